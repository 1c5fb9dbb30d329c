// this_file: crates/gridfont-sfnt/src/head.rs

//! `head` (and `bhed`) font header table

use crate::{ParseError, Reader, Result};

const HEAD_MAGIC: u32 = 0x5F0F3CF5;

/// The fields of `head` the metrics pipeline actually consumes.
///
/// `bhed` shares the layout byte for byte, so bitmap-only fonts parse
/// through the same struct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    pub units_per_em: u16,
    pub flags: u16,
    pub mac_style: u16,
    pub lowest_rec_ppem: u16,
}

impl Head {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let _version = r.read_u32().map_err(|_| ParseError::InvalidHeadTable)?;
        let _font_revision = r.read_u32().map_err(|_| ParseError::InvalidHeadTable)?;
        let _checksum_adjustment = r.read_u32().map_err(|_| ParseError::InvalidHeadTable)?;
        let magic = r.read_u32().map_err(|_| ParseError::InvalidHeadTable)?;
        if magic != HEAD_MAGIC {
            return Err(ParseError::InvalidHeadTable);
        }
        let flags = r.read_u16().map_err(|_| ParseError::InvalidHeadTable)?;
        let units_per_em = r.read_u16().map_err(|_| ParseError::InvalidHeadTable)?;
        if units_per_em == 0 {
            return Err(ParseError::InvalidHeadTable);
        }
        // created + modified timestamps, glyph bbox
        r.skip(16 + 8).map_err(|_| ParseError::InvalidHeadTable)?;
        let mac_style = r.read_u16().map_err(|_| ParseError::InvalidHeadTable)?;
        let lowest_rec_ppem = r.read_u16().map_err(|_| ParseError::InvalidHeadTable)?;

        Ok(Self {
            units_per_em,
            flags,
            mac_style,
            lowest_rec_ppem,
        })
    }
}

#[cfg(test)]
pub(crate) fn build_head(units_per_em: u16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // version
    out.extend_from_slice(&0u32.to_be_bytes()); // fontRevision
    out.extend_from_slice(&0u32.to_be_bytes()); // checksumAdjustment
    out.extend_from_slice(&HEAD_MAGIC.to_be_bytes());
    out.extend_from_slice(&0u16.to_be_bytes()); // flags
    out.extend_from_slice(&units_per_em.to_be_bytes());
    out.extend_from_slice(&[0u8; 16]); // created + modified
    for v in [-10i16, -20, 1000, 900] {
        out.extend_from_slice(&v.to_be_bytes()); // glyph bbox
    }
    out.extend_from_slice(&0u16.to_be_bytes()); // macStyle
    out.extend_from_slice(&9u16.to_be_bytes()); // lowestRecPPEM
    out.extend_from_slice(&2i16.to_be_bytes()); // fontDirectionHint
    out.extend_from_slice(&0i16.to_be_bytes()); // indexToLocFormat
    out.extend_from_slice(&0i16.to_be_bytes()); // glyphDataFormat
    out
}
