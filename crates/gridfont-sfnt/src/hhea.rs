// this_file: crates/gridfont-sfnt/src/hhea.rs

//! `hhea` table: generic horizontal metrics

use crate::{ParseError, Reader, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hhea {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub number_of_h_metrics: u16,
}

impl Hhea {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let _version = r.read_u32().map_err(|_| ParseError::InvalidHheaTable)?;
        let ascender = r.read_i16().map_err(|_| ParseError::InvalidHheaTable)?;
        let descender = r.read_i16().map_err(|_| ParseError::InvalidHheaTable)?;
        let line_gap = r.read_i16().map_err(|_| ParseError::InvalidHheaTable)?;
        let advance_width_max = r.read_u16().map_err(|_| ParseError::InvalidHheaTable)?;
        // minLeft/RightSideBearing, xMaxExtent, caret slope + offset, reserved,
        // metricDataFormat
        r.skip(2 * 11).map_err(|_| ParseError::InvalidHheaTable)?;
        let number_of_h_metrics = r.read_u16().map_err(|_| ParseError::InvalidHheaTable)?;

        Ok(Self {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            number_of_h_metrics,
        })
    }
}

#[cfg(test)]
pub(crate) fn build_hhea(ascender: i16, descender: i16, line_gap: i16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
    out.extend_from_slice(&ascender.to_be_bytes());
    out.extend_from_slice(&descender.to_be_bytes());
    out.extend_from_slice(&line_gap.to_be_bytes());
    out.extend_from_slice(&1229u16.to_be_bytes()); // advanceWidthMax
    out.extend_from_slice(&[0u8; 2 * 11]);
    out.extend_from_slice(&3u16.to_be_bytes()); // numberOfHMetrics
    out
}
