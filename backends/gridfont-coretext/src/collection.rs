// this_file: backends/gridfont-coretext/src/collection.rs

//! TrueType collection handling.
//!
//! CoreGraphics only loads the first face of a `ttcf` buffer, so when a
//! collection index is requested the chosen face is rebuilt as a
//! standalone sfnt: new header, rebased table records, table data copied
//! with 4-byte alignment. Checksums are carried over unchanged;
//! CoreText does not verify them.

use gridfont_core::Result;
use gridfont_sfnt::{ParseError, Reader};

const TTCF: u32 = u32::from_be_bytes(*b"ttcf");

pub fn extract_face(data: &[u8], index: u32) -> Result<Vec<u8>> {
    let mut r = Reader::new(data);
    if r.read_u32()? != TTCF {
        if index != 0 {
            return Err(ParseError::FaceIndexOutOfBounds.into());
        }
        return Ok(data.to_vec());
    }

    r.skip(4)?; // version
    let num_faces = r.read_u32()?;
    if index >= num_faces {
        return Err(ParseError::FaceIndexOutOfBounds.into());
    }
    r.skip(index as usize * 4)?;
    let dir_offset = r.read_u32()? as usize;

    r.seek(dir_offset)?;
    let sfnt_version = r.read_u32()?;
    let num_tables = r.read_u16()?;
    r.skip(6)?;

    struct Record {
        tag: u32,
        checksum: u32,
        offset: usize,
        len: usize,
    }
    let mut records = Vec::with_capacity(num_tables as usize);
    for _ in 0..num_tables {
        let tag = r.read_u32()?;
        let checksum = r.read_u32()?;
        let offset = r.read_u32()? as usize;
        let len = r.read_u32()? as usize;
        match offset.checked_add(len) {
            Some(end) if end <= data.len() => {}
            _ => return Err(ParseError::UnexpectedEof.into()),
        }
        records.push(Record {
            tag,
            checksum,
            offset,
            len,
        });
    }

    let n = num_tables as u32;
    let entry_selector = 31 - (n.max(1)).leading_zeros();
    let search_range = 16u32 << entry_selector;

    let header_len = 12 + 16 * records.len();
    let mut out = Vec::with_capacity(header_len + records.iter().map(|t| t.len + 3).sum::<usize>());
    out.extend_from_slice(&sfnt_version.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&(search_range as u16).to_be_bytes());
    out.extend_from_slice(&(entry_selector as u16).to_be_bytes());
    out.extend_from_slice(&((16 * n).saturating_sub(search_range) as u16).to_be_bytes());

    let mut next_offset = header_len;
    for rec in &records {
        out.extend_from_slice(&rec.tag.to_be_bytes());
        out.extend_from_slice(&rec.checksum.to_be_bytes());
        out.extend_from_slice(&(next_offset as u32).to_be_bytes());
        out.extend_from_slice(&(rec.len as u32).to_be_bytes());
        next_offset += (rec.len + 3) & !3;
    }
    for rec in &records {
        out.extend_from_slice(&data[rec.offset..rec.offset + rec.len]);
        // Pad to 4-byte alignment.
        out.resize(out.len().div_ceil(4) * 4, 0);
    }

    Ok(out)
}
