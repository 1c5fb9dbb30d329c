// this_file: crates/gridfont-sfnt/src/svg.rs

//! `SVG ` table: glyph coverage only
//!
//! Color classification needs to know whether a glyph has an SVG document,
//! not what the document contains, so only the document list's glyph ranges
//! are parsed. Rendering of the documents themselves is out of scope.

use crate::{ParseError, Reader, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct GlyphRange {
    start: u16,
    end: u16,
}

/// Parsed `SVG ` glyph coverage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Svg {
    // Sorted by start glyph id per the table spec; lookup binary-searches.
    ranges: Vec<GlyphRange>,
}

impl Svg {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let _version = r.read_u16().map_err(|_| ParseError::InvalidSvgTable)?;
        let list_offset = r.read_u32().map_err(|_| ParseError::InvalidSvgTable)? as usize;
        let _reserved = r.read_u32().map_err(|_| ParseError::InvalidSvgTable)?;

        let mut r = Reader::new(data);
        r.seek(list_offset).map_err(|_| ParseError::InvalidSvgTable)?;
        let num_entries = r.read_u16().map_err(|_| ParseError::InvalidSvgTable)?;

        let mut ranges = Vec::with_capacity(num_entries as usize);
        for _ in 0..num_entries {
            let start = r.read_u16().map_err(|_| ParseError::InvalidSvgTable)?;
            let end = r.read_u16().map_err(|_| ParseError::InvalidSvgTable)?;
            if end < start {
                return Err(ParseError::InvalidSvgTable);
            }
            // svgDocOffset + svgDocLength, unused here
            r.skip(8).map_err(|_| ParseError::InvalidSvgTable)?;
            ranges.push(GlyphRange { start, end });
        }

        Ok(Self { ranges })
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Whether the glyph id has an SVG document.
    pub fn has_glyph(&self, glyph_id: u32) -> bool {
        let Ok(id) = u16::try_from(glyph_id) else {
            return false;
        };
        self.ranges
            .binary_search_by(|range| {
                if id < range.start {
                    std::cmp::Ordering::Greater
                } else if id > range.end {
                    std::cmp::Ordering::Less
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }
}

#[cfg(test)]
pub(crate) fn build_svg(ranges: &[(u16, u16)]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_be_bytes()); // version
    out.extend_from_slice(&10u32.to_be_bytes()); // document list offset
    out.extend_from_slice(&0u32.to_be_bytes()); // reserved
    out.extend_from_slice(&(ranges.len() as u16).to_be_bytes());
    for (start, end) in ranges {
        out.extend_from_slice(&start.to_be_bytes());
        out.extend_from_slice(&end.to_be_bytes());
        out.extend_from_slice(&0u32.to_be_bytes()); // svgDocOffset
        out.extend_from_slice(&4u32.to_be_bytes()); // svgDocLength
    }
    out
}
