// this_file: crates/gridfont-sfnt/src/post.rs

//! `post` table: underline metrics

use crate::{ParseError, Reader, Result};

/// Underline fields from `post`, in font units.
///
/// A `underline_thickness` of 0 marks the table as broken for underline
/// purposes; [`Post::underline`] encodes the fallback policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Post {
    pub underline_position: i16,
    pub underline_thickness: i16,
    pub is_fixed_pitch: bool,
}

impl Post {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let _version = r.read_u32().map_err(|_| ParseError::InvalidPostTable)?;
        let _italic_angle = r.read_i32().map_err(|_| ParseError::InvalidPostTable)?;
        let underline_position = r.read_i16().map_err(|_| ParseError::InvalidPostTable)?;
        let underline_thickness = r.read_i16().map_err(|_| ParseError::InvalidPostTable)?;
        let is_fixed_pitch = r.read_u32().map_err(|_| ParseError::InvalidPostTable)? != 0;

        Ok(Self {
            underline_position,
            underline_thickness,
            is_fixed_pitch,
        })
    }

    /// `(position, thickness)` in font units, with broken-table handling:
    /// a zero thickness yields no thickness, and yields a position only
    /// when the position field is itself non-zero.
    pub fn underline(&self) -> (Option<i16>, Option<i16>) {
        if self.underline_thickness == 0 {
            let pos = (self.underline_position != 0).then_some(self.underline_position);
            (pos, None)
        } else {
            (
                Some(self.underline_position),
                Some(self.underline_thickness),
            )
        }
    }
}

#[cfg(test)]
pub(crate) fn build_post(position: i16, thickness: i16) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x0003_0000u32.to_be_bytes()); // version 3.0
    out.extend_from_slice(&0i32.to_be_bytes()); // italicAngle
    out.extend_from_slice(&position.to_be_bytes());
    out.extend_from_slice(&thickness.to_be_bytes());
    out.extend_from_slice(&1u32.to_be_bytes()); // isFixedPitch
    out.extend_from_slice(&[0u8; 16]); // memory usage hints
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_underline_passes_through() {
        let post = Post::parse(&build_post(-120, 60)).unwrap();
        assert_eq!(post.underline(), (Some(-120), Some(60)));
        assert!(post.is_fixed_pitch);
    }

    #[test]
    fn zero_thickness_drops_both_when_position_also_zero() {
        let post = Post::parse(&build_post(0, 0)).unwrap();
        assert_eq!(post.underline(), (None, None));
    }

    #[test]
    fn zero_thickness_keeps_sane_position() {
        let post = Post::parse(&build_post(-100, 0)).unwrap();
        assert_eq!(post.underline(), (Some(-100), None));
    }

    #[test]
    fn truncated_post_fails_cleanly() {
        assert_eq!(
            Post::parse(&build_post(-1, 1)[..10]),
            Err(ParseError::InvalidPostTable)
        );
    }
}
