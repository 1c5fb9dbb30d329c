// this_file: crates/gridfont-sfnt/src/os2.rs

//! `OS/2` table, versions 0 through 5

use crate::{ParseError, Reader, Result};

/// fsSelection bit 7: the font asks renderers to prefer the sTypo* fields.
pub const FS_SELECTION_USE_TYPO_METRICS: u16 = 1 << 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Os2 {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub weight_class: u16,
    pub fs_selection: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    /// Stored as a positive magnitude in the file; consumers negate it to
    /// match the sign convention of the other descent sources.
    pub win_descent: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    /// Only present in version >= 2.
    pub x_height: Option<i16>,
    /// Only present in version >= 2.
    pub cap_height: Option<i16>,
}

impl Os2 {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut r = Reader::new(data);
        let version = r.read_u16().map_err(|_| ParseError::InvalidOs2Table)?;
        let x_avg_char_width = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
        let weight_class = r.read_u16().map_err(|_| ParseError::InvalidOs2Table)?;
        // usWidthClass, fsType, subscript/superscript box (8 fields)
        r.skip(2 * 10).map_err(|_| ParseError::InvalidOs2Table)?;
        let strikeout_size = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
        let strikeout_position = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
        // sFamilyClass, panose, ulUnicodeRange1-4, achVendID
        r.skip(2 + 10 + 16 + 4).map_err(|_| ParseError::InvalidOs2Table)?;
        let fs_selection = r.read_u16().map_err(|_| ParseError::InvalidOs2Table)?;
        // usFirstCharIndex, usLastCharIndex
        r.skip(4).map_err(|_| ParseError::InvalidOs2Table)?;
        let typo_ascender = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
        let typo_descender = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
        let typo_line_gap = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
        let win_ascent = r.read_u16().map_err(|_| ParseError::InvalidOs2Table)?;
        let win_descent = r.read_u16().map_err(|_| ParseError::InvalidOs2Table)?;

        let (x_height, cap_height) = if version >= 2 {
            // ulCodePageRange1-2
            r.skip(8).map_err(|_| ParseError::InvalidOs2Table)?;
            let x_height = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
            let cap_height = r.read_i16().map_err(|_| ParseError::InvalidOs2Table)?;
            (Some(x_height), Some(cap_height))
        } else {
            (None, None)
        };

        Ok(Self {
            version,
            x_avg_char_width,
            weight_class,
            fs_selection,
            typo_ascender,
            typo_descender,
            typo_line_gap,
            win_ascent,
            win_descent,
            strikeout_size,
            strikeout_position,
            x_height,
            cap_height,
        })
    }

    pub fn use_typo_metrics(&self) -> bool {
        self.fs_selection & FS_SELECTION_USE_TYPO_METRICS != 0
    }

    /// Strikethrough `(position, thickness)` in font units, with the same
    /// broken-table policy as `post` underline fields.
    pub fn strikethrough(&self) -> (Option<i16>, Option<i16>) {
        if self.strikeout_size == 0 {
            let pos = (self.strikeout_position != 0).then_some(self.strikeout_position);
            (pos, None)
        } else {
            (Some(self.strikeout_position), Some(self.strikeout_size))
        }
    }
}

#[cfg(test)]
pub(crate) struct Os2Builder {
    pub version: u16,
    pub fs_selection: u16,
    pub typo_ascender: i16,
    pub typo_descender: i16,
    pub typo_line_gap: i16,
    pub win_ascent: u16,
    pub win_descent: u16,
    pub strikeout_size: i16,
    pub strikeout_position: i16,
    pub x_height: i16,
    pub cap_height: i16,
}

#[cfg(test)]
impl Default for Os2Builder {
    fn default() -> Self {
        Self {
            version: 4,
            fs_selection: 0,
            typo_ascender: 800,
            typo_descender: -200,
            typo_line_gap: 90,
            win_ascent: 1000,
            win_descent: 250,
            strikeout_size: 50,
            strikeout_position: 300,
            x_height: 520,
            cap_height: 720,
        }
    }
}

#[cfg(test)]
impl Os2Builder {
    pub(crate) fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.version.to_be_bytes());
        out.extend_from_slice(&600i16.to_be_bytes()); // xAvgCharWidth
        out.extend_from_slice(&400u16.to_be_bytes()); // usWeightClass
        out.extend_from_slice(&[0u8; 2 * 10]);
        out.extend_from_slice(&self.strikeout_size.to_be_bytes());
        out.extend_from_slice(&self.strikeout_position.to_be_bytes());
        out.extend_from_slice(&[0u8; 2 + 10 + 16 + 4]);
        out.extend_from_slice(&self.fs_selection.to_be_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&self.typo_ascender.to_be_bytes());
        out.extend_from_slice(&self.typo_descender.to_be_bytes());
        out.extend_from_slice(&self.typo_line_gap.to_be_bytes());
        out.extend_from_slice(&self.win_ascent.to_be_bytes());
        out.extend_from_slice(&self.win_descent.to_be_bytes());
        if self.version >= 2 {
            out.extend_from_slice(&[0u8; 8]); // ulCodePageRange1-2
            out.extend_from_slice(&self.x_height.to_be_bytes());
            out.extend_from_slice(&self.cap_height.to_be_bytes());
            out.extend_from_slice(&[0u8; 6]); // default/break char, max context
        }
        out
    }
}
