// this_file: crates/gridfont-sfnt/src/reader.rs

//! Big-endian cursor over raw table bytes
//!
//! Every table parser in this crate goes through [`Reader`]; there is no
//! unchecked indexing anywhere in the parsing layer. Reads past the end of
//! the slice return [`ParseError::UnexpectedEof`].

use crate::{ParseError, Result};

/// A four-byte table tag, e.g. `head` or `OS/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const HEAD: Tag = Tag(*b"head");
    /// Bitmap-only macOS fonts carry `bhed` instead of `head`.
    pub const BHED: Tag = Tag(*b"bhed");
    pub const POST: Tag = Tag(*b"post");
    pub const HHEA: Tag = Tag(*b"hhea");
    pub const OS2: Tag = Tag(*b"OS/2");
    pub const SVG: Tag = Tag(*b"SVG ");
    pub const SBIX: Tag = Tag(*b"sbix");
    pub const CBDT: Tag = Tag(*b"CBDT");

    pub const fn from_u32(v: u32) -> Tag {
        Tag(v.to_be_bytes())
    }

    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for b in self.0 {
            let c = if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Bounds-checked big-endian reader.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(ParseError::UnexpectedEof);
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.seek(self.pos.checked_add(n).ok_or(ParseError::UnexpectedEof)?)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(n).ok_or(ParseError::UnexpectedEof)?;
        if end > self.data.len() {
            return Err(ParseError::UnexpectedEof);
        }
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(self.read_u16()? as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.read_u32()? as i32)
    }

    pub fn read_tag(&mut self) -> Result<Tag> {
        let b = self.read_bytes(4)?;
        Ok(Tag([b[0], b[1], b[2], b[3]]))
    }
}
