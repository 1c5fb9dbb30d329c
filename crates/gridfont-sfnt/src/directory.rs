// this_file: crates/gridfont-sfnt/src/directory.rs

//! sfnt table directory, including TrueType collections
//!
//! Resolves a face index inside a `ttcf` wrapper (index 0 for plain files)
//! and exposes table slices by tag. All offsets and lengths are validated
//! against the underlying buffer before a slice is handed out.

use crate::{ParseError, Reader, Result, Tag};

const SFNT_VERSION_TRUETYPE: u32 = 0x0001_0000;
const SFNT_VERSION_CFF: u32 = u32::from_be_bytes(*b"OTTO");
const SFNT_VERSION_APPLE: u32 = u32::from_be_bytes(*b"true");
const SFNT_VERSION_TYP1: u32 = u32::from_be_bytes(*b"typ1");
const TTC_TAG: u32 = u32::from_be_bytes(*b"ttcf");

#[derive(Debug, Clone, Copy)]
struct Record {
    tag: Tag,
    offset: u32,
    length: u32,
}

/// Parsed table directory for one face of a font file.
#[derive(Debug, Clone)]
pub struct TableDirectory<'a> {
    data: &'a [u8],
    records: Vec<Record>,
}

impl<'a> TableDirectory<'a> {
    /// Parse the directory for face `index` of `data` (0 for non-TTC files).
    pub fn new(data: &'a [u8], index: u32) -> Result<Self> {
        let mut r = Reader::new(data);
        let magic = r.read_u32()?;

        let face_offset = if magic == TTC_TAG {
            // ttcf header: tag, version, numFonts, offsetTable[numFonts]
            let _version = r.read_u32()?;
            let num_fonts = r.read_u32()?;
            if index >= num_fonts {
                return Err(ParseError::FaceIndexOutOfBounds);
            }
            r.skip(index as usize * 4)?;
            r.read_u32()? as usize
        } else {
            if index != 0 {
                return Err(ParseError::FaceIndexOutOfBounds);
            }
            0
        };

        let mut r = Reader::new(data);
        r.seek(face_offset)?;
        let version = r.read_u32()?;
        match version {
            SFNT_VERSION_TRUETYPE | SFNT_VERSION_CFF | SFNT_VERSION_APPLE | SFNT_VERSION_TYP1 => {}
            _ => return Err(ParseError::UnknownMagic),
        }

        let num_tables = r.read_u16()?;
        // searchRange, entrySelector, rangeShift
        r.skip(6)?;

        let mut records = Vec::with_capacity(num_tables as usize);
        for _ in 0..num_tables {
            let tag = r.read_tag()?;
            let _checksum = r.read_u32()?;
            let offset = r.read_u32()?;
            let length = r.read_u32()?;
            records.push(Record {
                tag,
                offset,
                length,
            });
        }

        Ok(Self { data, records })
    }

    pub fn has_table(&self, tag: Tag) -> bool {
        self.records.iter().any(|rec| rec.tag == tag)
    }

    /// Returns the raw bytes of a table, or `None` if absent or if the
    /// directory entry points outside the file.
    pub fn table(&self, tag: Tag) -> Option<&'a [u8]> {
        let rec = self.records.iter().find(|rec| rec.tag == tag)?;
        let start = rec.offset as usize;
        let end = start.checked_add(rec.length as usize)?;
        self.data.get(start..end)
    }

    /// `head`, falling back to `bhed` for bitmap-only fonts.
    pub fn head_table(&self) -> Option<&'a [u8]> {
        self.table(Tag::HEAD).or_else(|| self.table(Tag::BHED))
    }
}
