// this_file: crates/gridfont-sfnt/src/lib.rs

//! Raw OpenType table access for gridfont
//!
//! Terminal font metrics come straight out of the binary `head`, `post`,
//! `hhea` and `OS/2` tables, so this crate parses exactly those (plus the
//! `SVG ` document list and `sbix`/`CBDT` presence checks used for color
//! glyph classification) with explicit versioned structs and bounds-checked
//! big-endian reads. Truncated data surfaces as [`ParseError::UnexpectedEof`]
//! rather than a panic.
//!
//! Both face backends share these parsers: the portable backend feeds them
//! slices out of the font file, the CoreText backend feeds them table copies
//! returned by the system font object. The vertical-metric selection policy
//! lives in [`metrics`] so the two backends cannot drift apart.

use thiserror::Error;

pub mod directory;
pub mod head;
pub mod hhea;
pub mod metrics;
pub mod os2;
pub mod post;
pub mod reader;
pub mod svg;

pub use directory::TableDirectory;
pub use head::Head;
pub use hhea::Hhea;
pub use metrics::FaceMetrics;
pub use os2::Os2;
pub use post::Post;
pub use reader::{Reader, Tag};
pub use svg::Svg;

pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors produced while reading font binary tables
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("table data ended early")]
    UnexpectedEof,

    #[error("not an sfnt font (unknown magic)")]
    UnknownMagic,

    #[error("font collection has no face at the requested index")]
    FaceIndexOutOfBounds,

    #[error("required table missing: {0}")]
    MissingTable(Tag),

    #[error("invalid head table")]
    InvalidHeadTable,

    #[error("invalid post table")]
    InvalidPostTable,

    #[error("invalid hhea table")]
    InvalidHheaTable,

    #[error("invalid OS/2 table")]
    InvalidOs2Table,

    #[error("invalid SVG table")]
    InvalidSvgTable,
}
