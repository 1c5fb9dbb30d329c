// this_file: crates/gridfont/src/lib.rs

//! Font faces for monospace grids.
//!
//! A [`Face`] turns font bytes into cell metrics and rasterized glyphs
//! packed into an [`Atlas`]. Two backends implement the trait:
//!
//! - `zeno` (default): a portable pure-Rust pipeline built on skrifa
//!   outlines and the zeno rasterizer.
//! - `coretext` (macOS): the system text stack, matching native
//!   rendering pixel for pixel.
//!
//! # Example
//!
//! ```ignore
//! use gridfont::prelude::*;
//!
//! let bytes = std::fs::read("mono.ttf")?;
//! let face = PlatformFace::new(bytes, 0, SizeOptions::default())?;
//! let grid = GridMetrics::calculate(&face.metrics()?);
//! let mut atlas = Atlas::new(512, 512, Format::Grayscale);
//! let gid = face.glyph_index('g').unwrap();
//! let glyph = face.render_glyph(&mut atlas, gid, &RenderOptions::new(grid))?;
//! ```
//!
//! # Feature Flags
//!
//! - `zeno`: portable backend (enabled by default)
//! - `coretext`: system backend, compiled on macOS only

pub use gridfont_core::{
    Atlas, Constraint, Face, FaceError, FaceMetrics, Format, Glyph, GlyphBox, GlyphId,
    GridMetrics, Region, RenderOptions, Result, SizeOptions, Synthetic, Variation,
};
pub use gridfont_core::{AlignRule, HeightRule, SizeRule};
pub use gridfont_sfnt as sfnt;

#[cfg(feature = "zeno")]
pub use gridfont_zeno as zeno;

#[cfg(all(feature = "coretext", target_os = "macos"))]
pub use gridfont_coretext as coretext;

/// The preferred face implementation for the current platform.
///
/// macOS builds with the `coretext` feature get the system stack;
/// everything else uses the portable rasterizer.
#[cfg(all(feature = "coretext", target_os = "macos"))]
pub type PlatformFace = gridfont_coretext::CoreTextFace;

#[cfg(all(feature = "zeno", not(all(feature = "coretext", target_os = "macos"))))]
pub type PlatformFace = gridfont_zeno::ZenoFace;

/// Common imports for typical usage.
pub mod prelude {
    pub use gridfont_core::{
        Atlas, Constraint, Face, FaceError, FaceMetrics, Format, Glyph, GlyphId, GridMetrics,
        RenderOptions, Result, SizeOptions, Synthetic, Variation,
    };

    #[cfg(any(
        feature = "zeno",
        all(feature = "coretext", target_os = "macos")
    ))]
    pub use crate::PlatformFace;
}
