// this_file: crates/gridfont-core/src/lib.rs

//! Core types for grid-oriented font rendering.
//!
//! This crate defines the backend-neutral pieces of the pipeline: the
//! [`Face`] trait rendering backends implement, the glyph [`Atlas`],
//! cell geometry ([`GridMetrics`]), the glyph [`Constraint`] engine, and
//! the shared error type. Backends live in their own crates and depend
//! on this one.

pub mod atlas;
pub mod constraint;
pub mod error;
pub mod fixed;
pub mod grid;
pub mod traits;
pub mod types;

pub use atlas::{Atlas, Format, Region};
pub use constraint::{AlignRule, Constraint, GlyphBox, HeightRule, SizeRule};
pub use error::{FaceError, Result};
pub use fixed::F26Dot6;
pub use grid::GridMetrics;
pub use traits::Face;
pub use types::{Glyph, GlyphId, RenderOptions, SizeOptions, Synthetic, Variation};

pub use gridfont_sfnt::FaceMetrics;
