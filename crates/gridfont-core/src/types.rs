// this_file: crates/gridfont-core/src/types.rs

//! Value types that flow across the face boundary

use crate::constraint::Constraint;
use crate::grid::GridMetrics;

/// Unique identifier for a glyph within a font
pub type GlyphId = u32;

/// Placement record for one rasterized glyph.
///
/// Purely descriptive: the pixels live in the atlas at
/// `(atlas_x, atlas_y)`; offsets position the glyph box relative to the
/// pen position (`offset_y` is measured from the baseline up to the top
/// of the glyph box).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Glyph {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub atlas_x: u32,
    pub atlas_y: u32,
    /// Natural horizontal advance in pixels; never altered by constraints.
    pub advance_x: f32,
}

/// Requested size for a face: points plus the output DPI pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeOptions {
    pub points: f32,
    pub xdpi: f32,
    pub ydpi: f32,
}

impl SizeOptions {
    pub fn new(points: f32) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    /// Pixels per em at this size (72 points to the inch).
    pub fn px_per_em(&self) -> f32 {
        self.points * self.ydpi / 72.0
    }
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            points: 12.0,
            xdpi: 96.0,
            ydpi: 96.0,
        }
    }
}

/// One variable-font axis setting, e.g. `wght = 700`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variation {
    pub tag: [u8; 4],
    pub value: f32,
}

impl Variation {
    pub const fn new(tag: [u8; 4], value: f32) -> Self {
        Self { tag, value }
    }
}

/// Style approximations applied at render time when no dedicated font file
/// exists for the style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Synthetic {
    pub bold: bool,
    pub italic: bool,
}

/// Caller-owned inputs to `render_glyph`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Grid metrics computed from a prior metrics call (possibly adjusted
    /// by the terminal, e.g. a user cell-width override).
    pub grid: GridMetrics,
    /// How many grid cells the glyph may span (1 or 2).
    pub constraint_width: u8,
    pub constraint: Constraint,
    /// Extra font-smoothing intensity (honored by the CoreText backend).
    pub thicken: bool,
    /// 0-255 smoothing strength, meaningful only when `thicken` is set.
    pub thicken_strength: u8,
}

impl RenderOptions {
    pub fn new(grid: GridMetrics) -> Self {
        Self {
            grid,
            constraint_width: 1,
            constraint: Constraint::none(),
            thicken: false,
            thicken_strength: 0,
        }
    }
}
