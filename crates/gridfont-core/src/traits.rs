// this_file: crates/gridfont-core/src/traits.rs

//! The face abstraction implemented by every rendering backend.

use gridfont_sfnt::FaceMetrics;

use crate::atlas::Atlas;
use crate::error::Result;
use crate::types::{Glyph, GlyphId, RenderOptions, SizeOptions, Variation};

/// One loaded font face at a specific pixel size.
///
/// Backends hold their own font objects and caches behind this trait;
/// callers see a uniform surface for lookup, metrics and rasterization.
///
/// `render_glyph` takes `&self` so many glyphs can be rendered without
/// exclusive access to the face; backends that need mutable scratch
/// state guard it internally. Size and variation changes take `&mut self`
/// and invalidate whatever the backend derived from the old size.
pub trait Face {
    /// Map a character to its glyph index, `None` when the face has no
    /// glyph for it.
    fn glyph_index(&self, ch: char) -> Option<GlyphId>;

    /// Whether the face carries any color glyph format at all.
    fn has_color(&self) -> bool;

    /// Whether this specific glyph renders in color. Backends differ in
    /// precision; a `true` answer means the glyph needs a color atlas.
    fn is_color_glyph(&self, glyph_id: GlyphId) -> bool;

    /// Compute typographic metrics at the current size.
    fn metrics(&self) -> Result<FaceMetrics>;

    /// Rescale the face.
    fn set_size(&mut self, size: SizeOptions) -> Result<()>;

    /// Apply variation axis settings, then rescale. Unknown tags are
    /// ignored so a shared variation list can target mixed font sets.
    fn set_variations(&mut self, variations: &[Variation], size: SizeOptions) -> Result<()>;

    /// Rasterize a glyph into `atlas` and describe where it landed.
    fn render_glyph(
        &self,
        atlas: &mut Atlas,
        glyph_id: GlyphId,
        opts: &RenderOptions,
    ) -> Result<Glyph>;
}
