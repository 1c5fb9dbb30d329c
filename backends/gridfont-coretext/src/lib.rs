// this_file: backends/gridfont-coretext/src/lib.rs

//! CoreText face backend for macOS.
//!
//! Glyph lookup, metrics probing and rasterization go through the same
//! CoreText pipeline the system text renderer uses, so output matches
//! native macOS terminals pixel for pixel. Table-level decisions
//! (metric fallbacks, color classification) still read the raw sfnt
//! tables through `gridfont-sfnt`, shared with the portable backend.

#![cfg(target_os = "macos")]

use std::path::Path;
use std::sync::Arc;

use core_foundation::base::{CFType, TCFType, TCFTypeRef};
use core_foundation::dictionary::CFMutableDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use core_graphics::base::CGFloat;
use core_graphics::color_space::CGColorSpace;
use core_graphics::context::{CGContext, CGTextDrawingMode};
use core_graphics::data_provider::CGDataProvider;
use core_graphics::font::{CGFont, CGGlyph};
use core_graphics::geometry::{CGAffineTransform, CGPoint, CGRect, CGSize};
use core_text::font::{self, CTFont, CTFontRef};
use core_text::font_descriptor::{self, kCTFontVariationAttribute, CTFontDescriptorRef};

use gridfont_core::{
    Atlas, Face, FaceError, FaceMetrics, Format, Glyph, GlyphBox, GlyphId, GridMetrics,
    RenderOptions, Result, SizeOptions, Synthetic, Variation,
};
use gridfont_sfnt::{metrics, Head, Hhea, Os2, ParseError, Post, Svg, TableDirectory, Tag};

mod collection;

pub use collection::extract_face;

/// Horizontal skew for synthetic italic, tan of roughly 12 degrees.
pub const ITALIC_SHEAR: CGFloat = 0.2126;

/// Keeps font bytes alive for as long as CoreGraphics references them.
struct ProviderData {
    bytes: Arc<[u8]>,
}

impl AsRef<[u8]> for ProviderData {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// A font face rendered through CoreText.
///
/// Rendering draws into a context created per call; no mutable state is
/// shared between `render_glyph` invocations, so a face can serve many
/// renders concurrently without locking.
pub struct CoreTextFace {
    bytes: Arc<[u8]>,
    cg_font: CGFont,
    ct_font: CTFont,
    size: SizeOptions,
    px_per_em: f32,
    synthetic: Synthetic,
    variations: Vec<Variation>,
    quirks_default_features: bool,
    head: Head,
    hhea: Hhea,
    post: Option<Post>,
    os2: Option<Os2>,
    svg: Option<Svg>,
    has_sbix: bool,
}

impl CoreTextFace {
    pub fn new(data: Vec<u8>, index: u32, size: SizeOptions) -> Result<Self> {
        Self::with_variations(data, index, &[], size)
    }

    pub fn with_variations(
        data: Vec<u8>,
        index: u32,
        variations: &[Variation],
        size: SizeOptions,
    ) -> Result<Self> {
        let bytes: Arc<[u8]> = extract_face(&data, index)?.into();

        let (head, hhea, post, os2, svg, has_sbix) = {
            let dir = TableDirectory::new(&bytes, 0)?;
            let head = Head::parse(
                dir.head_table()
                    .ok_or(ParseError::MissingTable(Tag::HEAD))?,
            )?;
            let hhea = Hhea::parse(dir.table(Tag::HHEA).ok_or(ParseError::MissingTable(Tag::HHEA))?)?;
            let post = dir.table(Tag::POST).map(Post::parse).transpose()?;
            let os2 = dir.table(Tag::OS2).map(Os2::parse).transpose()?;
            let svg = dir.table(Tag::SVG).and_then(|t| Svg::parse(t).ok());
            (head, hhea, post, os2, svg, dir.has_table(Tag::SBIX))
        };

        let provider = CGDataProvider::from_buffer(Arc::new(ProviderData {
            bytes: bytes.clone(),
        }));
        let cg_font =
            CGFont::from_data_provider(provider).map_err(|_| FaceError::FontInitFailure)?;

        let px = size.px_per_em();
        if !(px > 0.0 && px.is_finite()) {
            return Err(FaceError::FontInitFailure);
        }
        let ct_font = derive_ct_font(&cg_font, px as f64, variations)?;
        let quirks_default_features = family_needs_feature_quirk(&ct_font.family_name());

        Ok(Self {
            bytes,
            cg_font,
            ct_font,
            size,
            px_per_em: px,
            synthetic: Synthetic::default(),
            variations: variations.to_vec(),
            quirks_default_features,
            head,
            hhea,
            post,
            os2,
            svg,
            has_sbix,
        })
    }

    pub fn from_file(path: impl AsRef<Path>, index: u32, size: SizeOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::new(data, index, size)
    }

    /// A new face over the same font data at a different size. Variation
    /// settings and synthetic styling carry over.
    pub fn from_face_copy(&self, size: SizeOptions) -> Result<Self> {
        let mut face = Self {
            bytes: self.bytes.clone(),
            cg_font: self.cg_font.clone(),
            ct_font: self.ct_font.clone(),
            size: self.size,
            px_per_em: self.px_per_em,
            synthetic: self.synthetic,
            variations: self.variations.clone(),
            quirks_default_features: self.quirks_default_features,
            head: self.head,
            hhea: self.hhea,
            post: self.post,
            os2: self.os2,
            svg: self.svg.clone(),
            has_sbix: self.has_sbix,
        };
        face.set_size(size)?;
        Ok(face)
    }

    /// Copy of this face with bold emboldening enabled.
    pub fn synthetic_bold(&self) -> Result<Self> {
        let mut face = self.from_face_copy(self.size)?;
        face.synthetic.bold = true;
        Ok(face)
    }

    /// Copy of this face with italic shear enabled.
    pub fn synthetic_italic(&self) -> Result<Self> {
        let mut face = self.from_face_copy(self.size)?;
        face.synthetic.italic = true;
        Ok(face)
    }

    /// Enable style approximations for faces lacking a bold or italic
    /// variant.
    pub fn set_synthetic(&mut self, synthetic: Synthetic) {
        self.synthetic = synthetic;
    }

    pub fn synthetic(&self) -> Synthetic {
        self.synthetic
    }

    pub fn size(&self) -> SizeOptions {
        self.size
    }

    /// Whether default OpenType features should be suppressed for this
    /// family (system monospace fonts whose `calt` rules are broken for
    /// terminal grids).
    pub fn disable_default_font_features(&self) -> bool {
        self.quirks_default_features
    }

    /// Raw bytes of the loaded face (collection already sliced).
    pub fn data(&self) -> &[u8] {
        &self.bytes
    }

    fn glyph_advance(&self, glyph_id: GlyphId) -> f64 {
        let glyph = glyph_id.min(u16::MAX as u32) as CGGlyph;
        unsafe {
            CTFontGetAdvancesForGlyphs(
                self.ct_font.as_concrete_TypeRef(),
                ORIENTATION_DEFAULT,
                &glyph,
                std::ptr::null_mut(),
                1,
            )
        }
    }

    fn glyph_bounds(&self, glyph_id: GlyphId) -> CGRect {
        let glyph = glyph_id.min(u16::MAX as u32) as CGGlyph;
        unsafe {
            CTFontGetBoundingRectsForGlyphs(
                self.ct_font.as_concrete_TypeRef(),
                ORIENTATION_DEFAULT,
                &glyph,
                std::ptr::null_mut(),
                1,
            )
        }
    }

    #[allow(clippy::too_many_lines)]
    fn render_into_context(
        &self,
        atlas: &mut Atlas,
        glyph_id: GlyphId,
        opts: &RenderOptions,
        color: bool,
    ) -> Result<Glyph> {
        let advance_x = self.glyph_advance(glyph_id) as f32;
        let bounds = self.glyph_bounds(glyph_id);

        // Whitespace and sub-quarter-pixel glyphs are all-zero glyphs,
        // advance included; the renderer spaces them off the grid alone.
        if bounds.size.width < 0.25 || bounds.size.height < 0.25 {
            return Ok(Glyph::default());
        }

        // Bitmap (sbix) glyphs get neither bold growth nor smoothing.
        let synthetic_bold = self.synthetic.bold && !color;
        let thicken = opts.thicken && !color;
        let stroke = if synthetic_bold {
            (self.px_per_em as f64 / 64.0).max(0.25)
        } else {
            0.0
        };
        // Smoothed strokes bleed up to a pixel past the reported bounds.
        let smooth_pad = if thicken {
            opts.thicken_strength as f64 / 255.0
        } else {
            0.0
        };
        let pad = ((stroke / 2.0) + smooth_pad).ceil();

        let mut min_x = bounds.origin.x;
        let max_x = bounds.origin.x + bounds.size.width;
        let natural = if self.synthetic.italic && !color {
            // The shear moves outline tops rightward.
            GlyphBox {
                width: bounds.size.width
                    + ITALIC_SHEAR * (bounds.origin.y + bounds.size.height).max(0.0)
                    + 2.0 * pad,
                height: bounds.size.height + 2.0 * pad,
                x: min_x - pad,
                y: bounds.origin.y - pad,
            }
        } else {
            GlyphBox {
                width: max_x - min_x + 2.0 * pad,
                height: bounds.size.height + 2.0 * pad,
                x: min_x - pad,
                y: bounds.origin.y - pad,
            }
        };
        min_x = natural.x;
        let min_y = natural.y;

        let target = opts
            .constraint
            .constrain(natural, &opts.grid, opts.constraint_width);
        let scale_x = (target.width / natural.width) as CGFloat;
        let scale_y = (target.height / natural.height) as CGFloat;

        let width = (target.width.ceil() as u32).max(1);
        let height = (target.height.ceil() as u32).max(1);

        let depth = if color { 4usize } else { 1 };
        let bytes_per_row = width as usize * depth;
        let mut buffer = vec![0u8; height as usize * bytes_per_row];

        let context = if color {
            let space = CGColorSpace::create_device_rgb();
            CGContext::create_bitmap_context(
                Some(buffer.as_mut_ptr() as *mut _),
                width as usize,
                height as usize,
                8,
                bytes_per_row,
                &space,
                core_graphics::base::kCGImageAlphaPremultipliedLast,
            )
        } else {
            let space = CGColorSpace::create_device_gray();
            CGContext::create_bitmap_context(
                Some(buffer.as_mut_ptr() as *mut _),
                width as usize,
                height as usize,
                8,
                bytes_per_row,
                &space,
                core_graphics::base::kCGImageAlphaNone,
            )
        };

        context.set_should_antialias(true);
        context.set_allows_font_smoothing(true);
        context.set_should_smooth_fonts(thicken);

        if synthetic_bold {
            context.set_text_drawing_mode(CGTextDrawingMode::CGTextFillStroke);
            context.set_line_width(stroke);
            context.set_rgb_stroke_color(1.0, 1.0, 1.0, 1.0);
        } else {
            context.set_text_drawing_mode(CGTextDrawingMode::CGTextFill);
        }
        context.set_rgb_fill_color(1.0, 1.0, 1.0, 1.0);

        // Map the glyph box to the bitmap: scale to the constrained size,
        // then shift so the box's lower left lands on the context origin.
        context.scale(scale_x, scale_y);
        context.translate(-min_x, -min_y);
        if self.synthetic.italic && !color {
            context.set_text_matrix(&CGAffineTransform::new(
                1.0,
                0.0,
                ITALIC_SHEAR,
                1.0,
                0.0,
                0.0,
            ));
        }

        let glyph = glyph_id.min(u16::MAX as u32) as CGGlyph;
        self.ct_font
            .draw_glyphs(&[glyph], &[CGPoint::new(0.0, 0.0)], context.clone());
        drop(context);

        if color {
            // Premultiplied RGBA out of CoreGraphics, BGRA in the atlas.
            for px in buffer.chunks_exact_mut(4) {
                px.swap(0, 2);
            }
        }

        let region = atlas.reserve(width, height)?;
        if region.width > 0 {
            atlas.set(region, &buffer)?;
        }

        Ok(Glyph {
            width,
            height,
            offset_x: target.x.floor() as i32 + cell_center_adjustment(&opts.grid),
            offset_y: target.y.floor() as i32 + height as i32,
            atlas_x: region.x,
            atlas_y: region.y,
            advance_x,
        })
    }
}

impl Face for CoreTextFace {
    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        let mut units = [0u16; 2];
        let encoded = ch.encode_utf16(&mut units);
        let count = encoded.len();
        let mut glyphs = [0 as CGGlyph; 2];
        let mapped = unsafe {
            self.ct_font
                .get_glyphs_for_characters(units.as_ptr(), glyphs.as_mut_ptr(), count as isize)
        };
        // A surrogate pair still maps to a single glyph in slot zero.
        (mapped && glyphs[0] != 0).then_some(glyphs[0] as u32)
    }

    fn has_color(&self) -> bool {
        self.has_sbix || self.svg.is_some()
    }

    /// Coarse by design: an sbix font reports every glyph as color, which
    /// matches how CoreText itself rasterizes such fonts.
    fn is_color_glyph(&self, glyph_id: GlyphId) -> bool {
        if self.has_sbix {
            return true;
        }
        self.svg.as_ref().is_some_and(|svg| svg.has_glyph(glyph_id))
    }

    fn metrics(&self) -> Result<FaceMetrics> {
        let mut max_ascii: Option<f64> = None;
        for ch in ' '..='~' {
            let Some(gid) = self.glyph_index(ch) else {
                continue;
            };
            let adv = self.glyph_advance(gid);
            if adv > 0.0 {
                max_ascii = Some(max_ascii.map_or(adv, |m| m.max(adv)));
            }
        }

        let positive = |v: f64| (v.is_finite() && v > 0.0).then_some(v);
        let px_per_unit = self.px_per_em as f64 / self.head.units_per_em as f64;
        let probes = metrics::Probes {
            cap_height: positive(self.ct_font.cap_height()),
            ex_height: positive(self.ct_font.x_height()),
            max_ascii_advance: max_ascii,
            fallback_max_advance: self.hhea.advance_width_max as f64 * px_per_unit,
        };

        let post = self.post.unwrap_or(Post {
            underline_position: 0,
            underline_thickness: 0,
            is_fixed_pitch: false,
        });

        Ok(metrics::resolve(
            self.head.units_per_em,
            self.px_per_em as f64,
            &post,
            &self.hhea,
            self.os2.as_ref(),
            probes,
            true,
        ))
    }

    fn set_size(&mut self, size: SizeOptions) -> Result<()> {
        let px = size.px_per_em();
        if !(px > 0.0 && px.is_finite()) {
            return Err(FaceError::SetSizeFailed);
        }
        // A CTFont is immutable; resizing derives a fresh one, reapplying
        // any variation settings.
        self.ct_font = derive_ct_font(&self.cg_font, px as f64, &self.variations)
            .map_err(|_| FaceError::SetSizeFailed)?;
        self.size = size;
        self.px_per_em = px;
        Ok(())
    }

    fn set_variations(&mut self, variations: &[Variation], size: SizeOptions) -> Result<()> {
        self.variations = variations.to_vec();
        self.set_size(size)
    }

    fn render_glyph(
        &self,
        atlas: &mut Atlas,
        glyph_id: GlyphId,
        opts: &RenderOptions,
    ) -> Result<Glyph> {
        let color = self.is_color_glyph(glyph_id);
        match (color, atlas.format()) {
            (true, Format::Bgra) | (false, Format::Grayscale) => {}
            _ => return Err(FaceError::WrongAtlas),
        }
        if color {
            log::trace!("glyph {glyph_id}: color bitmap context");
        }
        self.render_into_context(atlas, glyph_id, opts, color)
    }
}

/// Build a sized CTFont, with a variation descriptor when axis settings
/// are present. Unknown axis tags are dropped by CoreText.
fn derive_ct_font(cg_font: &CGFont, px: f64, variations: &[Variation]) -> Result<CTFont> {
    let base = font::new_from_CGFont(cg_font, px);
    if base.as_concrete_TypeRef().as_void_ptr().is_null() {
        return Err(FaceError::FontInitFailure);
    }
    if variations.is_empty() {
        return Ok(base);
    }

    let mut axis_values = CFMutableDictionary::<CFNumber, CFNumber>::new();
    for v in variations {
        let axis = u32::from_be_bytes(v.tag) as i64;
        axis_values.set(CFNumber::from(axis), CFNumber::from(v.value as f64));
    }
    let axis_values = axis_values.to_immutable();

    let mut attributes = CFMutableDictionary::<CFString, CFType>::new();
    let var_key = unsafe { CFString::wrap_under_get_rule(kCTFontVariationAttribute) };
    let var_value = unsafe { CFType::wrap_under_get_rule(axis_values.as_CFTypeRef()) };
    attributes.set(var_key, var_value);
    let descriptor = font_descriptor::new_from_attributes(&attributes.to_immutable());

    let varied = unsafe {
        let font_ref = CTFontCreateCopyWithAttributes(
            base.as_concrete_TypeRef(),
            px,
            std::ptr::null(),
            descriptor.as_concrete_TypeRef(),
        );
        if font_ref.is_null() {
            return Err(FaceError::FontInitFailure);
        }
        CTFont::wrap_under_create_rule(font_ref)
    };
    Ok(varied)
}

/// System monospace families whose default `calt` substitutions misfire
/// on terminal grids.
fn family_needs_feature_quirk(family: &str) -> bool {
    matches!(family, "Menlo" | "Monaco")
}

/// Horizontal shift that recenters glyphs when the cell width was forced
/// away from the face's natural width.
fn cell_center_adjustment(grid: &GridMetrics) -> i32 {
    match grid.original_cell_width {
        Some(original) => (grid.cell_width as i32 - original as i32) / 2,
        None => 0,
    }
}

const ORIENTATION_DEFAULT: u32 = 0;

#[link(name = "CoreText", kind = "framework")]
extern "C" {
    fn CTFontGetAdvancesForGlyphs(
        font: CTFontRef,
        orientation: u32,
        glyphs: *const CGGlyph,
        advances: *mut CGSize,
        count: isize,
    ) -> f64;
    fn CTFontGetBoundingRectsForGlyphs(
        font: CTFontRef,
        orientation: u32,
        glyphs: *const CGGlyph,
        rects: *mut CGRect,
        count: isize,
    ) -> CGRect;
    fn CTFontCreateCopyWithAttributes(
        font: CTFontRef,
        size: CGFloat,
        matrix: *const CGAffineTransform,
        attributes: CTFontDescriptorRef,
    ) -> CTFontRef;
}
