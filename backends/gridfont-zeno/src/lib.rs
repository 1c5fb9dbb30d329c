// this_file: backends/gridfont-zeno/src/lib.rs

//! Pure Rust face backend.
//!
//! Glyph outlines come from skrifa and are rasterized with zeno; embedded
//! color strikes (sbix, CBDT) are decoded directly. No system font
//! libraries are involved, so this backend behaves identically on every
//! platform.
//!
//! A [`ZenoFace`] is cheap to share behind `&self` for rendering: the
//! only mutable state is a scratch buffer pool guarded by a mutex, so
//! concurrent `render_glyph` calls serialize on rasterization only.

use kurbo::Shape;
use parking_lot::Mutex;
use skrifa::instance::Size;
use skrifa::outline::DrawSettings;
use skrifa::MetadataProvider;
use std::path::Path;

use gridfont_core::{
    Atlas, F26Dot6, FaceError, Format, GlyphBox, GlyphId, Glyph, GridMetrics, Result, SizeOptions,
    Synthetic, Variation,
};
use gridfont_core::{Face, FaceMetrics, RenderOptions};
use gridfont_sfnt::{metrics, Head, Hhea, Os2, ParseError, Post, Svg, TableDirectory, Tag};

mod bitmap;
mod pen;

pub use pen::ITALIC_SHEAR;

use pen::DualPen;

/// Variation settings beyond this count are dropped.
pub const MAX_VARIATION_AXES: usize = 32;

/// Reusable rasterization buffers.
#[derive(Default)]
struct Scratch {
    mask: Vec<u8>,
    bold: Vec<u8>,
}

/// A font face rendered entirely in Rust.
pub struct ZenoFace {
    data: Vec<u8>,
    index: u32,
    size: SizeOptions,
    px_per_em: f32,
    location: skrifa::instance::Location,
    synthetic: Synthetic,
    head: Head,
    hhea: Hhea,
    post: Option<Post>,
    os2: Option<Os2>,
    svg: Option<Svg>,
    has_sbix: bool,
    has_cbdt: bool,
    quirks_default_features: bool,
    scratch: Mutex<Scratch>,
}

impl ZenoFace {
    /// Load face `index` from raw font bytes at the given size.
    pub fn new(data: Vec<u8>, index: u32, size: SizeOptions) -> Result<Self> {
        Self::with_variations(data, index, &[], size)
    }

    /// Load a face with variation axis settings applied from the start.
    pub fn with_variations(
        data: Vec<u8>,
        index: u32,
        variations: &[Variation],
        size: SizeOptions,
    ) -> Result<Self> {
        let (head, hhea, post, os2, svg, has_sbix, has_cbdt) = {
            let dir = TableDirectory::new(&data, index)?;
            let head = Head::parse(
                dir.head_table()
                    .ok_or(ParseError::MissingTable(Tag::HEAD))?,
            )?;
            let hhea = Hhea::parse(dir.table(Tag::HHEA).ok_or(ParseError::MissingTable(Tag::HHEA))?)?;
            let post = dir.table(Tag::POST).map(Post::parse).transpose()?;
            let os2 = dir.table(Tag::OS2).map(Os2::parse).transpose()?;
            // A malformed SVG table degrades to "no svg glyphs" instead of
            // failing the whole face.
            let svg = dir.table(Tag::SVG).and_then(|t| Svg::parse(t).ok());
            (
                head,
                hhea,
                post,
                os2,
                svg,
                dir.has_table(Tag::SBIX),
                dir.has_table(Tag::CBDT),
            )
        };

        let quirks_default_features = {
            let font =
                skrifa::FontRef::from_index(&data, index).map_err(|_| FaceError::FontInitFailure)?;
            font.localized_strings(skrifa::string::StringId::FAMILY_NAME)
                .english_or_first()
                .map(|name| family_needs_feature_quirk(&name.chars().collect::<String>()))
                .unwrap_or(false)
        };

        let mut face = Self {
            data,
            index,
            size: SizeOptions::default(),
            px_per_em: SizeOptions::default().px_per_em(),
            location: skrifa::instance::Location::default(),
            synthetic: Synthetic::default(),
            head,
            hhea,
            post,
            os2,
            svg,
            has_sbix,
            has_cbdt,
            quirks_default_features,
            scratch: Mutex::new(Scratch::default()),
        };
        face.set_variations(variations, size)?;
        Ok(face)
    }

    pub fn from_file(path: impl AsRef<Path>, index: u32, size: SizeOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::new(data, index, size)
    }

    /// A new face over the same font data at a different size. Variation
    /// settings and synthetic styling carry over; scratch buffers do not.
    pub fn from_face_copy(&self, size: SizeOptions) -> Result<Self> {
        let mut face = Self {
            data: self.data.clone(),
            index: self.index,
            size: self.size,
            px_per_em: self.px_per_em,
            location: self.location.clone(),
            synthetic: self.synthetic,
            head: self.head,
            hhea: self.hhea,
            post: self.post,
            os2: self.os2,
            svg: self.svg.clone(),
            has_sbix: self.has_sbix,
            has_cbdt: self.has_cbdt,
            quirks_default_features: self.quirks_default_features,
            scratch: Mutex::new(Scratch::default()),
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

    /// Tags of the variation axes this face exposes, empty for static
    /// fonts.
    pub fn variation_axes(&self) -> Vec<[u8; 4]> {
        self.font()
            .map(|font| {
                font.axes()
                    .iter()
                    .map(|axis| axis.tag().to_be_bytes())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn font(&self) -> Result<skrifa::FontRef<'_>> {
        skrifa::FontRef::from_index(&self.data, self.index).map_err(|_| FaceError::FontInitFailure)
    }

    /// Bounding-box top of the glyph for `ch`, used as a measured cap or
    /// ex height.
    fn probe_top(&self, font: &skrifa::FontRef, ch: char) -> Option<f64> {
        let gid = font.charmap().map(ch)?;
        let outline = font.outline_glyphs().get(gid)?;
        let mut pen = DualPen::new(1.0, 1.0, 0.0);
        let settings = DrawSettings::unhinted(Size::new(self.px_per_em), &self.location);
        outline.draw(settings, &mut pen).ok()?;
        let (_, path) = pen.finish();
        let bbox = path.bounding_box();
        (bbox.y1.is_finite() && bbox.y1 > 0.0).then_some(bbox.y1)
    }

    fn advance(&self, font: &skrifa::FontRef, glyph_id: GlyphId) -> f32 {
        font.glyph_metrics(Size::new(self.px_per_em), &self.location)
            .advance_width(skrifa::GlyphId::new(glyph_id))
            .unwrap_or(0.0)
    }

    fn render_strike(
        &self,
        atlas: &mut Atlas,
        glyph_id: GlyphId,
        strike: bitmap::DecodedStrike,
        opts: &RenderOptions,
        font: &skrifa::FontRef,
    ) -> Result<Glyph> {
        if atlas.format() != Format::Bgra {
            return Err(FaceError::WrongAtlas);
        }

        // Natural box at the requested ppem, before any constraint.
        let natural_w = (strike.width as f32 * strike.scale_x) as f64;
        let natural_h = (strike.height as f32 * strike.scale_y) as f64;
        let natural = GlyphBox {
            width: natural_w,
            height: natural_h,
            x: strike.bearing_x as f64,
            y: strike.bearing_y as f64 - natural_h,
        };

        let target = opts
            .constraint
            .constrain(natural, &opts.grid, opts.constraint_width);
        let width = (target.width.round() as u32).max(1);
        let height = (target.height.round() as u32).max(1);

        let pixels = if (width, height) == (strike.width, strike.height) {
            strike.bgra
        } else {
            bitmap::scale_bgra_bilinear(&strike.bgra, strike.width, strike.height, width, height)
        };

        let region = atlas.reserve(width, height)?;
        if region.width > 0 {
            atlas.set(region, &pixels)?;
        }

        Ok(Glyph {
            width,
            height,
            offset_x: target.x.floor() as i32 + cell_center_adjustment(&opts.grid),
            offset_y: target.y.floor() as i32 + height as i32,
            atlas_x: region.x,
            atlas_y: region.y,
            advance_x: self.advance(font, glyph_id),
        })
    }

    fn render_outline(
        &self,
        atlas: &mut Atlas,
        glyph_id: GlyphId,
        opts: &RenderOptions,
        font: &skrifa::FontRef,
    ) -> Result<Glyph> {
        if atlas.format() != Format::Grayscale {
            return Err(FaceError::WrongAtlas);
        }

        let outlines = font.outline_glyphs();
        let outline = outlines
            .get(skrifa::GlyphId::new(glyph_id))
            .ok_or(FaceError::GlyphRenderFailed)?;

        let shear = if self.synthetic.italic { ITALIC_SHEAR } else { 0.0 };
        let mut dual = DualPen::new(1.0, 1.0, shear);
        let settings = DrawSettings::unhinted(Size::new(self.px_per_em), &self.location);
        outline
            .draw(settings, &mut dual)
            .map_err(|_| FaceError::GlyphRenderFailed)?;
        let empty = dual.is_empty();
        let (mut commands, path) = dual.finish();

        let advance_x = self.advance(font, glyph_id);

        let bbox = path.bounding_box();
        // Whitespace and sub-quarter-pixel outlines are all-zero glyphs,
        // advance included; the renderer spaces them off the grid alone.
        if empty
            || !bbox.x0.is_finite()
            || bbox.width() < 0.25
            || bbox.height() < 0.25
        {
            return Ok(Glyph::default());
        }

        let stroke = if self.synthetic.bold {
            (self.px_per_em / 32.0).max(0.5)
        } else {
            0.0
        };
        // Dilation margin so emboldened edges are not clipped.
        let pad = (stroke as f64 / 2.0).ceil();

        let natural = GlyphBox {
            width: bbox.width() + 2.0 * pad,
            height: bbox.height() + 2.0 * pad,
            x: bbox.x0 - pad,
            y: bbox.y0 - pad,
        };
        let target = opts
            .constraint
            .constrain(natural, &opts.grid, opts.constraint_width);

        let scale_x = (target.width / natural.width) as f32;
        let scale_y = (target.height / natural.height) as f32;

        // Constraint scaling is applied to the outline itself, then the
        // scaled outline is rasterized, so fitted glyphs stay sharp.
        let (min_x, min_y) = if (scale_x - 1.0).abs() > 1e-6 || (scale_y - 1.0).abs() > 1e-6 {
            let mut scaled = DualPen::new(scale_x, scale_y, shear);
            outline
                .draw(
                    DrawSettings::unhinted(Size::new(self.px_per_em), &self.location),
                    &mut scaled,
                )
                .map_err(|_| FaceError::GlyphRenderFailed)?;
            let (cmds, spath) = scaled.finish();
            commands = cmds;
            let sbox = spath.bounding_box();
            (sbox.x0 - pad, sbox.y0 - pad)
        } else {
            (natural.x, natural.y)
        };

        let width = (target.width.ceil() as u32).max(1);
        let height = (target.height.ceil() as u32).max(1);
        let len = width as usize * height as usize;

        let mut scratch = self.scratch.lock();
        let Scratch { mask, bold } = &mut *scratch;
        mask.clear();
        mask.resize(len, 0);

        let offset = zeno::Vector::new(-min_x as f32, -min_y as f32);
        zeno::Mask::new(commands.as_str())
            .size(width, height)
            .offset(offset)
            .render_into(mask, None);

        if self.synthetic.bold {
            bold.clear();
            bold.resize(len, 0);
            zeno::Mask::new(commands.as_str())
                .style(zeno::Style::Stroke(zeno::Stroke::new(stroke)))
                .size(width, height)
                .offset(offset)
                .render_into(bold, None);
            for (dst, &src) in mask.iter_mut().zip(bold.iter()) {
                *dst = (*dst).max(src);
            }
        }

        // Outline space is y-up, atlas rows are y-down.
        for y in 0..(height / 2) as usize {
            let top = y * width as usize;
            let bottom = (height as usize - 1 - y) * width as usize;
            for x in 0..width as usize {
                mask.swap(top + x, bottom + x);
            }
        }

        let region = atlas.reserve(width, height)?;
        if region.width > 0 {
            atlas.set(region, mask)?;
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

impl Face for ZenoFace {
    fn glyph_index(&self, ch: char) -> Option<GlyphId> {
        let font = self.font().ok()?;
        font.charmap().map(ch).map(|g| g.to_u32())
    }

    fn has_color(&self) -> bool {
        self.has_sbix || self.has_cbdt || self.svg.is_some()
    }

    fn is_color_glyph(&self, glyph_id: GlyphId) -> bool {
        let Ok(font) = self.font() else {
            return false;
        };
        if bitmap::strike_is_color(&font, glyph_id, self.px_per_em) {
            return true;
        }
        self.svg.as_ref().is_some_and(|svg| svg.has_glyph(glyph_id))
    }

    fn metrics(&self) -> Result<FaceMetrics> {
        let font = self.font()?;
        let gm = font.glyph_metrics(Size::new(self.px_per_em), &self.location);
        let charmap = font.charmap();

        let mut max_ascii: Option<f64> = None;
        for ch in ' '..='~' {
            let Some(gid) = charmap.map(ch) else { continue };
            let Some(adv) = gm.advance_width(gid) else {
                continue;
            };
            if adv > 0.0 {
                max_ascii = Some(max_ascii.map_or(adv as f64, |m: f64| m.max(adv as f64)));
            }
        }

        let px_per_unit = self.px_per_em as f64 / self.head.units_per_em as f64;
        let probes = metrics::Probes {
            cap_height: self.probe_top(&font, 'H'),
            ex_height: self.probe_top(&font, 'x'),
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
            false,
        ))
    }

    fn set_size(&mut self, size: SizeOptions) -> Result<()> {
        let px = size.px_per_em();
        if !(px > 0.0 && px.is_finite()) {
            return Err(FaceError::SetSizeFailed);
        }
        // Quantize to 26.6 so the pixel size lands on the same sub-pixel
        // steps a fixed-point rasterizer would use.
        self.size = size;
        self.px_per_em = F26Dot6::from_f32(px).to_f32();
        Ok(())
    }

    fn set_variations(&mut self, variations: &[Variation], size: SizeOptions) -> Result<()> {
        if variations.len() > MAX_VARIATION_AXES {
            log::warn!(
                "{} variation settings given, keeping the first {MAX_VARIATION_AXES}",
                variations.len()
            );
        }
        let location = {
            let font = self.font()?;
            let settings: Vec<(&str, f32)> = variations
                .iter()
                .take(MAX_VARIATION_AXES)
                .filter_map(|v| std::str::from_utf8(&v.tag).ok().map(|tag| (tag, v.value)))
                .collect();
            font.axes().location(settings)
        };
        self.location = location;
        self.set_size(size)
    }

    fn render_glyph(
        &self,
        atlas: &mut Atlas,
        glyph_id: GlyphId,
        opts: &RenderOptions,
    ) -> Result<Glyph> {
        let font = self.font()?;
        if let Some(strike) =
            bitmap::decode_strike(&font, glyph_id, self.px_per_em, self.head.units_per_em)?
        {
            log::trace!("glyph {glyph_id}: color strike path");
            return self.render_strike(atlas, glyph_id, strike, opts, &font);
        }
        self.render_outline(atlas, glyph_id, opts, &font)
    }
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
