// this_file: backends/gridfont-zeno/src/bitmap.rs

//! Embedded bitmap strike handling (sbix, CBDT/CBLC).
//!
//! Strikes are stored at fixed ppem sizes; we decode the best strike for
//! the requested size into premultiplied BGRA and resample it with
//! bilinear interpolation to the exact pixel size the caller needs.
//! Strike pixels are stored top-down, matching atlas row order, so no
//! vertical flip happens here.

use gridfont_core::{FaceError, Result};
use skrifa::bitmap::{BitmapData, BitmapFormat, BitmapGlyph, BitmapStrikes};
use skrifa::instance::Size;
use skrifa::GlyphId;

/// A color strike decoded at its native size.
pub struct DecodedStrike {
    pub width: u32,
    pub height: u32,
    /// Premultiplied BGRA rows, top-down.
    pub bgra: Vec<u8>,
    /// Origin to left edge, pixels at the requested ppem.
    pub bearing_x: f32,
    /// Baseline to top edge, pixels at the requested ppem, positive above
    /// the baseline.
    pub bearing_y: f32,
    /// Scale from the strike's native ppem to the requested ppem.
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Whether the best strike for this glyph at `ppem` carries color data.
///
/// Mask-format strikes are monochrome and intentionally report false;
/// those glyphs take the outline path.
pub fn strike_is_color(font: &skrifa::FontRef, glyph_id: u32, ppem: f32) -> bool {
    let strikes = BitmapStrikes::new(font);
    matches!(
        strikes
            .glyph_for_size(Size::new(ppem), GlyphId::new(glyph_id))
            .map(|g| g.data),
        Some(BitmapData::Png(_)) | Some(BitmapData::Bgra(_))
    )
}

/// Decode the best color strike for `glyph_id` at `ppem`.
///
/// Returns `Ok(None)` when the font has no usable color strike for the
/// glyph; decode failures on a present strike are hard errors.
pub fn decode_strike(
    font: &skrifa::FontRef,
    glyph_id: u32,
    ppem: f32,
    units_per_em: u16,
) -> Result<Option<DecodedStrike>> {
    let strikes = BitmapStrikes::new(font);
    let Some(glyph) = strikes.glyph_for_size(Size::new(ppem), GlyphId::new(glyph_id)) else {
        return Ok(None);
    };

    let (bgra, width, height) = match &glyph.data {
        BitmapData::Png(png_data) => {
            let decoded = decode_png_bgra(png_data)?;
            // Strike metadata and the embedded image should agree; when
            // they do not, the decoded dimensions are the ones the pixel
            // buffer is actually laid out with.
            if (decoded.1, decoded.2) != (glyph.width, glyph.height) {
                log::debug!(
                    "strike png is {}x{}, metadata says {}x{}",
                    decoded.1,
                    decoded.2,
                    glyph.width,
                    glyph.height
                );
            }
            decoded
        }
        BitmapData::Bgra(bgra_data) => {
            if bgra_data.len() < glyph.width as usize * glyph.height as usize * 4 {
                return Err(FaceError::BitmapHandlingError);
            }
            (bgra_data.to_vec(), glyph.width, glyph.height)
        }
        BitmapData::Mask(_) => return Ok(None),
    };

    let scale_x = if glyph.ppem_x > 0.0 {
        ppem / glyph.ppem_x
    } else {
        1.0
    };
    let scale_y = if glyph.ppem_y > 0.0 {
        ppem / glyph.ppem_y
    } else {
        1.0
    };

    let (bearing_x, bearing_y) =
        bearings(&glyph, &strikes, ppem, units_per_em, scale_x, scale_y, height);

    Ok(Some(DecodedStrike {
        width,
        height,
        bgra,
        bearing_x,
        bearing_y,
        scale_x,
        scale_y,
    }))
}

/// Bearings at the requested ppem.
///
/// sbix strikes routinely report a zero vertical bearing; the system
/// renderer compensates with a fixed 100 font-unit lift and emoji fonts
/// are drawn expecting it, so the same lift is applied here.
fn bearings(
    glyph: &BitmapGlyph,
    strikes: &BitmapStrikes,
    ppem: f32,
    units_per_em: u16,
    scale_x: f32,
    scale_y: f32,
    height_px: u32,
) -> (f32, f32) {
    let bearing_x = (glyph.bearing_x - glyph.inner_bearing_x) * scale_x;

    let mut bearing_y =
        if glyph.bearing_y == 0.0 && strikes.format() == Some(BitmapFormat::Sbix) {
            100.0 * ppem / units_per_em.max(1) as f32
        } else {
            glyph.bearing_y * scale_y
        };
    bearing_y -= glyph.inner_bearing_y * scale_y;

    if glyph.placement_origin == skrifa::bitmap::Origin::BottomLeft {
        bearing_y += height_px as f32 * scale_y;
    }

    (bearing_x, bearing_y)
}

/// Decode a strike PNG into premultiplied BGRA.
///
/// Returns the buffer together with the decoded width and height; those
/// dimensions describe the buffer layout even when the strike metadata
/// disagrees with the embedded image.
fn decode_png_bgra(png_data: &[u8]) -> Result<(Vec<u8>, u32, u32)> {
    let decoder = png::Decoder::new(png_data);
    let mut reader = decoder
        .read_info()
        .map_err(|_| FaceError::BitmapHandlingError)?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|_| FaceError::BitmapHandlingError)?;

    let pixels = info.width as usize * info.height as usize;
    let mut bgra = Vec::with_capacity(pixels * 4);
    match info.color_type {
        png::ColorType::Rgba => {
            for px in buf[..info.buffer_size()].chunks_exact(4) {
                let a = px[3] as u16;
                bgra.push((px[2] as u16 * a / 255) as u8);
                bgra.push((px[1] as u16 * a / 255) as u8);
                bgra.push((px[0] as u16 * a / 255) as u8);
                bgra.push(px[3]);
            }
        }
        png::ColorType::Rgb => {
            for px in buf[..info.buffer_size()].chunks_exact(3) {
                bgra.extend_from_slice(&[px[2], px[1], px[0], 255]);
            }
        }
        png::ColorType::Grayscale => {
            for &g in &buf[..info.buffer_size()] {
                bgra.extend_from_slice(&[g, g, g, 255]);
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for px in buf[..info.buffer_size()].chunks_exact(2) {
                let g = (px[0] as u16 * px[1] as u16 / 255) as u8;
                bgra.extend_from_slice(&[g, g, g, px[1]]);
            }
        }
        png::ColorType::Indexed => return Err(FaceError::UnsupportedGlyphFormat),
    }

    Ok((bgra, info.width, info.height))
}

/// Bilinear resample of a four-channel image. Target dimensions must be
/// non-zero.
pub fn scale_bgra_bilinear(
    src: &[u8],
    src_width: u32,
    src_height: u32,
    dst_width: u32,
    dst_height: u32,
) -> Vec<u8> {
    let sw = src_width as usize;
    let sh = src_height as usize;
    let dw = dst_width as usize;
    let dh = dst_height as usize;
    let mut dst = vec![0u8; dw * dh * 4];

    for dy in 0..dh {
        for dx in 0..dw {
            let sx = (dx as f32 + 0.5) * (sw as f32 / dw as f32) - 0.5;
            let sy = (dy as f32 + 0.5) * (sh as f32 / dh as f32) - 0.5;

            let x0 = (sx.floor() as isize).clamp(0, sw as isize - 1) as usize;
            let y0 = (sy.floor() as isize).clamp(0, sh as isize - 1) as usize;
            let x1 = (x0 + 1).min(sw - 1);
            let y1 = (y0 + 1).min(sh - 1);

            let wx = sx - sx.floor();
            let wy = sy - sy.floor();

            let di = (dy * dw + dx) * 4;
            for c in 0..4 {
                let p00 = src[(y0 * sw + x0) * 4 + c] as f32;
                let p10 = src[(y0 * sw + x1) * 4 + c] as f32;
                let p01 = src[(y1 * sw + x0) * 4 + c] as f32;
                let p11 = src[(y1 * sw + x1) * 4 + c] as f32;
                let v = p00 * (1.0 - wx) * (1.0 - wy)
                    + p10 * wx * (1.0 - wy)
                    + p01 * (1.0 - wx) * wy
                    + p11 * wx * wy;
                dst[di + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    dst
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_rgba_png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut encoder = png::Encoder::new(&mut bytes, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("png header");
        let pixels = vec![128u8; width as usize * height as usize * 4];
        writer.write_image_data(&pixels).expect("png data");
        drop(writer);
        bytes
    }

    #[test]
    fn decoded_dimensions_describe_the_buffer() {
        // A strike whose metadata disagrees with the embedded image must
        // still produce a buffer whose recorded dimensions match its
        // layout, or downstream resampling reads out of bounds.
        let png_bytes = encode_rgba_png(3, 2);
        let (bgra, w, h) = decode_png_bgra(&png_bytes).expect("decode");
        assert_eq!((w, h), (3, 2));
        assert_eq!(bgra.len(), 3 * 2 * 4);

        let scaled = scale_bgra_bilinear(&bgra, w, h, 6, 4);
        assert_eq!(scaled.len(), 6 * 4 * 4);
    }

    #[test]
    fn bilinear_identity_copies() {
        let src = vec![
            10, 20, 30, 255, //
            40, 50, 60, 255, //
            70, 80, 90, 255, //
            11, 22, 33, 255,
        ];
        let out = scale_bgra_bilinear(&src, 2, 2, 2, 2);
        assert_eq!(out, src);
    }

    #[test]
    fn bilinear_downscale_averages() {
        // 2x2 of 0 and 200 in one channel collapses to their mean.
        let src = vec![
            0, 0, 0, 255, //
            200, 0, 0, 255, //
            0, 0, 0, 255, //
            200, 0, 0, 255,
        ];
        let out = scale_bgra_bilinear(&src, 2, 2, 1, 1);
        assert_eq!(out[0], 100);
        assert_eq!(out[3], 255);
    }

    #[test]
    fn bilinear_upscale_keeps_corners() {
        let src = vec![
            0, 0, 0, 255, //
            252, 0, 0, 255, //
            0, 0, 0, 255, //
            252, 0, 0, 255,
        ];
        let out = scale_bgra_bilinear(&src, 2, 2, 4, 4);
        // Corner samples clamp to the nearest source pixel.
        assert_eq!(out[0], 0);
        assert_eq!(out[(4 * 4 - 1) * 4], 252);
    }
}
