// this_file: backends/gridfont-zeno/tests/integration.rs

//! End-to-end tests against a real font file.
//!
//! A font is located via `GRIDFONT_TEST_FONT` or a handful of common
//! system paths; when none is present each test prints a skip notice and
//! passes, so the suite stays green on minimal CI images.

use gridfont_core::{
    AlignRule, Atlas, Constraint, Face, Format, GridMetrics, RenderOptions, SizeOptions, SizeRule,
    Synthetic,
};
use gridfont_zeno::ZenoFace;

fn test_font_path() -> Option<std::path::PathBuf> {
    if let Ok(path) = std::env::var("GRIDFONT_TEST_FONT") {
        let path = std::path::PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }
    let candidates = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
        "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
        "/System/Library/Fonts/Monaco.ttf",
        "/System/Library/Fonts/Supplemental/Courier New.ttf",
        "C:\\Windows\\Fonts\\consola.ttf",
    ];
    candidates
        .iter()
        .map(std::path::PathBuf::from)
        .find(|p| p.exists())
}

fn load_face() -> Option<ZenoFace> {
    let _ = env_logger::builder().is_test(true).try_init();
    let Some(path) = test_font_path() else {
        eprintln!("skipping: no test font available (set GRIDFONT_TEST_FONT)");
        return None;
    };
    let size = SizeOptions {
        points: 12.0,
        xdpi: 96.0,
        ydpi: 96.0,
    };
    Some(ZenoFace::from_file(&path, 0, size).expect("test font should load"))
}

fn grid_for(face: &ZenoFace) -> GridMetrics {
    GridMetrics::calculate(&face.metrics().expect("metrics should resolve"))
}

#[test]
fn metrics_are_plausible() {
    let Some(face) = load_face() else { return };
    let m = face.metrics().expect("metrics");
    assert!(m.cell_width > 0.0);
    assert!(m.ascent > 0.0);
    assert!(m.descent <= 0.0);
    assert!(m.line_height() >= m.ascent - m.descent);
}

#[test]
fn metrics_are_deterministic() {
    let Some(face) = load_face() else { return };
    let a = face.metrics().expect("metrics");
    let b = face.metrics().expect("metrics");
    assert_eq!(a, b);
}

#[test]
fn ascii_maps_to_glyphs() {
    let Some(face) = load_face() else { return };
    assert!(face.glyph_index('A').is_some());
    assert!(face.glyph_index('~').is_some());
    // Unmapped plane-16 private use characters yield None, not glyph 0.
    assert_eq!(face.glyph_index('\u{10FFFD}'), None);
}

#[test]
fn renders_a_visible_glyph() {
    let Some(face) = load_face() else { return };
    let grid = grid_for(&face);
    let mut atlas = Atlas::new(512, 512, Format::Grayscale);
    let opts = RenderOptions::new(grid);

    let gid = face.glyph_index('M').expect("glyph for M");
    let glyph = face
        .render_glyph(&mut atlas, gid, &opts)
        .expect("render should succeed");

    assert!(glyph.width > 0);
    assert!(glyph.height > 0);
    assert!(glyph.advance_x > 0.0);
    // Top of 'M' sits above the baseline.
    assert!(glyph.offset_y > 0);
    assert!(atlas.data().iter().any(|&b| b > 0));
}

#[test]
fn space_renders_an_all_zero_glyph() {
    let Some(face) = load_face() else { return };
    let grid = grid_for(&face);
    let mut atlas = Atlas::new(256, 256, Format::Grayscale);
    let opts = RenderOptions::new(grid);

    let gid = face.glyph_index(' ').expect("glyph for space");
    let glyph = face
        .render_glyph(&mut atlas, gid, &opts)
        .expect("render should succeed");

    assert_eq!(glyph, gridfont_core::Glyph::default());
    assert!(atlas.data().iter().all(|&b| b == 0));
}

#[test]
fn color_atlas_rejects_monochrome_glyphs() {
    let Some(face) = load_face() else { return };
    let grid = grid_for(&face);
    let mut atlas = Atlas::new(256, 256, Format::Bgra);
    let opts = RenderOptions::new(grid);

    let gid = face.glyph_index('A').expect("glyph for A");
    assert!(face.render_glyph(&mut atlas, gid, &opts).is_err());
}

#[test]
fn constrained_glyph_fits_the_cell() {
    let Some(face) = load_face() else { return };
    let grid = grid_for(&face);
    let mut atlas = Atlas::new(512, 512, Format::Grayscale);
    let mut opts = RenderOptions::new(grid);
    opts.constraint = Constraint {
        size_horizontal: SizeRule::Fit,
        size_vertical: SizeRule::Fit,
        align_horizontal: AlignRule::Center,
        align_vertical: AlignRule::Center,
        ..Constraint::none()
    };

    let gid = face.glyph_index('W').expect("glyph for W");
    let glyph = face
        .render_glyph(&mut atlas, gid, &opts)
        .expect("render should succeed");

    assert!(glyph.width <= grid.cell_width + 1);
    assert!(glyph.height <= grid.cell_height + 1);
    assert!(glyph.offset_x >= 0);
}

#[test]
fn constraint_never_touches_the_advance() {
    let Some(face) = load_face() else { return };
    let grid = grid_for(&face);
    let gid = face.glyph_index('W').expect("glyph for W");

    let mut atlas = Atlas::new(512, 512, Format::Grayscale);
    let plain = face
        .render_glyph(&mut atlas, gid, &RenderOptions::new(grid))
        .expect("render");

    let mut opts = RenderOptions::new(grid);
    opts.constraint = Constraint::icon();
    let constrained = face
        .render_glyph(&mut atlas, gid, &opts)
        .expect("render");

    assert_eq!(plain.advance_x, constrained.advance_x);
}

#[test]
fn synthetic_bold_adds_coverage() {
    let Some(path) = test_font_path() else {
        eprintln!("skipping: no test font available (set GRIDFONT_TEST_FONT)");
        return;
    };
    let size = SizeOptions::default();
    let regular = ZenoFace::from_file(&path, 0, size).expect("load");
    let mut heavy = ZenoFace::from_file(&path, 0, size).expect("load");
    heavy.set_synthetic(Synthetic {
        bold: true,
        italic: false,
    });

    let grid = grid_for(&regular);
    let gid = regular.glyph_index('l').expect("glyph for l");

    let coverage = |face: &ZenoFace| -> u64 {
        let mut atlas = Atlas::new(512, 512, Format::Grayscale);
        face.render_glyph(&mut atlas, gid, &RenderOptions::new(grid))
            .expect("render");
        atlas.data().iter().map(|&b| b as u64).sum()
    };

    assert!(coverage(&heavy) > coverage(&regular));
}

#[test]
fn synthetic_italic_widens_tall_glyphs() {
    let Some(path) = test_font_path() else {
        eprintln!("skipping: no test font available (set GRIDFONT_TEST_FONT)");
        return;
    };
    let size = SizeOptions {
        points: 24.0,
        ..SizeOptions::default()
    };
    let regular = ZenoFace::from_file(&path, 0, size).expect("load");
    let mut slanted = ZenoFace::from_file(&path, 0, size).expect("load");
    slanted.set_synthetic(Synthetic {
        bold: false,
        italic: true,
    });

    let grid = grid_for(&regular);
    let gid = regular.glyph_index('l').expect("glyph for l");

    let width = |face: &ZenoFace| -> u32 {
        let mut atlas = Atlas::new(512, 512, Format::Grayscale);
        face.render_glyph(&mut atlas, gid, &RenderOptions::new(grid))
            .expect("render")
            .width
    };

    assert!(width(&slanted) > width(&regular));
}

fn load_variable_face() -> Option<ZenoFace> {
    if let Ok(path) = std::env::var("GRIDFONT_TEST_VARIABLE_FONT") {
        if let Ok(face) = ZenoFace::from_file(&path, 0, SizeOptions::default()) {
            if face.variation_axes().contains(b"wght") {
                return Some(face);
            }
        }
    }
    let face = load_face()?;
    if face.variation_axes().contains(b"wght") {
        return Some(face);
    }
    eprintln!("skipping: test font has no wght axis (set GRIDFONT_TEST_VARIABLE_FONT)");
    None
}

#[test]
fn weight_axis_alters_rendered_coverage() {
    let Some(mut face) = load_variable_face() else { return };
    let grid = grid_for(&face);
    let gid = face.glyph_index('A').expect("glyph for A");

    let coverage = |face: &ZenoFace| -> u64 {
        let mut atlas = Atlas::new(512, 512, Format::Grayscale);
        face.render_glyph(&mut atlas, gid, &RenderOptions::new(grid))
            .expect("render");
        atlas.data().iter().map(|&b| b as u64).sum()
    };

    face.set_variations(
        &[gridfont_core::Variation::new(*b"wght", 100.0)],
        face.size(),
    )
    .expect("set_variations");
    let light = coverage(&face);

    face.set_variations(
        &[gridfont_core::Variation::new(*b"wght", 900.0)],
        face.size(),
    )
    .expect("set_variations");
    let heavy = coverage(&face);

    assert!(heavy > light);
}

#[test]
fn resize_round_trip_restores_metrics() {
    let Some(mut face) = load_face() else { return };
    let original = face.metrics().expect("metrics");

    face.set_size(SizeOptions {
        points: 24.0,
        xdpi: 96.0,
        ydpi: 96.0,
    })
    .expect("set_size");
    face.set_size(SizeOptions {
        points: 12.0,
        xdpi: 96.0,
        ydpi: 96.0,
    })
    .expect("set_size");

    assert_eq!(face.metrics().expect("metrics"), original);
}

#[test]
fn resizing_scales_metrics() {
    let Some(mut face) = load_face() else { return };
    let small = face.metrics().expect("metrics");

    face.set_size(SizeOptions {
        points: 24.0,
        xdpi: 96.0,
        ydpi: 96.0,
    })
    .expect("set_size");
    let large = face.metrics().expect("metrics");

    assert!(large.ascent > small.ascent);
    assert!(large.cell_width > small.cell_width);
}

#[test]
fn rejects_nonsense_sizes() {
    let Some(mut face) = load_face() else { return };
    assert!(face
        .set_size(SizeOptions {
            points: 0.0,
            xdpi: 96.0,
            ydpi: 96.0,
        })
        .is_err());
}

#[test]
fn unknown_variation_axes_are_ignored() {
    let Some(mut face) = load_face() else { return };
    let before = face.metrics().expect("metrics");
    face.set_variations(
        &[gridfont_core::Variation::new(*b"zzzz", 123.0)],
        SizeOptions::default(),
    )
    .expect("unknown axes must not fail");
    let after = face.metrics().expect("metrics");
    assert_eq!(before, after);
}

#[test]
fn face_copy_carries_style_to_the_new_size() {
    let Some(face) = load_face() else { return };
    let bold = face.synthetic_bold().expect("bold copy");
    assert!(bold.synthetic().bold);

    let resized = bold
        .from_face_copy(SizeOptions {
            points: 24.0,
            xdpi: 96.0,
            ydpi: 96.0,
        })
        .expect("resized copy");
    assert!(resized.synthetic().bold);

    let small = face.metrics().expect("metrics");
    let large = resized.metrics().expect("metrics");
    assert!(large.ascent > small.ascent);
}

#[test]
fn garbage_bytes_fail_to_load() {
    let data = vec![0u8; 64];
    assert!(ZenoFace::new(data, 0, SizeOptions::default()).is_err());
}
