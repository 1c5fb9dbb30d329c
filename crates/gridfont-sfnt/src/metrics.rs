// this_file: crates/gridfont-sfnt/src/metrics.rs

//! Face metrics resolution
//!
//! Both backends funnel their parsed tables and per-glyph probe results
//! through [`resolve`], so the multi-source fallback policy (typo vs hhea vs
//! win metrics, broken underline handling, cap/ex probing) is written down
//! exactly once.

use crate::{Hhea, Os2, Post};

/// Typographic measurements for one face at its current pixel size.
///
/// Produced fresh on every call; nothing here is cached by the face.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FaceMetrics {
    /// Representative monospace advance in pixels.
    pub cell_width: f64,
    /// Pixels above the baseline (positive).
    pub ascent: f64,
    /// Pixels below the baseline (negative, matching font conventions).
    pub descent: f64,
    /// Extra leading in pixels.
    pub line_gap: f64,
    pub underline_position: Option<f64>,
    pub underline_thickness: Option<f64>,
    pub strikethrough_position: Option<f64>,
    pub strikethrough_thickness: Option<f64>,
    pub cap_height: Option<f64>,
    pub ex_height: Option<f64>,
}

impl FaceMetrics {
    /// Cap height, estimated from the ascent when the face reports none.
    pub fn cap_height_or_estimate(&self) -> f64 {
        self.cap_height.unwrap_or(self.ascent * 0.75)
    }

    /// Ex height, estimated from the cap height when the face reports none.
    pub fn ex_height_or_estimate(&self) -> f64 {
        self.ex_height
            .unwrap_or_else(|| self.cap_height_or_estimate() * 0.75)
    }

    /// Line height in pixels.
    pub fn line_height(&self) -> f64 {
        self.ascent - self.descent + self.line_gap
    }
}

/// Measurements only a backend can supply, in pixel units.
///
/// Failed probes stay `None` and resolve into the documented fallbacks;
/// they never fail the metrics call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Probes {
    /// Measured bounding-box top of glyph 'H'.
    pub cap_height: Option<f64>,
    /// Measured bounding-box top of glyph 'x'.
    pub ex_height: Option<f64>,
    /// Maximum advance across the printable ASCII glyphs that rendered.
    pub max_ascii_advance: Option<f64>,
    /// Generic max-advance metric, used when no ASCII glyph rendered.
    pub fallback_max_advance: f64,
}

/// Vertical metrics in font units, before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetrics {
    pub ascent: i32,
    pub descent: i32,
    pub line_gap: i32,
}

/// Source priority for ascent/descent/line-gap:
///
/// 1. OS/2 typo metrics when fsSelection asks for them,
/// 2. hhea when it carries anything non-zero,
/// 3. OS/2 typo metrics when non-zero,
/// 4. OS/2 win metrics (usWinDescent negated to match sign conventions).
///
/// Without an OS/2 table, hhea is used unconditionally.
pub fn vertical_metrics(hhea: &Hhea, os2: Option<&Os2>) -> VerticalMetrics {
    let Some(os2) = os2 else {
        log::debug!("no OS/2 table, vertical metrics from hhea");
        return VerticalMetrics {
            ascent: hhea.ascender as i32,
            descent: hhea.descender as i32,
            line_gap: hhea.line_gap as i32,
        };
    };

    if os2.use_typo_metrics() {
        return VerticalMetrics {
            ascent: os2.typo_ascender as i32,
            descent: os2.typo_descender as i32,
            line_gap: os2.typo_line_gap as i32,
        };
    }

    if hhea.ascender != 0 || hhea.descender != 0 {
        return VerticalMetrics {
            ascent: hhea.ascender as i32,
            descent: hhea.descender as i32,
            line_gap: hhea.line_gap as i32,
        };
    }

    if os2.typo_ascender != 0 || os2.typo_descender != 0 {
        return VerticalMetrics {
            ascent: os2.typo_ascender as i32,
            descent: os2.typo_descender as i32,
            line_gap: os2.typo_line_gap as i32,
        };
    }

    log::debug!("hhea and typo metrics all zero, falling back to win metrics");
    VerticalMetrics {
        ascent: os2.win_ascent as i32,
        descent: -(os2.win_descent as i32),
        line_gap: 0,
    }
}

/// Combine parsed tables and backend probes into pixel-space [`FaceMetrics`].
///
/// `trust_os2_cap_ex` selects the backend policy for cap/ex height: when
/// true any present OS/2 cap/ex fields win; when false the probes win and
/// OS/2 is only consulted as a fallback. Either way a zero field means
/// "absent" and falls through to the probe.
pub fn resolve(
    units_per_em: u16,
    px_per_em: f64,
    post: &Post,
    hhea: &Hhea,
    os2: Option<&Os2>,
    probes: Probes,
    trust_os2_cap_ex: bool,
) -> FaceMetrics {
    let px_per_unit = px_per_em / units_per_em as f64;
    let scale = |units: i32| units as f64 * px_per_unit;

    let vertical = vertical_metrics(hhea, os2);

    let (underline_pos, underline_thick) = post.underline();
    let (strike_pos, strike_thick) = os2.map(Os2::strikethrough).unwrap_or((None, None));

    let os2_cap = os2
        .and_then(|t| t.cap_height)
        .filter(|&v| v != 0)
        .map(|v| scale(v as i32));
    let os2_ex = os2
        .and_then(|t| t.x_height)
        .filter(|&v| v != 0)
        .map(|v| scale(v as i32));

    let (cap_height, ex_height) = if trust_os2_cap_ex {
        (os2_cap.or(probes.cap_height), os2_ex.or(probes.ex_height))
    } else {
        (probes.cap_height.or(os2_cap), probes.ex_height.or(os2_ex))
    };

    FaceMetrics {
        cell_width: probes
            .max_ascii_advance
            .unwrap_or(probes.fallback_max_advance),
        ascent: scale(vertical.ascent),
        descent: scale(vertical.descent),
        line_gap: scale(vertical.line_gap),
        underline_position: underline_pos.map(|v| scale(v as i32)),
        underline_thickness: underline_thick.map(|v| scale(v as i32)),
        strikethrough_position: strike_pos.map(|v| scale(v as i32)),
        strikethrough_thickness: strike_thick.map(|v| scale(v as i32)),
        cap_height,
        ex_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hhea::build_hhea;
    use crate::os2::{Os2Builder, FS_SELECTION_USE_TYPO_METRICS};
    use crate::post::build_post;

    fn parsed_hhea(asc: i16, desc: i16, gap: i16) -> Hhea {
        Hhea::parse(&build_hhea(asc, desc, gap)).unwrap()
    }

    #[test]
    fn typo_metrics_bit_beats_hhea() {
        let hhea = parsed_hhea(500, -100, 0);
        let os2 = Os2::parse(
            &Os2Builder {
                fs_selection: FS_SELECTION_USE_TYPO_METRICS,
                typo_ascender: 1000,
                ..Default::default()
            }
            .build(),
        )
        .unwrap();

        let v = vertical_metrics(&hhea, Some(&os2));
        assert_eq!(v.ascent, 1000);

        // End to end: at 1000 upem and 10 px/em, ascent is 10px, not 5px.
        let post = Post::parse(&build_post(-100, 50)).unwrap();
        let m = resolve(1000, 10.0, &post, &hhea, Some(&os2), Probes::default(), false);
        assert!((m.ascent - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hhea_wins_without_the_bit() {
        let hhea = parsed_hhea(500, -100, 20);
        let os2 = Os2::parse(&Os2Builder::default().build()).unwrap();
        let v = vertical_metrics(&hhea, Some(&os2));
        assert_eq!(
            v,
            VerticalMetrics {
                ascent: 500,
                descent: -100,
                line_gap: 20
            }
        );
    }

    #[test]
    fn zeroed_hhea_falls_back_to_typo_then_win() {
        let hhea = parsed_hhea(0, 0, 0);

        let os2 = Os2::parse(&Os2Builder::default().build()).unwrap();
        let v = vertical_metrics(&hhea, Some(&os2));
        assert_eq!(v.ascent, 800);

        let os2 = Os2::parse(
            &Os2Builder {
                typo_ascender: 0,
                typo_descender: 0,
                win_ascent: 950,
                win_descent: 240,
                ..Default::default()
            }
            .build(),
        )
        .unwrap();
        let v = vertical_metrics(&hhea, Some(&os2));
        // usWinDescent is a magnitude; it must come out negative.
        assert_eq!(
            v,
            VerticalMetrics {
                ascent: 950,
                descent: -240,
                line_gap: 0
            }
        );
    }

    #[test]
    fn missing_os2_always_uses_hhea() {
        let hhea = parsed_hhea(0, 0, 0);
        let v = vertical_metrics(&hhea, None);
        assert_eq!(v.ascent, 0);
        assert_eq!(v.descent, 0);
    }

    #[test]
    fn broken_underline_resolves_to_none() {
        let hhea = parsed_hhea(800, -200, 0);
        let post = Post::parse(&build_post(0, 0)).unwrap();
        let m = resolve(1000, 16.0, &post, &hhea, None, Probes::default(), false);
        assert_eq!(m.underline_position, None);
        assert_eq!(m.underline_thickness, None);
        assert_eq!(m.strikethrough_position, None);
        assert_eq!(m.strikethrough_thickness, None);
    }

    #[test]
    fn cap_ex_trust_policies_differ() {
        let hhea = parsed_hhea(800, -200, 0);
        let post = Post::parse(&build_post(-100, 50)).unwrap();
        let os2 = Os2::parse(&Os2Builder::default().build()).unwrap();
        let probes = Probes {
            cap_height: Some(11.0),
            ex_height: Some(8.0),
            ..Default::default()
        };

        // Probe-first policy (portable backend): measured values win.
        let m = resolve(1000, 16.0, &post, &hhea, Some(&os2), probes, false);
        assert_eq!(m.cap_height, Some(11.0));

        // Table-first policy (CoreText): OS/2 fields win: 720 units @ 16px/em.
        let m = resolve(1000, 16.0, &post, &hhea, Some(&os2), probes, true);
        assert!((m.cap_height.unwrap() - 720.0 * 16.0 / 1000.0).abs() < 1e-9);
    }

    #[test]
    fn cell_width_prefers_probed_advance() {
        let hhea = parsed_hhea(800, -200, 0);
        let post = Post::parse(&build_post(-100, 50)).unwrap();
        let m = resolve(
            1000,
            16.0,
            &post,
            &hhea,
            None,
            Probes {
                max_ascii_advance: Some(9.5),
                fallback_max_advance: 20.0,
                ..Default::default()
            },
            false,
        );
        assert_eq!(m.cell_width, 9.5);

        let m = resolve(
            1000,
            16.0,
            &post,
            &hhea,
            None,
            Probes {
                fallback_max_advance: 20.0,
                ..Default::default()
            },
            false,
        );
        assert_eq!(m.cell_width, 20.0);
    }

    #[test]
    fn resolve_is_deterministic() {
        let hhea = parsed_hhea(800, -200, 90);
        let post = Post::parse(&build_post(-75, 50)).unwrap();
        let os2 = Os2::parse(&Os2Builder::default().build()).unwrap();
        let probes = Probes {
            cap_height: Some(11.0),
            ex_height: Some(8.0),
            max_ascii_advance: Some(9.6),
            fallback_max_advance: 10.0,
        };
        let a = resolve(2048, 21.0, &post, &hhea, Some(&os2), probes, false);
        let b = resolve(2048, 21.0, &post, &hhea, Some(&os2), probes, false);
        assert_eq!(a, b);
    }
}
