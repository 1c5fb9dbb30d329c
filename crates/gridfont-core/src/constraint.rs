// this_file: crates/gridfont-core/src/constraint.rs

//! Glyph constraint engine
//!
//! A pure geometric transform that fits a glyph's natural bounding box
//! into a terminal cell (or a multi-cell span) according to declarative
//! sizing, alignment and padding rules. Terminal renderers use this to keep
//! icon-style glyphs (powerline symbols, Nerd Font icons, emoji) inside
//! their cells without touching ordinary text glyphs.
//!
//! The step order is load-bearing: padding is removed first, sizing runs
//! before alignment, horizontal before vertical, the aspect-ratio clamp
//! between sizing and alignment, and padding is re-added last. Reordering
//! any of these changes the visual output for constrained glyphs.

use crate::grid::GridMetrics;

/// Per-axis sizing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeRule {
    /// Leave the natural size alone.
    #[default]
    None,
    /// Scale down proportionally only when the glyph overflows the axis.
    Fit,
    /// Scale proportionally (up or down) until the axis is filled.
    Cover,
    /// Force the axis to the available extent, ignoring proportions.
    Stretch,
}

/// Per-axis alignment rule, applied after sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignRule {
    #[default]
    None,
    Start,
    End,
    Center,
}

/// Which vertical budget the constraint works against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightRule {
    /// The full cell height.
    #[default]
    Cell,
    /// The grid's icon height: keeps decorative glyphs from towering over
    /// adjacent text, and (for multi-cell spans) narrows the width budget
    /// by the same factor so 2-cell icons don't turn absurdly wide.
    Icon,
}

/// A glyph bounding box in pixels. `x`/`y` are the bearings of the bottom
/// left corner, `y` measured up from the cell baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphBox {
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

/// Declarative fit/align rules for one glyph class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraint {
    pub size_horizontal: SizeRule,
    pub size_vertical: SizeRule,
    pub align_horizontal: AlignRule,
    pub align_vertical: AlignRule,
    /// Padding fractions of the available box, removed before sizing and
    /// re-added to the bearings at the very end.
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom: f64,
    /// Clamp width to `height * ratio` when set.
    pub max_xy_ratio: Option<f64>,
    /// Multipliers for glyphs that are one piece of a larger group
    /// (e.g. multi-cell Powerline assemblies); 1 for standalone glyphs.
    pub group_width: u8,
    pub group_height: u8,
    pub height: HeightRule,
}

impl Default for Constraint {
    fn default() -> Self {
        Self::none()
    }
}

impl Constraint {
    /// The identity constraint: ordinary text glyphs pass through.
    pub const fn none() -> Self {
        Self {
            size_horizontal: SizeRule::None,
            size_vertical: SizeRule::None,
            align_horizontal: AlignRule::None,
            align_vertical: AlignRule::None,
            pad_left: 0.0,
            pad_right: 0.0,
            pad_top: 0.0,
            pad_bottom: 0.0,
            max_xy_ratio: None,
            group_width: 1,
            group_height: 1,
            height: HeightRule::Cell,
        }
    }

    /// Preset for icon-style symbol glyphs: shrink to fit, center both
    /// axes, and cap the height at the grid's icon height.
    pub const fn icon() -> Self {
        Self {
            size_horizontal: SizeRule::Fit,
            size_vertical: SizeRule::Fit,
            align_horizontal: AlignRule::Center,
            align_vertical: AlignRule::Center,
            pad_left: 0.0,
            pad_right: 0.0,
            pad_top: 0.0,
            pad_bottom: 0.0,
            max_xy_ratio: None,
            group_width: 1,
            group_height: 1,
            height: HeightRule::Icon,
        }
    }

    /// Fit `glyph` into `constraint_width` cells of `grid`.
    ///
    /// Pure: same inputs always produce the same output.
    pub fn constrain(&self, glyph: GlyphBox, grid: &GridMetrics, constraint_width: u8) -> GlyphBox {
        let cols = constraint_width.max(1) as f64 * self.group_width.max(1) as f64;
        let mut avail_w = grid.cell_width as f64 * cols;
        let mut avail_h = grid.cell_height as f64 * self.group_height.max(1) as f64;

        if self.height == HeightRule::Icon && avail_h > 0.0 {
            let icon_h = (grid.icon_height as f64).min(avail_h);
            if constraint_width > 1 {
                avail_w *= icon_h / avail_h;
            }
            avail_h = icon_h;
        }

        let pad_l = self.pad_left * avail_w;
        let pad_r = self.pad_right * avail_w;
        let pad_t = self.pad_top * avail_h;
        let pad_b = self.pad_bottom * avail_h;

        // Usable area, and bearings shifted into padding-free space.
        let w = avail_w - pad_l - pad_r;
        let h = avail_h - pad_t - pad_b;
        let mut width = glyph.width;
        let mut height = glyph.height;
        let mut x = glyph.x - pad_l;
        let mut y = glyph.y - pad_b;

        match self.size_horizontal {
            SizeRule::None => {}
            SizeRule::Fit => {
                if width > w && width > 0.0 {
                    let scale = w / width;
                    let old_height = height;
                    width = w;
                    height *= scale;
                    x = 0.0;
                    y += (old_height - height) / 2.0;
                } else if width + x > w {
                    // The bearing pushes the glyph out; pull it back just
                    // far enough.
                    x = w - width;
                } else if x < 0.0 {
                    x = 0.0;
                }
            }
            SizeRule::Cover => {
                if width > 0.0 {
                    let scale = w / width;
                    let old_height = height;
                    width = w;
                    height *= scale;
                    x = 0.0;
                    y += (old_height - height) / 2.0;
                }
            }
            SizeRule::Stretch => {
                width = w;
                x = 0.0;
            }
        }

        match self.size_vertical {
            SizeRule::None => {}
            SizeRule::Fit => {
                if height > h && height > 0.0 {
                    let scale = h / height;
                    let old_width = width;
                    height = h;
                    width *= scale;
                    y = 0.0;
                    x += (old_width - width) / 2.0;
                } else if height + y > h {
                    y = h - height;
                } else if y < 0.0 {
                    y = 0.0;
                }
            }
            SizeRule::Cover => {
                if height > 0.0 {
                    let scale = h / height;
                    let old_width = width;
                    height = h;
                    width *= scale;
                    y = 0.0;
                    x += (old_width - width) / 2.0;
                }
            }
            SizeRule::Stretch => {
                height = h;
                y = 0.0;
            }
        }

        if let Some(ratio) = self.max_xy_ratio {
            if width > height * ratio {
                let new_width = height * ratio;
                x += (width - new_width) / 2.0;
                width = new_width;
            }
        }

        match self.align_horizontal {
            AlignRule::None => {}
            AlignRule::Start => x = 0.0,
            AlignRule::End => x = w - width,
            AlignRule::Center => x = (w - width) / 2.0,
        }
        match self.align_vertical {
            AlignRule::None => {}
            AlignRule::Start => y = 0.0,
            AlignRule::End => y = h - height,
            AlignRule::Center => y = (h - height) / 2.0,
        }

        GlyphBox {
            width,
            height,
            x: x + pad_l,
            y: y + pad_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(cell_width: u32, cell_height: u32) -> GridMetrics {
        GridMetrics {
            cell_width,
            cell_height,
            cell_baseline: 4,
            underline_position: cell_height.saturating_sub(2),
            underline_thickness: 1,
            strikethrough_position: cell_height / 2,
            strikethrough_thickness: 1,
            icon_height: cell_height,
            original_cell_width: None,
        }
    }

    #[test]
    fn identity_constraint_is_a_no_op() {
        let glyph = GlyphBox {
            width: 7.0,
            height: 11.0,
            x: 1.5,
            y: -2.0,
        };
        let out = Constraint::none().constrain(glyph, &grid(9, 18), 1);
        assert_eq!(out, glyph);
    }

    #[test]
    fn constrain_is_deterministic() {
        let c = Constraint {
            size_horizontal: SizeRule::Fit,
            size_vertical: SizeRule::Fit,
            align_horizontal: AlignRule::Center,
            align_vertical: AlignRule::Center,
            pad_left: 0.1,
            pad_right: 0.1,
            max_xy_ratio: Some(1.5),
            ..Constraint::none()
        };
        let glyph = GlyphBox {
            width: 23.0,
            height: 9.0,
            x: -3.0,
            y: 1.0,
        };
        let a = c.constrain(glyph, &grid(10, 20), 2);
        let b = c.constrain(glyph, &grid(10, 20), 2);
        assert_eq!(a, b);
    }

    #[test]
    fn fit_shrinks_proportionally_and_recenters() {
        let c = Constraint {
            size_horizontal: SizeRule::Fit,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 20.0,
                height: 10.0,
                x: 2.0,
                y: 0.0,
            },
            &grid(10, 20),
            1,
        );
        assert_eq!(out.width, 10.0);
        assert_eq!(out.height, 5.0);
        assert_eq!(out.x, 0.0);
        // Recentered upward by half the height loss.
        assert_eq!(out.y, 2.5);
    }

    #[test]
    fn fit_leaves_small_glyphs_alone_but_clamps_bearings() {
        let c = Constraint {
            size_horizontal: SizeRule::Fit,
            ..Constraint::none()
        };
        // Bearing pushes the right edge out: x is reduced just enough.
        let out = c.constrain(
            GlyphBox {
                width: 8.0,
                height: 8.0,
                x: 5.0,
                y: 0.0,
            },
            &grid(10, 20),
            1,
        );
        assert_eq!(out.width, 8.0);
        assert_eq!(out.x, 2.0);

        // Negative bearing clamps to zero.
        let out = c.constrain(
            GlyphBox {
                width: 8.0,
                height: 8.0,
                x: -3.0,
                y: 0.0,
            },
            &grid(10, 20),
            1,
        );
        assert_eq!(out.x, 0.0);
    }

    #[test]
    fn cover_scales_up_too() {
        let c = Constraint {
            size_horizontal: SizeRule::Cover,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 5.0,
                height: 5.0,
                x: 1.0,
                y: 1.0,
            },
            &grid(10, 20),
            1,
        );
        assert_eq!(out.width, 10.0);
        assert_eq!(out.height, 10.0);
        assert_eq!(out.x, 0.0);
        // y recentered down by half the growth.
        assert_eq!(out.y, 1.0 - 2.5);
    }

    #[test]
    fn stretch_is_not_proportional() {
        let c = Constraint {
            size_horizontal: SizeRule::Stretch,
            size_vertical: SizeRule::Stretch,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 3.0,
                height: 7.0,
                x: 2.0,
                y: 2.0,
            },
            &grid(10, 20),
            1,
        );
        assert_eq!(
            out,
            GlyphBox {
                width: 10.0,
                height: 20.0,
                x: 0.0,
                y: 0.0
            }
        );
    }

    #[test]
    fn align_start_zeroes_the_bearing_regardless_of_input() {
        let c = Constraint {
            align_horizontal: AlignRule::Start,
            align_vertical: AlignRule::Start,
            ..Constraint::none()
        };
        for x in [-5.0, 0.0, 3.0, 99.0] {
            let out = c.constrain(
                GlyphBox {
                    width: 4.0,
                    height: 4.0,
                    x,
                    y: x / 2.0,
                },
                &grid(10, 20),
                1,
            );
            assert_eq!(out.x, 0.0);
            assert_eq!(out.y, 0.0);
        }
    }

    #[test]
    fn align_end_and_center_position_within_usable_area() {
        let g = GlyphBox {
            width: 4.0,
            height: 10.0,
            x: 0.0,
            y: 0.0,
        };
        let c = Constraint {
            align_horizontal: AlignRule::End,
            ..Constraint::none()
        };
        assert_eq!(c.constrain(g, &grid(10, 20), 1).x, 6.0);

        let c = Constraint {
            align_horizontal: AlignRule::Center,
            align_vertical: AlignRule::Center,
            ..Constraint::none()
        };
        let out = c.constrain(g, &grid(10, 20), 1);
        assert_eq!(out.x, 3.0);
        assert_eq!(out.y, 5.0);
    }

    #[test]
    fn padding_is_removed_for_sizing_and_readded_to_bearings() {
        let c = Constraint {
            size_horizontal: SizeRule::Cover,
            align_horizontal: AlignRule::Start,
            pad_left: 0.1,
            pad_right: 0.1,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 5.0,
                height: 5.0,
                x: 0.0,
                y: 0.0,
            },
            &grid(10, 20),
            1,
        );
        // Usable width is 10 - 1 - 1 = 8; start-aligned x lands on the
        // left padding edge.
        assert_eq!(out.width, 8.0);
        assert_eq!(out.x, 1.0);
    }

    #[test]
    fn max_ratio_clamps_width_and_recenters() {
        let c = Constraint {
            max_xy_ratio: Some(2.0),
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 30.0,
                height: 10.0,
                x: 0.0,
                y: 0.0,
            },
            &grid(20, 20),
            2,
        );
        assert_eq!(out.width, 20.0);
        // Clamped by 10px, half of which shifts the bearing.
        assert_eq!(out.x, 5.0);
    }

    #[test]
    fn icon_height_caps_the_vertical_budget() {
        let mut g = grid(10, 20);
        g.icon_height = 16;
        let c = Constraint {
            size_vertical: SizeRule::Cover,
            height: HeightRule::Icon,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 8.0,
                height: 8.0,
                x: 0.0,
                y: 0.0,
            },
            &g,
            1,
        );
        assert_eq!(out.height, 16.0);
    }

    #[test]
    fn icon_rule_narrows_two_cell_spans() {
        let mut g = grid(10, 20);
        g.icon_height = 15;
        let c = Constraint {
            size_horizontal: SizeRule::Cover,
            height: HeightRule::Icon,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 8.0,
                height: 8.0,
                x: 0.0,
                y: 0.0,
            },
            &g,
            2,
        );
        // Two cells would be 20px wide; the icon rule scales that budget
        // by 15/20.
        assert_eq!(out.width, 15.0);
    }

    #[test]
    fn sizing_runs_before_alignment() {
        // A cover-sized glyph fills the axis, so end-alignment must land
        // at the padding edge rather than at a stale pre-scaling position.
        let c = Constraint {
            size_horizontal: SizeRule::Cover,
            align_horizontal: AlignRule::End,
            ..Constraint::none()
        };
        let out = c.constrain(
            GlyphBox {
                width: 2.0,
                height: 2.0,
                x: 7.0,
                y: 0.0,
            },
            &grid(10, 20),
            1,
        );
        assert_eq!(out.width, 10.0);
        assert_eq!(out.x, 0.0);
    }
}
