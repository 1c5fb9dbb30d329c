// this_file: crates/gridfont-core/src/grid.rs

//! Integer cell geometry derived from face metrics.

use gridfont_sfnt::FaceMetrics;

/// The pixel grid a terminal lays glyphs onto. All values are whole
/// pixels; `cell_baseline` is measured up from the cell bottom, the
/// underline and strikethrough positions down from the cell top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridMetrics {
    pub cell_width: u32,
    pub cell_height: u32,
    pub cell_baseline: u32,
    pub underline_position: u32,
    pub underline_thickness: u32,
    pub strikethrough_position: u32,
    pub strikethrough_thickness: u32,
    /// Height budget for icon-constrained glyphs, at most `cell_height`.
    pub icon_height: u32,
    /// Set when the user overrides cell width (e.g. forced square cells);
    /// rendering uses it to keep glyphs centered in the adjusted cell.
    pub original_cell_width: Option<u32>,
}

impl GridMetrics {
    /// Derive the grid from a face's scaled metrics.
    pub fn calculate(m: &FaceMetrics) -> Self {
        let cell_width = m.cell_width.ceil().max(1.0) as u32;
        let cell_height = m.line_height().ceil().max(1.0) as u32;

        // Split the line gap evenly above and below the text.
        let top_to_baseline = m.ascent + (m.line_height() - m.ascent + m.descent) / 2.0;
        let baseline_from_top = top_to_baseline.min(cell_height as f64);
        let cell_baseline = (cell_height as f64 - baseline_from_top).round().max(0.0) as u32;

        let underline_thickness = m.underline_thickness.unwrap_or(1.0).round().max(1.0) as u32;
        // Default underline: half the descent below the baseline.
        let underline_from_baseline = m.underline_position.unwrap_or(-m.descent / 2.0);
        let underline_position = (baseline_from_top - underline_from_baseline)
            .round()
            .clamp(0.0, (cell_height.saturating_sub(underline_thickness)) as f64)
            as u32;

        let strikethrough_thickness =
            m.strikethrough_thickness.unwrap_or(1.0).round().max(1.0) as u32;
        // Default strikethrough: half the ex height above the baseline.
        let strike_from_baseline = m
            .strikethrough_position
            .unwrap_or(m.ex_height_or_estimate() / 2.0 + strikethrough_thickness as f64 / 2.0);
        let strikethrough_position = (baseline_from_top - strike_from_baseline)
            .round()
            .clamp(0.0, (cell_height.saturating_sub(strikethrough_thickness)) as f64)
            as u32;

        let icon_height = ((m.cap_height_or_estimate() * 1.2).ceil() as u32).min(cell_height);

        Self {
            cell_width,
            cell_height,
            cell_baseline,
            underline_position,
            underline_thickness,
            strikethrough_position,
            strikethrough_thickness,
            icon_height,
            original_cell_width: None,
        }
    }

    /// Force the cell width, remembering the natural one so glyphs can be
    /// recentered.
    pub fn with_cell_width(mut self, width: u32) -> Self {
        if width != self.cell_width {
            self.original_cell_width = Some(self.cell_width);
            self.cell_width = width.max(1);
        }
        self
    }
}
