// this_file: backends/gridfont-zeno/src/pen.rs

//! Dual-output outline pen.
//!
//! One skrifa draw pass produces both an SVG path string for zeno's
//! rasterizer and a kurbo path for exact bounds, so glyph extents never
//! come from re-parsing the path. Synthetic italic is applied here at
//! the point level, before bounds are taken, so the sheared outline is
//! measured and rasterized consistently.

/// Horizontal shear factor for synthetic italic, tan of roughly 12
/// degrees.
pub const ITALIC_SHEAR: f32 = 0.2126;

pub struct DualPen {
    commands: Vec<String>,
    path: kurbo::BezPath,
    scale_x: f32,
    scale_y: f32,
    shear: f32,
}

impl DualPen {
    pub fn new(scale_x: f32, scale_y: f32, shear: f32) -> Self {
        Self {
            commands: Vec::new(),
            path: kurbo::BezPath::new(),
            scale_x,
            scale_y,
            shear,
        }
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        ((x + y * self.shear) * self.scale_x, y * self.scale_y)
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn finish(self) -> (String, kurbo::BezPath) {
        (self.commands.join(" "), self.path)
    }
}

impl skrifa::outline::OutlinePen for DualPen {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.commands.push(format!("M {x:.2},{y:.2}"));
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.commands.push(format!("L {x:.2},{y:.2}"));
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let (cx, cy) = self.map(cx, cy);
        let (x, y) = self.map(x, y);
        self.commands
            .push(format!("Q {cx:.2},{cy:.2} {x:.2},{y:.2}"));
        self.path
            .quad_to((cx as f64, cy as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (cx0, cy0) = self.map(cx0, cy0);
        let (cx1, cy1) = self.map(cx1, cy1);
        let (x, y) = self.map(x, y);
        self.commands.push(format!(
            "C {cx0:.2},{cy0:.2} {cx1:.2},{cy1:.2} {x:.2},{y:.2}"
        ));
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.commands.push("Z".to_string());
        self.path.close_path();
    }
}
