use rand::Rng;
use serde::{Deserialize, Serialize};

/// Canvas geometry and placement rules shared by commands, drags and import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Keep-out band along every canvas edge for generated positions.
    pub margin: f32,
    pub spine_y: f32,
    /// Spine starts this far from the left edge.
    pub spine_margin: f32,
    /// Room reserved on the right for the problem statement (fish head).
    pub head_width: f32,
    pub spine_base_offset: f32,
    pub spine_increment: f32,
    /// Max distance of a new cause from its category.
    pub cause_spread: f32,
    /// Max distance of a new subcause from its cause.
    pub subcause_spread: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            margin: 40.0,
            spine_y: 400.0,
            spine_margin: 100.0,
            head_width: 200.0,
            spine_base_offset: 200.0,
            spine_increment: 150.0,
            cause_spread: 120.0,
            subcause_spread: 80.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("canvasWidth", self.canvas_width),
            ("canvasHeight", self.canvas_height),
            ("margin", self.margin),
            ("spineY", self.spine_y),
            ("spineMargin", self.spine_margin),
            ("headWidth", self.head_width),
            ("spineBaseOffset", self.spine_base_offset),
            ("spineIncrement", self.spine_increment),
            ("causeSpread", self.cause_spread),
            ("subcauseSpread", self.subcause_spread),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(format!("{} must be finite", name));
        }
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err("canvas must have positive size".to_string());
        }
        if self.margin < 0.0 || 2.0 * self.margin > self.canvas_width.min(self.canvas_height) {
            return Err("margin does not fit the canvas".to_string());
        }
        let (lo, hi) = self.spine_range();
        if lo > hi {
            return Err(format!("empty spine range [{}, {}]", lo, hi));
        }
        if self.cause_spread < 0.0 || self.subcause_spread < 0.0 {
            return Err("spreads must be non-negative".to_string());
        }
        Ok(())
    }

    /// Valid horizontal span of spine attachment points.
    pub fn spine_range(&self) -> (f32, f32) {
        (self.spine_margin, self.canvas_width - self.head_width)
    }

    /// Clamp into the spine range. NaN lands on the lower bound.
    pub fn clamp_spine_x(&self, x: f32) -> f32 {
        let (lo, hi) = self.spine_range();
        if x.is_nan() {
            return lo;
        }
        x.max(lo).min(hi)
    }

    /// The one formula for a category's spine point when none is stored.
    pub fn default_spine_x(&self, index: usize) -> f32 {
        self.clamp_spine_x(self.spine_base_offset + index as f32 * self.spine_increment)
    }

    pub fn resolve_spine_x(&self, stored: Option<f32>, index: usize) -> f32 {
        match stored {
            Some(x) => self.clamp_spine_x(x),
            None => self.default_spine_x(index),
        }
    }

    /// Inner canvas rectangle (minx, miny, maxx, maxy) for generated positions.
    pub fn placement_bounds(&self) -> (f32, f32, f32, f32) {
        (
            self.margin,
            self.margin,
            self.canvas_width - self.margin,
            self.canvas_height - self.margin,
        )
    }

    pub fn clamp_to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        let (x0, y0, x1, y1) = self.placement_bounds();
        (x.max(x0).min(x1), y.max(y0).min(y1))
    }

    pub fn random_category_position<R: Rng>(&self, rng: &mut R) -> (f32, f32) {
        let (x0, y0, x1, y1) = self.placement_bounds();
        (uniform(rng, x0, x1), uniform(rng, y0, y1))
    }

    pub fn random_cause_position<R: Rng>(&self, rng: &mut R, parent: (f32, f32)) -> (f32, f32) {
        self.random_near(rng, parent, self.cause_spread)
    }

    pub fn random_subcause_position<R: Rng>(&self, rng: &mut R, parent: (f32, f32)) -> (f32, f32) {
        self.random_near(rng, parent, self.subcause_spread)
    }

    fn random_near<R: Rng>(&self, rng: &mut R, (px, py): (f32, f32), spread: f32) -> (f32, f32) {
        let dx = uniform(rng, -spread, spread);
        let dy = uniform(rng, -spread, spread);
        self.clamp_to_canvas(px + dx, py + dy)
    }

    /// Fixed slot for the i-th template category: even above the spine, odd below.
    pub fn template_position(&self, index: usize) -> (f32, f32) {
        let x = self.default_spine_x(index) - 0.5 * self.spine_increment;
        let reach = 0.6 * (self.canvas_height * 0.5);
        let y = if index % 2 == 0 { self.spine_y - reach } else { self.spine_y + reach };
        self.clamp_to_canvas(x, y)
    }
}

fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi { rng.random_range(lo..hi) } else { lo }
}
