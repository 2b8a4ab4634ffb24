//! Stroke parameters.

use kurbo::{BezPath, Stroke, StrokeOpts};
use serde::{Deserialize, Serialize};

/// Base tolerance for stroke outlines at a resolution scale of 1.
pub const STROKE_TOLERANCE: f64 = 0.1;

/// Default miter limit for new stroke descriptions.
pub const DEFAULT_MITER_LIMIT: f64 = 4.0;

/// Line cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cap {
    #[default]
    Butt = 0,
    Round = 1,
    Square = 2,
}

impl From<Cap> for kurbo::Cap {
    fn from(cap: Cap) -> Self {
        match cap {
            Cap::Butt => kurbo::Cap::Butt,
            Cap::Round => kurbo::Cap::Round,
            Cap::Square => kurbo::Cap::Square,
        }
    }
}

/// Line join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Join {
    #[default]
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

impl From<Join> for kurbo::Join {
    fn from(join: Join) -> Self {
        match join {
            Join::Miter => kurbo::Join::Miter,
            Join::Round => kurbo::Join::Round,
            Join::Bevel => kurbo::Join::Bevel,
        }
    }
}

/// How a stroke description renders geometry.
///
/// Discriminants are the values written into style keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeStyle {
    Hairline = 0,
    Fill = 1,
    Stroke = 2,
    StrokeAndFill = 3,
}

/// Styles a stroke description can be reset to once stroking is baked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStyle {
    Fill,
    Hairline,
}

fn default_miter_limit() -> f64 {
    DEFAULT_MITER_LIMIT
}

fn default_res_scale() -> f64 {
    1.0
}

/// Stroke description: width, caps, joins and resolution scale.
///
/// A negative width means fill, zero means hairline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeRec {
    width: f64,
    #[serde(default = "default_miter_limit")]
    miter_limit: f64,
    #[serde(default)]
    cap: Cap,
    #[serde(default)]
    join: Join,
    #[serde(default)]
    stroke_and_fill: bool,
    #[serde(default = "default_res_scale")]
    res_scale: f64,
}

impl Default for StrokeRec {
    fn default() -> Self {
        Self::fill()
    }
}

impl StrokeRec {
    /// Plain fill.
    pub fn fill() -> Self {
        Self {
            width: -1.0,
            miter_limit: DEFAULT_MITER_LIMIT,
            cap: Cap::default(),
            join: Join::default(),
            stroke_and_fill: false,
            res_scale: 1.0,
        }
    }

    /// Zero-width stroke.
    pub fn hairline() -> Self {
        Self {
            width: 0.0,
            ..Self::fill()
        }
    }

    /// Stroke of the given width. Zero gives a hairline.
    pub fn stroke(width: f64) -> Self {
        Self {
            width: width.max(0.0),
            ..Self::fill()
        }
    }

    pub fn from_init(init: InitStyle) -> Self {
        match init {
            InitStyle::Fill => Self::fill(),
            InitStyle::Hairline => Self::hairline(),
        }
    }

    pub fn with_cap(mut self, cap: Cap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    pub fn with_miter_limit(mut self, miter_limit: f64) -> Self {
        self.miter_limit = miter_limit;
        self
    }

    pub fn with_stroke_and_fill(mut self, stroke_and_fill: bool) -> Self {
        self.stroke_and_fill = stroke_and_fill;
        self
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn cap(&self) -> Cap {
        self.cap
    }

    pub fn join(&self) -> Join {
        self.join
    }

    pub fn miter_limit(&self) -> f64 {
        self.miter_limit
    }

    pub fn res_scale(&self) -> f64 {
        self.res_scale
    }

    /// Set the device scale that stroke approximation tolerance tracks.
    pub fn set_res_scale(&mut self, res_scale: f64) {
        self.res_scale = res_scale;
    }

    pub fn style(&self) -> StrokeStyle {
        if self.width < 0.0 {
            StrokeStyle::Fill
        } else if self.width == 0.0 {
            if self.stroke_and_fill {
                StrokeStyle::Fill
            } else {
                StrokeStyle::Hairline
            }
        } else if self.stroke_and_fill {
            StrokeStyle::StrokeAndFill
        } else {
            StrokeStyle::Stroke
        }
    }

    pub fn is_fill_style(&self) -> bool {
        self.style() == StrokeStyle::Fill
    }

    pub fn is_hairline_style(&self) -> bool {
        self.style() == StrokeStyle::Hairline
    }

    /// Whether stroking changes the geometry (as opposed to a fill or hairline).
    pub fn needs_to_apply(&self) -> bool {
        matches!(self.style(), StrokeStyle::Stroke | StrokeStyle::StrokeAndFill)
    }

    /// How far stroking can push geometry past its bounds.
    pub fn inflation_radius(&self) -> f64 {
        match self.style() {
            StrokeStyle::Fill => 0.0,
            StrokeStyle::Hairline => 1.0,
            StrokeStyle::Stroke | StrokeStyle::StrokeAndFill => {
                let mut multiplier: f64 = 1.0;
                if self.join == Join::Miter {
                    multiplier = multiplier.max(self.miter_limit);
                }
                if self.cap == Cap::Square {
                    multiplier = multiplier.max(std::f64::consts::SQRT_2);
                }
                self.width / 2.0 * multiplier
            }
        }
    }

    fn to_kurbo(self) -> Stroke {
        Stroke::new(self.width)
            .with_join(self.join.into())
            .with_miter_limit(self.miter_limit)
            .with_caps(self.cap.into())
    }

    /// Stroke `src` into fill geometry.
    ///
    /// Returns `None` for fill and hairline descriptions, which leave
    /// geometry unchanged.
    pub fn apply_to_path(&self, src: &BezPath) -> Option<BezPath> {
        if !self.needs_to_apply() {
            return None;
        }
        let res_scale = if self.res_scale.is_finite() && self.res_scale > 0.0 {
            self.res_scale
        } else {
            1.0
        };
        let tolerance = STROKE_TOLERANCE / res_scale;
        let opts = StrokeOpts::default();
        let mut out = kurbo::stroke(src.iter(), &self.to_kurbo(), &opts, tolerance);
        if self.stroke_and_fill {
            out.extend(src.iter());
        }
        Some(out)
    }
}
