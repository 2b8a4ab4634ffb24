//! Paint style: stroke description plus an optional path effect.

mod effect;
mod stroke;

pub use effect::{DashEffect, MAX_DASH_COUNT, PathEffect};
pub use stroke::{
    Cap, DEFAULT_MITER_LIMIT, InitStyle, Join, STROKE_TOLERANCE, StrokeRec, StrokeStyle,
};

use crate::key::{F64_WORDS, KeyFlags, KeyWriter};
use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Style errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    #[error("Invalid dash: {0}")]
    InvalidDash(String),
}

/// Result type for style construction.
pub type StyleResult<T> = Result<T, StyleError>;

/// Words written for the stroke part of a style key:
/// scale, packed style/join/cap, miter limit, width.
const STROKE_KEY_WORDS: usize = 3 * F64_WORDS + 1;

const JOIN_SHIFT: u32 = 2;
const CAP_SHIFT: u32 = 4;

/// How much of a style to bake into geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Apply {
    /// Run the path effect only; the stroke stays in the style.
    PathEffectOnly,
    /// Run the path effect, then the stroke.
    PathEffectAndStroke,
}

/// How a shape is painted: a stroke description and an optional path effect.
#[derive(Debug, Clone, Default)]
pub struct Style {
    stroke: StrokeRec,
    path_effect: Option<Arc<dyn PathEffect>>,
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        if self.stroke != other.stroke {
            return false;
        }
        match (&self.path_effect, &other.path_effect) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                Arc::ptr_eq(a, b)
                    || matches!((a.as_dash(), b.as_dash()), (Some(da), Some(db)) if da == db)
            }
            _ => false,
        }
    }
}

impl Style {
    pub fn new(stroke: StrokeRec, path_effect: Option<Arc<dyn PathEffect>>) -> Self {
        Self {
            stroke,
            path_effect,
        }
    }

    /// Plain fill, no path effect.
    pub fn fill() -> Self {
        Self::default()
    }

    pub fn hairline() -> Self {
        Self::from_stroke(StrokeRec::hairline())
    }

    /// A style with only a stroke description.
    pub fn from_stroke(stroke: StrokeRec) -> Self {
        Self {
            stroke,
            path_effect: None,
        }
    }

    pub fn from_init(init: InitStyle) -> Self {
        Self::from_stroke(StrokeRec::from_init(init))
    }

    /// A stroke with a dash pattern.
    pub fn dashed(stroke: StrokeRec, dash: DashEffect) -> Self {
        Self::new(stroke, Some(Arc::new(dash)))
    }

    pub fn stroke_rec(&self) -> &StrokeRec {
        &self.stroke
    }

    pub fn path_effect(&self) -> Option<&Arc<dyn PathEffect>> {
        self.path_effect.as_ref()
    }

    pub fn has_path_effect(&self) -> bool {
        self.path_effect.is_some()
    }

    pub fn dash(&self) -> Option<&DashEffect> {
        self.path_effect.as_deref().and_then(|pe| pe.as_dash())
    }

    pub fn is_dashed(&self) -> bool {
        self.dash().is_some()
    }

    pub fn has_non_dash_path_effect(&self) -> bool {
        self.has_path_effect() && !self.is_dashed()
    }

    /// Whether the style changes geometry at all when applied.
    pub fn applies(&self) -> bool {
        self.has_path_effect() || self.stroke.needs_to_apply()
    }

    /// Apply path effect and stroke to `src`.
    ///
    /// Returns the resulting geometry and the style it should be drawn with,
    /// or `None` if neither a path effect nor a stroke changes anything, or
    /// the path effect failed.
    pub fn apply_to_path(&self, src: &BezPath, scale: f64) -> Option<(BezPath, InitStyle)> {
        let mut stroke = self.stroke;
        stroke.set_res_scale(scale);

        let filtered = match &self.path_effect {
            Some(pe) => Some(pe.filter(src, &mut stroke)?),
            None => None,
        };
        let source = filtered.as_ref().unwrap_or(src);

        if let Some(stroked) = stroke.apply_to_path(source) {
            return Some((stroked, InitStyle::Fill));
        }
        let filtered = filtered?;
        let init = if stroke.is_fill_style() {
            InitStyle::Fill
        } else {
            InitStyle::Hairline
        };
        Some((filtered, init))
    }

    /// Number of key words this style contributes for `apply`, or `None` if
    /// the style cannot be keyed.
    pub fn key_size(&self, apply: Apply, _flags: KeyFlags) -> Option<usize> {
        let mut size = 0;
        if let Some(dash) = self.dash() {
            size += F64_WORDS * (2 + dash.intervals().len());
        } else if self.has_path_effect() {
            return None;
        }
        if apply == Apply::PathEffectOnly {
            return Some(size);
        }
        if self.stroke.needs_to_apply() {
            size += STROKE_KEY_WORDS;
        }
        Some(size)
    }

    /// Write this style's key for `apply` into `out`, returning the number of
    /// words written. `out` must hold at least [`Style::key_size`] words.
    pub fn write_key(&self, out: &mut [u32], apply: Apply, scale: f64, flags: KeyFlags) -> usize {
        let mut writer = KeyWriter::new(out);
        if let Some(dash) = self.dash() {
            writer.push_f64(scale);
            writer.push_f64(dash.phase());
            for &interval in dash.intervals() {
                writer.push_f64(interval);
            }
        } else {
            debug_assert!(!self.has_path_effect(), "unkeyable path effect");
        }

        if apply == Apply::PathEffectAndStroke && self.stroke.needs_to_apply() {
            writer.push_f64(scale);
            // Caps only show on open contours, but a path effect may open a
            // closed one.
            let cap = if flags.contains(KeyFlags::CLOSED) && !self.has_path_effect() {
                Cap::Butt
            } else {
                self.stroke.cap()
            };
            let join = self.stroke.join();
            writer.push_u32(
                self.stroke.style() as u32
                    | (join as u32) << JOIN_SHIFT
                    | (cap as u32) << CAP_SHIFT,
            );
            let miter = if join == Join::Miter {
                self.stroke.miter_limit()
            } else {
                -1.0
            };
            writer.push_f64(miter);
            writer.push_f64(self.stroke.width());
        }
        writer.written()
    }

    /// Expand geometry bounds by what the path effect and stroke may add.
    pub fn adjust_bounds(&self, bounds: Rect) -> Rect {
        let bounds = match &self.path_effect {
            Some(pe) => pe.compute_fast_bounds(bounds),
            None => bounds,
        };
        let radius = self.stroke.inflation_radius();
        bounds.inflate(radius, radius)
    }
}
