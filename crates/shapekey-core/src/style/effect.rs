//! Path effects: geometry transformations applied before stroking.

use super::{StrokeRec, StyleError, StyleResult};
use kurbo::{BezPath, ParamCurveArclen, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on dash segments produced by one filter call.
pub const MAX_DASH_COUNT: f64 = 1_000_000.0;

const ARCLEN_ACCURACY: f64 = 1e-3;

/// A transformation of path geometry, run before the stroke is applied.
pub trait PathEffect: fmt::Debug + Send + Sync {
    /// Produce the filtered geometry, or `None` when the effect cannot run.
    ///
    /// The stroke description is provided for effects that depend on it; its
    /// resolution scale must be left unchanged.
    fn filter(&self, src: &BezPath, stroke: &mut StrokeRec) -> Option<BezPath>;

    /// The dash parameters, if this effect is a dash.
    fn as_dash(&self) -> Option<&DashEffect> {
        None
    }

    /// Conservative bounds of the filtered geometry given source bounds.
    fn compute_fast_bounds(&self, bounds: Rect) -> Rect {
        bounds
    }
}

/// Dashing with an on/off interval pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDash")]
pub struct DashEffect {
    intervals: Vec<f64>,
    phase: f64,
    #[serde(skip)]
    interval_length: f64,
}

#[derive(Deserialize)]
struct RawDash {
    intervals: Vec<f64>,
    #[serde(default)]
    phase: f64,
}

impl TryFrom<RawDash> for DashEffect {
    type Error = StyleError;

    fn try_from(raw: RawDash) -> StyleResult<Self> {
        DashEffect::new(raw.intervals, raw.phase)
    }
}

impl DashEffect {
    /// Create a dash effect.
    ///
    /// Intervals alternate on and off lengths; there must be an even number
    /// of them, all finite and non-negative, with a positive sum. The phase is
    /// wrapped into `[0, sum)`.
    pub fn new(intervals: Vec<f64>, phase: f64) -> StyleResult<Self> {
        if intervals.len() < 2 || intervals.len() % 2 != 0 {
            return Err(StyleError::InvalidDash(format!(
                "expected an even number of intervals, got {}",
                intervals.len()
            )));
        }
        if intervals.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(StyleError::InvalidDash(
                "intervals must be finite and non-negative".to_string(),
            ));
        }
        let interval_length: f64 = intervals.iter().sum();
        if !interval_length.is_finite() || interval_length <= 0.0 {
            return Err(StyleError::InvalidDash(
                "intervals must have a positive sum".to_string(),
            ));
        }
        if !phase.is_finite() {
            return Err(StyleError::InvalidDash("phase must be finite".to_string()));
        }
        Ok(Self {
            intervals,
            phase: phase.rem_euclid(interval_length),
            interval_length,
        })
    }

    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Sum of all intervals.
    pub fn interval_length(&self) -> f64 {
        self.interval_length
    }
}

impl PathEffect for DashEffect {
    fn filter(&self, src: &BezPath, _stroke: &mut StrokeRec) -> Option<BezPath> {
        let length: f64 = src.segments().map(|seg| seg.arclen(ARCLEN_ACCURACY)).sum();
        let on_per_pattern = (self.intervals.len() / 2) as f64;
        let dash_count = (length / self.interval_length).ceil() * on_per_pattern;
        if !dash_count.is_finite() || dash_count > MAX_DASH_COUNT {
            log::debug!(
                "dash would produce {} segments over length {}, refusing",
                dash_count,
                length
            );
            return None;
        }
        Some(kurbo::dash(src.iter(), self.phase, &self.intervals).collect())
    }

    fn as_dash(&self) -> Option<&DashEffect> {
        Some(self)
    }
}
