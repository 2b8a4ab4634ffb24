//! JSON scene descriptions and the key report produced from them.

use kurbo::{BezPath, Rect};
use serde::{Deserialize, Serialize};
use shapekey_core::{
    Apply, CacheConfig, DashEffect, Path, RRect, Shape, ShapeCache, StrokeRec, Style,
};
use std::fs;
use thiserror::Error;

/// Inspector errors.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Usage: shapekey-inspect <scene.json>")]
    Usage,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid SVG path: {0}")]
    InvalidSvg(String),
}

/// Result type for inspector operations.
pub type InspectResult<T> = Result<T, InspectError>;

impl From<serde_json::Error> for InspectError {
    fn from(e: serde_json::Error) -> Self {
        InspectError::Parse(e.to_string())
    }
}

/// Source geometry of a scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Geometry {
    Empty,
    Rect { rect: Rect },
    Oval { rect: Rect },
    #[serde(rename = "rrect")]
    RRect { rrect: RRect },
    /// SVG path data, e.g. `M0,0 L10,0 L5,8 Z`.
    Path { svg: String },
}

fn default_scale() -> f64 {
    1.0
}

/// One style application stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Step {
    pub apply: Apply,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

/// A shape, the style it is drawn with, and the stages to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub geometry: Geometry,
    #[serde(default)]
    pub volatile: bool,
    #[serde(default)]
    pub stroke: Option<StrokeRec>,
    #[serde(default)]
    pub dash: Option<DashEffect>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Report line for one stage. Stage 0 is the source shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub stage: usize,
    pub kind: String,
    pub bounds: Rect,
    pub styled_bounds: Rect,
    /// Hex key words, or `None` when the shape is uncacheable.
    pub key: Option<String>,
    /// Earlier stage with an identical geometry key.
    pub same_key_as: Option<usize>,
}

impl Scene {
    /// Load a scene from a JSON file.
    pub fn load(path: &std::path::Path) -> InspectResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            InspectError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> InspectResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn style(&self) -> Style {
        let stroke = self.stroke.unwrap_or_else(StrokeRec::fill);
        match &self.dash {
            Some(dash) => Style::dashed(stroke, dash.clone()),
            None => Style::from_stroke(stroke),
        }
    }

    /// Build the source shape.
    pub fn shape(&self) -> InspectResult<Shape> {
        let style = self.style();
        let shape = match &self.geometry {
            Geometry::Empty => Shape::from_path(Path::new(), style),
            Geometry::Rect { rect } => Shape::from_rect(*rect, style),
            Geometry::Oval { rect } => Shape::from_path(Path::oval(*rect), style),
            Geometry::RRect { rrect } => Shape::from_rrect(*rrect, style),
            Geometry::Path { svg } => {
                let bez = BezPath::from_svg(svg)
                    .map_err(|e| InspectError::InvalidSvg(e.to_string()))?;
                let mut path = Path::from(bez);
                path.set_volatile(self.volatile);
                Shape::from_path(path, style)
            }
        };
        Ok(shape)
    }

    /// Apply every step in order and report each stage's key.
    pub fn inspect(&self) -> InspectResult<Vec<StageReport>> {
        let mut cache = ShapeCache::new(CacheConfig {
            max_entries: self.steps.len() + 1,
        });
        let mut shape = self.shape()?;
        let mut reports = Vec::with_capacity(self.steps.len() + 1);

        for stage in 0..=self.steps.len() {
            if stage > 0 {
                let step = self.steps[stage - 1];
                log::debug!("stage {}: applying {:?} at scale {}", stage, step.apply, step.scale);
                shape = shape.apply_style(step.apply, step.scale);
            }

            let same_key_as = cache.get(&shape).copied();
            if same_key_as.is_none() {
                // Uncacheable shapes are reported without a key.
                let _ = cache.insert(&shape, stage);
            }
            reports.push(StageReport {
                stage,
                kind: format!("{:?}", shape.kind()),
                bounds: shape.bounds(),
                styled_bounds: shape.styled_bounds(),
                key: shape.unstyled_key().map(|key| hex_key(&key)),
                same_key_as,
            });
        }
        Ok(reports)
    }
}

fn hex_key(words: &[u32]) -> String {
    words.iter().map(|w| format!("{w:08x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_scene(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_and_inspect_rect() {
        let file = write_scene(
            r#"{
                "geometry": {"type": "rect", "rect": {"x0": 0.0, "y0": 0.0, "x1": 10.0, "y1": 5.0}},
                "stroke": {"width": 2.0, "join": "round"},
                "steps": [{"apply": "path_effect_and_stroke"}]
            }"#,
        );
        let scene = Scene::load(file.path()).unwrap();
        let reports = scene.inspect().unwrap();
        assert_eq!(reports.len(), 2);

        assert_eq!(reports[0].kind, "RRect");
        assert_eq!(reports[0].bounds, Rect::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(reports[0].styled_bounds, Rect::new(-1.0, -1.0, 11.0, 6.0));
        assert_eq!(reports[0].key.as_ref().map(String::len), Some(24 * 8));

        assert_eq!(reports[1].kind, "Path");
        assert_eq!(reports[1].key.as_ref().map(String::len), Some((24 + 7) * 8));
        assert!(reports[1].key.as_ref().unwrap().starts_with(reports[0].key.as_ref().unwrap()));
        assert_eq!(reports[1].same_key_as, None);
    }

    #[test]
    fn test_noop_step_shares_key() {
        let scene = Scene::from_json(
            r#"{
                "geometry": {"type": "oval", "rect": {"x0": 0.0, "y0": 0.0, "x1": 8.0, "y1": 4.0}},
                "steps": [{"apply": "path_effect_only", "scale": 2.0}]
            }"#,
        )
        .unwrap();
        let reports = scene.inspect().unwrap();
        assert_eq!(reports[0].kind, "RRect");
        assert_eq!(reports[1].same_key_as, Some(0));
        assert_eq!(reports[1].key, reports[0].key);
    }

    #[test]
    fn test_volatile_path_is_uncacheable() {
        let scene = Scene::from_json(
            r#"{
                "geometry": {"type": "path", "svg": "M0,0 L10,0 L5,8 Z"},
                "volatile": true
            }"#,
        )
        .unwrap();
        let reports = scene.inspect().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, "Path");
        assert_eq!(reports[0].key, None);
        assert_eq!(reports[0].same_key_as, None);
    }

    #[test]
    fn test_empty_geometry() {
        let scene = Scene::from_json(r#"{"geometry": {"type": "empty"}}"#).unwrap();
        let reports = scene.inspect().unwrap();
        assert_eq!(reports[0].kind, "Empty");
        assert_eq!(reports[0].key.as_deref(), Some("00000001"));
    }

    #[test]
    fn test_invalid_svg() {
        let scene =
            Scene::from_json(r#"{"geometry": {"type": "path", "svg": "M0,0 Q"}}"#).unwrap();
        assert!(matches!(scene.inspect(), Err(InspectError::InvalidSvg(_))));
    }

    #[test]
    fn test_invalid_dash_is_a_parse_error() {
        let result = Scene::from_json(
            r#"{"geometry": {"type": "empty"}, "dash": {"intervals": [1.0]}}"#,
        );
        assert!(matches!(result, Err(InspectError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Scene::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(InspectError::Io(_))));
    }
}
