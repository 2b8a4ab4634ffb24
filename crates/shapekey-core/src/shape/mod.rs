//! Shapes: canonical geometry plus the style it is drawn with.
//!
//! A [`Shape`] reduces its geometry to the simplest equivalent form on
//! construction and can produce a key for that geometry, ignoring the style.
//! Applying the style (see [`Shape::apply_style`]) bakes some or all of it
//! into new geometry; the derived shape's key then covers the baked style, and
//! equal geometry reached through different stages gets equal keys.

mod apply;
mod canonical;
mod codec;

use crate::geometry::{Path, RRect};
use crate::style::Style;
use kurbo::Rect;

/// Which geometry variant a shape holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Empty,
    RRect,
    Path,
}

/// Active geometry. Only derived paths carry an inherited key.
#[derive(Debug, Clone, PartialEq)]
enum Repr {
    Empty,
    RRect(RRect),
    Path { path: Path, inherited_key: Vec<u32> },
}

/// Geometry and the style that will render it.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    repr: Repr,
    style: Style,
}

impl Default for Shape {
    fn default() -> Self {
        Self::new()
    }
}

impl Shape {
    /// An empty shape with the default fill style.
    pub fn new() -> Self {
        Self {
            repr: Repr::Empty,
            style: Style::default(),
        }
    }

    pub fn from_path(path: Path, style: Style) -> Self {
        let mut shape = Self {
            repr: Repr::Path {
                path,
                inherited_key: Vec::new(),
            },
            style,
        };
        shape.attempt_to_reduce_from_path();
        shape
    }

    pub fn from_rrect(rrect: RRect, style: Style) -> Self {
        let mut shape = Self {
            repr: Repr::RRect(rrect),
            style,
        };
        shape.attempt_to_reduce_from_rrect();
        shape
    }

    pub fn from_rect(rect: Rect, style: Style) -> Self {
        Self::from_rrect(RRect::from_rect(rect), style)
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn kind(&self) -> ShapeKind {
        match self.repr {
            Repr::Empty => ShapeKind::Empty,
            Repr::RRect(_) => ShapeKind::RRect,
            Repr::Path { .. } => ShapeKind::Path,
        }
    }

    /// Whether the unstyled geometry is empty. Applying the style may still
    /// produce geometry.
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    /// Bounds of the geometry, ignoring the style.
    pub fn bounds(&self) -> Rect {
        match &self.repr {
            Repr::Empty => Rect::ZERO,
            Repr::RRect(rrect) => rrect.bounds(),
            Repr::Path { path, .. } => path.bounds(),
        }
    }

    /// Bounds of the geometry once the style is drawn.
    pub fn styled_bounds(&self) -> Rect {
        if self.is_empty() && !self.style.has_non_dash_path_effect() {
            return Rect::ZERO;
        }
        self.style.adjust_bounds(self.bounds())
    }

    /// Whether the geometry is known to have no open contours, so a stroke
    /// would draw no caps. Paths are not inspected and always answer `false`.
    pub fn known_to_be_closed(&self) -> bool {
        match self.repr {
            Repr::Empty | Repr::RRect(_) => true,
            Repr::Path { .. } => false,
        }
    }

    /// The unstyled geometry as a path.
    pub fn as_path(&self) -> Path {
        match &self.repr {
            Repr::Empty => Path::new(),
            Repr::RRect(rrect) => Path::rrect(rrect),
            Repr::Path { path, .. } => path.clone(),
        }
    }

    /// The unstyled geometry as a rounded rect, if that is its canonical form.
    pub fn as_rrect(&self) -> Option<RRect> {
        match self.repr {
            Repr::RRect(rrect) => Some(rrect),
            _ => None,
        }
    }

    pub(crate) fn inherited_key(&self) -> &[u32] {
        match &self.repr {
            Repr::Path { inherited_key, .. } => inherited_key,
            _ => &[],
        }
    }
}

impl From<Path> for Shape {
    fn from(path: Path) -> Self {
        Shape::from_path(path, Style::default())
    }
}

impl From<RRect> for Shape {
    fn from(rrect: RRect) -> Self {
        Shape::from_rrect(rrect, Style::default())
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::from_rect(rect, Style::default())
    }
}
