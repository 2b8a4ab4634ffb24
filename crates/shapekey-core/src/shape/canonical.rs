//! Reduction of geometry to its simplest equivalent form.

use super::{Repr, Shape};
use crate::geometry::{Path, RRect};
use crate::style::StrokeRec;

/// Outcome of reducing a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Reduced {
    Empty,
    RRect(RRect),
    Path,
}

/// Find the simplest form of `path` when drawn with the given path effect
/// presence and stroke.
///
/// An open rectangle stays a path unless it is filled without a path effect:
/// stroking it draws caps that the closed rect would not have.
pub(crate) fn reduce_path(path: &Path, has_path_effect: bool, stroke: &StrokeRec) -> Reduced {
    if path.is_empty() {
        return Reduced::Empty;
    }
    if let Some(rrect) = path.is_rrect() {
        debug_assert!(!rrect.is_empty());
        return Reduced::RRect(rrect);
    }
    if let Some(rect) = path.is_oval() {
        let rrect = RRect::from_oval(rect);
        if rrect.is_empty() {
            return Reduced::Empty;
        }
        return Reduced::RRect(rrect);
    }
    if let Some((rect, closed)) = path.is_rect() {
        if closed || (!has_path_effect && stroke.is_fill_style()) {
            return Reduced::RRect(RRect::from_rect(rect));
        }
    }
    Reduced::Path
}

impl Shape {
    pub(super) fn attempt_to_reduce_from_path(&mut self) {
        let Repr::Path { path, .. } = &self.repr else {
            debug_assert!(false, "reducing a shape that is not a path");
            return;
        };
        match reduce_path(path, self.style.has_path_effect(), self.style.stroke_rec()) {
            Reduced::Empty => self.repr = Repr::Empty,
            Reduced::RRect(rrect) => {
                log::trace!("path reduced to {:?}", rrect.kind());
                self.repr = Repr::RRect(rrect);
            }
            Reduced::Path => {}
        }
    }

    pub(super) fn attempt_to_reduce_from_rrect(&mut self) {
        if let Repr::RRect(rrect) = &self.repr {
            if rrect.is_empty() {
                self.repr = Repr::Empty;
            }
        }
    }

    /// Re-run reduction. Shapes are reduced on construction, so this returns
    /// an equal shape.
    pub fn canonicalized(mut self) -> Self {
        match self.repr {
            Repr::Empty => {}
            Repr::RRect(_) => self.attempt_to_reduce_from_rrect(),
            Repr::Path { .. } => self.attempt_to_reduce_from_path(),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::ShapeKind;
    use crate::style::{DashEffect, Style};
    use kurbo::Rect;

    fn open_rect() -> Path {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((20.0, 0.0));
        path.line_to((20.0, 10.0));
        path.line_to((0.0, 10.0));
        path.line_to((0.0, 0.0));
        path
    }

    fn stroke() -> Style {
        Style::from_stroke(StrokeRec::stroke(3.0))
    }

    #[test]
    fn test_empty_path_reduces_to_empty() {
        let shape = Shape::from(Path::new());
        assert!(shape.is_empty());
        assert_eq!(shape.unstyled_key_size(), Some(1));
    }

    #[test]
    fn test_closed_rect_reduces() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        let shape = Shape::from_path(Path::rect(rect), stroke());
        assert_eq!(shape.kind(), ShapeKind::RRect);
        assert_eq!(shape.as_rrect(), Some(RRect::from_rect(rect)));
    }

    #[test]
    fn test_open_rect_under_stroke_stays_path() {
        let shape = Shape::from_path(open_rect(), stroke());
        assert_eq!(shape.kind(), ShapeKind::Path);
    }

    #[test]
    fn test_open_rect_under_fill_reduces() {
        let shape = Shape::from_path(open_rect(), Style::fill());
        assert_eq!(shape.kind(), ShapeKind::RRect);
    }

    #[test]
    fn test_open_rect_under_dashed_fill_stays_path() {
        let dash = DashEffect::new(vec![2.0, 2.0], 0.0).unwrap();
        let shape = Shape::from_path(open_rect(), Style::dashed(StrokeRec::fill(), dash));
        assert_eq!(shape.kind(), ShapeKind::Path);
    }

    #[test]
    fn test_oval_reduces() {
        let rect = Rect::new(0.0, 0.0, 30.0, 10.0);
        let shape = Shape::from(Path::oval(rect));
        assert_eq!(shape.kind(), ShapeKind::RRect);
        let rrect = shape.as_rrect().unwrap();
        assert!(rrect.is_oval());
        assert_eq!(rrect.rect(), rect);
    }

    #[test]
    fn test_degenerate_oval_reduces_to_empty() {
        let rect = Rect::new(0.0, 0.0, 0.0, 10.0);
        let shape = Shape::from(Path::oval(rect));
        assert!(shape.is_empty());
        assert_eq!(shape.unstyled_key(), Shape::from(RRect::from_oval(rect)).unstyled_key());
        assert_eq!(shape.clone().canonicalized(), shape);
    }

    #[test]
    fn test_rrect_path_reduces() {
        let rrect = RRect::from_rect_xy(Rect::new(0.0, 0.0, 30.0, 10.0), 3.0, 2.0);
        let shape = Shape::from(Path::rrect(&rrect));
        assert_eq!(shape.as_rrect(), Some(rrect));
    }

    #[test]
    fn test_empty_rrect_reduces() {
        let shape = Shape::from(RRect::from_rect(Rect::new(3.0, 3.0, 3.0, 10.0)));
        assert!(shape.is_empty());
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        let shapes = [
            Shape::new(),
            Shape::from(Rect::new(0.0, 0.0, 5.0, 5.0)),
            Shape::from(Path::oval(Rect::new(0.0, 0.0, 5.0, 8.0))),
            Shape::from(Path::oval(Rect::new(2.0, 2.0, 9.0, 2.0))),
            Shape::from_path(open_rect(), stroke()),
        ];
        for shape in shapes {
            let once = shape.clone().canonicalized();
            assert_eq!(once, shape);
            assert_eq!(once.clone().canonicalized(), once);
        }
    }

    #[test]
    fn test_reduction_drops_inherited_key() {
        let mut shape = Shape::from_path(open_rect(), stroke());
        if let Repr::Path { inherited_key, .. } = &mut shape.repr {
            inherited_key.extend([1, 2, 3]);
        }
        shape.style = Style::fill();
        let reduced = shape.canonicalized();
        assert_eq!(reduced.kind(), ShapeKind::RRect);
        assert!(reduced.inherited_key().is_empty());
    }
}
