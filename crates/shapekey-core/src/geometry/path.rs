//! Owned path geometry with a generation identifier.

use super::rrect::{OVAL_TOLERANCE, RRect, RRectKind, rect_path};
use kurbo::{BezPath, Ellipse, PathEl, Point, Rect, Shape as KurboShape};
use std::sync::atomic::{AtomicU32, Ordering};

/// Generation id shared by every empty path.
pub const EMPTY_GENERATION_ID: u32 = 1;

/// Allocate a fresh generation id.
///
/// Ids increase monotonically per process and skip the reserved values `0`
/// and [`EMPTY_GENERATION_ID`] on wrap-around.
fn next_generation_id() -> u32 {
    static GENERATION_COUNTER: AtomicU32 = AtomicU32::new(EMPTY_GENERATION_ID + 1);

    loop {
        let id = GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed);
        if id > EMPTY_GENERATION_ID {
            return id;
        }
    }
}

/// What the path is known to be, recorded when it was built from a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Hint {
    General,
    Oval(Rect),
    RRect(RRect),
}

/// A general path.
///
/// Wraps a [`BezPath`] and tracks a generation id that changes on every
/// mutation, so two paths with the same id are known to hold the same
/// geometry. A volatile path asks callers not to key caches on that id.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    inner: BezPath,
    generation_id: u32,
    volatile: bool,
    hint: Hint,
}

impl Default for Path {
    fn default() -> Self {
        Self::new()
    }
}

impl From<BezPath> for Path {
    fn from(inner: BezPath) -> Self {
        let generation_id = if inner.elements().is_empty() {
            EMPTY_GENERATION_ID
        } else {
            next_generation_id()
        };
        Self {
            inner,
            generation_id,
            volatile: false,
            hint: Hint::General,
        }
    }
}

impl Path {
    /// Create an empty path.
    pub fn new() -> Self {
        Self {
            inner: BezPath::new(),
            generation_id: EMPTY_GENERATION_ID,
            volatile: false,
            hint: Hint::General,
        }
    }

    /// A closed rectangle contour.
    pub fn rect(rect: Rect) -> Self {
        let mut path = Self::new();
        path.add_rect(rect);
        path
    }

    /// An oval inscribed in `rect`.
    pub fn oval(rect: Rect) -> Self {
        let mut path = Self::new();
        path.add_oval(rect);
        path
    }

    /// A rounded rectangle outline.
    pub fn rrect(rrect: &RRect) -> Self {
        let mut path = Self::new();
        path.add_rrect(rrect);
        path
    }

    fn touch(&mut self) {
        self.generation_id = next_generation_id();
        self.hint = Hint::General;
    }

    pub fn move_to(&mut self, p: impl Into<Point>) {
        self.inner.move_to(p);
        self.touch();
    }

    pub fn line_to(&mut self, p: impl Into<Point>) {
        self.inner.line_to(p);
        self.touch();
    }

    pub fn quad_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) {
        self.inner.quad_to(p1.into(), p2.into());
        self.touch();
    }

    pub fn curve_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) {
        self.inner.curve_to(p1.into(), p2.into(), p3.into());
        self.touch();
    }

    pub fn close_path(&mut self) {
        self.inner.close_path();
        self.touch();
    }

    /// Append elements from another path.
    pub fn extend(&mut self, elements: impl IntoIterator<Item = PathEl>) {
        self.inner.extend(elements);
        self.touch();
    }

    pub fn add_rect(&mut self, rect: Rect) {
        self.extend(rect_path(rect));
    }

    /// Append an oval. On an empty path the oval is remembered for [`Path::is_oval`].
    pub fn add_oval(&mut self, rect: Rect) {
        let was_empty = self.is_empty();
        let rect = rect.abs();
        self.extend(Ellipse::from_rect(rect).path_elements(OVAL_TOLERANCE));
        if was_empty {
            self.hint = Hint::Oval(rect);
        }
    }

    /// Append a rounded rect. Rect and oval kinds are appended as those
    /// primitives so the matching predicate recognizes them.
    pub fn add_rrect(&mut self, rrect: &RRect) {
        match rrect.kind() {
            RRectKind::Empty => {}
            RRectKind::Rect => self.add_rect(rrect.rect()),
            RRectKind::Oval => self.add_oval(rrect.rect()),
            RRectKind::Simple | RRectKind::Complex => {
                let was_empty = self.is_empty();
                self.extend(rrect.to_bez_path());
                if was_empty {
                    self.hint = Hint::RRect(*rrect);
                }
            }
        }
    }

    /// Remove all geometry. Volatility is cleared as well.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.elements().is_empty()
    }

    pub fn elements(&self) -> &[PathEl] {
        self.inner.elements()
    }

    pub fn as_bez_path(&self) -> &BezPath {
        &self.inner
    }

    pub fn into_bez_path(self) -> BezPath {
        self.inner
    }

    pub fn generation_id(&self) -> u32 {
        self.generation_id
    }

    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    /// Mark the path as volatile. Does not change the generation id.
    pub fn set_volatile(&mut self, volatile: bool) {
        self.volatile = volatile;
    }

    /// Tight bounds of the geometry; [`Rect::ZERO`] when empty.
    pub fn bounds(&self) -> Rect {
        if self.is_empty() {
            return Rect::ZERO;
        }
        self.inner.bounding_box()
    }

    /// The rounded rect this path was built from, if it was built from one.
    pub fn is_rrect(&self) -> Option<RRect> {
        match self.hint {
            Hint::RRect(rrect) => Some(rrect),
            _ => None,
        }
    }

    /// The bounds of the oval this path was built from, if it was built from one.
    pub fn is_oval(&self) -> Option<Rect> {
        match self.hint {
            Hint::Oval(rect) => Some(rect),
            _ => None,
        }
    }

    /// Detect a single axis-aligned rectangle contour.
    ///
    /// Returns the rect and whether the contour ends with a close. Three
    /// sides are accepted; the fourth is implied. Collinear points along a
    /// side and trailing moves are ignored; a side that doubles back is not.
    pub fn is_rect(&self) -> Option<(Rect, bool)> {
        let (first, rest) = self.inner.elements().split_first()?;
        let PathEl::MoveTo(start) = *first else {
            return None;
        };

        let mut corners: Vec<Point> = vec![start];
        let mut closed = false;
        let mut ended = false;
        for el in rest {
            match *el {
                PathEl::LineTo(p) if !closed && !ended => {
                    let n = corners.len();
                    if corners[n - 1] == p {
                        continue;
                    }
                    if n >= 2 && continues_side(corners[n - 2], corners[n - 1], p) {
                        corners[n - 1] = p;
                    } else {
                        corners.push(p);
                    }
                }
                PathEl::ClosePath if !closed && !ended => closed = true,
                PathEl::MoveTo(_) => ended = true,
                _ => return None,
            }
        }

        if corners.len() == 5 && corners[4] == corners[0] {
            corners.pop();
        }
        // A contour that starts mid-side splits that side in two.
        if corners.len() == 5 && continues_side(corners[4], corners[0], corners[1]) {
            corners.remove(0);
        }
        if corners.len() != 4 {
            return None;
        }

        let mut prev_horizontal = None;
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let horizontal = a.y == b.y && a.x != b.x;
            let vertical = a.x == b.x && a.y != b.y;
            if !horizontal && !vertical {
                return None;
            }
            if prev_horizontal == Some(horizontal) {
                return None;
            }
            prev_horizontal = Some(horizontal);
        }

        Some((Rect::from_points(corners[0], corners[2]), closed))
    }
}

/// Whether `c` extends the axis-aligned side from `a` to `b` in the same direction.
fn continues_side(a: Point, b: Point, c: Point) -> bool {
    if a.x == b.x && b.x == c.x {
        (b.y - a.y) * (c.y - b.y) > 0.0
    } else if a.y == b.y && b.y == c.y {
        (b.x - a.x) * (c.x - b.x) > 0.0
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_rect_path() -> Path {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 5.0));
        path.line_to((0.0, 5.0));
        path.line_to((0.0, 0.0));
        path
    }

    #[test]
    fn test_empty_path() {
        let path = Path::new();
        assert!(path.is_empty());
        assert_eq!(path.generation_id(), EMPTY_GENERATION_ID);
        assert_eq!(path.bounds(), Rect::ZERO);
    }

    #[test]
    fn test_mutation_changes_generation() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        let first = path.generation_id();
        path.line_to((1.0, 1.0));
        assert!(path.generation_id() > first);
    }

    #[test]
    fn test_clone_keeps_generation() {
        let path = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let copy = path.clone();
        assert_eq!(path.generation_id(), copy.generation_id());
        assert_eq!(path, copy);
    }

    #[test]
    fn test_volatile_keeps_generation() {
        let mut path = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let id = path.generation_id();
        path.set_volatile(true);
        assert!(path.is_volatile());
        assert_eq!(path.generation_id(), id);
    }

    #[test]
    fn test_closed_rect_detected() {
        let path = Path::rect(Rect::new(0.0, 0.0, 10.0, 5.0));
        assert_eq!(path.is_rect(), Some((Rect::new(0.0, 0.0, 10.0, 5.0), true)));
    }

    #[test]
    fn test_open_rect_detected() {
        let (rect, closed) = open_rect_path().is_rect().unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 10.0, 5.0));
        assert!(!closed);
    }

    #[test]
    fn test_three_sided_rect() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((0.0, 5.0));
        path.line_to((10.0, 5.0));
        path.line_to((10.0, 0.0));
        assert_eq!(path.is_rect(), Some((Rect::new(0.0, 0.0, 10.0, 5.0), false)));
    }

    #[test]
    fn test_rect_with_collinear_points() {
        let mut path = Path::new();
        path.move_to((5.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 2.0));
        path.line_to((10.0, 5.0));
        path.line_to((0.0, 5.0));
        path.line_to((0.0, 0.0));
        path.close_path();
        path.move_to((40.0, 40.0));
        assert_eq!(path.is_rect(), Some((Rect::new(0.0, 0.0, 10.0, 5.0), true)));
    }

    #[test]
    fn test_doubling_back_is_not_a_rect() {
        let mut path = Path::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 0.0));
        path.line_to((10.0, 5.0));
        path.line_to((10.0, 3.0));
        path.line_to((0.0, 3.0));
        path.close_path();
        assert!(path.is_rect().is_none());
    }

    #[test]
    fn test_non_rects_rejected() {
        let mut triangle = Path::new();
        triangle.move_to((0.0, 0.0));
        triangle.line_to((10.0, 0.0));
        triangle.line_to((5.0, 5.0));
        triangle.close_path();
        assert!(triangle.is_rect().is_none());

        let mut two = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        two.add_rect(Rect::new(2.0, 2.0, 3.0, 3.0));
        assert!(two.is_rect().is_none());

        let mut curve = Path::new();
        curve.move_to((0.0, 0.0));
        curve.quad_to((5.0, 5.0), (10.0, 0.0));
        assert!(curve.is_rect().is_none());

        let mut flat = Path::new();
        flat.move_to((0.0, 0.0));
        flat.line_to((10.0, 0.0));
        flat.line_to((0.0, 0.0));
        flat.close_path();
        assert!(flat.is_rect().is_none());
    }

    #[test]
    fn test_curves_accept_mixed_point_types() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.quad_to(Point::new(5.0, 10.0), (10.0, 0.0));
        path.curve_to((12.0, 2.0), Point::new(14.0, 2.0), (16.0, 0.0));
        assert_eq!(
            path.elements().last(),
            Some(&PathEl::CurveTo(
                Point::new(12.0, 2.0),
                Point::new(14.0, 2.0),
                Point::new(16.0, 0.0)
            ))
        );
        assert_eq!(path.bounds().x1, 16.0);
    }

    #[test]
    fn test_oval_hint() {
        let rect = Rect::new(0.0, 0.0, 20.0, 10.0);
        let mut path = Path::oval(rect);
        assert_eq!(path.is_oval(), Some(rect));
        path.line_to((30.0, 30.0));
        assert!(path.is_oval().is_none());
    }

    #[test]
    fn test_rrect_hint_only_on_empty_path() {
        let rrect = RRect::from_rect_xy(Rect::new(0.0, 0.0, 20.0, 10.0), 2.0, 2.0);
        assert_eq!(Path::rrect(&rrect).is_rrect(), Some(rrect));

        let mut path = Path::new();
        path.move_to((50.0, 50.0));
        path.add_rrect(&rrect);
        assert!(path.is_rrect().is_none());
    }

    #[test]
    fn test_rect_kind_rrect_becomes_rect() {
        let rrect = RRect::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let path = Path::rrect(&rrect);
        assert!(path.is_rrect().is_none());
        assert_eq!(path.is_rect(), Some((rrect.rect(), true)));
    }

    #[test]
    fn test_reset() {
        let mut path = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        path.set_volatile(true);
        path.reset();
        assert!(path.is_empty());
        assert!(!path.is_volatile());
        assert_eq!(path.generation_id(), EMPTY_GENERATION_ID);
    }
}
