//! Rounded rectangle with independent per-corner x/y radii.

use crate::key::{F64_WORDS, KeyWriter};
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Tolerance used when flattening ovals into cubic outlines.
pub(crate) const OVAL_TOLERANCE: f64 = 0.1;

/// Cubic control point distance for a quarter ellipse.
const KAPPA: f64 = 0.552_284_749_831;

/// Corner order used for radii and key layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    UpperLeft = 0,
    UpperRight = 1,
    LowerRight = 2,
    LowerLeft = 3,
}

/// Classification of a normalized rounded rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RRectKind {
    /// Zero area.
    Empty,
    /// All radii are zero.
    Rect,
    /// Every corner radius is half the width and height.
    Oval,
    /// All corners share one radius.
    Simple,
    /// Corners differ.
    Complex,
}

/// A rectangle with an elliptical radius per corner.
///
/// Always normalized: the rect is sorted, radii are non-negative and scaled so
/// adjacent corners never overlap along a side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRRect", into = "RawRRect")]
pub struct RRect {
    rect: Rect,
    radii: [Vec2; 4],
    kind: RRectKind,
}

/// Serialized form; deserialization re-runs normalization.
#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawRRect {
    rect: Rect,
    #[serde(default)]
    radii: [Vec2; 4],
}

impl From<RawRRect> for RRect {
    fn from(raw: RawRRect) -> Self {
        RRect::new(raw.rect, raw.radii)
    }
}

impl From<RRect> for RawRRect {
    fn from(rrect: RRect) -> Self {
        Self {
            rect: rrect.rect,
            radii: rrect.radii,
        }
    }
}

impl Default for RRect {
    fn default() -> Self {
        Self::empty_at(Rect::ZERO)
    }
}

impl RRect {
    /// Bytes occupied by the canonical layout: four rect edges and eight radii.
    pub const SIZE_IN_MEMORY: usize = 12 * std::mem::size_of::<f64>();

    /// Create a normalized rounded rect. Radii are ordered by [`Corner`].
    pub fn new(rect: Rect, radii: [Vec2; 4]) -> Self {
        if !rect.is_finite() {
            return Self::empty_at(Rect::ZERO);
        }
        let rect = rect.abs();
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Self::empty_at(rect);
        }

        let mut radii = radii.map(|r| {
            let x = if r.x.is_finite() && r.x > 0.0 { r.x } else { 0.0 };
            let y = if r.y.is_finite() && r.y > 0.0 { r.y } else { 0.0 };
            if x == 0.0 || y == 0.0 {
                Vec2::ZERO
            } else {
                Vec2::new(x, y)
            }
        });

        let (w, h) = (rect.width(), rect.height());
        let ul = radii[Corner::UpperLeft as usize];
        let ur = radii[Corner::UpperRight as usize];
        let lr = radii[Corner::LowerRight as usize];
        let ll = radii[Corner::LowerLeft as usize];
        let scale = [
            (ul.x + ur.x, w),
            (ll.x + lr.x, w),
            (ul.y + ll.y, h),
            (ur.y + lr.y, h),
        ]
        .into_iter()
        .fold(1.0_f64, |scale, (sum, side)| {
            if sum > side { scale.min(side / sum) } else { scale }
        });
        if scale < 1.0 {
            for r in &mut radii {
                *r *= scale;
            }
        }

        let kind = classify(rect, &radii);
        Self { rect, radii, kind }
    }

    /// A rounded rect with zero radii.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect, [Vec2::ZERO; 4])
    }

    /// The oval inscribed in `rect`.
    pub fn from_oval(rect: Rect) -> Self {
        let sorted = rect.abs();
        let r = Vec2::new(sorted.width() / 2.0, sorted.height() / 2.0);
        Self::new(rect, [r; 4])
    }

    /// A rounded rect with the same radius on every corner.
    pub fn from_rect_xy(rect: Rect, rx: f64, ry: f64) -> Self {
        Self::new(rect, [Vec2::new(rx, ry); 4])
    }

    fn empty_at(rect: Rect) -> Self {
        Self {
            rect,
            radii: [Vec2::ZERO; 4],
            kind: RRectKind::Empty,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn radii(&self) -> [Vec2; 4] {
        self.radii
    }

    pub fn radius(&self, corner: Corner) -> Vec2 {
        self.radii[corner as usize]
    }

    pub fn kind(&self) -> RRectKind {
        self.kind
    }

    pub fn is_empty(&self) -> bool {
        self.kind == RRectKind::Empty
    }

    pub fn is_rect(&self) -> bool {
        self.kind == RRectKind::Rect
    }

    pub fn is_oval(&self) -> bool {
        self.kind == RRectKind::Oval
    }

    pub fn bounds(&self) -> Rect {
        self.rect
    }

    /// Synthesize the outline as a single closed contour.
    pub fn to_bez_path(&self) -> BezPath {
        match self.kind {
            RRectKind::Empty => BezPath::new(),
            RRectKind::Rect => rect_path(self.rect),
            RRectKind::Oval => Ellipse::from_rect(self.rect).to_path(OVAL_TOLERANCE),
            RRectKind::Simple | RRectKind::Complex => self.rounded_path(),
        }
    }

    fn rounded_path(&self) -> BezPath {
        let Rect { x0, y0, x1, y1 } = self.rect;
        let ul = self.radius(Corner::UpperLeft);
        let ur = self.radius(Corner::UpperRight);
        let lr = self.radius(Corner::LowerRight);
        let ll = self.radius(Corner::LowerLeft);

        let mut path = BezPath::new();
        let start = Point::new(x0 + ul.x, y0);
        path.move_to(start);

        let mut current = start;
        line_to_if_moved(&mut path, &mut current, Point::new(x1 - ur.x, y0));
        if ur != Vec2::ZERO {
            path.curve_to(
                Point::new(x1 - ur.x + KAPPA * ur.x, y0),
                Point::new(x1, y0 + ur.y - KAPPA * ur.y),
                Point::new(x1, y0 + ur.y),
            );
            current = Point::new(x1, y0 + ur.y);
        }
        line_to_if_moved(&mut path, &mut current, Point::new(x1, y1 - lr.y));
        if lr != Vec2::ZERO {
            path.curve_to(
                Point::new(x1, y1 - lr.y + KAPPA * lr.y),
                Point::new(x1 - lr.x + KAPPA * lr.x, y1),
                Point::new(x1 - lr.x, y1),
            );
            current = Point::new(x1 - lr.x, y1);
        }
        line_to_if_moved(&mut path, &mut current, Point::new(x0 + ll.x, y1));
        if ll != Vec2::ZERO {
            path.curve_to(
                Point::new(x0 + ll.x - KAPPA * ll.x, y1),
                Point::new(x0, y1 - ll.y + KAPPA * ll.y),
                Point::new(x0, y1 - ll.y),
            );
            current = Point::new(x0, y1 - ll.y);
        }
        line_to_if_moved(&mut path, &mut current, Point::new(x0, y0 + ul.y));
        if ul != Vec2::ZERO {
            path.curve_to(
                Point::new(x0, y0 + ul.y - KAPPA * ul.y),
                Point::new(x0 + ul.x - KAPPA * ul.x, y0),
                start,
            );
        }
        path.close_path();
        path
    }

    /// Serialize the canonical layout: rect edges, then radii by corner (x, y).
    pub fn write_to_words(&self, writer: &mut KeyWriter<'_>) {
        let Rect { x0, y0, x1, y1 } = self.rect;
        for value in [x0, y0, x1, y1] {
            writer.push_f64(value);
        }
        for r in self.radii {
            writer.push_f64(r.x);
            writer.push_f64(r.y);
        }
    }

    /// Number of key words written by [`RRect::write_to_words`].
    pub const fn key_words() -> usize {
        12 * F64_WORDS
    }
}

impl From<Rect> for RRect {
    fn from(rect: Rect) -> Self {
        RRect::from_rect(rect)
    }
}

impl From<RoundedRect> for RRect {
    fn from(rounded: RoundedRect) -> Self {
        let r = rounded.radii();
        RRect::new(
            rounded.rect(),
            [
                Vec2::new(r.top_left, r.top_left),
                Vec2::new(r.top_right, r.top_right),
                Vec2::new(r.bottom_right, r.bottom_right),
                Vec2::new(r.bottom_left, r.bottom_left),
            ],
        )
    }
}

fn line_to_if_moved(path: &mut BezPath, current: &mut Point, to: Point) {
    if *current != to {
        path.line_to(to);
        *current = to;
    }
}

fn classify(rect: Rect, radii: &[Vec2; 4]) -> RRectKind {
    if radii.iter().all(|r| *r == Vec2::ZERO) {
        return RRectKind::Rect;
    }
    let first = radii[0];
    if radii.iter().all(|r| *r == first) {
        if first.x >= rect.width() / 2.0 && first.y >= rect.height() / 2.0 {
            return RRectKind::Oval;
        }
        return RRectKind::Simple;
    }
    RRectKind::Complex
}

/// A closed clockwise rectangle contour starting at the top-left corner.
pub(crate) fn rect_path(rect: Rect) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((rect.x0, rect.y0));
    path.line_to((rect.x1, rect.y0));
    path.line_to((rect.x1, rect.y1));
    path.line_to((rect.x0, rect.y1));
    path.close_path();
    path
}
