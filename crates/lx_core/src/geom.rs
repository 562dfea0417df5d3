//! Manhattan geometry: points, rectangles and the eight orientations.

use std::ops::Add;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Axis-aligned rectangle with `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
}

impl Rect {
    /// Build a rectangle from any two opposite corners.
    pub fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(a.x, a.y, b.x, b.y)
    }

    /// Closed overlap test: rectangles sharing only an edge overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    pub fn translate(&self, by: Point) -> Rect {
        Rect::new(self.x0 + by.x, self.y0 + by.y, self.x1 + by.x, self.y1 + by.y)
    }

    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orient {
    #[default]
    R0,
    R90,
    R180,
    R270,
    /// Mirror about the x axis.
    MX,
    /// Mirror about the y axis.
    MY,
    MXR90,
    MYR90,
}

impl Orient {
    const ALL: [Orient; 8] = [
        Orient::R0,
        Orient::R90,
        Orient::R180,
        Orient::R270,
        Orient::MX,
        Orient::MY,
        Orient::MXR90,
        Orient::MYR90,
    ];

    /// Row-major 2x2 matrix `[a, b, c, d]` mapping `(x, y)` to `(ax + by, cx + dy)`.
    fn matrix(self) -> [i64; 4] {
        match self {
            Orient::R0 => [1, 0, 0, 1],
            Orient::R90 => [0, -1, 1, 0],
            Orient::R180 => [-1, 0, 0, -1],
            Orient::R270 => [0, 1, -1, 0],
            Orient::MX => [1, 0, 0, -1],
            Orient::MY => [-1, 0, 0, 1],
            Orient::MXR90 => [0, 1, 1, 0],
            Orient::MYR90 => [0, -1, -1, 0],
        }
    }

    fn from_matrix(m: [i64; 4]) -> Orient {
        Self::ALL
            .into_iter()
            .find(|o| o.matrix() == m)
            .unwrap_or(Orient::R0)
    }

    pub fn apply(self, p: Point) -> Point {
        let [a, b, c, d] = self.matrix();
        Point::new(a * p.x + b * p.y, c * p.x + d * p.y)
    }

    /// Orientation equivalent to applying `inner` first, then `self`.
    pub fn then_after(self, inner: Orient) -> Orient {
        let [a, b, c, d] = self.matrix();
        let [e, f, g, h] = inner.matrix();
        Self::from_matrix([a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h])
    }
}

/// Placement of a child cell inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Transform {
    pub orient: Orient,
    pub offset: Point,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        orient: Orient::R0,
        offset: Point { x: 0, y: 0 },
    };

    pub fn new(orient: Orient, offset: Point) -> Self {
        Self { orient, offset }
    }

    pub fn translate(x: i64, y: i64) -> Self {
        Self::new(Orient::R0, Point::new(x, y))
    }

    pub fn apply(&self, p: Point) -> Point {
        self.orient.apply(p) + self.offset
    }

    pub fn apply_rect(&self, r: &Rect) -> Rect {
        Rect::from_corners(
            self.apply(Point::new(r.x0, r.y0)),
            self.apply(Point::new(r.x1, r.y1)),
        )
    }

    /// Transform equivalent to applying `inner` first, then `self`.
    pub fn compose(&self, inner: &Transform) -> Transform {
        Transform {
            orient: self.orient.then_after(inner.orient),
            offset: self.orient.apply(inner.offset) + self.offset,
        }
    }
}
