//! Basic 2D types and tolerances shared by every kernel algorithm.
//!
//! - `GeomCfg`: centralizes epsilons for determinants, point coincidence and areas.
//! - `Hs2`: closed half‑space `n·x <= c`, used for rectangle clipping.
//! - `Rect`: axis-aligned bounds with containment and corner helpers.
//! - `Winding`: the two ring orientations. CCW (positive signed area, y-up) is
//!   the internal convention of the crate.

use nalgebra::Vector2;

/// A point (or vector) in the plane.
pub type Point = Vector2<f64>;

/// Geometry configuration (tolerances).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    /// Determinant threshold below which two lines count as parallel.
    pub eps_det: f64,
    /// Distance below which two points count as coincident.
    pub eps_dist: f64,
    /// Area below which a triangle or ring counts as degenerate.
    pub eps_area: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self {
            eps_det: 1e-12,
            eps_dist: 1e-9,
            eps_area: 1e-9,
        }
    }
}

/// Ring orientation in a y-up frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Winding {
    Clockwise,
    CounterClockwise,
}

impl Winding {
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Winding::Clockwise => Winding::CounterClockwise,
            Winding::CounterClockwise => Winding::Clockwise,
        }
    }
}

/// Structural point equality with an explicit tolerance (max-abs metric).
#[inline]
pub fn approx_eq(a: Point, b: Point, tol: f64) -> bool {
    (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
}

/// Closed half‑space `n · x <= c` (no normalization required here).
#[derive(Clone, Copy, Debug)]
pub struct Hs2 {
    pub n: Vector2<f64>,
    pub c: f64,
}

impl Hs2 {
    #[inline]
    pub fn new(n: Vector2<f64>, c: f64) -> Self {
        Self { n, c }
    }
    /// Signed slack `n·p - c`; non-positive inside.
    #[inline]
    pub fn eval(&self, p: Point) -> f64 {
        self.n.dot(&p) - self.c
    }
}

/// Axis-aligned rectangle `[min.x, max.x] × [min.y, max.y]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    #[inline]
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Rectangle anchored at the origin with the given size.
    #[inline]
    pub fn from_size(width: f64, height: f64) -> Self {
        Self {
            min: Point::new(0.0, 0.0),
            max: Point::new(width, height),
        }
    }

    /// Tight bounds of a point set; `None` when empty.
    pub fn bounding(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut r = Rect::new(first, first);
        for p in &points[1..] {
            r.min.x = r.min.x.min(p.x);
            r.min.y = r.min.y.min(p.y);
            r.max.x = r.max.x.max(p.x);
            r.max.y = r.max.y.max(p.y);
        }
        Some(r)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }
    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }
    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
    #[inline]
    pub fn contains_eps(&self, p: Point, eps: f64) -> bool {
        p.x >= self.min.x - eps
            && p.x <= self.max.x + eps
            && p.y >= self.min.y - eps
            && p.y <= self.max.y + eps
    }

    /// Corners in CCW order starting at `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// The four bounding half-spaces.
    pub fn halfspaces(&self) -> [Hs2; 4] {
        [
            Hs2::new(Vector2::new(1.0, 0.0), self.max.x),
            Hs2::new(Vector2::new(-1.0, 0.0), -self.min.x),
            Hs2::new(Vector2::new(0.0, 1.0), self.max.y),
            Hs2::new(Vector2::new(0.0, -1.0), -self.min.y),
        ]
    }

    /// Clamp a point into the rectangle.
    #[inline]
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
        )
    }

    /// Whether `p` lies on the rectangle border (within `eps`).
    pub fn on_border(&self, p: Point, eps: f64) -> bool {
        self.contains_eps(p, eps)
            && ((p.x - self.min.x).abs() <= eps
                || (p.x - self.max.x).abs() <= eps
                || (p.y - self.min.y).abs() <= eps
                || (p.y - self.max.y).abs() <= eps)
    }
}
