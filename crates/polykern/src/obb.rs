//! Minimum-area oriented bounding box by edge-aligned candidates.
//!
//! For a convex ring the minimum-area enclosing rectangle has a side collinear
//! with some ring edge, so trying every edge direction is exact. Each
//! candidate projects all points onto the edge direction and its normal and
//! keeps the axis-aligned extent in that frame; O(n²) overall.
//! `fit_obb_hull` hulls an arbitrary point cloud first.

use nalgebra::{Matrix2, Vector2};
use tracing::trace;

use crate::error::{KernelError, Result};
use crate::geom2::{convex_hull, GeomCfg, Point};

/// Oriented box. Extents are full side lengths, `long_extent >= short_extent`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obb {
    pub center: Point,
    pub long_extent: f64,
    pub short_extent: f64,
    /// Angle of `long_axis` in `(-π/2, π/2]`.
    pub angle: f64,
    pub long_axis: Vector2<f64>,
    /// `long_axis` rotated by +90°.
    pub short_axis: Vector2<f64>,
}

impl Obb {
    #[inline]
    pub fn area(&self) -> f64 {
        self.long_extent * self.short_extent
    }

    /// Columns are the long and short axes; maps box coordinates to world.
    #[inline]
    pub fn frame(&self) -> Matrix2<f64> {
        Matrix2::from_columns(&[self.long_axis, self.short_axis])
    }

    /// Coordinates of `p` in the box frame, relative to the center.
    #[inline]
    pub fn to_local(&self, p: Point) -> Vector2<f64> {
        self.frame().transpose() * (p - self.center)
    }

    /// Corners in CCW order.
    pub fn corners(&self) -> [Point; 4] {
        let hl = self.long_axis * (0.5 * self.long_extent);
        let hs = self.short_axis * (0.5 * self.short_extent);
        [
            self.center - hl - hs,
            self.center + hl - hs,
            self.center + hl + hs,
            self.center - hl + hs,
        ]
    }

    pub fn contains(&self, p: Point, eps: f64) -> bool {
        let q = self.to_local(p);
        q.x.abs() <= 0.5 * self.long_extent + eps && q.y.abs() <= 0.5 * self.short_extent + eps
    }
}

/// Fit the minimum-area box of a convex ring using its edge directions.
///
/// Concave input gives a valid enclosing box that need not be minimal; use
/// [`fit_obb_hull`] for those. Edges shorter than `eps_dist` are skipped.
pub fn fit_obb(points: &[Point], cfg: GeomCfg) -> Result<Obb> {
    let n = points.len();
    if n < 2 {
        return Err(KernelError::TooFewPoints {
            required: 2,
            got: n,
        });
    }
    let mut best: Option<(f64, Obb)> = None;
    for i in 0..n {
        let e = points[(i + 1) % n] - points[i];
        let len = e.norm();
        if len <= cfg.eps_dist {
            continue;
        }
        let dir = e / len;
        let candidate = box_along(points, dir);
        let a = candidate.area();
        if best.as_ref().map_or(true, |(b, _)| a < *b) {
            best = Some((a, candidate));
        }
    }
    match best {
        Some((a, obb)) => {
            trace!(area = a, angle = obb.angle, "obb: fitted");
            Ok(obb)
        }
        None => Err(KernelError::InvalidParam(
            "every edge is shorter than eps_dist".into(),
        )),
    }
}

/// Hull `points` (any order, any shape), then fit.
pub fn fit_obb_hull(points: &[Point], cfg: GeomCfg) -> Result<Obb> {
    match convex_hull(points) {
        Some(hull) => fit_obb(&hull, cfg),
        // Fewer than three hull vertices: collinear or tiny input.
        None => fit_obb(points, cfg),
    }
}

/// Axis-aligned extent of `points` in the frame `(dir, dir⊥)`.
fn box_along(points: &[Point], dir: Vector2<f64>) -> Obb {
    let normal = Vector2::new(-dir.y, dir.x);
    let (mut u0, mut u1) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut v0, mut v1) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        let (u, v) = (p.dot(&dir), p.dot(&normal));
        u0 = u0.min(u);
        u1 = u1.max(u);
        v0 = v0.min(v);
        v1 = v1.max(v);
    }
    let center = dir * (0.5 * (u0 + u1)) + normal * (0.5 * (v0 + v1));
    let (du, dv) = (u1 - u0, v1 - v0);
    let (long, short, mut axis) = if du >= dv {
        (du, dv, dir)
    } else {
        (dv, du, normal)
    };
    // Canonical half-plane for the long axis.
    if axis.x < 0.0 || (axis.x == 0.0 && axis.y < 0.0) {
        axis = -axis;
    }
    Obb {
        center,
        long_extent: long,
        short_extent: short,
        angle: axis.y.atan2(axis.x),
        long_axis: axis,
        short_axis: Vector2::new(-axis.y, axis.x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom2::rand::{draw_polygon_radial, RadialCfg, ReplayToken, VertexCount};
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn rotated_rect(w: f64, h: f64, theta: f64, c: Point) -> Vec<Point> {
        let (s, co) = theta.sin_cos();
        let r = Matrix2::new(co, -s, s, co);
        [(-w, -h), (w, -h), (w, h), (-w, h)]
            .iter()
            .map(|&(x, y)| c + r * Vector2::new(0.5 * x, 0.5 * y))
            .collect()
    }

    #[test]
    fn axis_aligned_square() {
        let sq = rotated_rect(4.0, 4.0, 0.0, Point::new(2.0, 2.0));
        let b = fit_obb(&sq, GeomCfg::default()).unwrap();
        assert!((b.area() - 16.0).abs() < 1e-12);
        assert!((b.center - Point::new(2.0, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn rotated_rectangle_is_recovered() {
        let theta = 0.4;
        let ring = rotated_rect(6.0, 2.0, theta, Point::new(-1.0, 3.0));
        let b = fit_obb(&ring, GeomCfg::default()).unwrap();
        assert!((b.long_extent - 6.0).abs() < 1e-9);
        assert!((b.short_extent - 2.0).abs() < 1e-9);
        assert!((b.angle - theta).abs() < 1e-9);
        assert!((b.center - Point::new(-1.0, 3.0)).norm() < 1e-9);
        assert!(b.long_axis.dot(&b.short_axis).abs() < 1e-12);
    }

    #[test]
    fn angle_is_canonical() {
        let ring = rotated_rect(6.0, 2.0, FRAC_PI_2 + 0.3, Point::zeros());
        let b = fit_obb(&ring, GeomCfg::default()).unwrap();
        assert!(b.angle > -FRAC_PI_2 && b.angle <= FRAC_PI_2);
        assert!((b.angle - (0.3 - FRAC_PI_2)).abs() < 1e-9);
    }

    #[test]
    fn corners_are_ccw_and_contained() {
        let ring = rotated_rect(3.0, 1.0, 1.1, Point::new(5.0, 5.0));
        let b = fit_obb(&ring, GeomCfg::default()).unwrap();
        let c = b.corners();
        assert!(crate::geom2::signed_area(&c) > 0.0);
        assert!(c.iter().all(|&p| b.contains(p, 1e-9)));
        assert!(!b.contains(Point::new(0.0, 0.0), 1e-9));
    }

    #[test]
    fn degenerate_edges_are_skipped() {
        let ring = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        let b = fit_obb(&ring, GeomCfg::default()).unwrap();
        assert!((b.area() - 2.0).abs() < 1e-12);
        let err = fit_obb(&[Point::new(1.0, 1.0); 3], GeomCfg::default()).unwrap_err();
        assert!(matches!(err, KernelError::InvalidParam(_)));
    }

    #[test]
    fn hull_variant_handles_clouds() {
        let mut pts = rotated_rect(4.0, 2.0, 0.7, Point::new(1.0, 1.0));
        pts.push(Point::new(1.0, 1.0));
        pts.push(Point::new(1.2, 0.9));
        pts.reverse();
        let b = fit_obb_hull(&pts, GeomCfg::default()).unwrap();
        assert!((b.area() - 8.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn box_contains_ring_and_beats_every_direction(seed in 0u64..300, n in 3usize..24) {
            let ring = draw_polygon_radial(
                RadialCfg { vertex_count: VertexCount::Fixed(n), ..RadialCfg::default() },
                ReplayToken { seed, index: 2 },
            );
            let hull = convex_hull(&ring).unwrap();
            let b = fit_obb(&hull, GeomCfg::default()).unwrap();
            for p in &ring {
                prop_assert!(b.contains(*p, 1e-9));
            }
            for k in 0..180 {
                let t = k as f64 * std::f64::consts::PI / 180.0;
                let other = box_along(&hull, Vector2::new(t.cos(), t.sin()));
                prop_assert!(b.area() <= other.area() + 1e-9);
            }
        }
    }
}
