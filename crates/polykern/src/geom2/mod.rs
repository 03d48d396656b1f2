//! 2D primitives shared by every kernel algorithm.
//!
//! Purpose
//! - Orientation, point-in-polygon, segment intersection and self-intersection
//!   predicates on plain point rings (`&[Point]`, closing edge implicit).
//! - Tolerances live in `GeomCfg`; callers pass them explicitly.
//!
//! Assumptions and conventions
//! - y-up frame. Counter-clockwise (positive signed area) is the internal
//!   winding; `is_clockwise` is the majority-vote orientation test and
//!   `winding` the area-based one used for normalization.
//! - Predicates use plain `f64` arithmetic with epsilon thresholds. There are
//!   no exact-arithmetic fallbacks.

mod predicates;
pub mod rand;
mod types;
mod util;

pub use predicates::{
    area, centroid, clean_ring, cross, first_self_intersection, is_clockwise, is_convex,
    is_self_intersecting, perimeter, point_in_polygon, point_in_triangle, segment_intersection,
    segment_intersection_params, signed_area, turn, winding, with_winding,
};
pub use types::{approx_eq, GeomCfg, Hs2, Point, Rect, Winding};
pub use util::{clip_to_halfspace, clip_to_rect, convex_hull};
