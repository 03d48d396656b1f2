//! Curated flat API (unstable).
//!
//! One `use polykern::api::*` for callers such as the CLI, benches and demos.
//! Breaking changes are allowed; prefer the module paths for anything not
//! listed here.

// Primitives
pub use crate::geom2::{
    approx_eq, area, centroid, clean_ring, clip_to_rect, convex_hull, first_self_intersection,
    is_clockwise, is_convex, is_self_intersecting, perimeter, point_in_polygon, segment_intersection,
    signed_area, winding, with_winding, GeomCfg, Hs2, Point, Rect, Winding,
};
// Seeded sampling
pub use crate::geom2::rand::{
    draw_polygon_radial, sample_points_in_rect, RadialCfg, ReplayToken, VertexCount,
};
// Algorithms
pub use crate::decompose::{decompose_convex, DecomposeCfg, Decomposition};
pub use crate::delaunay::{
    relax, triangulate, DelaunayCfg, DelaunayEdge, DelaunayGraph, DelaunayInput, PointId,
    TriangleId, VoronoiCell,
};
pub use crate::earcut::{tessellate, tessellate_flat, TessellateCfg, Tessellation};
pub use crate::error::{Diagnostic, KernelError, Result};
pub use crate::obb::{fit_obb, fit_obb_hull, Obb};
pub use crate::offset::{offset_polygon, Offset, OffsetCfg, OffsetStatus};
pub use crate::subdivide::{split_polygon_by_line, subdivide, SubdivideCfg, Subdivision};
