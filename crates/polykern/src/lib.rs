//! 2D computational-geometry kernel.
//!
//! Polygons are plain point rings (`&[Point]`, closing edge implicit,
//! counter-clockwise internally). Each algorithm lives in its own module and
//! takes a `*Cfg` value embedding the shared tolerances (`GeomCfg`):
//! - `decompose`: convex decomposition of a simple polygon.
//! - `earcut`: ear-cut tessellation with holes.
//! - `delaunay`: Bowyer–Watson triangulation, Voronoi cells, Lloyd relaxation.
//! - `obb`: minimum-area oriented bounding box.
//! - `offset`: inset/outset with self-intersection recovery.
//! - `subdivide`: area-bounded recursive slicing.
//!
//! Error model
//! - Degenerate constructions and bad parameters are `Err(KernelError)`.
//! - Self-intersecting inputs are not errors: results come back empty with a
//!   `Diagnostic`. Exhausted iteration budgets set `truncated` on the report.
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the caller.

pub mod api;
pub mod decompose;
pub mod delaunay;
pub mod earcut;
pub mod error;
pub mod geom2;
pub mod obb;
pub mod offset;
pub mod subdivide;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Diagnostic, KernelError, Result};
pub use geom2::{GeomCfg, Point};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::decompose::{decompose_convex, DecomposeCfg};
    pub use crate::delaunay::{triangulate, DelaunayCfg, DelaunayGraph, DelaunayInput};
    pub use crate::earcut::{tessellate, TessellateCfg};
    pub use crate::error::{Diagnostic, KernelError};
    pub use crate::geom2::rand::ReplayToken;
    pub use crate::geom2::{area, signed_area, GeomCfg, Point, Rect, Winding};
    pub use crate::obb::{fit_obb, fit_obb_hull, Obb};
    pub use crate::offset::{offset_polygon, OffsetCfg};
    pub use crate::subdivide::{subdivide, SubdivideCfg};
}
