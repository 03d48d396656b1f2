use thiserror::Error;

/// Result type for kernel constructions.
pub type Result<T> = std::result::Result<T, KernelError>;

/// Hard failures. Self-intersecting inputs and exhausted iteration budgets are
/// not errors; they are reported on the returned value (see [`Diagnostic`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelError {
    #[error("degenerate triangle: vertices {0:?} are collinear")]
    DegenerateTriangle([usize; 3]),

    #[error("need at least {required} points, got {got}")]
    TooFewPoints { required: usize, got: usize },

    #[error("index {index} out of range for {len} points")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("point {index} lies outside the triangulation bounds")]
    OutOfBounds { index: usize },

    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

/// Validation signal attached to a partial or empty result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// Edges `first` and `second` of the offending ring cross.
    SelfIntersecting { first: usize, second: usize },
}
