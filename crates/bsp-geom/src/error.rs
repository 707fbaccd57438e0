use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WindingError {
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("Winding would have {count} points, the limit is {max}")]
    TooManyPoints { count: usize, max: usize },

    #[error("Plane origin magnitude {magnitude} exceeds the representable extent {max}")]
    OutOfRange { magnitude: f64, max: f64 },

    #[error("Operation requires a plane, got the null plane")]
    InvalidPlane,
}
