//! Numerically robust geometry for BSP level compilers.
//!
//! Planes are built on a [`Normal`] that stores axis-aligned directions exactly, and convex
//! [`Winding`]s are split by planes so that both halves share their cut edge bit for bit.
//!
//! # Example
//!
//! ```
//! use bsp_geom::{Plane, Winding};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut square = Winding::from_points(&[
//!     Point3::new(-1.0, -1.0, 0.0),
//!     Point3::new(1.0, -1.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(-1.0, 1.0, 0.0),
//! ])?;
//!
//! let front = square.split(&Plane::new(Vector3::x(), 0.0))?;
//! assert_eq!(square.len(), 4);
//! assert_eq!(front.map(|w| w.len()), Some(4));
//! # Ok::<(), bsp_geom::WindingError>(())
//! ```

mod error;
mod normal;
mod plane;
mod tolerance;
mod winding;

pub use error::WindingError;
pub use normal::{AXIAL_SNAP_EPSILON, AxialNormal, Normal};
pub use plane::{Classification, PLANE_EPSILON, Plane, PlaneSide};
pub use tolerance::{
    ZERO_EPSILON, scalar_near_zero, scalars_approx_equal, vector_near_zero, vectors_approx_equal,
};
pub use winding::{INVALID_EXTENT, MAX_EXTENT, MAX_POINTS, Winding};
