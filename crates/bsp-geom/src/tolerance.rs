//! Near-zero and near-equal predicates shared by the rest of the kernel.

use nalgebra::Vector3;

/// Canonical scalar tolerance.
///
/// This is the value map compilers have historically used for "close enough to zero";
/// classification against planes uses the coarser [`PLANE_EPSILON`](crate::PLANE_EPSILON).
pub const ZERO_EPSILON: f64 = 1e-4;

/// Returns true if `x` is within [`ZERO_EPSILON`] of zero.
#[inline]
pub fn scalar_near_zero(x: f64) -> bool {
    x.abs() < ZERO_EPSILON
}

/// Returns true if every component of `v` is near zero.
#[inline]
pub fn vector_near_zero(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| scalar_near_zero(*c))
}

/// Hybrid absolute/relative comparison of two scalars.
///
/// If exactly one operand is near zero the values are unequal. If both are, they are compared
/// with an absolute tolerance; otherwise the tolerance is scaled by the larger magnitude.
pub fn scalars_approx_equal(a: f64, b: f64) -> bool {
    match (scalar_near_zero(a), scalar_near_zero(b)) {
        (true, true) => (a - b).abs() < ZERO_EPSILON,
        (false, false) => (a - b).abs() <= ZERO_EPSILON * a.abs().max(b.abs()),
        _ => false,
    }
}

/// Per-component [`scalars_approx_equal`].
pub fn vectors_approx_equal(a: &Vector3<f64>, b: &Vector3<f64>) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| scalars_approx_equal(*x, *y))
}
