//! Unit directions with an exact representation for the coordinate axes.
//!
//! Most planes in a compiled level are axis-aligned. Storing them as a tag instead of a vector
//! keeps scaling, dot products and projections against them free of rounding error.

use std::ops::Neg;

use nalgebra::Vector3;

use crate::tolerance::{ZERO_EPSILON, scalar_near_zero, vectors_approx_equal};

/// Default snapping tolerance for the `_approx` constructors.
pub const AXIAL_SNAP_EPSILON: f64 = ZERO_EPSILON;

/// One of the six signed coordinate axes, or no direction at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxialNormal {
    /// The zero direction. Only ever produced for zero-length input.
    Null,
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl AxialNormal {
    /// Coordinate index and sign of this axis, or `None` for [`AxialNormal::Null`].
    #[inline]
    pub fn axis(self) -> Option<(usize, f64)> {
        match self {
            AxialNormal::Null => None,
            AxialNormal::PosX => Some((0, 1.0)),
            AxialNormal::NegX => Some((0, -1.0)),
            AxialNormal::PosY => Some((1, 1.0)),
            AxialNormal::NegY => Some((1, -1.0)),
            AxialNormal::PosZ => Some((2, 1.0)),
            AxialNormal::NegZ => Some((2, -1.0)),
        }
    }

    fn from_axis(index: usize, positive: bool) -> Self {
        match (index, positive) {
            (0, true) => AxialNormal::PosX,
            (0, false) => AxialNormal::NegX,
            (1, true) => AxialNormal::PosY,
            (1, false) => AxialNormal::NegY,
            (2, true) => AxialNormal::PosZ,
            (2, false) => AxialNormal::NegZ,
            _ => AxialNormal::Null,
        }
    }

    /// The opposite axis. Null stays null.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            AxialNormal::Null => AxialNormal::Null,
            AxialNormal::PosX => AxialNormal::NegX,
            AxialNormal::NegX => AxialNormal::PosX,
            AxialNormal::PosY => AxialNormal::NegY,
            AxialNormal::NegY => AxialNormal::PosY,
            AxialNormal::PosZ => AxialNormal::NegZ,
            AxialNormal::NegZ => AxialNormal::PosZ,
        }
    }

    /// The unit vector along this axis, zero for null.
    pub fn to_vector(self) -> Vector3<f64> {
        let mut v = Vector3::<f64>::zeros();
        if let Some((index, sign)) = self.axis() {
            v[index] = sign;
        }
        v
    }
}

/// A unit-length direction.
///
/// Construct one with [`Normal::from_unit_vector`] or [`Normal::from_vector`]; the result is
/// [`Normal::Axial`] whenever the input lies on a coordinate axis.
#[derive(Debug, Clone, Copy)]
pub enum Normal {
    Axial(AxialNormal),
    NonAxial(Vector3<f64>),
}

impl Normal {
    /// The null normal (no direction).
    pub const NULL: Normal = Normal::Axial(AxialNormal::Null);

    /// Builds a normal from a vector that is already unit length.
    ///
    /// The zero vector yields [`Normal::NULL`]. Only vectors that lie *exactly* on an axis
    /// become axial; use [`Normal::from_unit_vector_approx`] to snap near-axial input.
    /// Negative zeros count as zero, so `(-0.0, 1.0, 0.0)` becomes [`AxialNormal::PosY`] and
    /// materializes with `+0.0` in the x slot.
    ///
    /// # Panics (debug builds only)
    /// Panics if `v` is neither zero nor unit length.
    pub fn from_unit_vector(v: Vector3<f64>) -> Self {
        if v == Vector3::zeros() {
            return Self::NULL;
        }
        debug_assert_unit(&v);
        match exact_axis(&v) {
            Some(axial) => Normal::Axial(axial),
            None => Normal::NonAxial(v),
        }
    }

    /// Like [`Normal::from_unit_vector`], but snaps to an axis when every component is within
    /// `tolerance` of that axis.
    pub fn from_unit_vector_approx(v: Vector3<f64>, tolerance: f64) -> Self {
        if v == Vector3::zeros() {
            return Self::NULL;
        }
        debug_assert_unit(&v);
        match approx_axis(&v, tolerance) {
            Some(axial) => Normal::Axial(axial),
            None => Normal::NonAxial(v),
        }
    }

    /// Normalizes `v` and builds a normal from it. Zero yields [`Normal::NULL`].
    pub fn from_vector(v: Vector3<f64>) -> Self {
        match v.try_normalize(0.0) {
            Some(unit) => Self::from_unit_vector(unit),
            None => Self::NULL,
        }
    }

    /// Normalizes `v` and snaps it to an axis within `tolerance`.
    pub fn from_vector_approx(v: Vector3<f64>, tolerance: f64) -> Self {
        match v.try_normalize(0.0) {
            Some(unit) => Self::from_unit_vector_approx(unit, tolerance),
            None => Self::NULL,
        }
    }

    /// Always yields [`Normal::NonAxial`] (or null for zero), even for axis-aligned input.
    pub fn force_non_axial_from_unit_vector(v: Vector3<f64>) -> Self {
        if v == Vector3::zeros() {
            return Self::NULL;
        }
        debug_assert_unit(&v);
        Normal::NonAxial(v)
    }

    /// Normalizing counterpart of [`Normal::force_non_axial_from_unit_vector`].
    pub fn force_non_axial_from_vector(v: Vector3<f64>) -> Self {
        match v.try_normalize(0.0) {
            Some(unit) => Normal::NonAxial(unit),
            None => Self::NULL,
        }
    }

    /// Materializes the direction. Null gives the zero vector.
    #[inline]
    pub fn to_vector(&self) -> Vector3<f64> {
        match self {
            Normal::Axial(axial) => axial.to_vector(),
            Normal::NonAxial(v) => *v,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Normal::Axial(AxialNormal::Null))
    }

    /// True for every axial tag, including null.
    #[inline]
    pub fn is_axial(&self) -> bool {
        matches!(self, Normal::Axial(_))
    }

    /// Structural equality: same axial tag, or bit-identical non-axial vectors.
    ///
    /// An axial and a non-axial normal are never equal here, even when they point the same way.
    /// Use [`Normal::equivalent_to`] for geometric comparison.
    pub fn equals(&self, other: &Normal) -> bool {
        match (self, other) {
            (Normal::Axial(a), Normal::Axial(b)) => a == b,
            (Normal::NonAxial(a), Normal::NonAxial(b)) => {
                a.iter().zip(b.iter()).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            _ => false,
        }
    }

    /// Geometric equality of the directions, regardless of representation.
    pub fn equivalent_to(&self, other: &Normal) -> bool {
        vectors_approx_equal(&self.to_vector(), &other.to_vector())
    }

    /// `self * value`, exact for axial normals.
    #[inline]
    pub fn scaled_by(&self, value: f64) -> Vector3<f64> {
        match self {
            Normal::Axial(axial) => {
                let mut v = Vector3::<f64>::zeros();
                if let Some((index, sign)) = axial.axis() {
                    v[index] = if sign > 0.0 { value } else { -value };
                }
                v
            }
            Normal::NonAxial(n) => n * value,
        }
    }

    /// `self · v`, exact for axial normals.
    #[inline]
    pub fn dot_with(&self, v: &Vector3<f64>) -> f64 {
        match self {
            Normal::Axial(axial) => match axial.axis() {
                Some((index, sign)) if sign > 0.0 => v[index],
                Some((index, _)) => -v[index],
                None => 0.0,
            },
            Normal::NonAxial(n) => n.dot(v),
        }
    }

    /// The opposite direction.
    #[inline]
    pub fn negated(&self) -> Normal {
        match self {
            Normal::Axial(axial) => Normal::Axial(axial.opposite()),
            Normal::NonAxial(n) => Normal::NonAxial(-n),
        }
    }
}

impl PartialEq for Normal {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Neg for Normal {
    type Output = Normal;

    fn neg(self) -> Normal {
        self.negated()
    }
}

impl From<AxialNormal> for Normal {
    fn from(axial: AxialNormal) -> Self {
        Normal::Axial(axial)
    }
}

#[inline]
fn debug_assert_unit(v: &Vector3<f64>) {
    debug_assert!(
        scalar_near_zero(v.norm() - 1.0),
        "Normal must be unit length, got length {}",
        v.norm()
    );
}

/// Axis of `v` if two components are exactly zero and the third exactly ±1.
fn exact_axis(v: &Vector3<f64>) -> Option<AxialNormal> {
    let index = v.iter().position(|c| *c != 0.0)?;
    let others_zero = (0..3).filter(|i| *i != index).all(|i| v[i] == 0.0);
    if others_zero && v[index].abs() == 1.0 {
        Some(AxialNormal::from_axis(index, v[index] > 0.0))
    } else {
        None
    }
}

/// Axis of `v` if it is within `tolerance` of ±1 on one axis and of 0 on the others.
fn approx_axis(v: &Vector3<f64>, tolerance: f64) -> Option<AxialNormal> {
    let index = v.iamax();
    let others_zero = (0..3)
        .filter(|i| *i != index)
        .all(|i| v[i].abs() <= tolerance);
    if others_zero && (v[index].abs() - 1.0).abs() <= tolerance {
        Some(AxialNormal::from_axis(index, v[index] > 0.0))
    } else {
        None
    }
}
