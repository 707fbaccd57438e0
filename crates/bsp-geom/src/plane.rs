//! Plane representation and operations for BSP compilation.

use std::ops::Neg;

use nalgebra::{Point3, Vector3};

use crate::normal::{AxialNormal, Normal};
use crate::tolerance::scalar_near_zero;

/// Default epsilon for plane classification.
/// Points within this distance of the plane are considered "on" the plane.
///
/// Deliberately coarser than [`ZERO_EPSILON`](crate::ZERO_EPSILON): it drives keep/split/discard
/// decisions, and a tighter value produces sliver polygons.
pub const PLANE_EPSILON: f64 = 0.1;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Point is in front of the plane (positive side of normal)
    Front,
    /// Point is behind the plane (negative side of normal)
    Back,
    /// Point lies on the plane (within epsilon tolerance)
    OnPlane,
}

/// Classification of a whole winding relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices are in front of the plane (or on it)
    Front,
    /// All vertices are behind the plane (or on it)
    Back,
    /// All vertices are on the plane (coplanar)
    Coplanar,
    /// Vertices are on both sides (spans the plane)
    Spanning,
}

/// An oriented plane in 3D space, represented as `normal · point = distance`.
///
/// The null plane (null normal, zero distance) stands for "no plane". It is not a plane through
/// the origin, and every query short-circuits on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: Normal,
    distance: f64,
}

impl Plane {
    /// Creates a new plane from a unit normal vector and distance.
    ///
    /// # Panics (debug builds only)
    /// Panics if `normal` is not unit length.
    pub fn new(normal: Vector3<f64>, distance: f64) -> Self {
        debug_assert!(
            scalar_near_zero(normal.norm() - 1.0),
            "Plane normal must be unit length"
        );
        Self {
            normal: Normal::from_unit_vector(normal),
            distance,
        }
    }

    /// Creates a plane from an already constructed [`Normal`].
    #[inline]
    pub fn from_normal(normal: Normal, distance: f64) -> Self {
        Self { normal, distance }
    }

    /// Creates a plane from an arbitrary direction and distance.
    ///
    /// The direction is normalized first. A zero direction yields [`Plane::null`]
    /// regardless of `distance`.
    pub fn from_direction(direction: Vector3<f64>, distance: f64) -> Self {
        match direction.try_normalize(0.0) {
            Some(unit) => Self::new(unit, distance),
            None => Self::null(),
        }
    }

    /// Creates a plane from a point on the plane and a normal direction.
    /// The direction will be normalized automatically.
    pub fn from_point_and_normal(point: Point3<f64>, direction: Vector3<f64>) -> Self {
        let normal = Normal::from_vector(direction);
        if normal.is_null() {
            return Self::null();
        }
        Self {
            normal,
            distance: normal.dot_with(&point.coords),
        }
    }

    /// Creates a plane from three points.
    /// The normal direction follows the right-hand rule: (b - a) × (c - a).
    ///
    /// Collinear points give [`Plane::null`].
    pub fn from_three_points(a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) -> Self {
        let ab = b - a;
        let ac = c - a;
        Self::from_point_and_normal(a, ab.cross(&ac))
    }

    /// The "no plane" sentinel.
    #[inline]
    pub const fn null() -> Self {
        Self {
            normal: Normal::NULL,
            distance: 0.0,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.normal.is_null()
    }

    /// Returns the normal of the plane.
    #[inline]
    pub fn normal(&self) -> Normal {
        self.normal
    }

    /// Returns the signed distance from the origin to the plane along the normal.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The point on the plane closest to the coordinate origin.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        Point3::from(self.normal.scaled_by(self.distance))
    }

    /// Computes the signed distance from a point to the plane.
    /// - Positive: point is in front (same side as normal)
    /// - Negative: point is behind (opposite side from normal)
    /// - Zero: point is on the plane
    #[inline]
    pub fn signed_distance(&self, point: &Point3<f64>) -> f64 {
        self.normal.dot_with(&point.coords) - self.distance
    }

    /// Classifies which side of the plane a point lies on.
    /// Uses the default `PLANE_EPSILON` tolerance.
    #[inline]
    pub fn classify_point(&self, point: &Point3<f64>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies which side of the plane a point lies on, with a custom epsilon.
    pub fn classify_point_with_epsilon(&self, point: &Point3<f64>, epsilon: f64) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Returns the same set of points with the opposite orientation.
    ///
    /// Both the normal and the distance flip, so `negated().signed_distance(p)` is
    /// `-signed_distance(p)` for every point.
    #[inline]
    pub fn negated(&self) -> Self {
        Self {
            normal: self.normal.negated(),
            distance: -self.distance,
        }
    }

    /// Projects a point onto the plane (finds the closest point on the plane).
    ///
    /// For axial planes the matching coordinate is replaced outright, with no arithmetic on the
    /// other two. The null plane leaves the point unchanged.
    pub fn project_point(&self, point: &Point3<f64>) -> Point3<f64> {
        match self.normal {
            Normal::Axial(AxialNormal::Null) => *point,
            Normal::Axial(axial) => {
                let mut projected = *point;
                if let Some((index, sign)) = axial.axis() {
                    projected[index] = if sign > 0.0 {
                        self.distance
                    } else {
                        -self.distance
                    };
                }
                projected
            }
            Normal::NonAxial(n) => {
                let offset = (*point - self.origin()).dot(&n);
                *point - n * offset
            }
        }
    }

    /// Computes the intersection of the line through `start` and `end` with the plane.
    ///
    /// Returns `None` for the null plane, a zero-length segment, or a segment parallel to the
    /// plane. The result is not clamped to the segment.
    pub fn intersect_segment(
        &self,
        start: &Point3<f64>,
        end: &Point3<f64>,
    ) -> Option<Point3<f64>> {
        if self.is_null() {
            return None;
        }
        let direction = (end - start).try_normalize(0.0)?;
        let denom = self.normal.dot_with(&direction);

        // Segment is parallel to plane
        if scalar_near_zero(denom) {
            return None;
        }

        let t = -self.signed_distance(start) / denom;
        Some(*start + direction * t)
    }

    /// Two unit vectors spanning the plane, with `u × v` pointing along the normal.
    ///
    /// Axial planes use a fixed table. For other planes the seed is the world axis after the
    /// dominant normal component, signed like that component, projected onto the plane.
    /// The null plane yields a pair of zero vectors.
    pub fn basis_vectors(&self) -> (Vector3<f64>, Vector3<f64>) {
        match self.normal {
            Normal::Axial(axial) => axial_basis(axial),
            Normal::NonAxial(n) => {
                let mut dominant = 0;
                for i in 1..3 {
                    if n[i].abs() >= n[dominant].abs() {
                        dominant = i;
                    }
                }
                let mut seed = Vector3::<f64>::zeros();
                seed[(dominant + 1) % 3] = n[dominant].signum();

                let projected = seed - n * seed.dot(&n);
                let Some(u) = projected.try_normalize(0.0) else {
                    return (Vector3::zeros(), Vector3::zeros());
                };
                (u, n.cross(&u))
            }
        }
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self::null()
    }
}

impl Neg for Plane {
    type Output = Plane;

    fn neg(self) -> Plane {
        self.negated()
    }
}

fn axial_basis(axial: AxialNormal) -> (Vector3<f64>, Vector3<f64>) {
    let x = Vector3::x();
    let y = Vector3::y();
    let z = Vector3::z();
    match axial {
        AxialNormal::Null => (Vector3::zeros(), Vector3::zeros()),
        AxialNormal::PosX => (y, z),
        AxialNormal::NegX => (z, y),
        AxialNormal::PosY => (z, x),
        AxialNormal::NegY => (x, z),
        AxialNormal::PosZ => (x, y),
        AxialNormal::NegZ => (y, x),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::{ZERO_EPSILON, vectors_approx_equal};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn unit(x: f64, y: f64, z: f64) -> Vector3<f64> {
        Vector3::new(x, y, z).normalize()
    }

    #[test]
    fn origin_is_normal_scaled_by_distance() {
        let cases = [
            (Vector3::x(), 3.0),
            (-Vector3::y(), 2.5),
            (Vector3::z(), -7.0),
            (unit(1.0, 2.0, 3.0), 4.0),
            (unit(-1.0, 0.5, 0.0), -0.25),
        ];
        for (n, d) in cases {
            let plane = Plane::new(n, d);
            assert!(vectors_approx_equal(&plane.origin().coords, &(n * d)));
            assert_relative_eq!(plane.signed_distance(&plane.origin()), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn axial_origin_is_exact() {
        let plane = Plane::new(-Vector3::z(), 0.1);
        assert_eq!(plane.origin(), Point3::new(0.0, 0.0, -0.1));
    }

    #[test]
    fn from_direction_normalizes() {
        let plane = Plane::from_direction(Vector3::new(0.0, 10.0, 0.0), 4.0);
        assert_eq!(plane.normal(), Normal::Axial(AxialNormal::PosY));
        assert_eq!(plane.distance(), 4.0);
    }

    #[test]
    fn from_direction_zero_is_null_plane() {
        let plane = Plane::from_direction(Vector3::zeros(), 12.0);
        assert!(plane.is_null());
        assert_eq!(plane.distance(), 0.0);
        assert_eq!(plane, Plane::null());
    }

    #[test]
    fn from_three_points_follows_right_hand_rule() {
        let plane = Plane::from_three_points(
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 2.0),
            Point3::new(0.0, 1.0, 2.0),
        );
        assert_eq!(plane.normal(), Normal::Axial(AxialNormal::PosZ));
        assert_eq!(plane.distance(), 2.0);

        let collinear = Plane::from_three_points(
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        assert!(collinear.is_null());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Plane normal must be unit length")]
    fn non_unit_normal_is_rejected() {
        Plane::new(Vector3::new(0.0, 0.0, 3.0), 1.0);
    }

    #[test]
    fn classify_point_all_branches() {
        let plane = Plane::new(Vector3::x(), 1.0);
        assert_eq!(plane.classify_point(&Point3::new(1.5, 0.0, 0.0)), PlaneSide::Front);
        assert_eq!(plane.classify_point(&Point3::new(0.5, 9.0, 0.0)), PlaneSide::Back);
        assert_eq!(plane.classify_point(&Point3::new(1.05, 0.0, 3.0)), PlaneSide::OnPlane);
        assert_eq!(plane.classify_point(&Point3::new(0.95, 0.0, 3.0)), PlaneSide::OnPlane);
        assert_eq!(
            plane.classify_point_with_epsilon(&Point3::new(1.05, 0.0, 0.0), 0.01),
            PlaneSide::Front
        );
    }

    #[test]
    fn negation_flips_signed_distance() {
        let plane = Plane::new(unit(1.0, -2.0, 0.5), 3.0);
        let flipped = -plane;
        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, -1.0, 2.0),
            Point3::new(-3.0, 8.0, 1.0),
        ] {
            assert_relative_eq!(
                flipped.signed_distance(&p),
                -plane.signed_distance(&p),
                epsilon = 1e-12
            );
        }
        assert!(vectors_approx_equal(&flipped.origin().coords, &plane.origin().coords));
        assert_eq!(flipped.negated(), plane);
    }

    #[test]
    fn axial_projection_replaces_coordinate() {
        let plane = Plane::new(Vector3::y(), 2.0);
        assert_eq!(
            plane.project_point(&Point3::new(0.3, -7.0, 0.7)),
            Point3::new(0.3, 2.0, 0.7)
        );

        let plane = Plane::new(-Vector3::x(), 2.0);
        let projected = plane.project_point(&Point3::new(5.0, 1.0, 1.0));
        assert_eq!(projected, Point3::new(-2.0, 1.0, 1.0));
        assert_eq!(plane.signed_distance(&projected), 0.0);
    }

    #[test]
    fn non_axial_projection_lands_on_plane() {
        let plane = Plane::new(unit(1.0, 1.0, 1.0), 2.0);
        let projected = plane.project_point(&Point3::new(4.0, -1.0, 3.0));
        assert_relative_eq!(plane.signed_distance(&projected), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn null_plane_queries_short_circuit() {
        let plane = Plane::null();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(plane.project_point(&p), p);
        assert!(plane.intersect_segment(&p, &Point3::origin()).is_none());
        assert_eq!(plane.basis_vectors(), (Vector3::zeros(), Vector3::zeros()));
    }

    #[test]
    fn intersect_segment_parallel_is_none() {
        let plane = Plane::new(Vector3::z(), 0.0);
        let a = Point3::new(0.0, 0.0, 1.0);
        let b = Point3::new(5.0, 3.0, 1.0);
        assert!(plane.intersect_segment(&a, &b).is_none());
        assert!(plane.intersect_segment(&a, &a).is_none());
    }

    #[test]
    fn intersect_segment_recovers_known_point() {
        let plane = Plane::new(unit(0.3, -0.4, 0.8), 1.5);
        let on_plane = plane.project_point(&Point3::new(2.0, 1.0, -3.0));
        let dir = Vector3::new(0.2, 0.9, 0.4);
        let start = on_plane - dir * 3.0;
        let end = on_plane + dir * 2.0;
        let hit = plane.intersect_segment(&start, &end).unwrap();
        assert!((hit - on_plane).norm() < ZERO_EPSILON);
    }

    #[test]
    fn axial_basis_is_right_handed() {
        for n in [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ] {
            let (u, v) = Plane::new(n, 0.0).basis_vectors();
            assert_eq!(u.cross(&v), n);
            assert_eq!(u.dot(&n), 0.0);
            assert_eq!(v.dot(&n), 0.0);
        }
    }

    proptest! {
        #[test]
        fn classify_agrees_with_signed_distance(
            nx in -1.0f64..1.0, ny in -1.0f64..1.0, nz in 0.2f64..1.0,
            d in -100.0f64..100.0,
            px in -100.0f64..100.0, py in -100.0f64..100.0, pz in -100.0f64..100.0,
        ) {
            let plane = Plane::new(unit(nx, ny, nz), d);
            let p = Point3::new(px, py, pz);
            let dist = plane.signed_distance(&p);
            let expected = if dist > PLANE_EPSILON {
                PlaneSide::Front
            } else if dist < -PLANE_EPSILON {
                PlaneSide::Back
            } else {
                PlaneSide::OnPlane
            };
            prop_assert_eq!(plane.classify_point(&p), expected);
        }

        #[test]
        fn non_axial_basis_is_orthonormal_and_right_handed(
            nx in -1.0f64..1.0, ny in -1.0f64..1.0, nz in -1.0f64..1.0,
        ) {
            let n = Vector3::new(nx, ny, nz);
            prop_assume!(n.norm() > 0.1);
            let n = n.normalize();
            let plane = Plane::new(n, 1.0);
            let (u, v) = plane.basis_vectors();
            prop_assert!((u.norm() - 1.0).abs() < 1e-9);
            prop_assert!((v.norm() - 1.0).abs() < 1e-9);
            prop_assert!(u.dot(&n).abs() < 1e-9);
            prop_assert!(u.dot(&v).abs() < 1e-9);
            prop_assert!((u.cross(&v) - n).norm() < 1e-9);
        }

        #[test]
        fn intersect_segment_hits_plane(
            nx in -1.0f64..1.0, ny in -1.0f64..1.0, nz in 0.2f64..1.0,
            d in -50.0f64..50.0,
            ax in -50.0f64..50.0, ay in -50.0f64..50.0,
            t0 in 0.5f64..20.0, t1 in 0.5f64..20.0,
        ) {
            let plane = Plane::new(unit(nx, ny, nz), d);
            let on_plane = plane.project_point(&Point3::new(ax, ay, 0.0));
            let n = plane.normal().to_vector();
            let start = on_plane - n * t0;
            let end = on_plane + n * t1;
            let hit = plane.intersect_segment(&start, &end).unwrap();
            prop_assert!((hit - on_plane).norm() < ZERO_EPSILON);
        }
    }
}
