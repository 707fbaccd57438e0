//! Convex polygon windings and plane splitting.

use nalgebra::{Point3, Vector3};

use crate::error::WindingError;
use crate::plane::{Classification, PLANE_EPSILON, Plane, PlaneSide};
use crate::tolerance::vector_near_zero;

/// Hard limit on the number of points in a winding.
///
/// Repeated near-degenerate splits can otherwise grow a winding without bound.
pub const MAX_POINTS: usize = 96;

/// Largest plane-origin magnitude [`Winding::from_plane`] accepts.
pub const MAX_EXTENT: f64 = i32::MAX as f64;

/// Half-extent of the quad built by [`Winding::from_plane`]; just past anything valid.
pub const INVALID_EXTENT: f64 = MAX_EXTENT + 1.0;

/// A convex polygon in 3D space, defined by an ordered loop of points.
///
/// `points[i]` connects to `points[(i + 1) % len]`. Points are in counter-clockwise order when
/// viewed from the front of the defining plane, so the cross product of consecutive edges points
/// along its normal. An empty winding is the canonical degenerate polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Winding {
    points: Vec<Point3<f64>>,
}

impl Winding {
    /// Creates an empty winding.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Creates a winding from an ordered list of points.
    ///
    /// Fails with [`WindingError::TooManyPoints`] past [`MAX_POINTS`].
    pub fn from_points(points: &[Point3<f64>]) -> Result<Self, WindingError> {
        check_point_count(points.len())?;
        let mut storage = Vec::new();
        storage.try_reserve_exact(points.len())?;
        storage.extend_from_slice(points);
        Ok(Self { points: storage })
    }

    /// Creates a huge quad lying on `plane`, ready to be cut down by other planes.
    ///
    /// The null plane gives an empty winding. Fails with [`WindingError::OutOfRange`] if the
    /// plane is further than [`MAX_EXTENT`] from the origin.
    pub fn from_plane(plane: &Plane) -> Result<Self, WindingError> {
        let origin = plane.origin();
        let magnitude = origin.coords.norm();
        if magnitude > MAX_EXTENT {
            log::debug!("plane origin {magnitude} is outside the world extent");
            return Err(WindingError::OutOfRange {
                magnitude,
                max: MAX_EXTENT,
            });
        }
        if plane.is_null() {
            return Ok(Self::new());
        }

        let (u, v) = plane.basis_vectors();
        let u = u * INVALID_EXTENT;
        let v = v * INVALID_EXTENT;
        Self::from_points(&[
            origin - u - v,
            origin + u - v,
            origin + u + v,
            origin - u + v,
        ])
    }

    /// Returns the points of the winding.
    #[inline]
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<Point3<f64>> {
        self.points.get(index).copied()
    }

    /// Returns the endpoints of edge `index`, wrapping from the last point to the first.
    pub fn edge(&self, index: usize) -> Option<(Point3<f64>, Point3<f64>)> {
        let start = self.point(index)?;
        let end = self.points[(index + 1) % self.points.len()];
        Some((start, end))
    }

    /// Iterates over every edge in winding order.
    pub fn edges(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Appends a point, failing with [`WindingError::TooManyPoints`] once the winding is full.
    pub fn push_point(&mut self, point: Point3<f64>) -> Result<(), WindingError> {
        check_point_count(self.points.len() + 1)?;
        push_fallible(&mut self.points, point)
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Same points, opposite facing.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Sum of the fan cross products: twice the area, pointing along the face normal.
    ///
    /// Zero for windings with fewer than three points.
    pub fn normal(&self) -> Vector3<f64> {
        let Some(&first) = self.points.first() else {
            return Vector3::zeros();
        };
        self.points
            .windows(2)
            .skip(1)
            .map(|pair| (pair[0] - first).cross(&(pair[1] - first)))
            .sum()
    }

    pub fn area(&self) -> f64 {
        self.normal().norm() * 0.5
    }

    /// Average of the points, `None` when empty.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.points.is_empty() {
            return None;
        }
        let sum: Vector3<f64> = self.points.iter().map(|p| p.coords).sum();
        Some(Point3::from(sum / self.points.len() as f64))
    }

    /// The plane this winding lies on, or [`Plane::null`] if it is degenerate.
    pub fn plane(&self) -> Plane {
        match self.points.first() {
            Some(first) if self.points.len() >= 3 => {
                Plane::from_point_and_normal(*first, self.normal())
            }
            _ => Plane::null(),
        }
    }

    /// Classifies this winding relative to a plane.
    ///
    /// Returns:
    /// - `Front` if no vertex is behind the plane
    /// - `Back` if no vertex is in front of the plane
    /// - `Coplanar` if all vertices lie on the plane (including the empty winding)
    /// - `Spanning` if vertices are on both sides
    pub fn classify(&self, plane: &Plane) -> Classification {
        let mut front = 0;
        let mut back = 0;
        let mut on_plane = 0;

        for point in &self.points {
            match plane.classify_point(point) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => on_plane += 1,
            }
        }

        if on_plane == self.points.len() {
            Classification::Coplanar
        } else if back == 0 {
            Classification::Front
        } else if front == 0 {
            Classification::Back
        } else {
            Classification::Spanning
        }
    }

    /// Splits the winding by `plane` using the default [`PLANE_EPSILON`].
    ///
    /// See [`Winding::split_with_epsilon`].
    pub fn split(&mut self, plane: &Plane) -> Result<Option<Winding>, WindingError> {
        self.split_with_epsilon(plane, PLANE_EPSILON)
    }

    /// Splits the winding by `plane`.
    ///
    /// `self` keeps the part behind or on the plane; the part in front is returned, or `None` if
    /// nothing lies in front. An empty winding or the null plane is a no-op.
    ///
    /// A winding with no point strictly in front, including one lying entirely on the plane, is
    /// left untouched. Otherwise every point goes to the half on its side, and points on the plane
    /// go to both halves: a vertex on the cut belongs to the boundary of each piece. Each crossing
    /// edge contributes one intersection point that both halves share exactly. A half with fewer
    /// than three points is dropped, so a winding of one or two points always ends up empty.
    /// The null plane still leaves such a winding as it is.
    ///
    /// Nothing is modified if either half would exceed [`MAX_POINTS`] or an allocation fails.
    pub fn split_with_epsilon(
        &mut self,
        plane: &Plane,
        epsilon: f64,
    ) -> Result<Option<Winding>, WindingError> {
        if self.points.is_empty() || plane.is_null() {
            return Ok(None);
        }

        let n = self.points.len();
        // Fewer than three points can never finalise to a polygon on either side.
        if n < 3 {
            log::trace!("split: degenerate {n} point winding cleared");
            self.points.clear();
            return Ok(None);
        }

        let mut sides = [PlaneSide::OnPlane; MAX_POINTS];
        for (side, point) in sides.iter_mut().zip(&self.points) {
            *side = plane.classify_point_with_epsilon(point, epsilon);
        }
        let sides = &sides[..n];

        if !sides.contains(&PlaneSide::Front) {
            log::trace!("split: {n} points kept behind");
            return Ok(None);
        }
        if !sides.contains(&PlaneSide::Back) {
            log::trace!("split: {n} points moved in front");
            return Ok(Some(Self {
                points: std::mem::take(&mut self.points),
            }));
        }

        let mut back = Vec::new();
        let mut front = Vec::new();
        back.try_reserve(n + 2)?;
        front.try_reserve(n + 2)?;

        for i in 0..n {
            let current = self.points[i];
            let current_side = sides[i];
            let next_idx = (i + 1) % n;
            let next = self.points[next_idx];
            let next_side = sides[next_idx];

            match current_side {
                PlaneSide::Front => push_fallible(&mut front, current)?,
                PlaneSide::Back => push_fallible(&mut back, current)?,
                PlaneSide::OnPlane => {
                    push_fallible(&mut front, current)?;
                    push_fallible(&mut back, current)?;
                }
            }

            let crosses = matches!(
                (current_side, next_side),
                (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
            );
            if crosses && !vector_near_zero(&(next - current)) {
                let mid = crossing_point(plane, &current, &next);
                push_fallible(&mut back, mid)?;
                push_fallible(&mut front, mid)?;
            }
        }

        for half in [&mut back, &mut front] {
            if half.len() < 3 {
                half.clear();
            }
        }

        let largest = back.len().max(front.len());
        if largest > MAX_POINTS {
            log::debug!("split: rejected, a half would have {largest} points");
            return Err(WindingError::TooManyPoints {
                count: largest,
                max: MAX_POINTS,
            });
        }

        log::trace!(
            "split: {n} points into {} behind and {} in front",
            back.len(),
            front.len()
        );
        self.points = back;
        if front.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Self { points: front }))
        }
    }

    /// Cuts away everything in front of `plane`, keeping the part behind or on it.
    ///
    /// Unlike [`Winding::split`], the null plane is rejected with [`WindingError::InvalidPlane`].
    pub fn clip(&mut self, plane: &Plane) -> Result<(), WindingError> {
        if plane.is_null() {
            return Err(WindingError::InvalidPlane);
        }
        self.split(plane).map(|_| ())
    }
}

fn check_point_count(count: usize) -> Result<(), WindingError> {
    if count > MAX_POINTS {
        log::debug!("winding rejected, {count} points");
        return Err(WindingError::TooManyPoints {
            count,
            max: MAX_POINTS,
        });
    }
    Ok(())
}

fn push_fallible(points: &mut Vec<Point3<f64>>, point: Point3<f64>) -> Result<(), WindingError> {
    points.try_reserve(1)?;
    points.push(point);
    Ok(())
}

/// Where the edge from `start` to `end` crosses `plane`. The endpoints must straddle it.
fn crossing_point(plane: &Plane, start: &Point3<f64>, end: &Point3<f64>) -> Point3<f64> {
    plane.intersect_segment(start, end).unwrap_or_else(|| {
        // Long edges at a grazing angle: interpolate by the endpoint distances instead.
        let d0 = plane.signed_distance(start);
        let d1 = plane.signed_distance(end);
        *start + (end - start) * (d0 / (d0 - d1))
    })
}
