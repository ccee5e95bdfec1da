//! Primitive collision shapes and intersection algorithms
//!
//! Provides the validated axis-aligned box, the finite line segment used by
//! casts, and the two pure tests everything else is built on: closed-interval
//! box overlap and slab-method segment intersection.

use crate::error::{CollisionError, Result};
use crate::foundation::math::{Mat4, Point3, Vec3};

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// All three axes in X, Y, Z order
    pub const fn all() -> [Self; 3] {
        [Self::X, Self::Y, Self::Z]
    }

    /// Component index into a `Vec3`
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Positive unit vector along this axis
    pub fn unit(self) -> Vec3 {
        let mut v = Vec3::zeros();
        v[self.index()] = 1.0;
        v
    }
}

/// Axis-aligned bounding box
///
/// Invariant: `min[i] <= max[i]` on every axis. Construction rejects
/// anything else, NaN included, so every `Aabb` in circulation is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Create a box from its corners, failing with `InvalidBounds` if inverted
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        let valid = Axis::all()
            .iter()
            .all(|axis| min[axis.index()] <= max[axis.index()]);
        if valid {
            Ok(Self { min, max })
        } else {
            Err(CollisionError::InvalidBounds {
                min: [min.x, min.y, min.z],
                max: [max.x, max.y, max.z],
            })
        }
    }

    /// Create a box centered at a point with the given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Result<Self> {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Degenerate box containing a single point
    pub fn from_point(point: Vec3) -> Result<Self> {
        Self::new(point, point)
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Minimum coordinate on one axis
    pub fn min_on(&self, axis: Axis) -> f32 {
        self.min[axis.index()]
    }

    /// Maximum coordinate on one axis
    pub fn max_on(&self, axis: Axis) -> f32 {
        self.max[axis.index()]
    }

    /// Get the center of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-size of the box
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this box contains a point (faces included)
    pub fn contains_point(&self, point: Vec3) -> bool {
        Axis::all().iter().all(|axis| {
            let i = axis.index();
            point[i] >= self.min[i] && point[i] <= self.max[i]
        })
    }

    /// Check if this box overlaps another, see [`overlaps`]
    pub fn overlaps(&self, other: &Self) -> bool {
        overlaps(self, other)
    }

    /// Smallest box containing both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Bound of the eight corners after an affine transform
    ///
    /// Fails only when the matrix produces non-finite corners.
    pub fn transformed(&self, matrix: &Mat4) -> Result<Self> {
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for corner in 0..8 {
            let local = Point3::new(
                if corner & 1 == 0 { self.min.x } else { self.max.x },
                if corner & 2 == 0 { self.min.y } else { self.max.y },
                if corner & 4 == 0 { self.min.z } else { self.max.z },
            );
            let world = matrix.transform_point(&local).coords;
            min = min.inf(&world);
            max = max.sup(&world);
        }
        // inf/sup swallow NaN, so check the corners went through
        if !(min.iter().all(|c| c.is_finite()) && max.iter().all(|c| c.is_finite())) {
            return Err(CollisionError::InvalidBounds {
                min: [min.x, min.y, min.z],
                max: [max.x, max.y, max.z],
            });
        }
        Self::new(min, max)
    }
}

/// Closed-interval overlap on all three axes
///
/// Boxes that only touch (`a.max[i] == b.min[i]`) overlap. Symmetric in its
/// arguments.
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    Axis::all().iter().all(|axis| {
        let i = axis.index();
        a.min[i] <= b.max[i] && b.min[i] <= a.max[i]
    })
}

/// A finite line segment for casts and line-of-sight checks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Where the segment starts (`t = 0`)
    pub start: Vec3,
    /// Where the segment ends (`t = 1`)
    pub end: Vec3,
}

impl LineSegment {
    /// Creates a segment between two points
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Segment from `origin` along `direction` for `distance` units
    ///
    /// `direction` is normalized here; a zero direction yields a degenerate
    /// segment at `origin`.
    pub fn from_ray(origin: Vec3, direction: Vec3, distance: f32) -> Self {
        let end = direction
            .try_normalize(f32::EPSILON)
            .map_or(origin, |dir| origin + dir * distance);
        Self { start: origin, end }
    }

    /// Point at parametric `t` (0 = start, 1 = end)
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.start + (self.end - self.start) * t
    }

    /// `end - start`
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    /// Length of the segment
    pub fn length(&self) -> f32 {
        self.delta().magnitude()
    }

    /// A segment whose endpoints coincide; casts treat it as a point test
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }
}

/// Where a segment first touches a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    /// Parametric distance along the segment, in `[0, 1]`
    pub t: f32,
    /// Outward normal of the entry face; zero when the segment starts inside
    pub normal: Vec3,
}

/// Slab-method segment/box intersection
///
/// Each axis clips the running `[t_enter, t_exit]` window; the segment misses
/// as soon as the window empties or leaves `[0, 1]`. A segment that starts
/// inside (or on the surface of) the box reports `t = 0` with a zero normal.
/// Degenerate segments reduce to a point-in-box test.
pub fn cast_segment(segment: &LineSegment, aabb: &Aabb) -> Option<SegmentIntersection> {
    let inside = SegmentIntersection {
        t: 0.0,
        normal: Vec3::zeros(),
    };

    if segment.is_degenerate() {
        return aabb.contains_point(segment.start).then_some(inside);
    }

    let delta = segment.delta();
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec3::zeros();

    for axis in Axis::all() {
        let i = axis.index();
        let origin = segment.start[i];
        let (lo, hi) = (aabb.min[i], aabb.max[i]);

        if delta[i].abs() < f32::MIN_POSITIVE {
            // Parallel to this slab: either always inside it or never.
            // Subnormal deltas count too, their reciprocal overflows.
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / delta[i];
        let mut near = (lo - origin) * inv;
        let mut far = (hi - origin) * inv;
        let mut face = -axis.unit();
        if near > far {
            std::mem::swap(&mut near, &mut far);
            face = axis.unit();
        }

        if near > t_enter {
            t_enter = near;
            normal = face;
        }
        t_exit = t_exit.min(far);

        if t_enter > t_exit || t_exit < 0.0 || t_enter > 1.0 {
            return None;
        }
    }

    if t_enter <= 0.0 {
        return Some(inside);
    }

    Some(SegmentIntersection {
        t: t_enter.clamp(0.0, 1.0),
        normal,
    })
}
