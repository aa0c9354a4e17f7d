//! Geometric primitives used by the pickers.
//!
//! Everything here is plain value math over `glam` types: planes, infinite
//! lines, oriented lines in Plücker form, and 2D/3D segments.

use glam::{Vec2, Vec3};

/// An infinite line through `point` along `direction` (not normalized).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    point: Vec3,
    direction: Vec3,
}

impl Line3 {
    /// Creates the line passing through `p` and `q`.
    #[must_use]
    pub fn from_two_points(p: Vec3, q: Vec3) -> Self {
        Self {
            point: p,
            direction: q - p,
        }
    }

    /// A point on the line.
    #[must_use]
    pub fn point(&self) -> Vec3 {
        self.point
    }

    /// The (unnormalized) direction of the line.
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Returns the line parameter `t` such that `point + t * direction` is the
    /// orthogonal projection of `p` onto the line.
    ///
    /// Returns 0 for a degenerate line.
    #[must_use]
    pub fn parameter(&self, p: Vec3) -> f32 {
        let len2 = self.direction.length_squared();
        if len2 <= f32::EPSILON {
            return 0.0;
        }
        (p - self.point).dot(self.direction) / len2
    }

    /// Orthogonal projection of `p` onto the line.
    #[must_use]
    pub fn projection(&self, p: Vec3) -> Vec3 {
        self.point + self.direction * self.parameter(p)
    }
}

/// A plane `n · x + d = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane3 {
    normal: Vec3,
    d: f32,
}

impl Plane3 {
    /// Creates the plane through `point` with the given normal.
    ///
    /// The normal is normalized; a zero normal yields a degenerate plane that
    /// never intersects anything.
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// The unit normal (zero for a degenerate plane).
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Returns true if the plane has no usable normal.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::ZERO
    }

    /// Signed distance from `p` to the plane.
    #[must_use]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    /// Intersects the plane with an infinite line.
    ///
    /// Returns `None` when the plane is degenerate or the line is parallel to it.
    #[must_use]
    pub fn intersect(&self, line: &Line3) -> Option<Vec3> {
        let dir = line.direction();
        let denom = self.normal.dot(dir);
        if denom.abs() <= f32::EPSILON * dir.length() {
            return None;
        }
        let t = -self.signed_distance(line.point()) / denom;
        let hit = line.point() + dir * t;
        hit.is_finite().then_some(hit)
    }
}

/// A directed line in Plücker coordinates.
///
/// Two oriented lines can be compared with [`OrientedLine3::side`]: the sign
/// tells on which side one passes the other, which gives an exact
/// line-through-triangle test without computing any intersection point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedLine3 {
    direction: Vec3,
    moment: Vec3,
}

impl OrientedLine3 {
    /// Creates the line oriented from `p` towards `q`.
    #[must_use]
    pub fn new(p: Vec3, q: Vec3) -> Self {
        Self {
            direction: q - p,
            moment: p.cross(q),
        }
    }

    /// Permuted inner product of two oriented lines.
    ///
    /// Zero when the lines are coplanar, otherwise the sign encodes their
    /// relative orientation.
    #[must_use]
    pub fn side(a: &Self, b: &Self) -> f32 {
        a.direction.dot(b.moment) + b.direction.dot(a.moment)
    }

    /// Returns true if the line passes through the triangle `(a, b, c)`,
    /// boundary included.
    ///
    /// A line lying in the triangle's plane, or a degenerate triangle, is not
    /// considered a crossing.
    #[must_use]
    pub fn crosses_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> bool {
        let s0 = Self::side(self, &Self::new(a, b));
        let s1 = Self::side(self, &Self::new(b, c));
        let s2 = Self::side(self, &Self::new(c, a));

        if s0 == 0.0 && s1 == 0.0 && s2 == 0.0 {
            return false;
        }
        (s0 >= 0.0 && s1 >= 0.0 && s2 >= 0.0) || (s0 <= 0.0 && s1 <= 0.0 && s2 <= 0.0)
    }
}

/// A 3D line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment3 {
    source: Vec3,
    target: Vec3,
}

impl Segment3 {
    /// Creates the segment from `source` to `target`.
    #[must_use]
    pub fn new(source: Vec3, target: Vec3) -> Self {
        Self { source, target }
    }

    /// Squared distance from `p` to the closest point of the segment.
    #[must_use]
    pub fn squared_distance(&self, p: Vec3) -> f32 {
        let v = self.target - self.source;
        let len2 = v.length_squared();
        if len2 <= f32::EPSILON {
            return p.distance_squared(self.source);
        }
        let t = ((p - self.source).dot(v) / len2).clamp(0.0, 1.0);
        p.distance_squared(self.source + v * t)
    }
}

/// A 2D line segment, typically in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    source: Vec2,
    target: Vec2,
}

impl Segment2 {
    /// Creates the segment from `source` to `target`.
    #[must_use]
    pub fn new(source: Vec2, target: Vec2) -> Self {
        Self { source, target }
    }

    /// Squared distance from `p` to the closest point of the segment.
    #[must_use]
    pub fn squared_distance(&self, p: Vec2) -> f32 {
        let v = self.target - self.source;
        let len2 = v.length_squared();
        if len2 <= f32::EPSILON {
            return p.distance_squared(self.source);
        }
        let t = ((p - self.source).dot(v) / len2).clamp(0.0, 1.0);
        p.distance_squared(self.source + v * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_line_intersection() {
        let plane = Plane3::new(Vec3::new(0.0, 0.0, -2.0), Vec3::Z);
        let line = Line3::from_two_points(Vec3::new(0.5, 0.25, 5.0), Vec3::new(0.5, 0.25, 4.0));
        let hit = plane.intersect(&line).expect("line should hit the plane");
        assert!((hit - Vec3::new(0.5, 0.25, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_plane_parallel_line_has_no_intersection() {
        let plane = Plane3::new(Vec3::ZERO, Vec3::Y);
        let line = Line3::from_two_points(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        assert!(plane.intersect(&line).is_none());
    }

    #[test]
    fn test_degenerate_plane_never_intersects() {
        let plane = Plane3::new(Vec3::ZERO, Vec3::ZERO);
        assert!(plane.is_degenerate());
        let line = Line3::from_two_points(Vec3::Z, Vec3::NEG_Z);
        assert!(plane.intersect(&line).is_none());
    }

    #[test]
    fn test_line_parameter() {
        let line = Line3::from_two_points(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        assert!((line.parameter(Vec3::new(1.0, 5.0, 0.0)) - 0.5).abs() < 1e-6);
        assert!(line.parameter(Vec3::new(-1.0, 0.0, 0.0)) < 0.0);
        assert!((line.projection(Vec3::new(1.0, 5.0, 0.0)) - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn test_oriented_line_crosses_triangle() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);

        let inside = OrientedLine3::new(Vec3::new(0.2, 0.2, 1.0), Vec3::new(0.2, 0.2, -1.0));
        assert!(inside.crosses_triangle(a, b, c));
        // Winding of the triangle does not matter.
        assert!(inside.crosses_triangle(a, c, b));

        let outside = OrientedLine3::new(Vec3::new(0.8, 0.8, 1.0), Vec3::new(0.8, 0.8, -1.0));
        assert!(!outside.crosses_triangle(a, b, c));
    }

    #[test]
    fn test_oriented_line_in_plane_is_not_a_crossing() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 0.0);
        let c = Vec3::new(0.0, 1.0, 0.0);
        let grazing = OrientedLine3::new(Vec3::new(-1.0, 0.1, 0.0), Vec3::new(2.0, 0.1, 0.0));
        assert!(!grazing.crosses_triangle(a, b, c));
    }

    #[test]
    fn test_segment3_squared_distance() {
        let seg = Segment3::new(Vec3::ZERO, Vec3::X);
        assert!((seg.squared_distance(Vec3::new(0.5, 1.0, 0.0)) - 1.0).abs() < 1e-6);
        // Beyond the endpoints the distance is measured to the endpoint.
        assert!((seg.squared_distance(Vec3::new(2.0, 0.0, 0.0)) - 1.0).abs() < 1e-6);
        let point = Segment3::new(Vec3::ONE, Vec3::ONE);
        assert!((point.squared_distance(Vec3::ZERO) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_segment2_squared_distance() {
        let seg = Segment2::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!((seg.squared_distance(Vec2::new(5.0, 3.0)) - 9.0).abs() < 1e-5);
        assert!((seg.squared_distance(Vec2::new(-4.0, 3.0)) - 25.0).abs() < 1e-5);
    }
}
