//! Axis-aligned bounding box

use serde::{Deserialize, Serialize};

use super::Sphere;
use crate::math::{Mat4, Vec3, Vec3Ext};

/// Axis-aligned box. An empty box has `min = +inf` and `max = -inf` so that
/// the first expansion snaps it to the point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box3 {
    /// Create a box from corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box containing nothing
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(f32::INFINITY),
            max: Vec3::repeat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box enclosing every point
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut b = Self::empty();
        for p in points {
            b.expand_by_point(p);
        }
        b
    }

    /// Box of the given size centered on `center`
    pub fn from_center_and_size(center: &Vec3, size: &Vec3) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// True when any axis has `max < min`
    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    /// Center point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent along each axis
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow to include a point
    pub fn expand_by_point(&mut self, point: &Vec3) -> &mut Self {
        self.min = self.min.min_components(point);
        self.max = self.max.max_components(point);
        self
    }

    /// Grow both corners outwards by a vector
    pub fn expand_by_vector(&mut self, vector: &Vec3) -> &mut Self {
        self.min -= vector;
        self.max += vector;
        self
    }

    /// Grow both corners outwards by a scalar on every axis
    pub fn expand_by_scalar(&mut self, scalar: f32) -> &mut Self {
        self.expand_by_vector(&Vec3::repeat(scalar))
    }

    /// Inclusive containment test
    pub fn contains_point(&self, point: &Vec3) -> bool {
        !(point.x < self.min.x || point.x > self.max.x
            || point.y < self.min.y || point.y > self.max.y
            || point.z < self.min.z || point.z > self.max.z)
    }

    /// True when `other` lies entirely inside this box
    pub fn contains_box(&self, other: &Box3) -> bool {
        self.min.x <= other.min.x && other.max.x <= self.max.x
            && self.min.y <= other.min.y && other.max.y <= self.max.y
            && self.min.z <= other.min.z && other.max.z <= self.max.z
    }

    /// Position of `point` relative to the box, 0 at `min` and 1 at `max` per axis.
    ///
    /// Divides by zero on a flat axis.
    pub fn parameter_of(&self, point: &Vec3) -> Vec3 {
        (point - self.min).component_div(&self.size())
    }

    /// Overlap test using the six separating planes
    pub fn intersects_box(&self, other: &Box3) -> bool {
        !(other.max.x < self.min.x || other.min.x > self.max.x
            || other.max.y < self.min.y || other.min.y > self.max.y
            || other.max.z < self.min.z || other.min.z > self.max.z)
    }

    /// Closest point inside the box
    pub fn clamp_point(&self, point: &Vec3) -> Vec3 {
        point.clamp_components(&self.min, &self.max)
    }

    /// Distance from the box surface to an outside point, 0 inside
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        (self.clamp_point(point) - point).norm()
    }

    /// Sphere through the box corners
    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::new(self.center(), self.size().norm() * 0.5)
    }

    /// Restrict to the overlap with `other`. Disjoint boxes become empty.
    pub fn intersect(&mut self, other: &Box3) -> &mut Self {
        self.min = self.min.max_components(&other.min);
        self.max = self.max.min_components(&other.max);
        self
    }

    /// Grow to enclose `other`
    pub fn union(&mut self, other: &Box3) -> &mut Self {
        self.min = self.min.min_components(&other.min);
        self.max = self.max.max_components(&other.max);
        self
    }

    /// Transform the eight corners and refit
    pub fn apply_mat4(&mut self, m: &Mat4) -> &mut Self {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
        .map(|corner| corner.apply_mat4(m));

        *self = Self::from_points(&corners);
        self
    }

    /// Move both corners
    pub fn translate(&mut self, offset: &Vec3) -> &mut Self {
        self.min += offset;
        self.max += offset;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4Ext;
    use approx::assert_relative_eq;

    fn cube_points() -> Vec<Vec3> {
        vec![
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(3.0, -4.0, 1.0),
            Vec3::new(0.0, 0.0, -6.0),
            Vec3::new(2.5, 1.5, 2.5),
        ]
    }

    #[test]
    fn test_from_points_contains_every_point() {
        let points = cube_points();
        let b = Box3::from_points(&points);
        for p in &points {
            assert!(b.contains_point(p));
        }
        assert_eq!(b.min, Vec3::new(-1.0, -4.0, -6.0));
        assert_eq!(b.max, Vec3::new(3.0, 2.0, 2.5));
    }

    #[test]
    fn test_empty_box() {
        let mut b = Box3::empty();
        assert!(b.is_empty());
        assert!(!b.contains_point(&Vec3::zeros()));
        b.expand_by_point(&Vec3::new(1.0, 1.0, 1.0));
        assert!(!b.is_empty());
        assert_eq!(b.size(), Vec3::zeros());
    }

    #[test]
    fn test_center_size_and_expansion() {
        let mut b = Box3::from_center_and_size(&Vec3::new(1.0, 1.0, 1.0), &Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b.min, Vec3::new(0.0, -1.0, -2.0));
        assert_eq!(b.center(), Vec3::new(1.0, 1.0, 1.0));
        b.expand_by_scalar(1.0);
        assert_eq!(b.size(), Vec3::new(4.0, 6.0, 8.0));
    }

    #[test]
    fn test_box_relations() {
        let outer = Box3::new(Vec3::zeros(), Vec3::repeat(10.0));
        let inner = Box3::new(Vec3::repeat(2.0), Vec3::repeat(3.0));
        let apart = Box3::new(Vec3::repeat(11.0), Vec3::repeat(12.0));

        assert!(outer.contains_box(&inner));
        assert!(!inner.contains_box(&outer));
        assert!(outer.intersects_box(&inner));
        assert!(!outer.intersects_box(&apart));

        let mut overlap = outer;
        overlap.intersect(&Box3::new(Vec3::repeat(5.0), Vec3::repeat(15.0)));
        assert_eq!(overlap, Box3::new(Vec3::repeat(5.0), Vec3::repeat(10.0)));

        let mut disjoint = outer;
        disjoint.intersect(&apart);
        assert!(disjoint.is_empty());

        let mut joined = inner;
        joined.union(&apart);
        assert_eq!(joined, Box3::new(Vec3::repeat(2.0), Vec3::repeat(12.0)));
    }

    #[test]
    fn test_point_queries() {
        let b = Box3::new(Vec3::zeros(), Vec3::repeat(2.0));
        assert_eq!(b.clamp_point(&Vec3::new(5.0, 1.0, -1.0)), Vec3::new(2.0, 1.0, 0.0));
        assert_relative_eq!(b.distance_to_point(&Vec3::new(5.0, 1.0, 1.0)), 3.0);
        assert_eq!(b.distance_to_point(&Vec3::repeat(1.0)), 0.0);
        assert_eq!(b.parameter_of(&Vec3::new(1.0, 0.5, 2.0)), Vec3::new(0.5, 0.25, 1.0));
    }

    #[test]
    fn test_bounding_sphere() {
        let b = Box3::new(Vec3::repeat(-1.0), Vec3::repeat(1.0));
        let s = b.bounding_sphere();
        assert_eq!(s.center, Vec3::zeros());
        assert_relative_eq!(s.radius, 3.0_f32.sqrt());
    }

    #[test]
    fn test_apply_mat4_refits_corners() {
        let mut b = Box3::new(Vec3::repeat(-1.0), Vec3::repeat(1.0));
        b.apply_mat4(&Mat4::make_rotation_z(std::f32::consts::FRAC_PI_4));
        let half_diag = 2.0_f32.sqrt();
        assert_relative_eq!(b.max.x, half_diag, epsilon = 1e-5);
        assert_relative_eq!(b.min.y, -half_diag, epsilon = 1e-5);
        assert_relative_eq!(b.max.z, 1.0, epsilon = 1e-6);

        let mut moved = Box3::new(Vec3::zeros(), Vec3::repeat(1.0));
        moved.translate(&Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.min, Vec3::new(1.0, 2.0, 3.0));
    }
}
