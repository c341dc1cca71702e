//! Infinite plane `normal · p + constant = 0`

use serde::{Deserialize, Serialize};

use super::{Line3, Sphere};
use crate::math::{Mat3, Mat3Ext, Mat4, Vec3, Vec3Ext, Vec4};

/// Plane with a (normally unit length) normal and signed offset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Plane normal
    pub normal: Vec3,
    /// Negative distance from the origin along the normal
    pub constant: f32,
}

impl Default for Plane {
    fn default() -> Self {
        Self::new(Vec3::x(), 0.0)
    }
}

impl Plane {
    /// Create a plane from normal and constant, stored as given
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Plane from `(x, y, z)` normal and `w` constant
    pub fn from_components(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self::new(Vec3::new(x, y, z), w)
    }

    /// Plane from a homogeneous 4-vector
    pub fn from_vec4(v: &Vec4) -> Self {
        Self::from_components(v.x, v.y, v.z, v.w)
    }

    /// Plane with a given normal through `point`
    pub fn from_normal_and_coplanar_point(normal: &Vec3, point: &Vec3) -> Self {
        Self::new(*normal, -point.dot(normal))
    }

    /// Plane through three points, front face counter-clockwise.
    ///
    /// Collinear points produce a NaN normal.
    pub fn from_coplanar_points(a: &Vec3, b: &Vec3, c: &Vec3) -> Self {
        let normal = (c - b).cross(&(a - b)).normalize();
        Self::from_normal_and_coplanar_point(&normal, a)
    }

    /// Scale so the normal has unit length
    pub fn normalize(&mut self) -> &mut Self {
        let inverse_length = 1.0 / self.normal.norm();
        self.normal *= inverse_length;
        self.constant *= inverse_length;
        self
    }

    /// Flip the facing
    pub fn negate(&mut self) -> &mut Self {
        self.normal = -self.normal;
        self.constant = -self.constant;
        self
    }

    /// Signed distance, positive on the normal side
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }

    /// Signed distance to the sphere surface
    pub fn distance_to_sphere(&self, sphere: &Sphere) -> f32 {
        self.distance_to_point(&sphere.center) - sphere.radius
    }

    /// Offset from the plane to `point` along the normal
    pub fn ortho_point(&self, point: &Vec3) -> Vec3 {
        self.normal * self.distance_to_point(point)
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project_point(&self, point: &Vec3) -> Vec3 {
        point - self.ortho_point(point)
    }

    /// True when the segment's endpoints lie strictly on opposite sides
    pub fn is_intersection_line(&self, line: &Line3) -> bool {
        let start = self.distance_to_point(&line.start);
        let end = self.distance_to_point(&line.end);
        (start < 0.0 && end > 0.0) || (end < 0.0 && start > 0.0)
    }

    /// Crossing point of a segment with the plane.
    ///
    /// A segment parallel to the plane yields its start when the start lies
    /// on the plane, otherwise `None`. Crossings outside the segment yield `None`.
    pub fn intersect_line(&self, line: &Line3) -> Option<Vec3> {
        let direction = line.delta();
        let denominator = self.normal.dot(&direction);

        if denominator == 0.0 {
            if self.distance_to_point(&line.start) == 0.0 {
                return Some(line.start);
            }
            return None;
        }

        let t = -(line.start.dot(&self.normal) + self.constant) / denominator;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some(direction * t + line.start)
    }

    /// The point on the plane closest to the origin
    pub fn coplanar_point(&self) -> Vec3 {
        self.normal * -self.constant
    }

    /// Transform the plane. Pass a precomputed normal matrix to avoid recomputing it.
    pub fn apply_mat4(&mut self, m: &Mat4, normal_matrix: Option<&Mat3>) -> &mut Self {
        let normal_matrix = normal_matrix.copied().unwrap_or_else(|| Mat3::normal_matrix(m));
        let normal = self.normal.apply_mat3(&normal_matrix);
        let point = self.coplanar_point().apply_mat4(m);
        *self = Self::from_normal_and_coplanar_point(&normal, &point);
        self
    }

    /// Move the plane
    pub fn translate(&mut self, offset: &Vec3) -> &mut Self {
        self.constant -= offset.dot(&self.normal);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4Ext;
    use approx::assert_relative_eq;

    fn ground() -> Plane {
        Plane::from_normal_and_coplanar_point(&Vec3::y(), &Vec3::new(0.0, 2.0, 0.0))
    }

    #[test]
    fn test_construction() {
        let p = ground();
        assert_eq!(p.constant, -2.0);
        assert_relative_eq!(p.distance_to_point(&Vec3::new(5.0, 5.0, 5.0)), 3.0);

        let from_points = Plane::from_coplanar_points(
            &Vec3::new(0.0, 2.0, 0.0),
            &Vec3::new(0.0, 2.0, 1.0),
            &Vec3::new(1.0, 2.0, 0.0),
        );
        assert_relative_eq!(from_points.normal, Vec3::y());
        assert_relative_eq!(from_points.constant, -2.0);
    }

    #[test]
    fn test_normalize_and_negate() {
        let mut p = Plane::from_components(0.0, 3.0, 4.0, 10.0);
        p.normalize();
        assert_relative_eq!(p.normal.norm(), 1.0);
        assert_relative_eq!(p.constant, 2.0);
        p.negate();
        assert_relative_eq!(p.normal, Vec3::new(0.0, -0.6, -0.8));
        assert_relative_eq!(p.constant, -2.0);
    }

    #[test]
    fn test_projection() {
        let p = ground();
        let point = Vec3::new(1.0, 7.0, -3.0);
        assert_relative_eq!(p.project_point(&point), Vec3::new(1.0, 2.0, -3.0));
        assert_relative_eq!(p.ortho_point(&point), Vec3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(p.coplanar_point(), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(p.distance_to_sphere(&Sphere::new(point, 1.0)), 4.0);
    }

    #[test]
    fn test_intersect_line_crossing() {
        let p = ground();
        let line = Line3::new(Vec3::zeros(), Vec3::new(0.0, 4.0, 0.0));
        assert!(p.is_intersection_line(&line));
        assert_eq!(p.intersect_line(&line), Some(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_intersect_line_outside_segment() {
        let p = ground();
        let short = Line3::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        assert!(!p.is_intersection_line(&short));
        assert_eq!(p.intersect_line(&short), None);
    }

    #[test]
    fn test_intersect_line_parallel() {
        let p = ground();
        let on_plane = Line3::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(5.0, 2.0, 0.0));
        assert_eq!(p.intersect_line(&on_plane), Some(on_plane.start));

        let above = Line3::new(Vec3::new(0.0, 3.0, 0.0), Vec3::new(5.0, 3.0, 0.0));
        assert_eq!(p.intersect_line(&above), None);
    }

    #[test]
    fn test_apply_mat4_and_translate() {
        let mut p = ground();
        p.apply_mat4(&Mat4::make_translation(0.0, 3.0, 0.0), None);
        assert_relative_eq!(p.normal, Vec3::y());
        assert_relative_eq!(p.constant, -5.0);

        let mut rotated = ground();
        rotated.apply_mat4(&Mat4::make_rotation_z(std::f32::consts::FRAC_PI_2), None);
        assert_relative_eq!(rotated.normal, -Vec3::x(), epsilon = 1e-6);
        assert_relative_eq!(rotated.distance_to_point(&Vec3::new(-2.0, 0.0, 0.0)), 0.0, epsilon = 1e-6);

        let mut moved = ground();
        moved.translate(&Vec3::new(0.0, -2.0, 0.0));
        assert_relative_eq!(moved.constant, 0.0);
    }
}
