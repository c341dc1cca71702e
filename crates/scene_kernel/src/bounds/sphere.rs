//! Bounding sphere

use serde::{Deserialize, Serialize};

use super::Box3;
use crate::math::{Mat4, Mat4Ext, Vec3, Vec3Ext};

/// Sphere given by center and radius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sphere {
    /// Center point
    pub center: Vec3,
    /// Radius; non-positive means empty
    pub radius: f32,
}

impl Sphere {
    /// Create a sphere
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere enclosing `points`.
    ///
    /// Centered on `center` when given, otherwise on the center of the
    /// points' bounding box. The radius reaches the farthest point.
    /// No points give a zero radius, at the origin unless `center` is given.
    pub fn from_points(points: &[Vec3], center: Option<Vec3>) -> Self {
        if points.is_empty() {
            return Self::new(center.unwrap_or_else(Vec3::zeros), 0.0);
        }
        let center = center.unwrap_or_else(|| Box3::from_points(points).center());
        let max_radius_sq = points
            .iter()
            .map(|p| center.distance_to_squared(p))
            .fold(0.0_f32, f32::max);
        Self::new(center, max_radius_sq.sqrt())
    }

    /// True when the radius is not positive
    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }

    /// Inclusive containment test
    pub fn contains_point(&self, point: &Vec3) -> bool {
        point.distance_to_squared(&self.center) <= self.radius * self.radius
    }

    /// Signed distance from the surface, negative inside
    pub fn distance_to_point(&self, point: &Vec3) -> f32 {
        point.distance_to(&self.center) - self.radius
    }

    /// Overlap test
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let radius_sum = self.radius + other.radius;
        other.center.distance_to_squared(&self.center) <= radius_sum * radius_sum
    }

    /// Closest point inside the sphere
    pub fn clamp_point(&self, point: &Vec3) -> Vec3 {
        if self.center.distance_to_squared(point) > self.radius * self.radius {
            (point - self.center).normalize() * self.radius + self.center
        } else {
            *point
        }
    }

    /// Axis-aligned box enclosing the sphere
    pub fn bounding_box(&self) -> Box3 {
        let mut b = Box3::new(self.center, self.center);
        b.expand_by_scalar(self.radius);
        b
    }

    /// Transform the center and scale the radius by the largest axial scale
    pub fn apply_mat4(&mut self, m: &Mat4) -> &mut Self {
        self.center = self.center.apply_mat4(m);
        self.radius *= m.max_scale_on_axis();
        self
    }

    /// Move the center
    pub fn translate(&mut self, offset: &Vec3) -> &mut Self {
        self.center += offset;
        self
    }
}
