//! Line segment

use serde::{Deserialize, Serialize};

use crate::foundation::math::utils;
use crate::math::{Mat4, Vec3, Vec3Ext};

/// Segment from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line3 {
    /// First endpoint
    pub start: Vec3,
    /// Second endpoint
    pub end: Vec3,
}

impl Line3 {
    /// Create a segment
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self { start, end }
    }

    /// Midpoint
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// `end - start`
    pub fn delta(&self) -> Vec3 {
        self.end - self.start
    }

    /// Squared length
    pub fn distance_squared(&self) -> f32 {
        self.start.distance_to_squared(&self.end)
    }

    /// Length
    pub fn distance(&self) -> f32 {
        self.start.distance_to(&self.end)
    }

    /// Point at parameter `t`, with 0 at `start` and 1 at `end`
    pub fn at(&self, t: f32) -> Vec3 {
        self.delta() * t + self.start
    }

    /// Parameter of the point on the line closest to `point`
    pub fn closest_point_to_point_parameter(&self, point: &Vec3, clamp_to_line: bool) -> f32 {
        let start_p = point - self.start;
        let start_end = self.delta();
        let t = start_end.dot(&start_p) / start_end.dot(&start_end);
        if clamp_to_line {
            utils::clamp(t, 0.0, 1.0)
        } else {
            t
        }
    }

    /// Point on the line (or segment when clamped) closest to `point`
    pub fn closest_point_to_point(&self, point: &Vec3, clamp_to_line: bool) -> Vec3 {
        self.at(self.closest_point_to_point_parameter(point, clamp_to_line))
    }

    /// Transform both endpoints
    pub fn apply_mat4(&mut self, m: &Mat4) -> &mut Self {
        self.start = self.start.apply_mat4(m);
        self.end = self.end.apply_mat4(m);
        self
    }
}
