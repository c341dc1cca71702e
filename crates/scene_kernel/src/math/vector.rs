//! Vector extensions
//!
//! nalgebra already covers the arithmetic (add, sub, scale, dot, cross,
//! length, normalize, lerp). These traits add indexed component access and
//! the transform helpers the scene graph needs.

use super::{Mat3, Mat4, Quat, Vec2, Vec3};
use crate::foundation::math::utils;

/// Extra operations on 2D vectors
pub trait Vec2Ext {
    /// Component by index (0 = x, 1 = y). Panics on any other index.
    fn component(&self, index: usize) -> f32;

    /// Set a component by index (0 = x, 1 = y). Panics on any other index.
    fn set_component(&mut self, index: usize, value: f32);
}

impl Vec2Ext for Vec2 {
    fn component(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => panic!("Vec2 component index out of range: {}", index),
        }
    }

    fn set_component(&mut self, index: usize, value: f32) {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            _ => panic!("Vec2 component index out of range: {}", index),
        }
    }
}

/// Extra operations on 3D vectors
pub trait Vec3Ext {
    /// Component by index (0 = x, 1 = y, 2 = z). Panics on any other index.
    fn component(&self, index: usize) -> f32;

    /// Set a component by index. Panics on any index outside 0..=2.
    fn set_component(&mut self, index: usize, value: f32);

    /// Multiply by a 3x3 matrix
    fn apply_mat3(&self, m: &Mat3) -> Vec3;

    /// Transform as a point by an affine 4x4 matrix (w = 1, no divide)
    fn apply_mat4(&self, m: &Mat4) -> Vec3;

    /// Transform as a point by a projective matrix, dividing by the resulting w
    fn apply_projection(&self, m: &Mat4) -> Vec3;

    /// Rotate by a quaternion
    fn apply_quat(&self, q: &Quat) -> Vec3;

    /// Transform as a direction by the upper 3x3 of `m`, then normalize
    fn transform_direction(&self, m: &Mat4) -> Vec3;

    /// Clamp each component into `[min, max]`
    fn clamp_components(&self, min: &Vec3, max: &Vec3) -> Vec3;

    /// Rescale so the length lies in `[min, max]`
    fn clamp_length(&self, min: f32, max: f32) -> Vec3;

    /// Componentwise minimum
    fn min_components(&self, other: &Vec3) -> Vec3;

    /// Componentwise maximum
    fn max_components(&self, other: &Vec3) -> Vec3;

    /// Angle in radians between two vectors
    fn angle_to(&self, other: &Vec3) -> f32;

    /// Euclidean distance
    fn distance_to(&self, other: &Vec3) -> f32;

    /// Squared euclidean distance
    fn distance_to_squared(&self, other: &Vec3) -> f32;

    /// Projection onto the direction of `other`
    fn project_on_vector(&self, other: &Vec3) -> Vec3;

    /// Projection onto the plane through the origin with the given normal
    fn project_on_plane(&self, plane_normal: &Vec3) -> Vec3;

    /// Reflect off the plane orthogonal to `normal` (unit length)
    fn reflect(&self, normal: &Vec3) -> Vec3;

    /// Translation part of an affine matrix
    fn from_matrix_position(m: &Mat4) -> Vec3;

    /// Lengths of the first three columns of a matrix
    fn from_matrix_scale(m: &Mat4) -> Vec3;

    /// First three rows of column `index` of a matrix
    fn from_matrix_column(index: usize, m: &Mat4) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn component(&self, index: usize) -> f32 {
        match index {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => panic!("Vec3 component index out of range: {}", index),
        }
    }

    fn set_component(&mut self, index: usize, value: f32) {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            2 => self.z = value,
            _ => panic!("Vec3 component index out of range: {}", index),
        }
    }

    fn apply_mat3(&self, m: &Mat3) -> Vec3 {
        m * self
    }

    fn apply_mat4(&self, m: &Mat4) -> Vec3 {
        Vec3::new(
            m[(0, 0)] * self.x + m[(0, 1)] * self.y + m[(0, 2)] * self.z + m[(0, 3)],
            m[(1, 0)] * self.x + m[(1, 1)] * self.y + m[(1, 2)] * self.z + m[(1, 3)],
            m[(2, 0)] * self.x + m[(2, 1)] * self.y + m[(2, 2)] * self.z + m[(2, 3)],
        )
    }

    fn apply_projection(&self, m: &Mat4) -> Vec3 {
        let d = 1.0
            / (m[(3, 0)] * self.x + m[(3, 1)] * self.y + m[(3, 2)] * self.z + m[(3, 3)]);
        self.apply_mat4(m) * d
    }

    fn apply_quat(&self, q: &Quat) -> Vec3 {
        q.transform_vector(self)
    }

    fn transform_direction(&self, m: &Mat4) -> Vec3 {
        let linear = m.fixed_view::<3, 3>(0, 0) * self;
        linear.normalize()
    }

    fn clamp_components(&self, min: &Vec3, max: &Vec3) -> Vec3 {
        Vec3::new(
            min.x.max(max.x.min(self.x)),
            min.y.max(max.y.min(self.y)),
            min.z.max(max.z.min(self.z)),
        )
    }

    fn clamp_length(&self, min: f32, max: f32) -> Vec3 {
        let length = self.norm();
        self * (min.max(max.min(length)) / length)
    }

    fn min_components(&self, other: &Vec3) -> Vec3 {
        self.inf(other)
    }

    fn max_components(&self, other: &Vec3) -> Vec3 {
        self.sup(other)
    }

    fn angle_to(&self, other: &Vec3) -> f32 {
        let theta = self.dot(other) / (self.norm() * other.norm());
        utils::clamp(theta, -1.0, 1.0).acos()
    }

    fn distance_to(&self, other: &Vec3) -> f32 {
        self.distance_to_squared(other).sqrt()
    }

    fn distance_to_squared(&self, other: &Vec3) -> f32 {
        (self - other).norm_squared()
    }

    fn project_on_vector(&self, other: &Vec3) -> Vec3 {
        let direction = other.normalize();
        direction * self.dot(&direction)
    }

    fn project_on_plane(&self, plane_normal: &Vec3) -> Vec3 {
        self - self.project_on_vector(plane_normal)
    }

    fn reflect(&self, normal: &Vec3) -> Vec3 {
        self - normal * (2.0 * self.dot(normal))
    }

    fn from_matrix_position(m: &Mat4) -> Vec3 {
        Vec3::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
    }

    fn from_matrix_scale(m: &Mat4) -> Vec3 {
        Vec3::new(
            Vec3::from_matrix_column(0, m).norm(),
            Vec3::from_matrix_column(1, m).norm(),
            Vec3::from_matrix_column(2, m).norm(),
        )
    }

    fn from_matrix_column(index: usize, m: &Mat4) -> Vec3 {
        Vec3::new(m[(0, index)], m[(1, index)], m[(2, index)])
    }
}
