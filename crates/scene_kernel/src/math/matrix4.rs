//! 4x4 matrix extensions
//!
//! Constructors follow right-handed, OpenGL-style clip space conventions
//! (camera looks down -Z, depth mapped to [-1, 1]).

use nalgebra::Unit;

use super::{Euler, Quat, QuatExt, RotationOrder, Vec3};
use super::Mat4;
use crate::foundation::math::utils;

/// Extra operations on 4x4 matrices
pub trait Mat4Ext {
    /// Build `T * R * S` from position, rotation and scale
    fn compose(position: &Vec3, quaternion: &Quat, scale: &Vec3) -> Mat4;

    /// Split an affine matrix into position, rotation and scale.
    ///
    /// When the determinant is negative the x scale is negated.
    fn decompose(&self) -> (Vec3, Quat, Vec3);

    /// Pure rotation matrix from a quaternion
    fn make_rotation_from_quaternion(q: &Quat) -> Mat4;

    /// Pure rotation matrix from Euler angles in any of the six orders
    fn make_rotation_from_euler(euler: &Euler) -> Mat4;

    /// Rotation part of `m` with the scale of each column removed
    fn extract_rotation(m: &Mat4) -> Mat4;

    /// Rotation about the X axis
    fn make_rotation_x(theta: f32) -> Mat4;

    /// Rotation about the Y axis
    fn make_rotation_y(theta: f32) -> Mat4;

    /// Rotation about the Z axis
    fn make_rotation_z(theta: f32) -> Mat4;

    /// Rotation about an arbitrary axis (normalized internally)
    fn make_rotation_axis(axis: &Vec3, angle: f32) -> Mat4;

    /// Translation matrix
    fn make_translation(x: f32, y: f32, z: f32) -> Mat4;

    /// Scale matrix
    fn make_scale(x: f32, y: f32, z: f32) -> Mat4;

    /// Rotation whose +Z axis points from `target` towards `eye`
    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4;

    /// Largest axial scale factor
    fn max_scale_on_axis(&self) -> f32;

    /// Inverse, or the identity (with a warning) when the determinant is zero
    fn inverse_or_identity(&self) -> Mat4;

    /// Perspective projection from a vertical field of view in degrees
    fn make_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Off-center perspective projection
    fn make_frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;

    /// Orthographic projection
    fn make_orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4;

    /// The sixteen elements in column-major order
    fn to_column_major(&self) -> [f32; 16];
}

impl Mat4Ext for Mat4 {
    fn compose(position: &Vec3, quaternion: &Quat, scale: &Vec3) -> Mat4 {
        let mut m = Mat4::make_rotation_from_quaternion(quaternion);
        for (col, s) in scale.iter().enumerate() {
            for row in 0..3 {
                m[(row, col)] *= s;
            }
        }
        m[(0, 3)] = position.x;
        m[(1, 3)] = position.y;
        m[(2, 3)] = position.z;
        m
    }

    fn decompose(&self) -> (Vec3, Quat, Vec3) {
        let mut sx = Vec3::new(self[(0, 0)], self[(1, 0)], self[(2, 0)]).norm();
        let sy = Vec3::new(self[(0, 1)], self[(1, 1)], self[(2, 1)]).norm();
        let sz = Vec3::new(self[(0, 2)], self[(1, 2)], self[(2, 2)]).norm();

        if self.determinant() < 0.0 {
            sx = -sx;
        }

        let position = Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)]);

        let mut rotation = *self;
        for (col, s) in [sx, sy, sz].into_iter().enumerate() {
            let inv = 1.0 / s;
            for row in 0..3 {
                rotation[(row, col)] *= inv;
            }
        }

        (position, Quat::from_rotation_mat4(&rotation), Vec3::new(sx, sy, sz))
    }

    fn make_rotation_from_quaternion(q: &Quat) -> Mat4 {
        let (x, y, z, w) = (q.i, q.j, q.k, q.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Mat4::new(
            1.0 - (yy + zz), xy - wz, xz + wy, 0.0,
            xy + wz, 1.0 - (xx + zz), yz - wx, 0.0,
            xz - wy, yz + wx, 1.0 - (xx + yy), 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn make_rotation_from_euler(euler: &Euler) -> Mat4 {
        let (a, b) = (euler.x.cos(), euler.x.sin());
        let (c, d) = (euler.y.cos(), euler.y.sin());
        let (e, f) = (euler.z.cos(), euler.z.sin());

        let rows: [[f32; 3]; 3] = match euler.order {
            RotationOrder::Xyz => {
                let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);
                [
                    [c * e, -c * f, d],
                    [af + be * d, ae - bf * d, -b * c],
                    [bf - ae * d, be + af * d, a * c],
                ]
            }
            RotationOrder::Yxz => {
                let (ce, cf, de, df) = (c * e, c * f, d * e, d * f);
                [
                    [ce + df * b, de * b - cf, a * d],
                    [a * f, a * e, -b],
                    [cf * b - de, df + ce * b, a * c],
                ]
            }
            RotationOrder::Zxy => {
                let (ce, cf, de, df) = (c * e, c * f, d * e, d * f);
                [
                    [ce - df * b, -a * f, de + cf * b],
                    [cf + de * b, a * e, df - ce * b],
                    [-a * d, b, a * c],
                ]
            }
            RotationOrder::Zyx => {
                let (ae, af, be, bf) = (a * e, a * f, b * e, b * f);
                [
                    [c * e, be * d - af, ae * d + bf],
                    [c * f, bf * d + ae, af * d - be],
                    [-d, b * c, a * c],
                ]
            }
            RotationOrder::Yzx => {
                let (ac, ad, bc, bd) = (a * c, a * d, b * c, b * d);
                [
                    [c * e, bd - ac * f, bc * f + ad],
                    [f, a * e, -b * e],
                    [-d * e, ad * f + bc, ac - bd * f],
                ]
            }
            RotationOrder::Xzy => {
                let (ac, ad, bc, bd) = (a * c, a * d, b * c, b * d);
                [
                    [c * e, -f, d * e],
                    [ac * f + bd, a * e, ad * f - bc],
                    [bc * f - ad, b * e, bd * f + ac],
                ]
            }
        };

        let mut m = Mat4::identity();
        for (row, values) in rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                m[(row, col)] = *value;
            }
        }
        m
    }

    fn extract_rotation(m: &Mat4) -> Mat4 {
        let mut out = Mat4::identity();
        for col in 0..3 {
            let axis = Vec3::new(m[(0, col)], m[(1, col)], m[(2, col)]);
            let inv = 1.0 / axis.norm();
            for row in 0..3 {
                out[(row, col)] = m[(row, col)] * inv;
            }
        }
        out
    }

    fn make_rotation_x(theta: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), theta)
    }

    fn make_rotation_y(theta: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), theta)
    }

    fn make_rotation_z(theta: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), theta)
    }

    fn make_rotation_axis(axis: &Vec3, angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Unit::new_normalize(*axis), angle)
    }

    fn make_translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    fn make_scale(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_nonuniform_scaling(&Vec3::new(x, y, z))
    }

    fn look_at(eye: &Vec3, target: &Vec3, up: &Vec3) -> Mat4 {
        let mut z = eye - target;
        if z.norm_squared() == 0.0 {
            z = Vec3::z();
        } else {
            z.normalize_mut();
        }

        let mut x = up.cross(&z);
        if x.norm_squared() == 0.0 {
            // up is parallel to the view direction
            z.x += 0.0001;
            x = up.cross(&z);
        }
        x.normalize_mut();

        let y = z.cross(&x);

        Mat4::new(
            x.x, y.x, z.x, 0.0,
            x.y, y.y, z.y, 0.0,
            x.z, y.z, z.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn max_scale_on_axis(&self) -> f32 {
        let sx = self.fixed_view::<3, 1>(0, 0).norm_squared();
        let sy = self.fixed_view::<3, 1>(0, 1).norm_squared();
        let sz = self.fixed_view::<3, 1>(0, 2).norm_squared();
        sx.max(sy).max(sz).sqrt()
    }

    fn inverse_or_identity(&self) -> Mat4 {
        if self.determinant() == 0.0 {
            log::warn!("Mat4 inverse requested for a singular matrix, using identity");
            return Mat4::identity();
        }
        self.try_inverse().unwrap_or_else(Mat4::identity)
    }

    fn make_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let ymax = near * utils::deg_to_rad(fov * 0.5).tan();
        let ymin = -ymax;
        let xmin = ymin * aspect;
        let xmax = ymax * aspect;
        Mat4::make_frustum(xmin, xmax, ymin, ymax, near, far)
    }

    fn make_frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let x = 2.0 * near / (right - left);
        let y = 2.0 * near / (top - bottom);
        let a = (right + left) / (right - left);
        let b = (top + bottom) / (top - bottom);
        let c = -(far + near) / (far - near);
        let d = -2.0 * far * near / (far - near);

        Mat4::new(
            x, 0.0, a, 0.0,
            0.0, y, b, 0.0,
            0.0, 0.0, c, d,
            0.0, 0.0, -1.0, 0.0,
        )
    }

    fn make_orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Mat4 {
        let w = right - left;
        let h = top - bottom;
        let p = far - near;
        let x = (right + left) / w;
        let y = (top + bottom) / h;
        let z = (far + near) / p;

        Mat4::new(
            2.0 / w, 0.0, 0.0, -x,
            0.0, 2.0 / h, 0.0, -y,
            0.0, 0.0, -2.0 / p, -z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn to_column_major(&self) -> [f32; 16] {
        let mut out = [0.0; 16];
        out.copy_from_slice(self.as_slice());
        out
    }
}
