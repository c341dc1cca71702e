//! Quaternion extensions
//!
//! Conversions here follow the same conventions as [`super::Mat4Ext`], so a
//! quaternion built from Euler angles and a matrix built from the same angles
//! describe the same rotation.

use nalgebra::Quaternion;

use super::{Euler, Mat4, Quat, RotationOrder, Vec3};
use crate::foundation::math::constants::SLERP_LINEAR_THRESHOLD;

/// Extra operations on unit quaternions
pub trait QuatExt {
    /// Quaternion equivalent of Euler angles in the given order
    fn from_euler(euler: &Euler) -> Quat;

    /// Quaternion from the upper 3x3 of `m`, which must be a pure rotation
    fn from_rotation_mat4(m: &Mat4) -> Quat;

    /// Rotation taking unit vector `from` onto unit vector `to`
    fn from_unit_vectors(from: &Vec3, to: &Vec3) -> Quat;

    /// Spherical interpolation along the shortest arc.
    ///
    /// `t = 0` returns `self` and `t = 1` returns `other` exactly. Nearly
    /// opposite inputs fall back to averaging the components.
    fn slerp_shortest(&self, other: &Quat, t: f32) -> Quat;
}

impl QuatExt for Quat {
    fn from_euler(euler: &Euler) -> Quat {
        let (s1, c1) = (euler.x / 2.0).sin_cos();
        let (s2, c2) = (euler.y / 2.0).sin_cos();
        let (s3, c3) = (euler.z / 2.0).sin_cos();

        let a = s1 * c2 * c3;
        let b = c1 * s2 * s3;
        let c = c1 * s2 * c3;
        let d = s1 * c2 * s3;
        let e = c1 * c2 * s3;
        let f = s1 * s2 * c3;
        let g = c1 * c2 * c3;
        let h = s1 * s2 * s3;

        let (x, y, z, w) = match euler.order {
            RotationOrder::Xyz => (a + b, c - d, e + f, g - h),
            RotationOrder::Yxz => (a + b, c - d, e - f, g + h),
            RotationOrder::Zxy => (a - b, c + d, e + f, g - h),
            RotationOrder::Zyx => (a - b, c + d, e - f, g + h),
            RotationOrder::Yzx => (a + b, c + d, e - f, g - h),
            RotationOrder::Xzy => (a - b, c - d, e + f, g + h),
        };

        Quat::new_normalize(Quaternion::new(w, x, y, z))
    }

    fn from_rotation_mat4(m: &Mat4) -> Quat {
        let (m11, m12, m13) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let (m21, m22, m23) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let (m31, m32, m33) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

        let trace = m11 + m22 + m33;

        let (x, y, z, w) = if trace > 0.0 {
            let s = 0.5 / (trace + 1.0).sqrt();
            ((m32 - m23) * s, (m13 - m31) * s, (m21 - m12) * s, 0.25 / s)
        } else if m11 > m22 && m11 > m33 {
            let s = 2.0 * (1.0 + m11 - m22 - m33).sqrt();
            (0.25 * s, (m12 + m21) / s, (m13 + m31) / s, (m32 - m23) / s)
        } else if m22 > m33 {
            let s = 2.0 * (1.0 + m22 - m11 - m33).sqrt();
            ((m12 + m21) / s, 0.25 * s, (m23 + m32) / s, (m13 - m31) / s)
        } else {
            let s = 2.0 * (1.0 + m33 - m11 - m22).sqrt();
            ((m13 + m31) / s, (m23 + m32) / s, 0.25 * s, (m21 - m12) / s)
        };

        Quat::new_normalize(Quaternion::new(w, x, y, z))
    }

    fn from_unit_vectors(from: &Vec3, to: &Vec3) -> Quat {
        const EPS: f32 = 0.000_001;

        let mut r = from.dot(to) + 1.0;
        let axis = if r < EPS {
            // Opposite vectors, pick any perpendicular axis
            r = 0.0;
            if from.x.abs() > from.z.abs() {
                Vec3::new(-from.y, from.x, 0.0)
            } else {
                Vec3::new(0.0, -from.z, from.y)
            }
        } else {
            from.cross(to)
        };

        Quat::new_normalize(Quaternion::new(r, axis.x, axis.y, axis.z))
    }

    fn slerp_shortest(&self, other: &Quat, t: f32) -> Quat {
        if t == 0.0 {
            return *self;
        }
        if t == 1.0 {
            return *other;
        }

        let a = self.quaternion();
        let mut b = *other.quaternion();
        let mut cos_half_theta = a.dot(&b);

        if cos_half_theta < 0.0 {
            b = -b;
            cos_half_theta = -cos_half_theta;
        }

        if cos_half_theta >= 1.0 {
            return *self;
        }

        let half_theta = cos_half_theta.acos();
        let sin_half_theta = (1.0 - cos_half_theta * cos_half_theta).sqrt();

        if sin_half_theta.abs() < SLERP_LINEAR_THRESHOLD {
            return Quat::new_normalize((a + b) * 0.5);
        }

        let ratio_a = ((1.0 - t) * half_theta).sin() / sin_half_theta;
        let ratio_b = (t * half_theta).sin() / sin_half_theta;

        Quat::new_normalize(a * ratio_a + b * ratio_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::{HALF_PI, PI};
    use crate::math::{Mat4Ext, Vec3Ext};
    use approx::assert_relative_eq;
    use nalgebra::Unit;

    fn same_rotation(a: &Quat, b: &Quat) -> bool {
        a.coords.dot(&b.coords).abs() > 0.9999
    }

    #[test]
    fn test_from_euler_single_axis() {
        let q = Quat::from_euler(&Euler::new(0.0, HALF_PI, 0.0, RotationOrder::Xyz));
        let expected = Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI);
        assert!(same_rotation(&q, &expected));
    }

    #[test]
    fn test_from_rotation_mat4_all_trace_branches() {
        // Angles chosen to drive each of the four branches
        let rotations = [
            Quat::from_axis_angle(&Vec3::x_axis(), 0.3),
            Quat::from_axis_angle(&Vec3::x_axis(), PI * 0.9),
            Quat::from_axis_angle(&Vec3::y_axis(), PI * 0.9),
            Quat::from_axis_angle(&Vec3::z_axis(), PI * 0.9),
        ];
        for q in rotations {
            let m = Mat4::make_rotation_from_quaternion(&q);
            assert!(same_rotation(&Quat::from_rotation_mat4(&m), &q));
        }
    }

    #[test]
    fn test_from_unit_vectors() {
        let q = Quat::from_unit_vectors(&Vec3::x(), &Vec3::y());
        assert_relative_eq!(Vec3::x().apply_quat(&q), Vec3::y(), epsilon = 1e-6);

        let flip = Quat::from_unit_vectors(&Vec3::z(), &-Vec3::z());
        assert_relative_eq!(Vec3::z().apply_quat(&flip), -Vec3::z(), epsilon = 1e-6);
    }

    #[test]
    fn test_slerp_endpoints_are_exact() {
        let a = Quat::from_axis_angle(&Vec3::z_axis(), 0.2);
        let b = Quat::from_axis_angle(&Vec3::z_axis(), 1.4);
        assert_eq!(a.slerp_shortest(&b, 0.0), a);
        assert_eq!(a.slerp_shortest(&b, 1.0), b);
    }

    #[test]
    fn test_slerp_midpoint() {
        let a = Quat::identity();
        let b = Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI);
        let mid = a.slerp_shortest(&b, 0.5);
        let expected = Quat::from_axis_angle(&Vec3::z_axis(), HALF_PI * 0.5);
        assert!(same_rotation(&mid, &expected));
    }

    #[test]
    fn test_slerp_takes_shortest_path() {
        let axis = Unit::new_normalize(Vec3::new(0.0, 1.0, 0.0));
        let a = Quat::from_axis_angle(&axis, 0.1);
        // Same orientation as 0.3 rad but in the opposite hemisphere
        let b = Quat::new_unchecked(-*Quat::from_axis_angle(&axis, 0.3).quaternion());
        let mid = a.slerp_shortest(&b, 0.5);
        assert!(same_rotation(&mid, &Quat::from_axis_angle(&axis, 0.2)));
    }

    #[test]
    fn test_slerp_identical_inputs() {
        let a = Quat::from_axis_angle(&Vec3::x_axis(), 0.75);
        let out = a.slerp_shortest(&a, 0.3);
        assert!(same_rotation(&out, &a));
    }
}
