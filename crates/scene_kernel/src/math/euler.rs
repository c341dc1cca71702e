//! Euler angles
//!
//! Plain data: an `Euler` never notifies anything when it changes. Scene
//! nodes store a quaternion and derive Euler angles on request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Mat4, Mat4Ext, MathError, Quat, Vec3};
use crate::foundation::math::{constants::GIMBAL_LOCK_THRESHOLD, utils};

/// Order in which the three axis rotations are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    /// X, then Y, then Z
    #[default]
    #[serde(rename = "XYZ")]
    Xyz,
    /// Y, then Z, then X
    #[serde(rename = "YZX")]
    Yzx,
    /// Z, then X, then Y
    #[serde(rename = "ZXY")]
    Zxy,
    /// X, then Z, then Y
    #[serde(rename = "XZY")]
    Xzy,
    /// Y, then X, then Z
    #[serde(rename = "YXZ")]
    Yxz,
    /// Z, then Y, then X
    #[serde(rename = "ZYX")]
    Zyx,
}

impl RotationOrder {
    /// Every supported order
    pub const ALL: [RotationOrder; 6] = [
        RotationOrder::Xyz,
        RotationOrder::Yzx,
        RotationOrder::Zxy,
        RotationOrder::Xzy,
        RotationOrder::Yxz,
        RotationOrder::Zyx,
    ];

    /// Canonical upper-case name, e.g. `"XYZ"`
    pub fn as_str(self) -> &'static str {
        match self {
            RotationOrder::Xyz => "XYZ",
            RotationOrder::Yzx => "YZX",
            RotationOrder::Zxy => "ZXY",
            RotationOrder::Xzy => "XZY",
            RotationOrder::Yxz => "YXZ",
            RotationOrder::Zyx => "ZYX",
        }
    }
}

impl fmt::Display for RotationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RotationOrder {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RotationOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| MathError::UnsupportedRotationOrder(s.to_string()))
    }
}

/// Rotation as three angles in radians applied in `order`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Euler {
    /// Angle about X
    pub x: f32,
    /// Angle about Y
    pub y: f32,
    /// Angle about Z
    pub z: f32,
    /// Application order
    pub order: RotationOrder,
}

impl Euler {
    /// Create Euler angles
    pub fn new(x: f32, y: f32, z: f32, order: RotationOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Angles from a vector's components
    pub fn from_vector(v: &Vec3, order: RotationOrder) -> Self {
        Self::new(v.x, v.y, v.z, order)
    }

    /// Angles as a vector, dropping the order
    pub fn to_vector(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Extract angles from the upper 3x3 of `m`, which must be unscaled.
    ///
    /// Near gimbal lock the third angle is pinned to zero.
    pub fn from_rotation_matrix(m: &Mat4, order: RotationOrder) -> Self {
        let (m11, m12, m13) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let (m21, m22, m23) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let (m31, m32, m33) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

        let unlocked = |term: f32| term.abs() < GIMBAL_LOCK_THRESHOLD;
        let asin = |term: f32| utils::clamp(term, -1.0, 1.0).asin();

        let (x, y, z) = match order {
            RotationOrder::Xyz => {
                let y = asin(m13);
                if unlocked(m13) {
                    ((-m23).atan2(m33), y, (-m12).atan2(m11))
                } else {
                    (m32.atan2(m22), y, 0.0)
                }
            }
            RotationOrder::Yxz => {
                let x = asin(-m23);
                if unlocked(m23) {
                    (x, m13.atan2(m33), m21.atan2(m22))
                } else {
                    (x, (-m31).atan2(m11), 0.0)
                }
            }
            RotationOrder::Zxy => {
                let x = asin(m32);
                if unlocked(m32) {
                    (x, (-m31).atan2(m33), (-m12).atan2(m22))
                } else {
                    (x, 0.0, m21.atan2(m11))
                }
            }
            RotationOrder::Zyx => {
                let y = asin(-m31);
                if unlocked(m31) {
                    (m32.atan2(m33), y, m21.atan2(m11))
                } else {
                    (0.0, y, (-m12).atan2(m22))
                }
            }
            RotationOrder::Yzx => {
                let z = asin(m21);
                if unlocked(m21) {
                    ((-m23).atan2(m22), (-m31).atan2(m11), z)
                } else {
                    (0.0, m13.atan2(m33), z)
                }
            }
            RotationOrder::Xzy => {
                let z = asin(-m12);
                if unlocked(m12) {
                    (m32.atan2(m22), m13.atan2(m11), z)
                } else {
                    ((-m23).atan2(m33), 0.0, z)
                }
            }
        };

        Self { x, y, z, order }
    }

    /// Angles equivalent to a quaternion in the given order
    pub fn from_quaternion(q: &Quat, order: RotationOrder) -> Self {
        Self::from_rotation_matrix(&Mat4::make_rotation_from_quaternion(q), order)
    }

    /// Same rotation expressed in another order. Revolutions beyond ±π are lost.
    pub fn reorder(&self, new_order: RotationOrder) -> Self {
        use super::QuatExt;
        Self::from_quaternion(&Quat::from_euler(self), new_order)
    }
}
