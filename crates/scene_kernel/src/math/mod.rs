//! Vector math kernel
//!
//! Extension traits over the nalgebra storage types plus the rotation
//! representations the scene graph relies on. All matrices are column-major;
//! transforms compose as `T * R * S`.

mod vector;
mod matrix3;
mod matrix4;
mod quaternion;
mod euler;
mod color;

pub use vector::{Vec2Ext, Vec3Ext};
pub use matrix3::Mat3Ext;
pub use matrix4::Mat4Ext;
pub use quaternion::QuatExt;
pub use euler::{Euler, RotationOrder};
pub use color::Color;

pub use crate::foundation::math::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

use thiserror::Error;

/// Math errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Rotation order string is not one of the six supported orders
    #[error("Unsupported rotation order: {0}")]
    UnsupportedRotationOrder(String),
}
