//! 3x3 matrix extensions, chiefly the normal matrix

use super::{Mat3, Mat4};

/// Extra operations on 3x3 matrices
pub trait Mat3Ext {
    /// Inverse-transpose of the upper-left 3x3 of `m`.
    ///
    /// A singular block yields the identity and logs a warning.
    fn normal_matrix(m: &Mat4) -> Mat3;

    /// Inverse, or the identity (with a warning) when the determinant is zero
    fn inverse_or_identity(&self) -> Mat3;

    /// The nine elements in column-major order
    fn to_column_major(&self) -> [f32; 9];
}

impl Mat3Ext for Mat3 {
    fn normal_matrix(m: &Mat4) -> Mat3 {
        let linear: Mat3 = m.fixed_view::<3, 3>(0, 0).into_owned();
        linear.inverse_or_identity().transpose()
    }

    fn inverse_or_identity(&self) -> Mat3 {
        if self.determinant() == 0.0 {
            log::warn!("Mat3 inverse requested for a singular matrix, using identity");
            return Mat3::identity();
        }
        self.try_inverse().unwrap_or_else(Mat3::identity)
    }

    fn to_column_major(&self) -> [f32; 9] {
        let mut out = [0.0; 9];
        out.copy_from_slice(self.as_slice());
        out
    }
}
