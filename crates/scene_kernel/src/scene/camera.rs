//! Perspective projection state carried by camera nodes

use crate::foundation::math::utils::{deg_to_rad, rad_to_deg};
use crate::math::{Mat4, Mat4Ext};

/// Sub-rectangle of a larger virtual viewport, for tiled or multi-monitor output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOffset {
    /// Width of the full virtual viewport
    pub full_width: f32,
    /// Height of the full virtual viewport
    pub full_height: f32,
    /// Horizontal offset of this view
    pub x: f32,
    /// Vertical offset of this view
    pub y: f32,
    /// Width of this view
    pub width: f32,
    /// Height of this view
    pub height: f32,
}

/// Perspective camera parameters and the derived projection.
///
/// `projection_matrix` is only refreshed by [`PerspectiveCamera::update_projection_matrix`];
/// call it after editing fields directly. `matrix_world_inverse` is kept in
/// sync by the scene during world matrix updates.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Zoom factor narrowing the field of view
    pub zoom: f32,
    /// Optional sub-view of a larger frustum
    pub view: Option<ViewOffset>,
    /// Projection matrix
    pub projection_matrix: Mat4,
    /// Inverse of the node's world matrix
    pub matrix_world_inverse: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    /// Create a camera and compute its projection
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            zoom: 1.0,
            view: None,
            projection_matrix: Mat4::identity(),
            matrix_world_inverse: Mat4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Field of view after zoom, in degrees
    pub fn effective_fov(&self) -> f32 {
        rad_to_deg(2.0 * ((deg_to_rad(self.fov) * 0.5).tan() / self.zoom).atan())
    }

    /// Derive the field of view from a lens focal length (mm).
    ///
    /// `frame_height` defaults to 24mm, a full-frame 35mm sensor.
    pub fn set_lens(&mut self, focal_length: f32, frame_height: Option<f32>) {
        let frame_height = frame_height.unwrap_or(24.0);
        self.fov = 2.0 * rad_to_deg((frame_height / (focal_length * 2.0)).atan());
        self.update_projection_matrix();
    }

    /// Render only a window of a larger virtual viewport
    pub fn set_view_offset(
        &mut self,
        full_width: f32,
        full_height: f32,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) {
        self.view = Some(ViewOffset { full_width, full_height, x, y, width, height });
        self.update_projection_matrix();
    }

    /// Drop the view offset
    pub fn clear_view_offset(&mut self) {
        self.view = None;
        self.update_projection_matrix();
    }

    /// Recompute the projection from the current parameters
    pub fn update_projection_matrix(&mut self) {
        let fov = self.effective_fov();

        self.projection_matrix = match self.view {
            Some(view) if view.full_width > 0.0 => {
                let aspect = view.full_width / view.full_height;
                let top = deg_to_rad(fov * 0.5).tan() * self.near;
                let bottom = -top;
                let left = aspect * bottom;
                let right = aspect * top;
                let width = (right - left).abs();
                let height = (top - bottom).abs();

                Mat4::make_frustum(
                    left + view.x * width / view.full_width,
                    left + (view.x + view.width) * width / view.full_width,
                    top - (view.y + view.height) * height / view.full_height,
                    top - view.y * height / view.full_height,
                    self.near,
                    self.far,
                )
            }
            _ => Mat4::make_perspective(fov, self.aspect, self.near, self.far),
        };
    }

    /// Copy lens parameters from another camera
    pub fn copy_lens(&mut self, source: &Self) {
        self.fov = source.fov;
        self.aspect = source.aspect;
        self.near = source.near;
        self.far = source.far;
        self.zoom = source.zoom;
        self.view = source.view;
        self.update_projection_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let camera = PerspectiveCamera::default();
        assert_eq!(camera.fov, 50.0);
        assert_eq!(camera.aspect, 1.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 2000.0);
        assert_eq!(camera.zoom, 1.0);
        assert_relative_eq!(
            camera.projection_matrix,
            Mat4::make_perspective(50.0, 1.0, 0.1, 2000.0)
        );
    }

    #[test]
    fn test_set_lens() {
        let mut camera = PerspectiveCamera::default();
        // 12mm focal length on a 24mm frame gives 90 degrees
        camera.set_lens(12.0, None);
        assert_relative_eq!(camera.fov, 90.0, epsilon = 1e-4);

        camera.set_lens(12.0, Some(12.0));
        assert_relative_eq!(camera.fov, 2.0 * rad_to_deg(0.5_f32.atan()), epsilon = 1e-4);
    }

    #[test]
    fn test_zoom_narrows_fov() {
        let mut camera = PerspectiveCamera::new(90.0, 1.0, 1.0, 100.0);
        camera.zoom = 2.0;
        camera.update_projection_matrix();
        assert_relative_eq!(camera.effective_fov(), rad_to_deg(2.0 * 0.5_f32.atan()), epsilon = 1e-4);
        assert!(camera.effective_fov() < camera.fov);
    }

    #[test]
    fn test_full_view_offset_matches_plain_projection() {
        let mut camera = PerspectiveCamera::new(60.0, 2.0, 1.0, 100.0);
        let plain = camera.projection_matrix;

        camera.set_view_offset(200.0, 100.0, 0.0, 0.0, 200.0, 100.0);
        assert_relative_eq!(camera.projection_matrix, plain, epsilon = 1e-5);

        // Left half of the viewport is no longer symmetric
        camera.set_view_offset(200.0, 100.0, 0.0, 0.0, 100.0, 100.0);
        assert!(camera.projection_matrix[(0, 2)].abs() > 0.5);

        camera.clear_view_offset();
        assert_relative_eq!(camera.projection_matrix, plain, epsilon = 1e-5);
    }
}
