//! View frustum for visibility culling

use serde::{Deserialize, Serialize};

use super::{Box3, Plane, Sphere};
use crate::math::{Mat4, Vec3};
use crate::scene::Object3D;

/// Six inward-facing planes bounding the visible volume.
///
/// Plane order follows the row combinations used by [`Frustum::from_matrix`]:
/// right, left, bottom, top, far, near.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    /// Bounding planes, normals pointing inside
    pub planes: [Plane; 6],
}

impl Default for Frustum {
    fn default() -> Self {
        Self { planes: [Plane::default(); 6] }
    }
}

impl Frustum {
    /// Create a frustum from six planes
    pub fn new(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract the planes of a combined `projection * view` matrix
    pub fn from_matrix(m: &Mat4) -> Self {
        let w = m.row(3).transpose();
        let x = m.row(0).transpose();
        let y = m.row(1).transpose();
        let z = m.row(2).transpose();

        let mut planes = [
            Plane::from_vec4(&(w - x)),
            Plane::from_vec4(&(w + x)),
            Plane::from_vec4(&(w + y)),
            Plane::from_vec4(&(w - y)),
            Plane::from_vec4(&(w - z)),
            Plane::from_vec4(&(w + z)),
        ];
        for plane in &mut planes {
            plane.normalize();
        }

        Self { planes }
    }

    /// True unless the sphere lies entirely behind some plane
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        let neg_radius = -sphere.radius;
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(&sphere.center) >= neg_radius)
    }

    /// True unless both the nearest and farthest box corners lie behind some plane
    pub fn intersects_box(&self, b: &Box3) -> bool {
        self.planes.iter().all(|plane| {
            let pick = |positive: bool, lo: f32, hi: f32| if positive { (lo, hi) } else { (hi, lo) };
            let (x1, x2) = pick(plane.normal.x > 0.0, b.min.x, b.max.x);
            let (y1, y2) = pick(plane.normal.y > 0.0, b.min.y, b.max.y);
            let (z1, z2) = pick(plane.normal.z > 0.0, b.min.z, b.max.z);

            let d1 = plane.distance_to_point(&Vec3::new(x1, y1, z1));
            let d2 = plane.distance_to_point(&Vec3::new(x2, y2, z2));
            !(d1 < 0.0 && d2 < 0.0)
        })
    }

    /// Point containment, inclusive of the planes
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Test a node's geometry bounds in world space.
    ///
    /// Uses the cached bounding sphere when present and computes one otherwise
    /// without touching the node. Nodes without geometry always intersect.
    pub fn intersects_object(&self, object: &Object3D) -> bool {
        match object.geometry.as_ref() {
            Some(geometry) => {
                let mut sphere = geometry.resolved_bounding_sphere();
                sphere.apply_mat4(&object.matrix_world);
                self.intersects_sphere(&sphere)
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Mat4Ext;
    use approx::assert_relative_eq;

    /// Camera at the origin looking down -Z, 90 degree fov, near 1, far 100
    fn view_frustum() -> Frustum {
        Frustum::from_matrix(&Mat4::make_perspective(90.0, 1.0, 1.0, 100.0))
    }

    #[test]
    fn test_planes_are_normalized() {
        for plane in view_frustum().planes {
            assert_relative_eq!(plane.normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_in_view_direction_intersects() {
        let f = view_frustum();
        for radius in [0.0, 0.5, 10.0, 1000.0] {
            assert!(f.intersects_sphere(&Sphere::new(Vec3::new(0.0, 0.0, -50.0), radius)));
        }
    }

    #[test]
    fn test_sphere_behind_any_plane_is_rejected() {
        let f = view_frustum();
        // Behind the camera
        assert!(!f.intersects_sphere(&Sphere::new(Vec3::new(0.0, 0.0, 5.0), 1.0)));
        // Beyond the far plane
        assert!(!f.intersects_sphere(&Sphere::new(Vec3::new(0.0, 0.0, -200.0), 10.0)));
        // Far off to the side
        assert!(!f.intersects_sphere(&Sphere::new(Vec3::new(100.0, 0.0, -10.0), 1.0)));
        // Each plane individually
        for plane in f.planes {
            let outside = plane.coplanar_point() - plane.normal * 3.0;
            let sphere = Sphere::new(outside, 2.9);
            assert!(plane.distance_to_point(&sphere.center) < -sphere.radius);
            assert!(!f.intersects_sphere(&sphere));
        }
    }

    #[test]
    fn test_box_tests() {
        let f = view_frustum();
        let visible = Box3::new(Vec3::new(-1.0, -1.0, -11.0), Vec3::new(1.0, 1.0, -9.0));
        let behind = Box3::new(Vec3::new(-1.0, -1.0, 2.0), Vec3::new(1.0, 1.0, 4.0));
        // Straddles the left plane
        let straddling = Box3::new(Vec3::new(-15.0, -1.0, -11.0), Vec3::new(-5.0, 1.0, -9.0));

        assert!(f.intersects_box(&visible));
        assert!(!f.intersects_box(&behind));
        assert!(f.intersects_box(&straddling));
    }

    #[test]
    fn test_contains_point() {
        let f = view_frustum();
        assert!(f.contains_point(&Vec3::new(0.0, 0.0, -10.0)));
        assert!(!f.contains_point(&Vec3::new(0.0, 0.0, -0.5)));
        assert!(!f.contains_point(&Vec3::new(20.0, 0.0, -10.0)));
    }
}
