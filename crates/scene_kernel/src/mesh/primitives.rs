//! Procedural geometry builders

use super::{Face3, Geometry};
use crate::math::{Vec2, Vec3, Vec3Ext};

/// Axis-aligned box centered on the origin, subdivided per axis.
///
/// Each side gets its own material index: +X 0, -X 1, +Y 2, -Y 3, +Z 4, -Z 5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    /// Extent along X
    pub width: f32,
    /// Extent along Y
    pub height: f32,
    /// Extent along Z
    pub depth: f32,
    /// Subdivisions along X
    pub width_segments: usize,
    /// Subdivisions along Y
    pub height_segments: usize,
    /// Subdivisions along Z
    pub depth_segments: usize,
}

impl BoxGeometry {
    /// Box with one segment per axis
    pub fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
            width_segments: 1,
            height_segments: 1,
            depth_segments: 1,
        }
    }

    /// Set the subdivisions, clamped to at least one
    pub fn with_segments(mut self, width: usize, height: usize, depth: usize) -> Self {
        self.width_segments = width.max(1);
        self.height_segments = height.max(1);
        self.depth_segments = depth.max(1);
        self
    }

    /// Generate the geometry. Shared corner and edge vertices are merged.
    pub fn build(&self) -> Geometry {
        let mut geometry = Geometry::new();
        let (half_w, half_h, half_d) = (self.width / 2.0, self.height / 2.0, self.depth / 2.0);

        // (u axis, v axis, u direction, v direction, plane width, plane height, offset along w)
        self.build_plane(&mut geometry, 2, 1, -1.0, -1.0, self.depth, self.height, half_w, 0);
        self.build_plane(&mut geometry, 2, 1, 1.0, -1.0, self.depth, self.height, -half_w, 1);
        self.build_plane(&mut geometry, 0, 2, 1.0, 1.0, self.width, self.depth, half_h, 2);
        self.build_plane(&mut geometry, 0, 2, 1.0, -1.0, self.width, self.depth, -half_h, 3);
        self.build_plane(&mut geometry, 0, 1, 1.0, -1.0, self.width, self.height, half_d, 4);
        self.build_plane(&mut geometry, 0, 1, -1.0, -1.0, self.width, self.height, -half_d, 5);

        geometry.merge_vertices();
        geometry
    }

    fn build_plane(
        &self,
        geometry: &mut Geometry,
        u: usize,
        v: usize,
        u_dir: f32,
        v_dir: f32,
        width: f32,
        height: f32,
        depth: f32,
        material_index: usize,
    ) {
        let w = 3 - u - v;
        let (grid_x, grid_y) = match w {
            2 => (self.width_segments, self.height_segments),
            1 => (self.width_segments, self.depth_segments),
            _ => (self.depth_segments, self.height_segments),
        };
        let (half_width, half_height) = (width / 2.0, height / 2.0);
        let segment_width = width / grid_x as f32;
        let segment_height = height / grid_y as f32;
        let offset = geometry.vertices.len();

        let mut normal = Vec3::zeros();
        normal.set_component(w, if depth > 0.0 { 1.0 } else { -1.0 });

        for iy in 0..=grid_y {
            for ix in 0..=grid_x {
                let mut vertex = Vec3::zeros();
                vertex.set_component(u, (ix as f32 * segment_width - half_width) * u_dir);
                vertex.set_component(v, (iy as f32 * segment_height - half_height) * v_dir);
                vertex.set_component(w, depth);
                geometry.vertices.push(vertex);
            }
        }

        let row = grid_x + 1;
        let (gx, gy) = (grid_x as f32, grid_y as f32);
        for iy in 0..grid_y {
            for ix in 0..grid_x {
                let a = ix + row * iy;
                let b = ix + row * (iy + 1);
                let c = (ix + 1) + row * (iy + 1);
                let d = (ix + 1) + row * iy;

                let (fx, fy) = (ix as f32, iy as f32);
                let uv_a = Vec2::new(fx / gx, 1.0 - fy / gy);
                let uv_b = Vec2::new(fx / gx, 1.0 - (fy + 1.0) / gy);
                let uv_c = Vec2::new((fx + 1.0) / gx, 1.0 - (fy + 1.0) / gy);
                let uv_d = Vec2::new((fx + 1.0) / gx, 1.0 - fy / gy);

                for (corners, uvs) in [
                    ([a, b, d], [uv_a, uv_b, uv_d]),
                    ([b, c, d], [uv_b, uv_c, uv_d]),
                ] {
                    let face = Face3::new(corners[0] + offset, corners[1] + offset, corners[2] + offset)
                        .with_normal(normal)
                        .with_vertex_normals([normal; 3])
                        .with_material_index(material_index);
                    geometry.faces.push(face);
                    geometry.face_vertex_uvs[0].push(uvs);
                }
            }
        }
    }
}

impl From<BoxGeometry> for Geometry {
    fn from(params: BoxGeometry) -> Self {
        params.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_cube_topology() {
        let cube = BoxGeometry::new(1.0, 1.0, 1.0).build();
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.faces.len(), 12);
        assert_eq!(cube.face_vertex_uvs[0].len(), 12);
        for face in &cube.faces {
            assert!(face.indices().iter().all(|&i| i < 8));
            assert!(!face.is_degenerate());
        }
        for vertex in &cube.vertices {
            assert!(vertex.iter().all(|c| (c.abs() - 0.5).abs() < 1e-6));
        }
    }

    #[test]
    fn test_stored_normals_match_winding() {
        let mut cube = BoxGeometry::new(2.0, 3.0, 4.0).build();
        let stored: Vec<Vec3> = cube.faces.iter().map(|f| f.normal).collect();
        cube.compute_face_normals();
        for (face, expected) in cube.faces.iter().zip(stored) {
            assert_relative_eq!(face.normal, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_material_index_per_side() {
        let cube = BoxGeometry::new(1.0, 1.0, 1.0).build();
        let expected = [
            (0, Vec3::x()),
            (1, -Vec3::x()),
            (2, Vec3::y()),
            (3, -Vec3::y()),
            (4, Vec3::z()),
            (5, -Vec3::z()),
        ];
        for (index, normal) in expected {
            let faces: Vec<_> = cube.faces.iter().filter(|f| f.material_index == index).collect();
            assert_eq!(faces.len(), 2);
            assert!(faces.iter().all(|f| f.normal == normal));
        }
    }

    #[test]
    fn test_segments() {
        let g = BoxGeometry::new(1.0, 1.0, 1.0).with_segments(2, 3, 4).build();
        // Two triangles per cell on each pair of opposite sides
        let cells = 2 * (2 * 3) + 2 * (2 * 4) + 2 * (4 * 3);
        assert_eq!(g.faces.len(), cells * 2);
        // Surface lattice points of a 2x3x4 grid
        let lattice = 3 * 4 * 5 - 2 * 3;
        assert_eq!(g.vertices.len(), lattice);

        let bounds = crate::bounds::Box3::from_points(&g.vertices);
        assert_relative_eq!(bounds.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_relative_eq!(bounds.max, Vec3::new(0.5, 0.5, 0.5));
    }
}
