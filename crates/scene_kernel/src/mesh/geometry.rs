//! Indexed triangle geometry
//!
//! Vertices are shared between faces; normals, colors and UVs live on the
//! faces. Bounding volumes are cached and handled according to the
//! geometry's [`BoundsPolicy`].

use std::collections::HashMap;

use bitflags::bitflags;

use super::Face3;
use crate::bounds::{Box3, Sphere};
use crate::core::config::BoundsPolicy;
use crate::foundation::ids::{generate_uuid, GEOMETRY_IDS};
use crate::math::{Color, Mat3, Mat3Ext, Mat4, Mat4Ext, Vec2, Vec3, Vec3Ext};
use crate::scene::Object3D;

bitflags! {
    /// Buffers the renderer must re-upload
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GeometryUpdates: u8 {
        /// Vertex positions changed
        const VERTICES = 1 << 0;
        /// Face list changed
        const ELEMENTS = 1 << 1;
        /// UVs changed
        const UVS = 1 << 2;
        /// Normals changed
        const NORMALS = 1 << 3;
        /// Colors changed
        const COLORS = 1 << 4;
    }
}

/// Decimal places used when merging coincident vertices
pub const MERGE_PRECISION_POINTS: i32 = 4;

/// Unit vector, or zero for a zero-length input
fn unit_or_zero(v: &Vec3) -> Vec3 {
    v.try_normalize(0.0).unwrap_or_else(Vec3::zeros)
}

/// Triangle mesh data
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Process-wide integer id
    pub id: u32,
    /// Random UUID
    pub uuid: String,
    /// Optional name
    pub name: String,
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Per-vertex colors, parallel to `vertices` when used
    pub colors: Vec<Color>,
    /// Triangles
    pub faces: Vec<Face3>,
    /// UV channels, each holding one entry per face
    pub face_vertex_uvs: Vec<Vec<[Vec2; 3]>>,
    /// How cached bounds react to vertex changes
    pub bounds_policy: BoundsPolicy,
    /// Pending renderer uploads
    pub needs_update: GeometryUpdates,
    bounding_box: Option<Box3>,
    bounding_sphere: Option<Sphere>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

impl Geometry {
    /// Empty geometry with a single empty UV channel
    pub fn new() -> Self {
        Self {
            id: GEOMETRY_IDS.next_id(),
            uuid: generate_uuid(),
            name: String::new(),
            vertices: Vec::new(),
            colors: Vec::new(),
            faces: Vec::new(),
            face_vertex_uvs: vec![Vec::new()],
            bounds_policy: BoundsPolicy::default(),
            needs_update: GeometryUpdates::empty(),
            bounding_box: None,
            bounding_sphere: None,
        }
    }

    /// Geometry from vertices and faces
    pub fn from_triangles(vertices: Vec<Vec3>, faces: Vec<Face3>) -> Self {
        let mut geometry = Self::new();
        geometry.vertices = vertices;
        geometry.faces = faces;
        geometry.needs_update = GeometryUpdates::VERTICES | GeometryUpdates::ELEMENTS;
        geometry
    }

    /// Set the bounds policy
    pub fn with_bounds_policy(mut self, policy: BoundsPolicy) -> Self {
        self.bounds_policy = policy;
        self
    }

    /// Cached bounding box
    pub fn bounding_box(&self) -> Option<&Box3> {
        self.bounding_box.as_ref()
    }

    /// Cached bounding sphere
    pub fn bounding_sphere(&self) -> Option<&Sphere> {
        self.bounding_sphere.as_ref()
    }

    /// Cached bounding sphere, or one computed on the spot without caching.
    /// Geometry without vertices resolves to a zero-radius sphere at the origin.
    pub fn resolved_bounding_sphere(&self) -> Sphere {
        self.bounding_sphere
            .unwrap_or_else(|| Sphere::from_points(&self.vertices, None))
    }

    /// Drop both cached bounds
    pub fn invalidate_bounds(&mut self) {
        self.bounding_box = None;
        self.bounding_sphere = None;
    }

    /// Record that `vertices` was edited directly
    pub fn vertices_changed(&mut self) {
        if self.bounds_policy == BoundsPolicy::InvalidateOnMutation {
            self.invalidate_bounds();
        }
        self.needs_update |= GeometryUpdates::VERTICES;
    }

    /// Recompute and cache the bounding box
    pub fn compute_bounding_box(&mut self) -> Box3 {
        let bounds = Box3::from_points(&self.vertices);
        self.bounding_box = Some(bounds);
        bounds
    }

    /// Recompute and cache the bounding sphere
    pub fn compute_bounding_sphere(&mut self) -> Sphere {
        let sphere = Sphere::from_points(&self.vertices, None);
        self.bounding_sphere = Some(sphere);
        sphere
    }

    fn refresh_cached_bounds(&mut self) {
        if self.bounding_box.is_some() {
            self.compute_bounding_box();
        }
        if self.bounding_sphere.is_some() {
            self.compute_bounding_sphere();
        }
    }

    /// Transform vertices by `m` and normals by its normal matrix.
    ///
    /// Bounds that are already cached are recomputed; absent ones stay absent.
    pub fn apply_matrix(&mut self, m: &Mat4) {
        let normal_matrix = Mat3::normal_matrix(m);

        for vertex in &mut self.vertices {
            *vertex = vertex.apply_mat4(m);
        }

        for face in &mut self.faces {
            face.normal = unit_or_zero(&face.normal.apply_mat3(&normal_matrix));
            if let Some(normals) = face.vertex_normals.as_mut() {
                for normal in normals.iter_mut() {
                    *normal = unit_or_zero(&normal.apply_mat3(&normal_matrix));
                }
            }
        }

        self.refresh_cached_bounds();
        self.needs_update |= GeometryUpdates::VERTICES | GeometryUpdates::NORMALS;
    }

    /// Rotate about the X axis
    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.apply_matrix(&Mat4::make_rotation_x(angle));
        self
    }

    /// Rotate about the Y axis
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.apply_matrix(&Mat4::make_rotation_y(angle));
        self
    }

    /// Rotate about the Z axis
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.apply_matrix(&Mat4::make_rotation_z(angle));
        self
    }

    /// Translate every vertex
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.apply_matrix(&Mat4::make_translation(x, y, z));
        self
    }

    /// Scale every vertex
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.apply_matrix(&Mat4::make_scale(x, y, z));
        self
    }

    /// Rotate so local +Z points towards `target` from the origin, with +Y up
    pub fn look_at(&mut self, target: &Vec3) -> &mut Self {
        self.apply_matrix(&Mat4::look_at(target, &Vec3::zeros(), &Vec3::y()));
        self
    }

    /// Move the bounding box center to the origin. Returns the applied offset.
    pub fn center(&mut self) -> Vec3 {
        let offset = -self.compute_bounding_box().center();
        self.translate(offset.x, offset.y, offset.z);
        offset
    }

    /// Center on the bounding sphere and scale it to unit radius.
    ///
    /// A zero radius leaves the scale unchanged.
    pub fn normalize(&mut self) -> &mut Self {
        let sphere = self.compute_bounding_sphere();
        let center = sphere.center;
        let s = if sphere.radius == 0.0 { 1.0 } else { 1.0 / sphere.radius };

        let m = Mat4::new(
            s, 0.0, 0.0, -s * center.x,
            0.0, s, 0.0, -s * center.y,
            0.0, 0.0, s, -s * center.z,
            0.0, 0.0, 0.0, 1.0,
        );
        self.apply_matrix(&m);
        self
    }

    /// Face normals from counter-clockwise winding: `normalize((c - b) x (a - b))`
    pub fn compute_face_normals(&mut self) {
        let vertices = &self.vertices;
        for face in &mut self.faces {
            let (va, vb, vc) = (vertices[face.a], vertices[face.b], vertices[face.c]);
            face.normal = unit_or_zero(&(vc - vb).cross(&(va - vb)));
        }
        self.needs_update |= GeometryUpdates::NORMALS;
    }

    /// Smooth per-corner normals from the faces around each vertex.
    ///
    /// With `area_weighted` larger triangles contribute more; otherwise the
    /// current face normals are averaged.
    pub fn compute_vertex_normals(&mut self, area_weighted: bool) {
        let mut accumulated = vec![Vec3::zeros(); self.vertices.len()];

        for face in &self.faces {
            let contribution = if area_weighted {
                let (va, vb, vc) = (
                    self.vertices[face.a],
                    self.vertices[face.b],
                    self.vertices[face.c],
                );
                (vc - vb).cross(&(va - vb))
            } else {
                face.normal
            };
            for index in face.indices() {
                accumulated[index] += contribution;
            }
        }

        for normal in &mut accumulated {
            *normal = unit_or_zero(normal);
        }

        for face in &mut self.faces {
            face.vertex_normals = Some([accumulated[face.a], accumulated[face.b], accumulated[face.c]]);
        }
        self.needs_update |= GeometryUpdates::NORMALS;
    }

    /// Append another geometry.
    ///
    /// Vertices are optionally transformed by `matrix` and normals by its
    /// normal matrix. Appended face indices are offset by the vertex count
    /// before the merge and material indices by `material_index_offset`.
    pub fn merge(&mut self, other: &Geometry, matrix: Option<&Mat4>, material_index_offset: usize) {
        let vertex_offset = self.vertices.len();
        let normal_matrix = matrix.map(Mat3::normal_matrix);

        self.vertices.extend(other.vertices.iter().map(|vertex| match matrix {
            Some(m) => vertex.apply_mat4(m),
            None => *vertex,
        }));

        let transform_normal = |normal: &Vec3| match &normal_matrix {
            Some(nm) => unit_or_zero(&normal.apply_mat3(nm)),
            None => *normal,
        };

        for face in &other.faces {
            let mut copy = face.clone();
            copy.a += vertex_offset;
            copy.b += vertex_offset;
            copy.c += vertex_offset;
            copy.normal = transform_normal(&face.normal);
            copy.vertex_normals = face.vertex_normals.map(|normals| normals.map(|n| transform_normal(&n)));
            copy.material_index += material_index_offset;
            self.faces.push(copy);
        }

        self.colors.extend_from_slice(&other.colors);

        for (channel, uvs) in other.face_vertex_uvs.iter().enumerate() {
            if self.face_vertex_uvs.len() <= channel {
                self.face_vertex_uvs.resize_with(channel + 1, Vec::new);
            }
            self.face_vertex_uvs[channel].extend_from_slice(uvs);
        }

        self.vertices_changed();
        self.needs_update |= GeometryUpdates::ELEMENTS | GeometryUpdates::UVS | GeometryUpdates::COLORS;
    }

    /// Append a mesh node's geometry, placed by the node's local matrix
    pub fn merge_node(&mut self, node: &Object3D) {
        let Some(geometry) = node.geometry.as_ref() else {
            log::warn!("Node {} has no geometry to merge", node.id);
            return;
        };

        let matrix = if node.matrix_auto_update {
            Mat4::compose(&node.position, &node.quaternion, &node.scale)
        } else {
            node.matrix
        };
        self.merge(geometry, Some(&matrix), 0);
    }

    /// Collapse vertices equal to four decimal places.
    ///
    /// Faces that become degenerate are removed along with their UVs.
    /// Returns the number of vertices removed.
    pub fn merge_vertices(&mut self) -> usize {
        let precision = 10_f32.powi(MERGE_PRECISION_POINTS);
        let key = |v: &Vec3| {
            (
                (v.x * precision).round() as i64,
                (v.y * precision).round() as i64,
                (v.z * precision).round() as i64,
            )
        };

        let mut first_seen: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let mut unique = Vec::with_capacity(self.vertices.len());
        let mut unique_colors = Vec::new();
        let parallel_colors = self.colors.len() == self.vertices.len();
        let mut remap = Vec::with_capacity(self.vertices.len());

        for (index, vertex) in self.vertices.iter().enumerate() {
            let new_index = *first_seen.entry(key(vertex)).or_insert_with(|| {
                unique.push(*vertex);
                if parallel_colors {
                    unique_colors.push(self.colors[index]);
                }
                unique.len() - 1
            });
            remap.push(new_index);
        }

        for face in &mut self.faces {
            face.a = remap[face.a];
            face.b = remap[face.b];
            face.c = remap[face.c];
        }

        let keep: Vec<bool> = self.faces.iter().map(|face| !face.is_degenerate()).collect();
        if keep.iter().any(|kept| !kept) {
            let mut flags = keep.iter();
            self.faces.retain(|_| *flags.next().unwrap_or(&true));
            for channel in &mut self.face_vertex_uvs {
                let mut index = 0;
                channel.retain(|_| {
                    let kept = keep.get(index).copied().unwrap_or(true);
                    index += 1;
                    kept
                });
            }
            self.needs_update |= GeometryUpdates::ELEMENTS | GeometryUpdates::UVS;
        }

        let removed = self.vertices.len() - unique.len();
        self.vertices = unique;
        if parallel_colors {
            self.colors = unique_colors;
        }
        self.vertices_changed();
        removed
    }

    /// Stable sort of faces by material index, reordering UV channels alongside
    pub fn sort_faces_by_material_index(&mut self) {
        let mut order: Vec<usize> = (0..self.faces.len()).collect();
        order.sort_by_key(|&index| self.faces[index].material_index);

        self.faces = order.iter().map(|&index| self.faces[index].clone()).collect();
        for channel in &mut self.face_vertex_uvs {
            if channel.len() == order.len() {
                *channel = order.iter().map(|&index| channel[index]).collect();
            }
        }
        self.needs_update |= GeometryUpdates::ELEMENTS | GeometryUpdates::UVS;
    }
}
