//! Flattened vertex streams for upload

use bytemuck::{Pod, Zeroable};

use super::Geometry;
use crate::math::{Color, Vec2, Vec3};

/// Interleaved vertex layout
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position
    pub position: [f32; 3],
    /// Normal
    pub normal: [f32; 3],
    /// Texture coordinate from UV channel 0
    pub tex_coord: [f32; 2],
    /// Linear RGB color
    pub color: [f32; 3],
}

/// Non-indexed attribute streams, three corners per face
///
/// Corner normals come from the face's vertex normals when present, otherwise
/// the face normal. Colors follow the same rule. Missing UVs are zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryBuffers {
    /// xyz per corner
    pub positions: Vec<f32>,
    /// xyz per corner
    pub normals: Vec<f32>,
    /// uv per corner
    pub uvs: Vec<f32>,
    /// rgb per corner
    pub colors: Vec<f32>,
    /// Sequential triangle indices into the streams
    pub indices: Vec<[u32; 3]>,
}

impl GeometryBuffers {
    /// Unroll `geometry` into per-corner streams
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let corners = geometry.faces.len() * 3;
        let mut buffers = Self {
            positions: Vec::with_capacity(corners * 3),
            normals: Vec::with_capacity(corners * 3),
            uvs: Vec::with_capacity(corners * 2),
            colors: Vec::with_capacity(corners * 3),
            indices: Vec::with_capacity(geometry.faces.len()),
        };
        let uv_channel = geometry.face_vertex_uvs.first();

        for (face_index, face) in geometry.faces.iter().enumerate() {
            let normals = face.vertex_normals.unwrap_or([face.normal; 3]);
            let colors = face.vertex_colors.unwrap_or([face.color; 3]);
            let uvs = uv_channel
                .and_then(|channel| channel.get(face_index))
                .copied()
                .unwrap_or([Vec2::zeros(); 3]);

            for (corner, &vertex_index) in face.indices().iter().enumerate() {
                let position = geometry.vertices.get(vertex_index).copied().unwrap_or_else(|| {
                    log::warn!("Face {} references missing vertex {}", face_index, vertex_index);
                    Vec3::zeros()
                });
                buffers.positions.extend_from_slice(position.as_slice());
                buffers.normals.extend_from_slice(normals[corner].as_slice());
                buffers.uvs.extend_from_slice(uvs[corner].as_slice());
                buffers.colors.extend_from_slice(&colors[corner].to_array());
            }

            let base = (face_index * 3) as u32;
            buffers.indices.push([base, base + 1, base + 2]);
        }

        buffers
    }

    /// Number of corners in the streams
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Zip the streams into the interleaved layout
    pub fn interleaved(&self) -> Vec<Vertex> {
        (0..self.vertex_count())
            .map(|i| Vertex {
                position: [self.positions[i * 3], self.positions[i * 3 + 1], self.positions[i * 3 + 2]],
                normal: [self.normals[i * 3], self.normals[i * 3 + 1], self.normals[i * 3 + 2]],
                tex_coord: [self.uvs[i * 2], self.uvs[i * 2 + 1]],
                color: [self.colors[i * 3], self.colors[i * 3 + 1], self.colors[i * 3 + 2]],
            })
            .collect()
    }

    /// Index stream as raw bytes
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

impl From<&Geometry> for GeometryBuffers {
    fn from(geometry: &Geometry) -> Self {
        Self::from_geometry(geometry)
    }
}

impl Vertex {
    /// Vertex from kernel types
    pub fn new(position: Vec3, normal: Vec3, tex_coord: Vec2, color: Color) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            tex_coord: tex_coord.into(),
            color: color.to_array(),
        }
    }
}
