//! Triangle face

use crate::math::{Color, Vec3};

/// Triangle referencing three vertices of its geometry by index
#[derive(Debug, Clone, PartialEq)]
pub struct Face3 {
    /// First vertex index
    pub a: usize,
    /// Second vertex index
    pub b: usize,
    /// Third vertex index
    pub c: usize,
    /// Face normal
    pub normal: Vec3,
    /// Per-corner normals, when present
    pub vertex_normals: Option<[Vec3; 3]>,
    /// Face color
    pub color: Color,
    /// Per-corner colors, when present
    pub vertex_colors: Option<[Color; 3]>,
    /// Index into the mesh's material list
    pub material_index: usize,
}

impl Face3 {
    /// Face with a zero normal, white color and material 0
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            normal: Vec3::zeros(),
            vertex_normals: None,
            color: Color::WHITE,
            vertex_colors: None,
            material_index: 0,
        }
    }

    /// Set the face normal
    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    /// Set the per-corner normals
    pub fn with_vertex_normals(mut self, normals: [Vec3; 3]) -> Self {
        self.vertex_normals = Some(normals);
        self
    }

    /// Set the face color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the per-corner colors
    pub fn with_vertex_colors(mut self, colors: [Color; 3]) -> Self {
        self.vertex_colors = Some(colors);
        self
    }

    /// Set the material index
    pub fn with_material_index(mut self, index: usize) -> Self {
        self.material_index = index;
        self
    }

    /// Vertex indices in winding order
    pub fn indices(&self) -> [usize; 3] {
        [self.a, self.b, self.c]
    }

    /// True when two corners share a vertex
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b || self.b == self.c || self.c == self.a
    }
}
