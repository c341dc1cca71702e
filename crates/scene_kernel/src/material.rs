//! Material parameters
//!
//! Materials are typed parameter storage. The kernel only carries them from a
//! mesh node to whoever renders it; nothing here interprets the values.
//!
//! Parameters can also be assigned by name through [`Material::set_value`],
//! which validates both the name and the value type:
//!
//! ```
//! use scene_kernel::material::{Material, MaterialValue, Side};
//!
//! let mut material = Material::new().with_name("hull");
//! material.set_value("opacity", MaterialValue::Float(0.5)).unwrap();
//! material.set_value("side", MaterialValue::Side(Side::Double)).unwrap();
//! assert!(material.set_value("shininess", MaterialValue::Float(30.0)).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::foundation::ids::{generate_uuid, MATERIAL_IDS};
use crate::math::Color;

/// Which triangle sides are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Counter-clockwise faces
    #[default]
    Front,
    /// Clockwise faces
    Back,
    /// Both
    Double,
}

/// Blend mode applied when the material is transparent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blending {
    /// Overwrite the target
    None,
    /// Source-alpha over
    #[default]
    Normal,
    /// Add source to target
    Additive,
    /// Subtract source from target
    Subtractive,
    /// Multiply source and target
    Multiply,
    /// Renderer-defined factors
    Custom,
}

/// Source of per-vertex color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexColors {
    /// Use the material color only
    #[default]
    None,
    /// Use each face's color
    Face,
    /// Use each corner's color
    Vertex,
}

/// Value accepted by [`Material::set_value`]
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    /// Boolean flag
    Bool(bool),
    /// Scalar
    Float(f32),
    /// RGB color
    Color(Color),
    /// Face culling side
    Side(Side),
    /// Blend mode
    Blending(Blending),
    /// Vertex color source
    VertexColors(VertexColors),
    /// Text
    Text(String),
}

impl MaterialValue {
    fn type_name(&self) -> &'static str {
        match self {
            MaterialValue::Bool(_) => "bool",
            MaterialValue::Float(_) => "float",
            MaterialValue::Color(_) => "color",
            MaterialValue::Side(_) => "side",
            MaterialValue::Blending(_) => "blending",
            MaterialValue::VertexColors(_) => "vertex_colors",
            MaterialValue::Text(_) => "text",
        }
    }
}

/// Named parameter assignment errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MaterialError {
    /// No parameter with this name
    #[error("'{0}' is not a material parameter")]
    UnknownParameter(String),

    /// Parameter exists but takes a different type
    #[error("Parameter '{name}' expects {expected}, got {found}")]
    TypeMismatch {
        /// Parameter name
        name: String,
        /// Type the parameter takes
        expected: &'static str,
        /// Type that was supplied
        found: &'static str,
    },
}

/// Surface parameters attached to a mesh node
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Process-wide integer id
    pub id: u32,
    /// Random UUID
    pub uuid: String,
    /// Optional name
    pub name: String,
    /// Drawn sides
    pub side: Side,
    /// Opacity in [0, 1]
    pub opacity: f32,
    /// Whether blending is enabled
    pub transparent: bool,
    /// Blend mode
    pub blending: Blending,
    /// Depth testing
    pub depth_test: bool,
    /// Depth writes
    pub depth_write: bool,
    /// Color writes
    pub color_write: bool,
    /// Fragments with alpha below this are discarded
    pub alpha_test: f32,
    /// Hidden materials are skipped by the renderer
    pub visible: bool,
    /// Base color
    pub color: Color,
    /// Draw edges only
    pub wireframe: bool,
    /// Edge width in wireframe mode
    pub wireframe_linewidth: f32,
    /// Per-vertex color source
    pub vertex_colors: VertexColors,
    /// Affected by scene fog
    pub fog: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

impl Material {
    /// Recognized parameter names, in declaration order
    pub const PARAMETERS: [&'static str; 15] = [
        "name",
        "side",
        "opacity",
        "transparent",
        "blending",
        "depth_test",
        "depth_write",
        "color_write",
        "alpha_test",
        "visible",
        "color",
        "wireframe",
        "wireframe_linewidth",
        "vertex_colors",
        "fog",
    ];

    /// White, opaque, front-sided material with a fresh id
    pub fn new() -> Self {
        Self {
            id: MATERIAL_IDS.next_id(),
            uuid: generate_uuid(),
            name: String::new(),
            side: Side::Front,
            opacity: 1.0,
            transparent: false,
            blending: Blending::Normal,
            depth_test: true,
            depth_write: true,
            color_write: true,
            alpha_test: 0.0,
            visible: true,
            color: Color::WHITE,
            wireframe: false,
            wireframe_linewidth: 1.0,
            vertex_colors: VertexColors::None,
            fog: true,
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the base color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the opacity, clamped to [0, 1]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Set the drawn sides
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    /// Copy every parameter from `source`, keeping this material's id and uuid
    pub fn copy_from(&mut self, source: &Material) {
        let (id, uuid) = (self.id, std::mem::take(&mut self.uuid));
        *self = source.clone();
        self.id = id;
        self.uuid = uuid;
    }

    /// Copy with a fresh id and uuid
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new();
        copy.copy_from(self);
        copy
    }

    /// Assign one parameter by name
    pub fn set_value(&mut self, name: &str, value: MaterialValue) -> Result<(), MaterialError> {
        let mismatch = |expected: &'static str, value: &MaterialValue| MaterialError::TypeMismatch {
            name: name.to_string(),
            expected,
            found: value.type_name(),
        };

        match (name, value) {
            ("name", MaterialValue::Text(v)) => self.name = v,
            ("side", MaterialValue::Side(v)) => self.side = v,
            ("opacity", MaterialValue::Float(v)) => self.opacity = v,
            ("transparent", MaterialValue::Bool(v)) => self.transparent = v,
            ("blending", MaterialValue::Blending(v)) => self.blending = v,
            ("depth_test", MaterialValue::Bool(v)) => self.depth_test = v,
            ("depth_write", MaterialValue::Bool(v)) => self.depth_write = v,
            ("color_write", MaterialValue::Bool(v)) => self.color_write = v,
            ("alpha_test", MaterialValue::Float(v)) => self.alpha_test = v,
            ("visible", MaterialValue::Bool(v)) => self.visible = v,
            ("color", MaterialValue::Color(v)) => self.color = v,
            ("wireframe", MaterialValue::Bool(v)) => self.wireframe = v,
            ("wireframe_linewidth", MaterialValue::Float(v)) => self.wireframe_linewidth = v,
            ("vertex_colors", MaterialValue::VertexColors(v)) => self.vertex_colors = v,
            ("fog", MaterialValue::Bool(v)) => self.fog = v,

            ("name", value) => return Err(mismatch("text", &value)),
            ("side", value) => return Err(mismatch("side", &value)),
            ("blending", value) => return Err(mismatch("blending", &value)),
            ("color", value) => return Err(mismatch("color", &value)),
            ("vertex_colors", value) => return Err(mismatch("vertex_colors", &value)),
            ("opacity" | "alpha_test" | "wireframe_linewidth", value) => {
                return Err(mismatch("float", &value))
            }
            ("transparent" | "depth_test" | "depth_write" | "color_write" | "visible" | "wireframe" | "fog", value) => {
                return Err(mismatch("bool", &value))
            }

            (unknown, _) => return Err(MaterialError::UnknownParameter(unknown.to_string())),
        }
        Ok(())
    }

    /// Assign a batch of parameters. Rejected entries are logged and skipped.
    ///
    /// Returns the number of parameters applied.
    pub fn set_values<I, S>(&mut self, values: I) -> usize
    where
        I: IntoIterator<Item = (S, MaterialValue)>,
        S: AsRef<str>,
    {
        let mut applied = 0;
        for (name, value) in values {
            match self.set_value(name.as_ref(), value) {
                Ok(()) => applied += 1,
                Err(e) => log::warn!("Material '{}': {}", self.name, e),
            }
        }
        applied
    }
}
