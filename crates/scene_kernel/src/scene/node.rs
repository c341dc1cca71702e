//! Scene graph node
//!
//! An [`Object3D`] holds a local transform and the matrices derived from it.
//! The quaternion is the authoritative rotation; Euler angles are computed on
//! request. Hierarchy links are handles into the owning [`super::Scene`].

use std::collections::HashMap;

use super::{EventDispatcher, Layers, NodeId, PerspectiveCamera};
use crate::core::config::KernelConfig;
use crate::foundation::ids::{generate_uuid, OBJECT_IDS};
use crate::foundation::math::Unit;
use crate::material::Material;
use crate::math::{Euler, Mat4, Mat4Ext, Quat, QuatExt, RotationOrder, Vec3, Vec3Ext};
use crate::mesh::Geometry;

/// What a node represents
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Plain transform group
    Object3D,
    /// Renderable geometry
    Mesh,
    /// Perspective camera
    PerspectiveCamera(PerspectiveCamera),
}

impl NodeKind {
    /// Type tag
    pub fn name(&self) -> &'static str {
        match self {
            Self::Object3D => "Object3D",
            Self::Mesh => "Mesh",
            Self::PerspectiveCamera(_) => "PerspectiveCamera",
        }
    }
}

/// A transform node in the scene graph
#[derive(Debug)]
pub struct Object3D {
    /// Process-wide integer id
    pub id: u32,
    /// Random UUID
    pub uuid: String,
    /// Optional name, not required to be unique
    pub name: String,
    /// Node type and type-specific state
    pub kind: NodeKind,

    /// Up direction used by `look_at`
    pub up: Vec3,
    /// Local translation
    pub position: Vec3,
    /// Local rotation
    pub quaternion: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Order used when reading the rotation as Euler angles
    pub rotation_order: RotationOrder,

    /// Local matrix
    pub matrix: Mat4,
    /// World matrix, valid while `matrix_world_needs_update` is false
    pub matrix_world: Mat4,
    /// Recompose `matrix` from position/quaternion/scale on every world update
    pub matrix_auto_update: bool,
    /// World matrix is stale
    pub matrix_world_needs_update: bool,

    /// Hidden nodes and their subtrees are skipped by culling
    pub visible: bool,
    /// When false the node is never frustum culled
    pub frustum_culled: bool,
    /// Renderer hint
    pub cast_shadow: bool,
    /// Renderer hint
    pub receive_shadow: bool,
    /// Renderer sort override
    pub render_order: i32,
    /// Layer membership
    pub layers: Layers,
    /// Free-form application data
    pub user_data: HashMap<String, String>,

    /// Mesh geometry
    pub geometry: Option<Geometry>,
    /// Mesh material
    pub material: Option<Material>,

    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    events: EventDispatcher,
}

impl Object3D {
    /// Create a detached node with default kernel settings
    pub fn new(kind: NodeKind) -> Self {
        Self::with_config(kind, &KernelConfig::default())
    }

    /// Create a detached node using the given defaults
    pub fn with_config(kind: NodeKind, config: &KernelConfig) -> Self {
        Self {
            id: OBJECT_IDS.next_id(),
            uuid: generate_uuid(),
            name: String::new(),
            kind,
            up: config.default_up,
            position: Vec3::zeros(),
            quaternion: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            rotation_order: config.default_rotation_order,
            matrix: Mat4::identity(),
            matrix_world: Mat4::identity(),
            matrix_auto_update: config.default_matrix_auto_update,
            matrix_world_needs_update: false,
            visible: true,
            frustum_culled: true,
            cast_shadow: false,
            receive_shadow: false,
            render_order: 0,
            layers: Layers::default(),
            user_data: HashMap::new(),
            geometry: None,
            material: None,
            parent: None,
            children: Vec::new(),
            events: EventDispatcher::new(),
        }
    }

    /// Create a mesh node owning `geometry`
    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        let mut node = Self::new(NodeKind::Mesh);
        node.geometry = Some(geometry);
        node.material = Some(material);
        node
    }

    /// Create a camera node
    pub fn camera(camera: PerspectiveCamera) -> Self {
        Self::new(NodeKind::PerspectiveCamera(camera))
    }

    /// Parent handle
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child handles, in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Lifecycle listeners
    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Whether this node is a mesh
    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh)
    }

    /// Camera state, if this node is a camera
    pub fn as_camera(&self) -> Option<&PerspectiveCamera> {
        match &self.kind {
            NodeKind::PerspectiveCamera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera state, if this node is a camera
    pub fn as_camera_mut(&mut self) -> Option<&mut PerspectiveCamera> {
        match &mut self.kind {
            NodeKind::PerspectiveCamera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Local direction the node faces: +Z for objects, -Z for cameras
    pub fn forward(&self) -> Vec3 {
        match self.kind {
            NodeKind::PerspectiveCamera(_) => Vec3::new(0.0, 0.0, -1.0),
            _ => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Recompose the local matrix and mark the world matrix stale
    pub fn update_matrix(&mut self) {
        self.matrix = Mat4::compose(&self.position, &self.quaternion, &self.scale);
        self.matrix_world_needs_update = true;
    }

    /// Store a freshly computed world matrix
    pub(crate) fn set_world_matrix(&mut self, world: Mat4) {
        self.matrix_world = world;
        self.matrix_world_needs_update = false;
        if let NodeKind::PerspectiveCamera(camera) = &mut self.kind {
            camera.matrix_world_inverse = world.inverse_or_identity();
        }
    }

    /// Pre-multiply the local transform by `m` and decompose the result back
    /// into position, quaternion and scale
    pub fn apply_matrix(&mut self, m: &Mat4) {
        if self.matrix_auto_update {
            self.update_matrix();
        }
        self.matrix = m * self.matrix;
        let (position, quaternion, scale) = self.matrix.decompose();
        self.position = position;
        self.quaternion = quaternion;
        self.scale = scale;
    }

    /// Rotation as Euler angles in the node's rotation order
    pub fn rotation(&self) -> Euler {
        Euler::from_quaternion(&self.quaternion, self.rotation_order)
    }

    /// Set the rotation from Euler angles. The node adopts their order.
    pub fn set_rotation_from_euler(&mut self, euler: &Euler) {
        self.rotation_order = euler.order;
        self.quaternion = Quat::from_euler(euler);
    }

    /// Set the rotation to `angle` radians about `axis` (normalized here)
    pub fn set_rotation_from_axis_angle(&mut self, axis: &Vec3, angle: f32) {
        self.quaternion = Quat::from_axis_angle(&Unit::new_normalize(*axis), angle);
    }

    /// Set the rotation from the upper 3x3 of an unscaled rotation matrix
    pub fn set_rotation_from_matrix(&mut self, m: &Mat4) {
        self.quaternion = Quat::from_rotation_mat4(m);
    }

    /// Rotate about an axis in local space
    pub fn rotate_on_axis(&mut self, axis: &Vec3, angle: f32) {
        let q = Quat::from_axis_angle(&Unit::new_normalize(*axis), angle);
        self.quaternion *= q;
    }

    /// Rotate about local X
    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate_on_axis(&Vec3::x(), angle);
    }

    /// Rotate about local Y
    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate_on_axis(&Vec3::y(), angle);
    }

    /// Rotate about local Z
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate_on_axis(&Vec3::z(), angle);
    }

    /// Move along an axis expressed in local space
    pub fn translate_on_axis(&mut self, axis: &Vec3, distance: f32) {
        self.position += axis.apply_quat(&self.quaternion) * distance;
    }

    /// Move along local X
    pub fn translate_x(&mut self, distance: f32) {
        self.translate_on_axis(&Vec3::x(), distance);
    }

    /// Move along local Y
    pub fn translate_y(&mut self, distance: f32) {
        self.translate_on_axis(&Vec3::y(), distance);
    }

    /// Move along local Z
    pub fn translate_z(&mut self, distance: f32) {
        self.translate_on_axis(&Vec3::z(), distance);
    }

    /// Orient the node towards `target`.
    ///
    /// Only correct for nodes without a transformed ancestor: the parent's
    /// world transform is not taken into account.
    pub fn look_at(&mut self, target: &Vec3) {
        let basis = if self.as_camera().is_some() {
            Mat4::look_at(&self.position, target, &self.up)
        } else {
            Mat4::look_at(target, &self.position, &self.up)
        };
        self.quaternion = Quat::from_rotation_mat4(&basis);
    }

    /// Transform a point from this node's space to world space using the
    /// current world matrix
    pub fn local_to_world(&self, point: &Vec3) -> Vec3 {
        point.apply_mat4(&self.matrix_world)
    }

    /// Transform a world space point into this node's space
    pub fn world_to_local(&self, point: &Vec3) -> Vec3 {
        point.apply_mat4(&self.matrix_world.inverse_or_identity())
    }

    /// Copy transform, flags and metadata from `source`. Identity, hierarchy,
    /// kind and attachments are left alone.
    pub fn copy_transform(&mut self, source: &Self) {
        self.name.clone_from(&source.name);
        self.up = source.up;
        self.position = source.position;
        self.quaternion = source.quaternion;
        self.scale = source.scale;
        self.rotation_order = source.rotation_order;
        self.matrix = source.matrix;
        self.matrix_world = source.matrix_world;
        self.matrix_auto_update = source.matrix_auto_update;
        self.matrix_world_needs_update = source.matrix_world_needs_update;
        self.visible = source.visible;
        self.frustum_culled = source.frustum_culled;
        self.cast_shadow = source.cast_shadow;
        self.receive_shadow = source.receive_shadow;
        self.render_order = source.render_order;
        self.layers = source.layers;
        self.user_data.clone_from(&source.user_data);
    }

    /// Detached copy with a fresh id and UUID and no listeners
    pub fn duplicate(&self) -> Self {
        let mut copy = Self::new(self.kind.clone());
        copy.copy_transform(self);
        copy.geometry.clone_from(&self.geometry);
        copy.material.clone_from(&self.material);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::constants::HALF_PI;
    use approx::assert_relative_eq;

    #[test]
    fn test_ids_are_unique() {
        let a = Object3D::new(NodeKind::Object3D);
        let b = Object3D::new(NodeKind::Object3D);
        assert_ne!(a.id, b.id);
        assert_ne!(a.uuid, b.uuid);
        assert_eq!(a.kind.name(), "Object3D");
    }

    #[test]
    fn test_config_defaults_applied() {
        let config = KernelConfig::new()
            .with_up(Vec3::z())
            .with_matrix_auto_update(false)
            .with_rotation_order(RotationOrder::Zyx);
        let node = Object3D::with_config(NodeKind::Mesh, &config);
        assert_eq!(node.up, Vec3::z());
        assert!(!node.matrix_auto_update);
        assert_eq!(node.rotation_order, RotationOrder::Zyx);
    }

    #[test]
    fn test_update_matrix_composes_trs() {
        let mut node = Object3D::new(NodeKind::Object3D);
        node.position = Vec3::new(1.0, 2.0, 3.0);
        node.rotate_z(HALF_PI);
        node.scale = Vec3::new(2.0, 2.0, 2.0);
        node.update_matrix();

        assert!(node.matrix_world_needs_update);
        let p = Vec3::x().apply_mat4(&node.matrix);
        assert_relative_eq!(p, Vec3::new(1.0, 4.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_translate_follows_rotation() {
        let mut node = Object3D::new(NodeKind::Object3D);
        node.rotate_y(HALF_PI);
        node.translate_z(2.0);
        assert_relative_eq!(node.position, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);

        node.translate_on_axis(&Vec3::x(), 1.0);
        assert_relative_eq!(node.position, Vec3::new(2.0, 0.0, -1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotation_views() {
        let mut node = Object3D::new(NodeKind::Object3D);
        let euler = Euler::new(0.3, -0.2, 0.5, RotationOrder::Yxz);
        node.set_rotation_from_euler(&euler);
        assert_eq!(node.rotation_order, RotationOrder::Yxz);

        let back = node.rotation();
        assert_relative_eq!(back.x, 0.3, epsilon = 1e-5);
        assert_relative_eq!(back.y, -0.2, epsilon = 1e-5);
        assert_relative_eq!(back.z, 0.5, epsilon = 1e-5);

        node.set_rotation_from_axis_angle(&Vec3::new(0.0, 0.0, 5.0), HALF_PI);
        assert_relative_eq!(Vec3::x().apply_quat(&node.quaternion), Vec3::y(), epsilon = 1e-5);

        node.set_rotation_from_matrix(&Mat4::make_rotation_x(HALF_PI));
        assert_relative_eq!(Vec3::y().apply_quat(&node.quaternion), Vec3::z(), epsilon = 1e-5);
    }

    #[test]
    fn test_apply_matrix_decomposes() {
        let mut node = Object3D::new(NodeKind::Object3D);
        node.position = Vec3::new(1.0, 0.0, 0.0);
        node.apply_matrix(&Mat4::make_translation(0.0, 5.0, 0.0));
        assert_relative_eq!(node.position, Vec3::new(1.0, 5.0, 0.0));

        node.apply_matrix(&Mat4::make_scale(3.0, 3.0, 3.0));
        assert_relative_eq!(node.position, Vec3::new(3.0, 15.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(node.scale, Vec3::new(3.0, 3.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_object_faces_target_with_positive_z() {
        let mut node = Object3D::new(NodeKind::Object3D);
        node.look_at(&Vec3::new(10.0, 0.0, 0.0));
        let facing = node.forward().apply_quat(&node.quaternion);
        assert_relative_eq!(facing, Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_camera_faces_target_with_negative_z() {
        let mut node = Object3D::camera(PerspectiveCamera::default());
        node.position = Vec3::new(0.0, 0.0, 10.0);
        node.look_at(&Vec3::zeros());
        let facing = node.forward().apply_quat(&node.quaternion);
        assert_relative_eq!(facing, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-5);

        node.look_at(&Vec3::new(10.0, 0.0, 10.0));
        let facing = node.forward().apply_quat(&node.quaternion);
        assert_relative_eq!(facing, Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_camera_world_inverse_tracks_world() {
        let mut node = Object3D::camera(PerspectiveCamera::default());
        let world = Mat4::make_translation(1.0, 2.0, 3.0);
        node.set_world_matrix(world);
        let camera = node.as_camera().unwrap();
        assert_relative_eq!(camera.matrix_world_inverse * world, Mat4::identity(), epsilon = 1e-6);
    }

    #[test]
    fn test_duplicate_gets_new_identity() {
        let mut node = Object3D::new(NodeKind::Mesh);
        node.name = "hull".to_string();
        node.position = Vec3::new(4.0, 5.0, 6.0);
        node.render_order = 3;
        node.user_data.insert("team".to_string(), "red".to_string());

        let copy = node.duplicate();
        assert_ne!(copy.id, node.id);
        assert_ne!(copy.uuid, node.uuid);
        assert_eq!(copy.name, "hull");
        assert_eq!(copy.position, node.position);
        assert_eq!(copy.render_order, 3);
        assert_eq!(copy.user_data.get("team").map(String::as_str), Some("red"));
        assert!(copy.parent().is_none());
        assert!(copy.children().is_empty());
    }
}
