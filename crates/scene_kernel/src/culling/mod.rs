//! Frustum culling
//!
//! Collects the mesh nodes a camera can see. The caller refreshes world
//! matrices first; the culler only reads them.

use crate::bounds::{Frustum, Sphere};
use crate::math::Mat4;
use crate::scene::{Layers, NodeId, Object3D, Scene, SceneError};

/// Reusable visibility pass
///
/// The frustum, the sphere under test, the traversal stack and the result
/// list are kept between frames so a pass does not allocate once the stack
/// and the list have grown.
#[derive(Debug, Clone, Default)]
pub struct FrustumCuller {
    frustum: Frustum,
    projection_view: Mat4,
    sphere: Sphere,
    camera_layers: Layers,
    stack: Vec<NodeId>,
    visible: Vec<NodeId>,
}

impl FrustumCuller {
    /// Create an empty culler
    pub fn new() -> Self {
        Self::default()
    }

    /// Frustum of the last camera passed to [`FrustumCuller::set_from_camera`]
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    /// Combined `projection * view` matrix of that camera
    pub fn projection_view(&self) -> &Mat4 {
        &self.projection_view
    }

    /// Nodes collected by the last pass, in pre-order
    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    /// Derive the frustum from a camera node
    pub fn set_from_camera(&mut self, scene: &Scene, camera: NodeId) -> Result<&Frustum, SceneError> {
        let node = scene.node(camera)?;
        let lens = node.as_camera().ok_or(SceneError::NotACamera(camera))?;

        self.projection_view = lens.projection_matrix * lens.matrix_world_inverse;
        self.frustum = Frustum::from_matrix(&self.projection_view);
        self.camera_layers = node.layers;
        Ok(&self.frustum)
    }

    /// Whether a node passes the current camera's layer mask and frustum
    pub fn accepts(&mut self, node: &Object3D) -> bool {
        if !self.camera_layers.test(&node.layers) {
            return false;
        }
        if !node.frustum_culled {
            return true;
        }
        match node.geometry.as_ref() {
            Some(geometry) => {
                self.sphere = geometry.resolved_bounding_sphere();
                self.sphere.apply_mat4(&node.matrix_world);
                self.frustum.intersects_sphere(&self.sphere)
            }
            None => true,
        }
    }

    /// Collect the visible mesh nodes under `root` as seen from `camera`
    pub fn cull(&mut self, scene: &Scene, camera: NodeId, root: NodeId) -> Result<&[NodeId], SceneError> {
        self.set_from_camera(scene, camera)?;
        self.visible.clear();
        self.collect(scene, root)?;
        log::trace!("Culled to {} visible nodes", self.visible.len());
        Ok(&self.visible)
    }

    /// Collect the visible mesh nodes of every tree in the scene
    pub fn cull_scene(&mut self, scene: &Scene, camera: NodeId) -> Result<&[NodeId], SceneError> {
        self.set_from_camera(scene, camera)?;
        self.visible.clear();
        for &root in scene.roots() {
            self.collect(scene, root)?;
        }
        log::trace!("Culled scene to {} visible nodes", self.visible.len());
        Ok(&self.visible)
    }

    fn collect(&mut self, scene: &Scene, root: NodeId) -> Result<(), SceneError> {
        scene.node(root)?;
        self.stack.clear();
        self.stack.push(root);

        // Pre-order; hidden nodes hide their subtree
        while let Some(id) = self.stack.pop() {
            let Some(node) = scene.get(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            if node.is_mesh() && self.accepts(node) {
                self.visible.push(id);
            }
            self.stack.extend(node.children().iter().rev().copied());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::math::Vec3;
    use crate::mesh::BoxGeometry;
    use crate::scene::PerspectiveCamera;

    fn cube(scene: &mut Scene, position: Vec3) -> NodeId {
        let id = scene.create_mesh(BoxGeometry::new(1.0, 1.0, 1.0).build(), Material::new());
        scene.get_mut(id).unwrap().position = position;
        id
    }

    fn setup() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::new();
        let root = scene.create_object();
        let camera = scene.create_camera(PerspectiveCamera::new(60.0, 1.0, 0.1, 100.0));
        scene.add(root, camera).unwrap();
        (scene, root, camera)
    }

    #[test]
    fn test_in_front_and_behind() {
        let (mut scene, root, camera) = setup();
        let ahead = cube(&mut scene, Vec3::new(0.0, 0.0, -10.0));
        let behind = cube(&mut scene, Vec3::new(0.0, 0.0, 10.0));
        let far_away = cube(&mut scene, Vec3::new(0.0, 0.0, -500.0));
        for id in [ahead, behind, far_away] {
            scene.add(root, id).unwrap();
        }
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        let visible = culler.cull(&scene, camera, root).unwrap();
        assert_eq!(visible, &[ahead]);
    }

    #[test]
    fn test_moving_camera_changes_result() {
        let (mut scene, root, camera) = setup();
        let behind = cube(&mut scene, Vec3::new(0.0, 0.0, 10.0));
        scene.add(root, behind).unwrap();

        scene.get_mut(camera).unwrap().rotate_y(std::f32::consts::PI);
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        assert_eq!(culler.cull(&scene, camera, root).unwrap(), &[behind]);
    }

    #[test]
    fn test_frustum_culled_false_is_always_accepted() {
        let (mut scene, root, camera) = setup();
        let behind = cube(&mut scene, Vec3::new(0.0, 0.0, 10.0));
        scene.get_mut(behind).unwrap().frustum_culled = false;
        scene.add(root, behind).unwrap();
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        assert_eq!(culler.cull(&scene, camera, root).unwrap(), &[behind]);
    }

    #[test]
    fn test_hidden_subtree_and_layers() {
        let (mut scene, root, camera) = setup();
        let group = scene.create_object();
        let hidden_child = cube(&mut scene, Vec3::new(0.0, 0.0, -5.0));
        let other_layer = cube(&mut scene, Vec3::new(1.0, 0.0, -5.0));
        let shown = cube(&mut scene, Vec3::new(-1.0, 0.0, -5.0));
        scene.add(root, group).unwrap();
        scene.add(group, hidden_child).unwrap();
        scene.add(root, other_layer).unwrap();
        scene.add(root, shown).unwrap();
        scene.get_mut(group).unwrap().visible = false;
        scene.get_mut(other_layer).unwrap().layers.set_channel(3);
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        assert_eq!(culler.cull(&scene, camera, root).unwrap(), &[shown]);

        scene.get_mut(camera).unwrap().layers.enable_channel(3);
        assert_eq!(culler.cull(&scene, camera, root).unwrap(), &[other_layer, shown]);
    }

    #[test]
    fn test_cull_scene_walks_every_root() {
        let (mut scene, _root, camera) = setup();
        let loose = cube(&mut scene, Vec3::new(0.0, 0.0, -3.0));
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        assert_eq!(culler.cull_scene(&scene, camera).unwrap(), &[loose]);
        assert_eq!(culler.visible(), &[loose]);
    }

    #[test]
    fn test_requires_camera() {
        let (mut scene, root, _camera) = setup();
        let mesh = cube(&mut scene, Vec3::zeros());
        let mut culler = FrustumCuller::new();

        assert_eq!(
            culler.cull(&scene, mesh, root).unwrap_err(),
            SceneError::NotACamera(mesh)
        );
    }

    #[test]
    fn test_repeated_passes_reuse_scratch() {
        let (mut scene, root, camera) = setup();
        for i in 0..8 {
            let id = cube(&mut scene, Vec3::new(i as f32 - 4.0, 0.0, -20.0));
            scene.add(root, id).unwrap();
        }
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        let first = culler.cull(&scene, camera, root).unwrap().to_vec();
        let (stack_capacity, visible_capacity) = (culler.stack.capacity(), culler.visible.capacity());

        let second = culler.cull(&scene, camera, root).unwrap().to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 8);
        assert_eq!(culler.stack.capacity(), stack_capacity);
        assert_eq!(culler.visible.capacity(), visible_capacity);
    }

    #[test]
    fn test_empty_mesh_is_placed_at_its_origin() {
        let (mut scene, root, camera) = setup();
        let ahead = scene.create_mesh(crate::mesh::Geometry::new(), Material::new());
        let behind = scene.create_mesh(crate::mesh::Geometry::new(), Material::new());
        scene.get_mut(ahead).unwrap().position = Vec3::new(0.0, 0.0, -5.0);
        scene.get_mut(behind).unwrap().position = Vec3::new(0.0, 0.0, 5.0);
        scene.add(root, ahead).unwrap();
        scene.add(root, behind).unwrap();
        scene.update_all(false);

        let mut culler = FrustumCuller::new();
        assert_eq!(culler.cull(&scene, camera, root).unwrap(), &[ahead]);
    }
}
