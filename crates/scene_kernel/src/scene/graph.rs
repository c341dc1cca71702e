//! Node arena and tree operations

use slotmap::SlotMap;

use super::{EventKind, NodeEvent, NodeId, NodeKind, Object3D, PerspectiveCamera, SceneError};
use crate::core::config::KernelConfig;
use crate::material::Material;
use crate::math::{Euler, Mat4, Mat4Ext, Quat, Vec3, Vec3Ext};
use crate::mesh::Geometry;

/// Owns every node and the ordered list of parentless nodes
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Object3D>,
    roots: Vec<NodeId>,
    config: KernelConfig,
}

impl Scene {
    /// Create an empty scene with default settings
    pub fn new() -> Self {
        Self::with_config(KernelConfig::default())
    }

    /// Create an empty scene whose nodes use `config` defaults
    pub fn with_config(config: KernelConfig) -> Self {
        Self { nodes: SlotMap::with_key(), roots: Vec::new(), config }
    }

    /// Active configuration
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Parentless nodes in creation/detach order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Iterate over every node in arena order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Object3D)> {
        self.nodes.iter()
    }

    /// Insert a node as a new root. Any hierarchy links it carries are cleared.
    pub fn insert(&mut self, mut node: Object3D) -> NodeId {
        node.parent = None;
        node.children.clear();
        let id = self.nodes.insert(node);
        self.roots.push(id);
        log::trace!("Inserted node {:?}", id);
        id
    }

    /// Create a detached node of the given kind
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let node = Object3D::with_config(kind, &self.config);
        self.insert(node)
    }

    /// Create a detached group node
    pub fn create_object(&mut self) -> NodeId {
        self.create_node(NodeKind::Object3D)
    }

    /// Create a detached mesh node owning `geometry`
    pub fn create_mesh(&mut self, mut geometry: Geometry, material: Material) -> NodeId {
        geometry.bounds_policy = self.config.bounds_policy;
        let mut node = Object3D::with_config(NodeKind::Mesh, &self.config);
        node.geometry = Some(geometry);
        node.material = Some(material);
        self.insert(node)
    }

    /// Create a detached camera node
    pub fn create_camera(&mut self, camera: PerspectiveCamera) -> NodeId {
        self.create_node(NodeKind::PerspectiveCamera(camera))
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Result<&Object3D, SceneError> {
        self.nodes.get(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Mutably borrow a node
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Object3D, SceneError> {
        self.nodes.get_mut(id).ok_or(SceneError::NodeNotFound(id))
    }

    /// Borrow a node if it exists
    pub fn get(&self, id: NodeId) -> Option<&Object3D> {
        self.nodes.get(id)
    }

    /// Mutably borrow a node if it exists
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Object3D> {
        self.nodes.get_mut(id)
    }

    /// True when `ancestor` is `id` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(node_id).and_then(|node| node.parent);
        }
        false
    }

    fn dispatch(&self, id: NodeId, kind: EventKind) {
        if let Some(node) = self.nodes.get(id) {
            node.events().dispatch(&NodeEvent::new(kind, id));
        }
    }

    /// Unlink `child` from its parent and make it a root. Returns whether it had a parent.
    fn detach(&mut self, child: NodeId) -> bool {
        let Some(parent) = self.nodes.get(child).and_then(|node| node.parent) else {
            return false;
        };

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&c| c != child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = None;
        }
        self.roots.push(child);
        self.dispatch(child, EventKind::Removed);
        true
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    ///
    /// Adding a node to itself or to one of its descendants is rejected with a
    /// warning and leaves the tree unchanged.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        self.node(child)?;

        if parent == child {
            log::warn!("Node {:?} can't be added as a child of itself", child);
            return Ok(());
        }
        if self.is_ancestor(child, parent) {
            log::warn!(
                "Node {:?} can't be added under its own descendant {:?}",
                child,
                parent
            );
            return Ok(());
        }

        self.detach(child);
        self.roots.retain(|&root| root != child);

        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        log::debug!("Attached node {:?} to {:?}", child, parent);

        self.dispatch(child, EventKind::Added);
        Ok(())
    }

    /// Detach `child` from `parent`. Does nothing if it is not a child of `parent`.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.node(parent)?.children.contains(&child) {
            return Ok(());
        }
        self.detach(child);
        log::debug!("Detached node {:?} from {:?}", child, parent);
        Ok(())
    }

    /// Detach a node and drop it with its whole subtree.
    ///
    /// Every dropped node receives a `Dispose` event first.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.node(id)?;
        self.detach(id);
        self.roots.retain(|&root| root != id);

        let subtree = self.descendants(id);
        for &node_id in &subtree {
            self.dispatch(node_id, EventKind::Dispose);
        }
        for node_id in &subtree {
            self.nodes.remove(*node_id);
        }
        log::debug!("Destroyed node {:?} and {} descendants", id, subtree.len() - 1);
        Ok(())
    }

    /// `id` and all of its descendants in pre-order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            if let Some(node) = self.nodes.get(node_id) {
                out.push(node_id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Recompose a node's local matrix and mark it stale
    pub fn update_matrix(&mut self, id: NodeId) -> Result<(), SceneError> {
        self.node_mut(id)?.update_matrix();
        Ok(())
    }

    /// Refresh world matrices of `id` and its subtree.
    ///
    /// A node whose world matrix changes forces an update of every descendant.
    /// The parent's stored world matrix is used as-is.
    pub fn update_matrix_world(&mut self, id: NodeId, force: bool) -> Result<(), SceneError> {
        let parent_world = match self.node(id)?.parent {
            Some(parent) => Some(self.node(parent)?.matrix_world),
            None => None,
        };

        let mut stack: Vec<(NodeId, Option<Mat4>, bool)> = vec![(id, parent_world, force)];
        while let Some((node_id, parent_world, force)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(node_id) else {
                continue;
            };

            if node.matrix_auto_update {
                node.update_matrix();
            }

            let mut force = force;
            if node.matrix_world_needs_update || force {
                let world = match parent_world {
                    Some(parent_world) => parent_world * node.matrix,
                    None => node.matrix,
                };
                node.set_world_matrix(world);
                log::trace!("Updated world matrix of node {:?}", node_id);
                force = true;
            }

            let world = node.matrix_world;
            stack.extend(node.children.iter().rev().map(|&child| (child, Some(world), force)));
        }
        Ok(())
    }

    /// Refresh world matrices of every tree in the scene
    pub fn update_all(&mut self, force: bool) {
        let roots = self.roots.clone();
        for root in roots {
            if let Err(e) = self.update_matrix_world(root, force) {
                log::warn!("Skipping stale root during world update: {}", e);
            }
        }
    }

    /// World space position, after forcing a world update of the node
    pub fn world_position(&mut self, id: NodeId) -> Result<Vec3, SceneError> {
        self.update_matrix_world(id, true)?;
        Ok(Vec3::from_matrix_position(&self.node(id)?.matrix_world))
    }

    /// World space rotation, after forcing a world update of the node
    pub fn world_quaternion(&mut self, id: NodeId) -> Result<Quat, SceneError> {
        self.update_matrix_world(id, true)?;
        let (_, quaternion, _) = self.node(id)?.matrix_world.decompose();
        Ok(quaternion)
    }

    /// World space rotation as Euler angles in the node's rotation order
    pub fn world_rotation(&mut self, id: NodeId) -> Result<Euler, SceneError> {
        let quaternion = self.world_quaternion(id)?;
        Ok(Euler::from_quaternion(&quaternion, self.node(id)?.rotation_order))
    }

    /// World space scale, after forcing a world update of the node
    pub fn world_scale(&mut self, id: NodeId) -> Result<Vec3, SceneError> {
        self.update_matrix_world(id, true)?;
        let (_, _, scale) = self.node(id)?.matrix_world.decompose();
        Ok(scale)
    }

    /// Direction the node faces in world space
    pub fn world_direction(&mut self, id: NodeId) -> Result<Vec3, SceneError> {
        let quaternion = self.world_quaternion(id)?;
        Ok(self.node(id)?.forward().apply_quat(&quaternion))
    }

    /// Orient a node towards a point. See [`Object3D::look_at`] for limits.
    pub fn look_at(&mut self, id: NodeId, target: &Vec3) -> Result<(), SceneError> {
        self.node_mut(id)?.look_at(target);
        Ok(())
    }

    /// Node space point to world space, using the stored world matrix
    pub fn local_to_world(&self, id: NodeId, point: &Vec3) -> Result<Vec3, SceneError> {
        Ok(self.node(id)?.local_to_world(point))
    }

    /// World space point to node space, using the stored world matrix
    pub fn world_to_local(&self, id: NodeId, point: &Vec3) -> Result<Vec3, SceneError> {
        Ok(self.node(id)?.world_to_local(point))
    }

    /// Visit `root` and its descendants in pre-order
    pub fn traverse<F>(&self, root: NodeId, mut visit: F) -> Result<(), SceneError>
    where
        F: FnMut(NodeId, &Object3D),
    {
        self.node(root)?;
        for id in self.descendants(root) {
            visit(id, &self.nodes[id]);
        }
        Ok(())
    }

    /// Visit visible nodes in pre-order. Hidden nodes hide their subtree.
    pub fn traverse_visible<F>(&self, root: NodeId, mut visit: F) -> Result<(), SceneError>
    where
        F: FnMut(NodeId, &Object3D),
    {
        self.node(root)?;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            visit(id, node);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(())
    }

    /// Visit every ancestor of `id`, nearest first
    pub fn traverse_ancestors<F>(&self, id: NodeId, mut visit: F) -> Result<(), SceneError>
    where
        F: FnMut(NodeId, &Object3D),
    {
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            let node = self.node(parent)?;
            visit(parent, node);
            current = node.parent;
        }
        Ok(())
    }

    /// Find a node by integer id within the subtree of `root`
    pub fn node_by_id(&self, root: NodeId, object_id: u32) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.nodes[id].id == object_id)
    }

    /// Find the first node with `name` within the subtree of `root`
    pub fn node_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|&id| self.nodes[id].name == name)
    }

    /// Duplicate a node, and its descendants when `recursive`, as a new root tree
    pub fn clone_subtree(&mut self, id: NodeId, recursive: bool) -> Result<NodeId, SceneError> {
        let copy = self.node(id)?.duplicate();
        let new_root = self.insert(copy);

        if recursive {
            let children = self.node(id)?.children.clone();
            for child in children {
                let new_child = self.clone_subtree(child, true)?;
                self.add(new_root, new_child)?;
            }
        }
        Ok(new_root)
    }
}
