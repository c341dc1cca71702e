//! Scene graph
//!
//! Nodes live in a [`Scene`] arena and refer to each other through [`NodeId`]
//! handles: a parent handle on the child and an ordered list of child handles
//! on the parent. World matrices are derived top-down from local transforms.
//!
//! ## Architecture
//!
//! ```text
//! position / quaternion / scale
//!      ↓  update_matrix
//! local matrix
//!      ↓  update_matrix_world (pre-order)
//! world matrix = parent.world * local
//! ```

mod camera;
mod events;
mod graph;
mod layers;
mod node;

use slotmap::new_key_type;

pub use camera::{PerspectiveCamera, ViewOffset};
pub use events::{EventDispatcher, EventKind, Listener, NodeEvent};
pub use graph::Scene;
pub use layers::Layers;
pub use node::{NodeKind, Object3D};

new_key_type! {
    /// Handle to a node stored in a [`Scene`]
    pub struct NodeId;
}

/// Scene graph errors
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// Handle does not refer to a live node
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Operation needs a camera node
    #[error("Node is not a camera: {0:?}")]
    NotACamera(NodeId),
}
