//! # Scene Kernel
//!
//! Transform hierarchy and geometric math for real-time 3D scenes.
//!
//! ## Features
//!
//! - **Scene Graph**: arena-backed node tree with local and world transforms
//! - **Rotation Math**: Euler angles in six axis orders, quaternions and matrices
//! - **Bounding Volumes**: boxes, spheres, planes and view frusta
//! - **Mesh Geometry**: normals, merging, vertex welding and flat upload buffers
//! - **Culling**: camera frustum and layer based visibility
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_kernel::prelude::*;
//!
//! let mut scene = Scene::new();
//! let camera = scene.create_camera(PerspectiveCamera::new(60.0, 16.0 / 9.0, 0.1, 100.0));
//! let ship = scene.create_mesh(BoxGeometry::new(1.0, 1.0, 1.0).build(), Material::new());
//! scene.node_mut(ship)?.position = Vec3::new(0.0, 0.0, -10.0);
//!
//! scene.update_all(false);
//!
//! let mut culler = FrustumCuller::new();
//! assert_eq!(culler.cull_scene(&scene, camera)?, &[ship]);
//! # Ok::<(), SceneError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;
pub mod foundation;

pub mod bounds;
pub mod culling;
pub mod material;
pub mod math;
pub mod mesh;
pub mod scene;

/// Common imports for kernel users
pub mod prelude {
    pub use crate::{
        bounds::{Box3, Frustum, Line3, Plane, Sphere},
        core::config::{BoundsPolicy, Config, KernelConfig},
        culling::FrustumCuller,
        material::{Material, MaterialValue},
        math::{Color, Euler, Mat3, Mat4, Quat, RotationOrder, Vec2, Vec3},
        math::{Mat3Ext, Mat4Ext, QuatExt, Vec3Ext},
        mesh::{BoxGeometry, Face3, Geometry, GeometryBuffers},
        scene::{Layers, NodeId, NodeKind, Object3D, PerspectiveCamera, Scene, SceneError},
    };
}
