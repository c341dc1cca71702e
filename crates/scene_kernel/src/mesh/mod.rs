//! Mesh geometry
//!
//! Indexed triangle geometry with per-face attributes, bounds caching,
//! normal generation, merging and vertex welding. [`GeometryBuffers`]
//! flattens a geometry into renderer-ready arrays.

mod buffers;
mod face;
mod geometry;
mod primitives;

pub use buffers::{GeometryBuffers, Vertex};
pub use face::Face3;
pub use geometry::{Geometry, GeometryUpdates, MERGE_PRECISION_POINTS};
pub use primitives::BoxGeometry;
