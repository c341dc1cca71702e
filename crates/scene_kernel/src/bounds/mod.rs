//! Geometric primitives and bounding volumes
//!
//! Value types used to approximate geometry and to cull it: boxes, spheres,
//! planes, segments and the six-plane view frustum.

mod box3;
mod sphere;
mod plane;
mod line3;
mod frustum;

pub use box3::Box3;
pub use sphere::Sphere;
pub use plane::Plane;
pub use line3::Line3;
pub use frustum::Frustum;
