/// xform3d Core Library - Affine transformation engine for a fixed polyhedral model
///
/// This library provides the pure math behind the viewer: 3-vector helpers,
/// homogeneous 4x4 matrix construction, the fixed-order transformation
/// pipeline, and the perspective/orthographic projection and depth-sort steps.
/// Drawing is left to the consumer.

pub mod engine;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod transform;
pub mod vector;

/// Floating-point type used for all geometry.
pub type Float = f64;

/// Tolerance used when guarding divisions.
pub const EPSILON: Float = 1e-9;

// Re-export commonly used types
pub use engine::{compose, compute, Stage, TransformState, Transformations};
pub use error::{Error, Result};
pub use geometry::{Edge, Face, Mesh, Vertex};
pub use projection::{sort_faces_by_depth, DepthFace, OrthoViewport, PerspectiveCamera, Plane, ScreenPoint};
pub use transform::Transform;
