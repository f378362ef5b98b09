//! Scene Graph
//!
//! Scene hierarchy and components:
//! - [`Node`]: a scene node (parent/child links plus a transform)
//! - [`Transform`]: position, Euler rotation, scale
//! - [`Scene`]: node arena with mesh and light pools
//! - [`Camera`], [`Light`]: the viewing and lighting rig
//! - [`Stage`]: owns the scene for one mounted avatar and manages its lifecycle

pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod stage;
pub mod transform;

pub use camera::Camera;
pub use light::{Light, LightKind};
pub use mesh::Mesh;
pub use node::Node;
pub use scene::Scene;
pub use stage::{DisplayedModel, SceneState, Stage};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
    pub struct MeshKey;
    pub struct LightKey;
}
