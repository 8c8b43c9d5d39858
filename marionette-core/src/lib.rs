/// Marionette Core Library - Mesh normalization and articulated scene graphs
///
/// This library loads OBJ meshes into a canonical unit volume, arranges them
/// in a rigid transform hierarchy with per-node animation, and hands each
/// mesh to a pluggable renderer with its accumulated world transform.

pub mod animation;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod loader;
pub mod material;
pub mod obj;
pub mod projection;
pub mod robot;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use animation::AnimationRule;
pub use error::{Error, ParseError, Result};
pub use geometry::{Aabb, MeshData, Triangle, Vertex};
pub use lighting::{LightKind, LightRig};
pub use loader::{AssetSource, DirectorySource, MemorySource, MeshLoader};
pub use material::{Material, MaterialPreset};
pub use obj::parse_obj;
pub use projection::{Camera, ProjectionMode, RenderContext, ShadingModel};
pub use robot::{Part, Robot, RobotAssets, RobotConfig};
pub use scene::{Child, DrawCall, MeshLeaf, Renderer, TransformNode};
pub use transform::Transform;
