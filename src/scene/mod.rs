//! Everything related to the scene graph.

pub use self::layers::Layers;
pub use self::scene::{Disposed, Scene};
pub use self::scene_node::{Drawable, NodeId, NodeKind, SceneNode, WorldTransform};

mod layers;
mod scene;
mod scene_node;
