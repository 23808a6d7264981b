//! Procedural mesh generation.

pub use self::icosphere::{icosphere, unit_icosphere, MAX_ICOSPHERE_DETAIL};
pub use self::render_mesh::RenderMesh;

mod icosphere;
mod render_mesh;
pub mod utils;
