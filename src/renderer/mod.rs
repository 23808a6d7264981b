//! Renderers drawing scene graphs into render targets.

pub use self::rasterizer::{Rasterizer, RenderStats};
pub use self::renderer::Renderer3d;

mod rasterizer;
mod renderer;
