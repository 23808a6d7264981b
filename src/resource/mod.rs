//! Geometries, materials, and the buffers they are rendered into.

pub use self::geometry::Geometry;
pub use self::material::Material;
pub use self::render_target::RenderTarget;
pub use self::resource_manager::{GeometryHandle, MaterialHandle, ResourceManager};

mod geometry;
mod material;
mod render_target;
mod resource_manager;
