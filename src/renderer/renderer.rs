use crate::camera::Camera3d;
use crate::resource::{RenderTarget, ResourceManager};
use crate::scene::{Layers, Scene};

/// Trait implemented by anything able to draw a scene into a render target.
///
/// Implementations clear `target` (to the scene background unless configured
/// otherwise), then draw the
/// visible drawables whose layers intersect `layers`.
pub trait Renderer3d {
    /// Renders `scene` as seen by `camera` into `target`.
    fn render(
        &mut self,
        scene: &Scene,
        camera: &dyn Camera3d,
        resources: &ResourceManager,
        layers: Layers,
        target: &mut RenderTarget,
    );
}
