//! Trait implemented by every post-processing pass.

use crate::camera::Camera3d;
use crate::resource::{RenderTarget, ResourceManager};
use crate::scene::Scene;

/// Everything a pass may read while it renders.
pub struct PassContext<'a> {
    /// The scene being rendered.
    pub scene: &'a Scene,
    /// The camera the scene is seen from.
    pub camera: &'a dyn Camera3d,
    /// Geometries and materials referenced by the scene.
    pub resources: &'a ResourceManager,
    /// An extra input texture, sampled by compositing passes.
    pub auxiliary: Option<&'a RenderTarget>,
}

impl<'a> PassContext<'a> {
    /// A context without auxiliary texture.
    pub fn new(
        scene: &'a Scene,
        camera: &'a dyn Camera3d,
        resources: &'a ResourceManager,
    ) -> PassContext<'a> {
        PassContext {
            scene,
            camera,
            resources,
            auxiliary: None,
        }
    }

    /// Sets the auxiliary texture.
    pub fn with_auxiliary(mut self, auxiliary: &'a RenderTarget) -> PassContext<'a> {
        self.auxiliary = Some(auxiliary);
        self
    }
}

/// One step of an [`EffectComposer`](crate::post_processing::EffectComposer).
pub trait Pass {
    /// Renders into `write`, usually from `read`.
    fn render(&mut self, context: &PassContext, read: &RenderTarget, write: &mut RenderTarget);

    /// Called when the composer is resized.
    fn set_size(&mut self, _width: u32, _height: u32) {}

    /// Disabled passes are skipped by the composer.
    fn enabled(&self) -> bool {
        true
    }

    /// Whether the composer swaps its buffers after this pass, making `write`
    /// the next pass input.
    ///
    /// A pass returning `false` treats `write` as scratch space.
    fn needs_swap(&self) -> bool {
        true
    }
}
