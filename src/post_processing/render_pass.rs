use crate::color::Color;
use crate::post_processing::{Pass, PassContext};
use crate::renderer::{Rasterizer, RenderStats, Renderer3d};
use crate::resource::RenderTarget;
use crate::scene::Layers;

/// Rasterizes the scene into the composer, ignoring the pass input.
pub struct RenderPass {
    layers: Layers,
    rasterizer: Rasterizer,
}

impl Default for RenderPass {
    fn default() -> Self {
        Self::new(Layers::all())
    }
}

impl RenderPass {
    /// A pass drawing the drawables whose layers intersect `layers`.
    pub fn new(layers: Layers) -> RenderPass {
        RenderPass {
            layers,
            rasterizer: Rasterizer::new(),
        }
    }

    /// Clears to `clear_color` instead of the scene background.
    pub fn with_clear_color(mut self, clear_color: Color) -> RenderPass {
        self.rasterizer.set_clear_color(Some(clear_color));
        self
    }

    /// The layer mask drawn by this pass.
    pub fn layers(&self) -> Layers {
        self.layers
    }

    /// Changes the layer mask.
    pub fn set_layers(&mut self, layers: Layers) {
        self.layers = layers;
    }

    /// Statistics of the last render.
    pub fn stats(&self) -> RenderStats {
        self.rasterizer.stats()
    }
}

impl Pass for RenderPass {
    fn render(&mut self, context: &PassContext, _: &RenderTarget, write: &mut RenderTarget) {
        self.rasterizer.render(
            context.scene,
            context.camera,
            context.resources,
            self.layers,
            write,
        );
    }
}
