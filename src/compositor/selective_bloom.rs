//! Two-pipeline selective bloom.
//!
//! Each frame runs, in order:
//!
//! 1. the darken pass: every drawable outside [`Layers::BLOOM`] gets the null
//!    material, its original one being saved in the substitution table;
//! 2. the glow render: scene render (cleared to black, so the background is
//!    not added twice) followed by the bloom pass, kept off-screen;
//! 3. the restore pass: original materials are put back and the table is
//!    drained;
//! 4. the final render: scene render followed by an additive mix of the glow
//!    output.

use crate::camera::Camera3d;
use crate::color;
use crate::compositor::SubstitutionTable;
use crate::config::BloomParams;
use crate::post_processing::{BloomPass, EffectComposer, MixPass, PassContext, RenderPass};
use crate::resource::{Material, MaterialHandle, RenderTarget, ResourceManager};
use crate::scene::{Layers, NodeKind, Scene, SceneNode};

/// Renders a scene so that only [`Layers::BLOOM`] drawables bloom.
pub struct SelectiveBloomCompositor {
    glow: EffectComposer,
    composite: EffectComposer,
    bloom: BloomParams,
    substitutions: SubstitutionTable,
    null_material: Option<MaterialHandle>,
}

impl SelectiveBloomCompositor {
    /// Creates a compositor rendering `width`×`height` frames.
    pub fn new(width: u32, height: u32, bloom: BloomParams) -> SelectiveBloomCompositor {
        let bloom = bloom.clamped();

        let mut composite = EffectComposer::new(width, height);
        composite.add_pass(RenderPass::new(Layers::all()));
        composite.add_pass(MixPass::new(1.0));

        SelectiveBloomCompositor {
            glow: glow_composer(width, height, bloom),
            composite,
            bloom,
            substitutions: SubstitutionTable::new(),
            null_material: None,
        }
    }

    /// The handle of the null material, once allocated by a darken pass.
    pub fn null_material(&self) -> Option<MaterialHandle> {
        self.null_material
    }

    /// Read-only view of the substitution table.
    ///
    /// It is empty outside of [`render`](Self::render) unless a darken pass
    /// was run on its own.
    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }

    /// Current bloom parameters.
    pub fn bloom(&self) -> BloomParams {
        self.bloom
    }

    /// Replaces the bloom parameters.
    pub fn set_bloom(&mut self, bloom: BloomParams) {
        let bloom = bloom.clamped();
        if bloom == self.bloom {
            return;
        }

        let (w, h) = self.glow.size();
        self.bloom = bloom;
        self.glow = glow_composer(w, h, bloom);
    }

    /// Frame size.
    pub fn size(&self) -> (u32, u32) {
        self.composite.size()
    }

    /// Resizes both pipelines. Unchanged sizes are a no-op.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.glow.set_size(width, height);
        self.composite.set_size(width, height);
    }

    /// Swaps the material of every non-glowing drawable for the null material.
    ///
    /// Glowing drawables are left untouched and never enter the table.
    pub fn darken_non_bloomed(&mut self, scene: &mut Scene, resources: &mut ResourceManager) {
        let null = self.ensure_null_material(resources);
        let table = &mut self.substitutions;

        scene.visit_mut(|node| {
            if node.layers().is_bloom() {
                return;
            }
            let id = node.id();
            if let NodeKind::Drawable(drawable) = node.kind_mut() {
                table.save(id, drawable.material);
                drawable.material = null;
            }
        });
    }

    /// Gives every darkened drawable its original material back.
    ///
    /// Nodes without an entry are left alone. Entries whose node left the
    /// scene are dropped, so the table is always empty afterwards.
    pub fn restore_materials(&mut self, scene: &mut Scene) {
        let table = &mut self.substitutions;

        scene.visit_mut(|node| {
            let id = node.id();
            if let Some(drawable) = node.drawable_mut() {
                if let Some(original) = table.take(id) {
                    drawable.material = original;
                }
            }
        });

        let stale = self.substitutions.clear();
        if stale > 0 {
            log::trace!("dropped {} substitutions of removed nodes", stale);
        }
    }

    /// Restores a single node. Returns `false`, changing nothing, when the
    /// node has no entry.
    pub fn restore_one(&mut self, node: &mut SceneNode) -> bool {
        let id = node.id();
        let Some(drawable) = node.drawable_mut() else {
            return false;
        };

        match self.substitutions.take(id) {
            Some(original) => {
                drawable.material = original;
                true
            }
            None => false,
        }
    }

    /// Runs the whole frame protocol and returns the composited frame.
    pub fn render(
        &mut self,
        scene: &mut Scene,
        camera: &dyn Camera3d,
        resources: &mut ResourceManager,
    ) -> &RenderTarget {
        self.darken_non_bloomed(scene, resources);
        let _ = self.glow.render(&PassContext::new(scene, camera, resources));
        self.restore_materials(scene);

        let context = PassContext::new(scene, camera, resources).with_auxiliary(self.glow.output());
        self.composite.render(&context)
    }

    /// The glow pipeline output of the last frame.
    pub fn glow_output(&self) -> &RenderTarget {
        self.glow.output()
    }

    /// The composited output of the last frame.
    pub fn output(&self) -> &RenderTarget {
        self.composite.output()
    }

    fn ensure_null_material(&mut self, resources: &mut ResourceManager) -> MaterialHandle {
        match self.null_material {
            Some(handle) if resources.material(handle).is_some() => handle,
            _ => {
                let handle = resources.add_material(Material::Null);
                self.null_material = Some(handle);
                handle
            }
        }
    }
}

fn glow_composer(width: u32, height: u32, bloom: BloomParams) -> EffectComposer {
    let mut glow = EffectComposer::new(width, height);
    glow.set_render_to_screen(false);
    glow.add_pass(RenderPass::new(Layers::all()).with_clear_color(color::BLACK));
    glow.add_pass(BloomPass::new(width, height, bloom));
    glow
}
