use crate::color;
use crate::post_processing::{Pass, PassContext};
use crate::resource::RenderTarget;

/// Additive compositing: `out = base + auxiliary * mix`.
///
/// The auxiliary texture (the glow render) is resampled bilinearly when its
/// size differs from the composer's. Without auxiliary texture the base is
/// copied unchanged.
pub struct MixPass {
    mix: f32,
}

impl Default for MixPass {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl MixPass {
    /// A mix pass adding the auxiliary texture scaled by `mix`.
    pub fn new(mix: f32) -> MixPass {
        MixPass { mix }
    }

    /// The blend factor.
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Sets the blend factor.
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.max(0.0);
    }
}

impl Pass for MixPass {
    fn render(&mut self, context: &PassContext, read: &RenderTarget, write: &mut RenderTarget) {
        write.copy_from(read);

        let Some(glow) = context.auxiliary else {
            return;
        };

        let (w, h) = write.size();
        let same_size = glow.size() == (w, h);

        for y in 0..h {
            for x in 0..w {
                let add = if same_size {
                    glow.pixel(x, y)
                } else {
                    glow.sample((x as f32 + 0.5) / w as f32, (y as f32 + 0.5) / h as f32)
                };
                let base = write.pixel(x, y);
                write.set_pixel(x, y, color::add_scaled(base, add, self.mix));
            }
        }
    }
}
