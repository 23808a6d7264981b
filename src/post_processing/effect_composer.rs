use crate::post_processing::{Pass, PassContext};
use crate::resource::RenderTarget;

/// Runs a chain of passes over a pair of ping-pong render targets.
///
/// After [`render`](Self::render), [`output`](Self::output) holds the result
/// of the last swapping pass.
pub struct EffectComposer {
    read: RenderTarget,
    write: RenderTarget,
    passes: Vec<Box<dyn Pass>>,
    render_to_screen: bool,
}

impl EffectComposer {
    /// Creates an empty composer with `width`×`height` buffers.
    pub fn new(width: u32, height: u32) -> EffectComposer {
        EffectComposer {
            read: RenderTarget::new(width, height),
            write: RenderTarget::new(width, height),
            passes: Vec::new(),
            render_to_screen: true,
        }
    }

    /// Appends a pass to the chain.
    pub fn add_pass<P: Pass + 'static>(&mut self, mut pass: P) {
        let (w, h) = self.read.size();
        pass.set_size(w, h);
        self.passes.push(Box::new(pass));
    }

    /// Number of passes in the chain.
    pub fn num_passes(&self) -> usize {
        self.passes.len()
    }

    /// Whether the output of this composer is the presented image.
    ///
    /// Composers feeding another pipeline keep their output off-screen.
    pub fn render_to_screen(&self) -> bool {
        self.render_to_screen
    }

    /// Sets whether the output of this composer is the presented image.
    pub fn set_render_to_screen(&mut self, render_to_screen: bool) {
        self.render_to_screen = render_to_screen;
    }

    /// Current buffer size.
    pub fn size(&self) -> (u32, u32) {
        self.read.size()
    }

    /// Resizes both buffers and every pass. Unchanged sizes are a no-op.
    pub fn set_size(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);

        if !self.read.resize(width, height) {
            return;
        }
        let _ = self.write.resize(width, height);

        for pass in self.passes.iter_mut() {
            pass.set_size(width, height);
        }
    }

    /// Runs every enabled pass in order and returns the output.
    pub fn render(&mut self, context: &PassContext) -> &RenderTarget {
        for pass in self.passes.iter_mut() {
            if !pass.enabled() {
                continue;
            }

            pass.render(context, &self.read, &mut self.write);

            if pass.needs_swap() {
                std::mem::swap(&mut self.read, &mut self.write);
            }
        }

        &self.read
    }

    /// The last rendered output.
    pub fn output(&self) -> &RenderTarget {
        &self.read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::color::{self, Color};
    use crate::resource::ResourceManager;
    use crate::scene::Scene;

    struct Fill(Color, bool);

    impl Pass for Fill {
        fn render(&mut self, _: &PassContext, _: &RenderTarget, write: &mut RenderTarget) {
            write.clear(self.0);
        }

        fn enabled(&self) -> bool {
            self.1
        }
    }

    struct Brighten;

    impl Pass for Brighten {
        fn render(&mut self, _: &PassContext, read: &RenderTarget, write: &mut RenderTarget) {
            write.copy_from(read);
            let p = read.pixel(0, 0);
            write.set_pixel(0, 0, color::scale(p, 2.0));
        }
    }

    #[test]
    fn passes_chain_through_the_ping_pong_buffers() {
        let scene = Scene::new();
        let camera = PerspectiveCamera::default();
        let resources = ResourceManager::new();

        let mut composer = EffectComposer::new(2, 2);
        composer.add_pass(Fill(Color::new(0.25, 0.0, 0.0, 1.0), true));
        composer.add_pass(Fill(color::WHITE, false));
        composer.add_pass(Brighten);

        let out = composer.render(&PassContext::new(&scene, &camera, &resources));
        assert_eq!(out.pixel(0, 0).r, 0.5);
        assert_eq!(out.pixel(1, 1).r, 0.25);
    }

    #[test]
    fn resize_reaches_every_buffer() {
        let mut composer = EffectComposer::new(4, 4);
        composer.set_size(10, 0);
        assert_eq!(composer.size(), (10, 1));
        assert_eq!(composer.output().size(), (10, 1));
    }
}
