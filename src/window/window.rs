//! The window type and its render loop.

use crate::app::AppContext;
use crate::config::WindowConfig;
use crate::error::Result;
use crate::window::events;
use crate::window::{Canvas, Presenter};
use web_time::Instant;

/// Frame deltas are clamped so a stalled window does not fast-forward animations.
const MAX_FRAME_DELTA: f32 = 0.1;

/// An on-screen view of an [`AppContext`].
///
/// The application is rendered on the CPU at the window's logical size
/// times its (clamped) pixel ratio, then uploaded and stretched over the
/// surface.
pub struct Window {
    canvas: Canvas,
    presenter: Presenter,
}

impl Window {
    /// Opens a window configured by `config`.
    pub async fn open(config: &WindowConfig) -> Result<Window> {
        let canvas = Canvas::open(config).await?;
        let presenter = Presenter::new(canvas.context());

        Ok(Window { canvas, presenter })
    }

    /// The underlying canvas.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Drives `app` until the window is closed, `app` stops itself, or
    /// `max_frames` frames were presented.
    pub fn run(&mut self, app: &mut AppContext, max_frames: Option<u64>) -> Result<()> {
        let (width, height) = self.canvas.logical_size();
        let _ = app.resize(width, height, self.canvas.scale_factor());

        let mut last = Instant::now();
        let mut presented = 0u64;

        while app.is_running() {
            for event in self.canvas.poll_events() {
                events::apply(app, &event);
            }
            if !app.is_running() {
                break;
            }

            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32().min(MAX_FRAME_DELTA);
            last = now;

            let frame = app.frame(dt);
            self.presenter.upload(self.canvas.context(), frame);

            if self.present() {
                presented += 1;
            }
            log::trace!(
                "frame {} rendered in {:.2}ms",
                app.frame_count(),
                now.elapsed().as_secs_f64() * 1000.0
            );

            if max_frames.is_some_and(|max| presented >= max) {
                log::debug!("stopping after {} frames", presented);
                app.stop();
            }
        }

        Ok(())
    }

    fn present(&mut self) -> bool {
        let surface_texture = match self.canvas.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost or outdated, reconfiguring");
                self.canvas.reconfigure();
                return false;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("surface timeout, skipping frame");
                return false;
            }
            Err(e) => {
                log::error!("failed to acquire the surface texture: {e:?}");
                return false;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.presenter.draw(self.canvas.context(), &view);
        surface_texture.present();
        true
    }
}
