//! A native window with a configured wgpu surface.

use std::cell::RefCell;
use std::sync::Arc;

use crate::config::WindowConfig;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::window::events::{self, WindowEvent};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent as WinitWindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

// winit only allows one EventLoop per program and it is neither Send nor
// Sync, so it lives in thread-local storage and is reused across canvases.
thread_local! {
    static EVENT_LOOP: RefCell<Option<EventLoop<()>>> = const { RefCell::new(None) };
}

/// Collects the events of one window while the event loop is pumped.
struct EventCollector {
    window_id: WindowId,
    scale_factor: f64,
    events: Vec<WindowEvent>,
}

impl ApplicationHandler for EventCollector {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        if window_id != self.window_id {
            return;
        }
        if let Some(event) = events::translate(&event, self.scale_factor) {
            if let WindowEvent::ScaleFactorChanged(scale) = event {
                self.scale_factor = scale;
            }
            self.events.push(event);
        }
    }
}

/// A window and its presentation surface.
pub struct Canvas {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    context: Context,
    scale_factor: f64,
}

impl Canvas {
    /// Opens a window and initializes the wgpu context for it.
    pub async fn open(config: &WindowConfig) -> Result<Canvas> {
        let window_attrs = WindowAttributes::default()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64));

        let window = EVENT_LOOP.with(|cell| -> Result<Window> {
            let mut event_loop = cell.borrow_mut();
            if event_loop.is_none() {
                *event_loop =
                    Some(EventLoop::new().map_err(|e| Error::Window(e.to_string()))?);
            }
            let Some(event_loop) = event_loop.as_ref() else {
                return Err(Error::Window("event loop unavailable".to_string()));
            };

            #[allow(deprecated)]
            event_loop
                .create_window(window_attrs)
                .map_err(|e| Error::Window(e.to_string()))
        })?;
        let window = Arc::new(window);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .map_err(|_| Error::SurfaceNotFound)?;

        let context = Context::for_surface(instance, &surface).await?;
        let caps = surface.get_capabilities(&context.adapter);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: context.surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: if config.vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&context.device, &surface_config);

        let scale_factor = window.scale_factor();
        log::info!(
            "opened {}x{} surface ({:?}, scale factor {})",
            surface_config.width,
            surface_config.height,
            surface_config.format,
            scale_factor
        );

        Ok(Canvas {
            window,
            surface,
            surface_config,
            context,
            scale_factor,
        })
    }

    /// Polls the window system without blocking.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        use winit::platform::pump_events::EventLoopExtPumpEvents;

        let mut collector = EventCollector {
            window_id: self.window.id(),
            scale_factor: self.scale_factor,
            events: Vec::new(),
        };

        let timeout = Some(std::time::Duration::ZERO);
        EVENT_LOOP.with(|cell| {
            if let Some(ref mut event_loop) = *cell.borrow_mut() {
                let _ = event_loop.pump_app_events(timeout, &mut collector);
            }
        });

        self.scale_factor = collector.scale_factor;
        for event in &collector.events {
            if let WindowEvent::Resized { width, height, .. } = *event {
                self.resize(width, height);
            }
        }

        collector.events
    }

    /// Reconfigures the surface for a new physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == (self.surface_config.width, self.surface_config.height) {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.context.device, &self.surface_config);
    }

    /// Reconfigures the surface with its current settings.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.context.device, &self.surface_config);
    }

    /// Gets the current surface texture for rendering.
    pub fn get_current_texture(&self) -> std::result::Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// The wgpu context of this canvas.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The physical size of the surface.
    pub fn size(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// The logical size of the window.
    pub fn logical_size(&self) -> (u32, u32) {
        let (w, h) = self.size();
        (
            (w as f64 / self.scale_factor).round() as u32,
            (h as f64 / self.scale_factor).round() as u32,
        )
    }

    /// The device pixel ratio.
    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Sets the window title.
    pub fn set_title(&mut self, title: &str) {
        self.window.set_title(title);
    }
}
