//! The application context: every piece of state of a running viewer.

use crate::animation::EmissivePulses;
use crate::app::generator::{self, Field};
use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::color;
use crate::compositor::SelectiveBloomCompositor;
use crate::config::{BloomParams, SceneParams, ViewerConfig};
use crate::error::{Error, Result};
use crate::light::Light;
use crate::raycast::{Intersection, Raycaster};
use crate::resource::{RenderTarget, ResourceManager};
use crate::scene::Scene;
use glamx::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Largest device pixel ratio rendered at.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Duration of the emissive pulse played on a hovered sphere, in seconds.
pub const PULSE_DURATION: f32 = 1.0;

/// Logical size and pixel ratio of the output surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    /// A surface of `width`×`height` logical pixels at pixel ratio 1.
    pub fn new(width: u32, height: u32) -> SurfaceSize {
        SurfaceSize {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Sets the device pixel ratio.
    pub fn with_pixel_ratio(mut self, device_pixel_ratio: f64) -> SurfaceSize {
        self.device_pixel_ratio = device_pixel_ratio;
        self
    }

    /// Size of the rendered frame, in physical pixels.
    pub fn buffer_size(&self) -> (u32, u32) {
        let ratio = clamp_pixel_ratio(self.device_pixel_ratio);
        (
            ((self.width.max(1) as f64 * ratio).round() as u32).max(1),
            ((self.height.max(1) as f64 * ratio).round() as u32).max(1),
        )
    }
}

/// State of a running viewer, constructed once at startup.
///
/// Window events are forwarded to its methods; the frame loop calls
/// [`update`](Self::update) then [`render`](Self::render) while
/// [`is_running`](Self::is_running) holds.
pub struct AppContext {
    config: ViewerConfig,
    surface: SurfaceSize,
    scene: Scene,
    resources: ResourceManager,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    compositor: SelectiveBloomCompositor,
    raycaster: Raycaster,
    pulses: EmissivePulses,
    field: Option<Field>,
    cursor: Option<Vec2>,
    pointer: Option<Vec2>,
    last_hit: Option<Intersection>,
    rng: StdRng,
    frames: u64,
    running: bool,
}

impl AppContext {
    /// Creates the context and generates the first field.
    ///
    /// Fails with [`Error::SurfaceNotFound`] when there is no output surface.
    pub fn new(surface: Option<SurfaceSize>, config: ViewerConfig) -> Result<AppContext> {
        let surface = surface.ok_or(Error::SurfaceNotFound)?;
        let surface = SurfaceSize {
            width: surface.width.max(1),
            height: surface.height.max(1),
            device_pixel_ratio: clamp_pixel_ratio(surface.device_pixel_ratio),
        };
        let config = config.clamped();
        let (width, height) = surface.buffer_size();

        let mut camera = PerspectiveCamera::new(
            75.0,
            surface.width as f32 / surface.height as f32,
            0.1,
            1000.0,
        );
        camera.look_at_from(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);

        let mut controls = OrbitControls::new(&camera);
        controls.enable_damping = true;
        controls.auto_rotate = true;
        controls.auto_rotate_speed = 0.3;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut scene = Scene::new();
        scene.set_background(color::NIGHT);

        log::info!(
            "creating viewer: {}x{} ({}x{} pixels), {} spheres",
            surface.width,
            surface.height,
            width,
            height,
            config.scene.count
        );

        let mut context = AppContext {
            surface,
            scene,
            resources: ResourceManager::new(),
            camera,
            controls,
            compositor: SelectiveBloomCompositor::new(width, height, config.bloom),
            raycaster: Raycaster::default(),
            pulses: EmissivePulses::new(config.scene.emissive_intensity, PULSE_DURATION),
            field: None,
            cursor: None,
            pointer: None,
            last_hit: None,
            rng,
            frames: 0,
            running: true,
            config,
        };
        context.regenerate();

        Ok(context)
    }

    /// Throws the current field away and generates a new one.
    ///
    /// Every geometry and material of the previous field is released first.
    pub fn regenerate(&mut self) {
        let disposed = self.scene.dispose(&mut self.resources);
        self.pulses.clear();
        self.last_hit = None;

        let sun = self
            .scene
            .create_light(Light::directional(Vec3::new(-1.0, -2.0, -1.5)).with_intensity(0.8))
            .with_name("sun");
        let _ = self.scene.add(sun);

        let field = generator::populate(
            &mut self.scene,
            &mut self.resources,
            &self.config.scene,
            &mut self.rng,
        );

        log::info!(
            "generated {} spheres ({} glowing), released {} geometries and {} materials",
            field.len(),
            field.glowing.len(),
            disposed.geometries,
            disposed.materials
        );
        self.field = Some(field);
    }

    /// Replaces the scene parameters and regenerates the field.
    pub fn set_params(&mut self, params: SceneParams) {
        self.config.scene = params.clamped();
        self.pulses.set_boost(self.config.scene.emissive_intensity);
        self.regenerate();
    }

    /// Replaces the bloom parameters. The field is kept.
    pub fn set_bloom(&mut self, bloom: BloomParams) {
        self.config.bloom = bloom.clamped();
        self.compositor.set_bloom(self.config.bloom);
    }

    /// Handles a resize of the output surface.
    ///
    /// Returns `false`, doing nothing, when neither the logical size nor the
    /// effective pixel ratio changed.
    pub fn resize(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        let surface = SurfaceSize {
            width: width.max(1),
            height: height.max(1),
            device_pixel_ratio: clamp_pixel_ratio(device_pixel_ratio),
        };
        if surface == self.surface {
            return false;
        }

        self.surface = surface;
        self.camera
            .set_aspect(surface.width as f32 / surface.height as f32);

        let (w, h) = surface.buffer_size();
        self.compositor.set_size(w, h);
        log::debug!("resized to {}x{} ({}x{} pixels)", width, height, w, h);
        true
    }

    /// Records the pointer position, in logical pixels from the top-left
    /// corner.
    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.pointer = Some(Vec2::new(x as f32, y as f32));
        let w = self.surface.width as f64;
        let h = self.surface.height as f64;
        self.cursor = Some(Vec2::new(
            (x / w * 2.0 - 1.0) as f32,
            (-(y / h) * 2.0 + 1.0) as f32,
        ));
    }

    /// Forgets the pointer; hit-testing stops until it comes back.
    pub fn clear_cursor(&mut self) {
        self.cursor = None;
        self.pointer = None;
    }

    /// The pointer in normalized device coordinates.
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Starts an orbit drag at the last pointer position.
    pub fn pointer_down(&mut self) {
        if let Some(pointer) = self.pointer {
            self.controls.pointer_down(pointer);
        }
    }

    /// Ends an orbit drag.
    pub fn pointer_up(&mut self) {
        self.controls.pointer_up();
    }

    /// Moves the pointer: updates the hit-test cursor and any ongoing drag.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.set_cursor(x, y);
        self.controls
            .pointer_move(Vec2::new(x as f32, y as f32), self.surface.height as f32);
    }

    /// Dollies the camera; positive values zoom in.
    pub fn scroll(&mut self, delta: f32) {
        self.controls.scroll(delta);
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Moves the camera, steps the emissive pulses and hit-tests the
    /// cursor. The first sphere under the cursor starts pulsing unless it
    /// already does.
    pub fn update(&mut self, dt: f32) {
        let _ = self.controls.update(&mut self.camera, dt);
        self.pulses.update(dt, &self.scene, &mut self.resources);

        self.last_hit = None;
        let Some(cursor) = self.cursor else {
            return;
        };

        self.raycaster.set_from_camera(cursor, &self.camera);
        if let Some(hit) = self.raycaster.intersect_first(&self.scene, &self.resources) {
            if self.pulses.start(hit.node, &self.scene, &self.resources) {
                log::debug!("hit {:?} at distance {:.3}", hit.node, hit.distance);
            }
            self.last_hit = Some(hit);
        }
    }

    /// Renders one composited frame.
    pub fn render(&mut self) -> &RenderTarget {
        self.frames += 1;
        self.compositor
            .render(&mut self.scene, &self.camera, &mut self.resources)
    }

    /// [`update`](Self::update) then [`render`](Self::render).
    pub fn frame(&mut self, dt: f32) -> &RenderTarget {
        self.update(dt);
        self.render()
    }

    /// The last composited frame.
    pub fn output(&self) -> &RenderTarget {
        self.compositor.output()
    }

    /// Whether the frame loop should keep going.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Asks the frame loop to stop after the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Number of frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// The current configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The current output surface.
    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    /// The scene graph.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the scene graph.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Geometries and materials of the scene.
    pub fn resources(&self) -> &ResourceManager {
        &self.resources
    }

    /// Mutable access to the geometries and materials.
    pub fn resources_mut(&mut self) -> &mut ResourceManager {
        &mut self.resources
    }

    /// The camera.
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Mutable access to the camera. Call [`sync_controls`](Self::sync_controls)
    /// after moving it.
    pub fn camera_mut(&mut self) -> &mut PerspectiveCamera {
        &mut self.camera
    }

    /// Re-reads the orbit state from the camera placement.
    pub fn sync_controls(&mut self) {
        let mut controls = OrbitControls::new(&self.camera);
        controls.auto_rotate = self.controls.auto_rotate;
        controls.auto_rotate_speed = self.controls.auto_rotate_speed;
        controls.enable_damping = self.controls.enable_damping;
        controls.damping_factor = self.controls.damping_factor;
        self.controls = controls;
    }

    /// The orbit controls.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    /// The compositor.
    pub fn compositor(&self) -> &SelectiveBloomCompositor {
        &self.compositor
    }

    /// The running emissive pulses.
    pub fn pulses(&self) -> &EmissivePulses {
        &self.pulses
    }

    /// The current field.
    pub fn field(&self) -> Option<&Field> {
        self.field.as_ref()
    }

    /// The hit found by the last update.
    pub fn last_hit(&self) -> Option<Intersection> {
        self.last_hit
    }
}

fn clamp_pixel_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio.min(MAX_PIXEL_RATIO)
    } else {
        1.0
    }
}
