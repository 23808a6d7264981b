use crate::camera::{Camera3d, PerspectiveCamera};
use glamx::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

const MIN_POLAR: f32 = 1.0e-6;

/// Orbits a [`PerspectiveCamera`] around a target point.
///
/// Dragging rotates, scrolling dollies, and the camera may spin on its own
/// around the vertical axis. With damping enabled, drag-induced rotation
/// decays smoothly instead of stopping at once.
#[derive(Clone, Debug)]
pub struct OrbitControls {
    /// The point orbited around.
    pub target: Vec3,
    /// Whether the camera spins around the target on its own.
    pub auto_rotate: bool,
    /// Auto-rotation speed. `1.0` is one full turn per minute.
    pub auto_rotate_speed: f32,
    /// Whether drag-induced rotation decays smoothly.
    pub enable_damping: bool,
    /// Fraction of the pending rotation applied per update when damping.
    pub damping_factor: f32,
    /// Drag sensitivity.
    pub rotate_speed: f32,
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance to the target.
    pub max_distance: f32,
    radius: f32,
    theta: f32,
    phi: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    drag_origin: Option<Vec2>,
}

impl OrbitControls {
    /// Creates controls matching the current placement of `camera`.
    pub fn new(camera: &PerspectiveCamera) -> OrbitControls {
        let target = camera.target();
        let offset = camera.eye() - target;
        let radius = offset.length();
        let (theta, phi) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        OrbitControls {
            target,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            radius,
            theta,
            phi,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            drag_origin: None,
        }
    }

    /// Distance between the camera and the target.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.radius
    }

    /// Azimuthal angle around the vertical axis, in radians.
    #[inline]
    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    /// Starts a drag at `cursor` (pixels).
    pub fn pointer_down(&mut self, cursor: Vec2) {
        self.drag_origin = Some(cursor);
    }

    /// Ends the current drag.
    pub fn pointer_up(&mut self) {
        self.drag_origin = None;
    }

    /// Accumulates a rotation from the cursor motion, if a drag is in progress.
    pub fn pointer_move(&mut self, cursor: Vec2, viewport_height: f32) {
        let Some(origin) = self.drag_origin else {
            return;
        };

        let delta = cursor - origin;
        let height = viewport_height.max(1.0);
        self.delta_theta -= TAU * delta.x / height * self.rotate_speed;
        self.delta_phi -= TAU * delta.y / height * self.rotate_speed;
        self.drag_origin = Some(cursor);
    }

    /// Dollies in (`delta > 0`) or out (`delta < 0`).
    pub fn scroll(&mut self, delta: f32) {
        if delta > 0.0 {
            self.scale *= 0.95;
        } else if delta < 0.0 {
            self.scale /= 0.95;
        }
    }

    /// Applies pending motion and writes the result into `camera`.
    ///
    /// `dt` is the elapsed time in seconds. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, dt: f32) -> bool {
        if self.auto_rotate && dt > 0.0 {
            self.delta_theta -= TAU / 60.0 * self.auto_rotate_speed * dt;
        }

        let (step_theta, step_phi) = if self.enable_damping {
            (
                self.delta_theta * self.damping_factor,
                self.delta_phi * self.damping_factor,
            )
        } else {
            (self.delta_theta, self.delta_phi)
        };

        self.theta += step_theta;
        self.phi = (self.phi + step_phi).clamp(MIN_POLAR, PI - MIN_POLAR);
        let new_radius = (self.radius * self.scale).clamp(self.min_distance, self.max_distance);
        let moved = step_theta != 0.0 || step_phi != 0.0 || new_radius != self.radius;
        self.radius = new_radius;

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
        }
        self.scale = 1.0;

        let sin_phi_radius = self.phi.sin() * self.radius;
        let offset = Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        );

        camera.look_at_from(self.target + offset, self.target);
        moved
    }
}
