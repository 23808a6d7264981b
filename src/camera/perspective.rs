use crate::camera::Camera3d;
use glamx::{Mat4, Vec3};

/// A perspective camera looking from `position` towards `target`.
///
/// The projection only changes through [`set_aspect`](Self::set_aspect),
/// [`set_fov`](Self::set_fov) and [`set_clip_planes`](Self::set_clip_planes);
/// each of them refreshes the cached matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    position: Vec3,
    target: Vec3,
    up: Vec3,
    fov_y: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    view: Mat4,
    proj: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        PerspectiveCamera::new(75.0, 1.0, 0.1, 1000.0)
    }
}

impl PerspectiveCamera {
    /// Creates a camera at `(0, 0, 5)` looking at the origin.
    ///
    /// `fov_y` is the vertical field of view in degrees.
    pub fn new(fov_y: f32, aspect: f32, znear: f32, zfar: f32) -> PerspectiveCamera {
        let mut res = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y,
            aspect: sanitize_aspect(aspect),
            znear,
            zfar,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        };
        res.update_projection();
        res.update_view();
        res
    }

    /// Moves the camera, keeping its target.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update_view();
    }

    /// Points the camera at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        self.update_view();
    }

    /// Moves the camera and points it at `target` in one step.
    pub fn look_at_from(&mut self, position: Vec3, target: Vec3) {
        self.position = position;
        self.target = target;
        self.update_view();
    }

    /// The point the camera looks at.
    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// The camera up vector.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Vertical field of view, in degrees.
    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov_y
    }

    /// Width over height of the viewport.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Sets the vertical field of view, in degrees.
    pub fn set_fov(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
        self.update_projection();
    }

    /// Sets the aspect ratio (viewport width over height).
    ///
    /// Non-finite or non-positive ratios are replaced by `1.0`.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
        self.update_projection();
    }

    /// Sets the near and far clipping planes.
    pub fn set_clip_planes(&mut self, znear: f32, zfar: f32) {
        self.znear = znear;
        self.zfar = zfar;
        self.update_projection();
    }

    /// Recomputes the projection matrix from the current frustum parameters.
    pub fn update_projection(&mut self) {
        self.proj =
            Mat4::perspective_rh_gl(self.fov_y.to_radians(), self.aspect, self.znear, self.zfar);
    }

    fn update_view(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

impl Camera3d for PerspectiveCamera {
    #[inline]
    fn eye(&self) -> Vec3 {
        self.position
    }

    #[inline]
    fn view(&self) -> Mat4 {
        self.view
    }

    #[inline]
    fn projection(&self) -> Mat4 {
        self.proj
    }

    #[inline]
    fn clip_planes(&self) -> (f32, f32) {
        (self.znear, self.zfar)
    }
}
