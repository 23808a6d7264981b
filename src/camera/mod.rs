//! Cameras and camera controls.

pub use self::camera3d::Camera3d;
pub use self::orbit_controls::OrbitControls;
pub use self::perspective::PerspectiveCamera;

mod camera3d;
mod orbit_controls;
mod perspective;
