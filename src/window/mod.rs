//! The window, and things to handle the rendering loop and events.

mod canvas;
mod events;
mod presenter;
mod screenshot;
mod window;

pub use canvas::Canvas;
pub use events::{apply, Key, MouseButton, WindowEvent};
pub use presenter::Presenter;
pub use screenshot::save_screenshot;
pub use window::Window;
