//! The viewer application: its state and the fields it shows.

pub use self::context::{AppContext, SurfaceSize, MAX_PIXEL_RATIO, PULSE_DURATION};
pub use self::generator::{populate, Field};

mod context;
mod generator;
