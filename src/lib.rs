/*!
# Glowfield

Selective bloom for fields of procedurally colored spheres.

Only some objects of a scene should glow. Glowfield gets there by rendering
the scene twice per frame:

1. every non-glowing drawable is temporarily swapped to a shared black
   "null" material, the scene is rendered and blurred by a
   [`BloomPass`](post_processing::BloomPass) into a glow buffer;
2. the original materials are restored and the scene is rendered normally,
   then the glow buffer is added on top.

Non-glowing objects still write depth during the glow render, so they occlude
the glow of objects behind them. The whole protocol is driven by
[`SelectiveBloomCompositor`](compositor::SelectiveBloomCompositor).

Rendering happens on the CPU into HDR [`RenderTarget`](resource::RenderTarget)s,
which makes the compositor usable headless (and testable without a GPU). The
[`window`] module presents the composited frame through wgpu.

```
use glowfield::prelude::*;

let config = ViewerConfig {
    seed: Some(7),
    scene: SceneParams { count: 50, ..Default::default() },
    ..Default::default()
};
let mut app = AppContext::new(Some(SurfaceSize::new(64, 48)), config).unwrap();
let frame = app.frame(1.0 / 60.0);
assert_eq!(frame.size(), (64, 48));
```

## Controls

* `left click + drag`: orbit around the field.
* `scroll`: zoom in / zoom out.
* `hover`: pulse the emissive intensity of the sphere under the cursor.
* `r`: regenerate the field.
* `b`: toggle the bloom.
* `space`: toggle the auto-rotation.
* `escape`: quit.
*/
#![allow(clippy::module_inception)]
#![allow(clippy::too_many_arguments)]

#[macro_use]
extern crate bitflags;

pub use glamx;

pub mod animation;
pub mod app;
pub mod camera;
pub mod color;
pub mod compositor;
pub mod config;
pub mod context;
pub mod error;
pub mod light;
pub mod post_processing;
pub mod procedural;
pub mod raycast;
pub mod renderer;
pub mod resource;
pub mod scene;
pub mod window;

pub use crate::error::{Error, Result};

pub mod prelude {
    pub use crate::animation::*;
    pub use crate::app::*;
    pub use crate::camera::*;
    pub use crate::color::{Color, ColorBounds, ColorGenerator};
    pub use crate::compositor::*;
    pub use crate::config::*;
    pub use crate::error::{Error, Result};
    pub use crate::light::*;
    pub use crate::post_processing::*;
    pub use crate::raycast::*;
    pub use crate::renderer::*;
    pub use crate::resource::*;
    pub use crate::scene::*;
    pub use crate::window::{save_screenshot, Window};
    pub use glamx::{Quat, Vec2, Vec3};
}
