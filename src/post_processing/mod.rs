//! Post-processing passes and the composer chaining them.

pub use self::bloom::{BloomPass, MIP_LEVELS};
pub use self::effect_composer::EffectComposer;
pub use self::mix::MixPass;
pub use self::pass::{Pass, PassContext};
pub use self::render_pass::RenderPass;

mod bloom;
mod effect_composer;
mod mix;
mod pass;
mod render_pass;
