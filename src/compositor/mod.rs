//! Selective bloom compositing.

pub use self::selective_bloom::SelectiveBloomCompositor;
pub use self::substitution::SubstitutionTable;

mod selective_bloom;
mod substitution;
