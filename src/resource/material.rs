//! Materials: how a drawable is shaded.

use crate::color::{self, Color};

/// Describes how a drawable contributes color to a render.
///
/// Materials are owned by the [`ResourceManager`](crate::resource::ResourceManager)
/// and referenced by handle, so that swapping a drawable's material is a
/// handle swap and restoring it brings back the exact same material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Material {
    /// Unlit, flat color.
    Basic {
        /// The surface color.
        color: Color,
    },
    /// Lambert-lit color plus an emissive term.
    Standard {
        /// The diffuse color.
        color: Color,
        /// The emitted color, independent of lighting.
        emissive: Color,
        /// Multiplier applied to `emissive`.
        emissive_intensity: f32,
    },
    /// Contributes no color at all. Still occludes what lies behind it.
    Null,
}

impl Default for Material {
    fn default() -> Self {
        Material::Basic {
            color: color::WHITE,
        }
    }
}

impl Material {
    /// An unlit material.
    pub fn basic(color: Color) -> Material {
        Material::Basic { color }
    }

    /// A lit material emitting its own color at `emissive_intensity`.
    pub fn standard(color: Color, emissive_intensity: f32) -> Material {
        Material::Standard {
            color,
            emissive: color,
            emissive_intensity,
        }
    }

    /// The material's base color; black for [`Material::Null`].
    pub fn color(&self) -> Color {
        match *self {
            Material::Basic { color } | Material::Standard { color, .. } => color,
            Material::Null => color::BLACK,
        }
    }

    /// Whether this is the null (black) material.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Material::Null)
    }

    /// The emissive intensity, if this material has an emissive term.
    pub fn emissive_intensity(&self) -> Option<f32> {
        match *self {
            Material::Standard {
                emissive_intensity, ..
            } => Some(emissive_intensity),
            _ => None,
        }
    }

    /// Sets the emissive intensity. Returns `false` (and does nothing) for
    /// materials without an emissive term.
    pub fn set_emissive_intensity(&mut self, intensity: f32) -> bool {
        match self {
            Material::Standard {
                emissive_intensity, ..
            } => {
                *emissive_intensity = intensity;
                true
            }
            _ => false,
        }
    }

    /// The color emitted regardless of lighting.
    pub fn emission(&self) -> Color {
        match *self {
            Material::Standard {
                emissive,
                emissive_intensity,
                ..
            } => color::scale(emissive, emissive_intensity),
            _ => color::BLACK,
        }
    }
}
