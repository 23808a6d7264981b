//! Lighting configuration for 3D scenes.
//!
//! Lights live in the scene graph as [`NodeKind::Light`](crate::scene::NodeKind)
//! nodes and take their position from the node's world transform. Only
//! [`Material::Standard`](crate::resource::Material) reacts to them.

use crate::color::Color;
use glamx::Vec3;

/// Maximum number of lights supported in a scene.
pub const MAX_LIGHTS: usize = 8;

/// The type of light source.
#[derive(Clone, Debug, PartialEq)]
pub enum LightType {
    /// A point light that emits light equally in all directions from a point.
    ///
    /// The light position comes from the scene node's world transform.
    Point {
        /// Maximum distance the light affects. Beyond this distance, the light
        /// contribution is zero.
        attenuation_radius: f32,
    },

    /// A directional light with parallel rays (like the sun), traveling along
    /// the given direction. Position is ignored.
    Directional(Vec3),
}

impl Default for LightType {
    fn default() -> Self {
        LightType::Point {
            attenuation_radius: 100.0,
        }
    }
}

/// A light source that can be attached to a scene node.
///
/// # Examples
/// ```
/// # use glowfield::light::Light;
/// # use glowfield::color::WHITE;
/// # use glamx::Vec3;
/// let sun = Light::directional(Vec3::new(-1.0, -1.0, -1.0))
///     .with_color(WHITE)
///     .with_intensity(0.8);
/// assert!(sun.enabled);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    /// The type of light (point or directional).
    pub light_type: LightType,
    /// The color of the light (RGBA, each component 0.0-1.0).
    pub color: Color,
    /// The intensity multiplier for the light.
    pub intensity: f32,
    /// Whether the light is enabled.
    pub enabled: bool,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::default(),
            color: crate::color::WHITE,
            intensity: 1.0,
            enabled: true,
        }
    }
}

impl Light {
    /// Creates a point light with the given attenuation radius.
    pub fn point(attenuation_radius: f32) -> Self {
        Self {
            light_type: LightType::Point { attenuation_radius },
            ..Default::default()
        }
    }

    /// Creates a directional light shining along `dir`.
    pub fn directional(dir: Vec3) -> Self {
        Self {
            light_type: LightType::Directional(dir),
            ..Default::default()
        }
    }

    /// Sets the light color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Sets the light intensity.
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Sets whether the light is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// A light that has been collected from the scene tree with its world-space position.
#[derive(Clone, Debug)]
pub struct CollectedLight {
    /// The type of light.
    pub light_type: LightType,
    /// The light color, premultiplied by its intensity.
    pub radiance: Vec3,
    /// World-space position of the light.
    pub world_position: Vec3,
}

impl CollectedLight {
    /// Lambert contribution of this light on a surface at `point` with unit `normal`.
    pub fn lambert(&self, point: Vec3, normal: Vec3) -> Vec3 {
        match self.light_type {
            LightType::Directional(dir) => {
                let to_light = -dir.normalize_or_zero();
                self.radiance * normal.dot(to_light).max(0.0)
            }
            LightType::Point { attenuation_radius } => {
                let delta = self.world_position - point;
                let dist = delta.length();
                if dist >= attenuation_radius || dist <= f32::EPSILON {
                    return Vec3::ZERO;
                }
                let falloff = 1.0 - dist / attenuation_radius;
                self.radiance * normal.dot(delta / dist).max(0.0) * falloff * falloff
            }
        }
    }
}

/// A collection of lights gathered from the scene tree before rendering.
#[derive(Clone, Debug)]
pub struct LightCollection {
    /// The collected lights with their world-space positions.
    pub lights: Vec<CollectedLight>,
    /// Global ambient lighting intensity.
    pub ambient: f32,
}

impl Default for LightCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl LightCollection {
    /// Creates a new empty light collection with default ambient.
    pub fn new() -> Self {
        Self::with_ambient(0.2)
    }

    /// Creates a new light collection with the specified ambient intensity.
    pub fn with_ambient(ambient: f32) -> Self {
        Self {
            lights: Vec::with_capacity(MAX_LIGHTS),
            ambient,
        }
    }

    /// Adds a light to the collection if there's room.
    ///
    /// Returns `true` if the light was added, `false` if the collection is full.
    pub fn add(&mut self, light: CollectedLight) -> bool {
        if self.lights.len() < MAX_LIGHTS {
            self.lights.push(light);
            true
        } else {
            false
        }
    }

    /// Returns the number of lights in the collection.
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Total diffuse irradiance (ambient included) at `point`.
    pub fn irradiance(&self, point: Vec3, normal: Vec3) -> Vec3 {
        self.lights
            .iter()
            .fold(Vec3::splat(self.ambient), |acc, l| acc + l.lambert(point, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn directional_light_faces_the_surface() {
        let light = CollectedLight {
            light_type: LightType::Directional(Vec3::new(0.0, 0.0, -1.0)),
            radiance: Vec3::ONE,
            world_position: Vec3::ZERO,
        };

        assert_relative_eq!(light.lambert(Vec3::ZERO, Vec3::Z).x, 1.0);
        assert_relative_eq!(light.lambert(Vec3::ZERO, -Vec3::Z).x, 0.0);
    }

    #[test]
    fn point_light_attenuates_to_zero() {
        let light = CollectedLight {
            light_type: LightType::Point {
                attenuation_radius: 10.0,
            },
            radiance: Vec3::ONE,
            world_position: Vec3::new(0.0, 0.0, 5.0),
        };

        let near = light.lambert(Vec3::new(0.0, 0.0, 4.0), Vec3::Z).x;
        let far = light.lambert(Vec3::new(0.0, 0.0, -4.0), Vec3::Z).x;
        let out = light.lambert(Vec3::new(0.0, 0.0, -6.0), Vec3::Z).x;
        assert!(near > 0.0);
        assert!(far > 0.0 && far < near);
        assert_eq!(out, 0.0);
    }

    #[test]
    fn collection_is_bounded() {
        let mut lights = LightCollection::with_ambient(0.1);
        for _ in 0..MAX_LIGHTS {
            assert!(lights.add(CollectedLight {
                light_type: LightType::default(),
                radiance: Vec3::ONE,
                world_position: Vec3::ZERO,
            }));
        }
        assert!(!lights.add(CollectedLight {
            light_type: LightType::default(),
            radiance: Vec3::ONE,
            world_position: Vec3::ZERO,
        }));
        assert_eq!(lights.len(), MAX_LIGHTS);
    }
}
