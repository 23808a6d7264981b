//! Tunable parameters and the viewer configuration file.
//!
//! Every parameter is clamped to its documented range whenever it enters the
//! crate, whether from a TOML file, the command line or a setter.

use crate::color::ColorBounds;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the generated sphere field. Changing any of them
/// regenerates the whole field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    /// Number of spheres, in `[1, 15000]`.
    pub count: u32,
    /// Scale factor of each sphere, in `[0.1, 2]`.
    pub size: f32,
    /// Edge length of the cube the spheres are scattered in, in `[0.1, 50]`.
    pub spread: f32,
    /// Emissive intensity of every material, in `[0.01, 1]`.
    pub emissive_intensity: f32,
    /// Probability that a sphere glows, in `[0, 1]`.
    pub glow_ratio: f32,
    /// Icosphere subdivision level, in `[0, 4]`.
    pub detail: u32,
    /// Bounds of the generated colors.
    pub colors: ColorBounds,
}

impl SceneParams {
    pub const COUNT_RANGE: (u32, u32) = (1, 15_000);
    pub const SIZE_RANGE: (f32, f32) = (0.1, 2.0);
    pub const SPREAD_RANGE: (f32, f32) = (0.1, 50.0);
    pub const EMISSIVE_RANGE: (f32, f32) = (0.01, 1.0);
    pub const DETAIL_MAX: u32 = crate::procedural::MAX_ICOSPHERE_DETAIL;

    /// Returns a copy with every field clamped to its range.
    pub fn clamped(self) -> SceneParams {
        SceneParams {
            count: self.count.clamp(Self::COUNT_RANGE.0, Self::COUNT_RANGE.1),
            size: clamp_f32(self.size, Self::SIZE_RANGE, 0.5),
            spread: clamp_f32(self.spread, Self::SPREAD_RANGE, 10.0),
            emissive_intensity: clamp_f32(self.emissive_intensity, Self::EMISSIVE_RANGE, 1.0),
            glow_ratio: clamp_f32(self.glow_ratio, (0.0, 1.0), 0.5),
            detail: self.detail.min(Self::DETAIL_MAX),
            colors: self.colors,
        }
    }
}

impl Default for SceneParams {
    fn default() -> Self {
        SceneParams {
            count: 1000,
            size: 0.5,
            spread: 10.0,
            emissive_intensity: 1.0,
            glow_ratio: 0.5,
            detail: 1,
            colors: ColorBounds::pastel(),
        }
    }
}

/// Parameters of the bloom pass. Changing them never regenerates the field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BloomParams {
    /// Overall bloom intensity, in `[0, 5]`.
    pub strength: f32,
    /// Blend between tight and wide blur levels, in `[0, 1]`.
    pub radius: f32,
    /// Minimum luminance that blooms, in `[0, 5]`.
    pub threshold: f32,
    /// Whether the bloom contributes to the final image.
    pub enabled: bool,
}

impl BloomParams {
    /// Returns a copy with every field clamped to its range.
    pub fn clamped(self) -> BloomParams {
        BloomParams {
            strength: clamp_f32(self.strength, (0.0, 5.0), 1.0),
            radius: clamp_f32(self.radius, (0.0, 1.0), 1.0),
            threshold: clamp_f32(self.threshold, (0.0, 5.0), 0.0),
            enabled: self.enabled,
        }
    }
}

impl Default for BloomParams {
    fn default() -> Self {
        BloomParams {
            strength: 1.0,
            radius: 1.0,
            threshold: 0.0,
            enabled: true,
        }
    }
}

/// Window settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 800,
            height: 600,
            title: "glowfield".to_string(),
            vsync: true,
        }
    }
}

/// Everything the viewer reads at startup.
///
/// # Example
/// ```
/// # use glowfield::config::ViewerConfig;
/// let config = ViewerConfig::from_toml_str("seed = 4\n[scene]\ncount = 20000\n").unwrap();
/// assert_eq!(config.seed, Some(4));
/// assert_eq!(config.scene.count, 15000);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Seed of the field generator. A random seed is drawn when absent.
    pub seed: Option<u64>,
    pub scene: SceneParams,
    pub bloom: BloomParams,
    pub window: WindowConfig,
}

impl ViewerConfig {
    /// Parses a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(contents: &str) -> std::result::Result<ViewerConfig, toml::de::Error> {
        let config: ViewerConfig = toml::from_str(contents)?;
        Ok(config.clamped())
    }

    /// Loads a `.toml` configuration file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<ViewerConfig> {
        let path = path.as_ref();
        if !is_toml(path) {
            return Err(Error::UnsupportedConfigFormat(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Saves this configuration as a `.toml` file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !is_toml(path) {
            return Err(Error::UnsupportedConfigFormat(path.to_path_buf()));
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| Error::ConfigSerialize(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Returns a copy with scene and bloom parameters clamped.
    pub fn clamped(self) -> ViewerConfig {
        ViewerConfig {
            seed: self.seed,
            scene: self.scene.clamped(),
            bloom: self.bloom.clamped(),
            window: WindowConfig {
                width: self.window.width.max(1),
                height: self.window.height.max(1),
                ..self.window
            },
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

/// Clamps `v` into `range`; NaN falls back to `default`.
fn clamp_f32(v: f32, range: (f32, f32), default: f32) -> f32 {
    if v.is_nan() {
        default
    } else {
        v.clamp(range.0, range.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_params_are_clamped() {
        let params = SceneParams {
            count: 0,
            size: 9.0,
            spread: -3.0,
            emissive_intensity: f32::NAN,
            glow_ratio: 2.0,
            detail: 12,
            ..SceneParams::default()
        }
        .clamped();

        assert_eq!(params.count, 1);
        assert_eq!(params.size, 2.0);
        assert_eq!(params.spread, 0.1);
        assert_eq!(params.emissive_intensity, 1.0);
        assert_eq!(params.glow_ratio, 1.0);
        assert_eq!(params.detail, 4);
    }

    #[test]
    fn bloom_params_are_clamped() {
        let params = BloomParams {
            strength: 7.0,
            radius: -1.0,
            threshold: 5.5,
            enabled: false,
        }
        .clamped();

        assert_eq!(params.strength, 5.0);
        assert_eq!(params.radius, 0.0);
        assert_eq!(params.threshold, 5.0);
        assert!(!params.enabled);
    }

    #[test]
    fn empty_document_yields_defaults() {
        assert_eq!(ViewerConfig::from_toml_str("").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ViewerConfig::from_toml_str(
            "[bloom]\nstrength = 2.5\n[window]\ntitle = \"demo\"\n",
        )
        .unwrap();

        assert_eq!(config.bloom.strength, 2.5);
        assert_eq!(config.bloom.radius, 1.0);
        assert_eq!(config.window.title, "demo");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.scene, SceneParams::default());
    }

    #[test]
    fn files_round_trip_through_disk() {
        let path = std::env::temp_dir().join(format!("glowfield-{}.toml", std::process::id()));
        let config = ViewerConfig {
            seed: Some(99),
            ..ViewerConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = ViewerConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn non_toml_files_are_rejected() {
        assert!(matches!(
            ViewerConfig::load_from_file("viewer.ron"),
            Err(Error::UnsupportedConfigFormat(_))
        ));
    }
}
