//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Planet geometry.
    pub planet: PlanetConfig,
    /// Height perturbation settings.
    pub terrain: TerrainConfig,
    /// Blend lookup table generation.
    pub blend: BlendConfig,
    /// LOD selection.
    pub lod: LodConfig,
    /// Camera and viewport.
    pub view: ViewConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Planet geometry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Sphere radius, also the cube half-extent.
    pub radius: u32,
    /// Quadtree depth per face.
    pub quad_divs: u32,
    /// Segments per patch side (power of two).
    pub tri_divs: u32,
    /// Base material name; faces append `_FR`, `_BK`, ...
    pub material: String,
}

/// Height perturbation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    pub seed: u64,
    /// Number of perturbations.
    pub iterations: u32,
    /// Height step is `radius / magnitude_divisor`.
    pub magnitude_divisor: f32,
}

/// Blend lookup table generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlendConfig {
    /// PNG read at finalise, written by the generator.
    pub lookup_path: PathBuf,
    /// Side length of the generated table.
    pub size: u32,
    /// Noise lattice step per table cell.
    pub noise_scale: f64,
    /// How strongly noise breaks up band edges.
    pub noise_factor: f32,
    /// Start and end of the high band.
    pub peak: [f32; 2],
    /// Low, mid and high transition heights.
    pub trough: [f32; 3],
    pub base_steep: bool,
    pub dirt_steep: bool,
    pub rock_steep: bool,
}

/// LOD selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Renders skipped between LOD updates.
    pub frames_per_update: u32,
    /// Divisor of the one-to-one pixel threshold.
    pub pixel_divisor: f64,
}

/// Camera and viewport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f64,
    pub near: f64,
    pub far: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 512,
            quad_divs: 2,
            tri_divs: 16,
            material: "Planet".to_string(),
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: 200,
            magnitude_divisor: 200.0,
        }
    }
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            lookup_path: PathBuf::from("lut.png"),
            size: 512,
            noise_scale: 0.05,
            noise_factor: 0.2,
            peak: [0.70, 0.90],
            trough: [0.65, 0.80, 0.95],
            base_steep: false,
            dirt_steep: true,
            rock_steep: true,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            frames_per_update: 4,
            pixel_divisor: 10.0,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280,
            viewport_height: 720,
            fov_y_degrees: 45.0,
            near: 1.0,
            far: 100_000.0,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Validation ---

/// Largest blend table side `validate` accepts.
pub const MAX_BLEND_SIZE: u32 = 8192;

impl Config {
    /// Rejects values the planet can't be built or viewed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        if self.terrain.magnitude_divisor <= 0.0 {
            return invalid(format!(
                "terrain.magnitude_divisor must be positive, got {}",
                self.terrain.magnitude_divisor
            ));
        }
        if !(2..=MAX_BLEND_SIZE).contains(&self.blend.size) {
            return invalid(format!(
                "blend.size must be within 2..={MAX_BLEND_SIZE}, got {}",
                self.blend.size
            ));
        }
        if self.blend.noise_scale <= 0.0 {
            return invalid(format!("blend.noise_scale must be positive, got {}", self.blend.noise_scale));
        }
        let b = &self.blend;
        let positions = [b.trough[0], b.peak[0], b.trough[1], b.peak[1], b.trough[2]];
        if positions.iter().any(|v| !(0.0..=1.0).contains(v))
            || positions.windows(2).any(|w| w[0] >= w[1])
        {
            return invalid(format!(
                "blend bands must be ordered trough < peak < trough < peak < trough within 0..1, got {positions:?}"
            ));
        }
        if self.lod.pixel_divisor <= 0.0 {
            return invalid(format!("lod.pixel_divisor must be positive, got {}", self.lod.pixel_divisor));
        }
        if self.view.viewport_width == 0 || self.view.viewport_height == 0 {
            return invalid("view viewport must be non-empty".to_string());
        }
        if self.view.near <= 0.0 || self.view.far <= self.view.near {
            return invalid(format!(
                "view clip range {}..{} is invalid",
                self.view.near, self.view.far
            ));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("radius: 512"));
        assert!(ron_str.contains("frames_per_update: 4"));
        assert!(ron_str.contains("\"lut.png\""));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(planet: (radius: 1024), lod: ())";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.planet.radius, 1024);
        assert_eq!(config.planet.tri_divs, 16, "missing field keeps its default");
        assert_eq!(config.blend, BlendConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(future_setting: true)");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.planet.radius = 2048;
        config.terrain.seed = 99;
        config.blend.lookup_path = PathBuf::from("media/lookup.png");

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.ron").exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.lod.frames_per_update = 0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.lod.frames_per_update), Some(0));
        assert!(modified.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.view.far = config.view.near;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.lod.pixel_divisor = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("pixel_divisor"), "message: {err}");

        let mut config = Config::default();
        config.blend.size = 65_536;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blend.size"), "message: {err}");
        config.blend.size = MAX_BLEND_SIZE;
        assert!(config.validate().is_ok(), "the cap itself is allowed");

        let mut config = Config::default();
        config.blend.peak = [0.85, 0.90];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "peak above trough");
    }
}
