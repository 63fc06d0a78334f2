//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Heightmap and biome synthesis.
    pub generation: GenerationConfig,
    /// Hydraulic and thermal erosion.
    pub erosion: ErosionConfig,
    /// Level-of-detail distance table.
    pub lod: LodConfig,
    /// Height brush defaults and scripted stamps.
    pub brush: BrushConfig,
    /// Output files.
    pub output: OutputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Synthesis parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Noise seed.
    pub seed: u32,
    /// Samples along X.
    pub width: usize,
    /// Samples along Z.
    pub depth: usize,
    /// World-space extent along X.
    pub world_width: f32,
    /// World-space extent along Z.
    pub world_depth: f32,
    /// Normalized-to-world height multiplier.
    pub height_scale: f32,
    /// Normalized water level (0.0 - 1.0).
    pub water_level: f32,
    /// Derive moisture, temperature and biomes.
    pub biomes: bool,
}

/// Erosion parameters. Iteration counts of 0 skip a pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ErosionConfig {
    /// Rain/flow/evaporate passes.
    pub hydraulic_iterations: u32,
    /// Talus relaxation passes, run after the hydraulic ones.
    pub thermal_iterations: u32,
    /// Water added per texel per hydraulic iteration.
    pub rain_rate: f32,
    /// Fraction of water removed per hydraulic iteration.
    pub evaporation_rate: f32,
    /// Sediment carried per unit of moved water per unit of height drop.
    pub sediment_capacity: f32,
    /// Fraction of excess sediment dropped per flow step.
    pub deposition_rate: f32,
    /// Fraction of spare capacity eroded from the source per flow step.
    pub erosion_rate: f32,
    /// Thermal slope threshold, as a height difference.
    pub talus: f32,
    /// Fraction of the excess over `talus` moved per neighbor.
    pub thermal_rate: f32,
    /// Clamp heights to `±height_clamp * height_scale` after each pass.
    pub height_clamp: Option<f32>,
}

/// LOD switch distances, nearest level first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Camera distance at which each level starts, in world units.
    /// Extra entries beyond the selector's levels are ignored.
    pub distances: Vec<f32>,
}

/// One brush application in world coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrushStamp {
    /// `raise`, `lower`, `smooth` or `flatten`.
    pub kind: String,
    /// World X of the stamp center.
    pub x: f32,
    /// World Z of the stamp center.
    pub z: f32,
}

/// Height brush settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrushConfig {
    /// Radius in world units.
    pub radius: f32,
    /// Strength (0.0 - 1.0).
    pub strength: f32,
    /// `linear`, `smooth` or `sharp`.
    pub falloff: String,
    /// Target height for flatten stamps.
    pub target_height: f32,
    /// Stamps applied after erosion, in order.
    pub stamps: Vec<BrushStamp>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving preview images.
    pub directory: PathBuf,
    /// Write `heightmap.png` and `biomes.png`.
    pub write_png: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            width: 128,
            depth: 128,
            world_width: 256.0,
            world_depth: 256.0,
            height_scale: 100.0,
            water_level: 0.3,
            biomes: true,
        }
    }
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            hydraulic_iterations: 50,
            thermal_iterations: 25,
            rain_rate: 0.01,
            evaporation_rate: 0.5,
            sediment_capacity: 0.1,
            deposition_rate: 0.3,
            erosion_rate: 0.3,
            talus: 0.7,
            thermal_rate: 0.3,
            height_clamp: None,
        }
    }
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            distances: vec![0.0, 100.0, 200.0, 400.0],
        }
    }
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            strength: 0.5,
            falloff: "smooth".to_string(),
            target_height: 0.0,
            stamps: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("out"),
            write_png: true,
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

// --- Load / Save ---

impl Config {
    /// Load `config.ron` from `config_dir`, writing the defaults there first
    /// if the file does not exist yet.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write this config to `config_dir/config.ron`, creating the directory.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::Write {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::Serialize)?;

        let path = config_dir.join(CONFIG_FILE);
        std::fs::write(&path, serialized).map_err(|source| ConfigError::Write { path, source })
    }
}
