//! Command-line argument parsing for the `strata` generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Terrain generator command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Procedural terrain generator")]
pub struct CliArgs {
    /// Noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Samples along X.
    #[arg(long)]
    pub width: Option<usize>,

    /// Samples along Z.
    #[arg(long)]
    pub depth: Option<usize>,

    /// Normalized-to-world height multiplier.
    #[arg(long)]
    pub height_scale: Option<f32>,

    /// Normalized water level (0.0 - 1.0).
    #[arg(long)]
    pub water_level: Option<f32>,

    /// Hydraulic erosion iterations.
    #[arg(long)]
    pub hydraulic_iterations: Option<u32>,

    /// Thermal erosion iterations.
    #[arg(long)]
    pub thermal_iterations: Option<u32>,

    /// Skip climate and biome classification.
    #[arg(long)]
    pub no_biomes: bool,

    /// Directory for preview images.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.generation.seed = seed;
        }
        if let Some(w) = args.width {
            self.generation.width = w;
        }
        if let Some(d) = args.depth {
            self.generation.depth = d;
        }
        if let Some(scale) = args.height_scale {
            self.generation.height_scale = scale;
        }
        if let Some(level) = args.water_level {
            self.generation.water_level = level;
        }
        if let Some(n) = args.hydraulic_iterations {
            self.erosion.hydraulic_iterations = n;
        }
        if let Some(n) = args.thermal_iterations {
            self.erosion.thermal_iterations = n;
        }
        if args.no_biomes {
            self.generation.biomes = false;
        }
        if let Some(ref dir) = args.output {
            self.output.directory = dir.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(42),
            thermal_iterations: Some(0),
            no_biomes: true,
            output: Some(PathBuf::from("/tmp/strata")),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.generation.seed, 42);
        assert_eq!(config.erosion.thermal_iterations, 0);
        assert!(!config.generation.biomes);
        assert_eq!(config.output.directory, PathBuf::from("/tmp/strata"));
        // Non-overridden fields retain defaults
        assert_eq!(config.generation.width, 128);
        assert_eq!(config.erosion.hydraulic_iterations, 50);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "strata",
            "--seed",
            "7",
            "--width",
            "64",
            "--height-scale",
            "50",
            "--no-biomes",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.width, Some(64));
        assert_eq!(args.height_scale, Some(50.0));
        assert!(args.no_biomes);
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.depth, None);
    }
}
