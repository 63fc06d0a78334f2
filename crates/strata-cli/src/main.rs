//! `strata`: generate a terrain from config and CLI flags, report on it, and
//! write preview images.

mod params;
mod platform;
mod preview;

use clap::Parser;
use strata_config::{CliArgs, Config, ConfigError};
use strata_edit::ParseBrushError;
use strata_heightfield::{HeightField, HeightFieldError};
use strata_terrain::{
    Biome, ClimateMaps, GenerationJob, render_biome_debug, render_heightmap_debug, run_job,
};

use crate::platform::AppDirs;

/// Failures that abort a run.
#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid terrain parameters: {0}")]
    Terrain(#[from] HeightFieldError),

    #[error("invalid brush settings: {0}")]
    Brush(#[from] ParseBrushError),

    #[error("failed to write preview: {0}")]
    Preview(#[from] png::EncodingError),

    #[error("failed to create output directory: {0}")]
    Output(#[source] std::io::Error),
}

fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(&args) {
        eprintln!("strata: {e}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), AppError> {
    let dirs = match &args.config {
        Some(dir) => AppDirs::with_config_dir(dir.clone()),
        None => AppDirs::resolve(),
    };

    let mut config = Config::load_or_create(&dirs.config_dir)?;
    config.apply_cli_overrides(args);
    strata_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));

    tracing::info!(config_dir = %dirs.config_dir.display(), "configuration loaded");

    let job = GenerationJob {
        id: 0,
        params: params::synthesis_params(&config),
        erosion: Some(params::erosion_pipeline(&config.erosion)),
    };
    let mut terrain = run_job(&job)?;
    tracing::info!(elapsed_us = terrain.generation_time_us, "terrain generated");

    if let Some(report) = &terrain.erosion {
        tracing::info!(
            volume_before = report.volume_before,
            volume_after = report.volume_after,
            suspended_sediment = report.suspended_sediment,
            "erosion summary"
        );
    }

    let stamps = params::apply_stamps(&config.brush, &mut terrain.output.field)?;
    if stamps > 0 {
        tracing::info!(stamps, "brush stamps applied");
    }

    let field = &terrain.output.field;
    report_field(field);
    if let Some(climate) = &terrain.output.climate {
        report_biomes(climate);
    }
    report_lods(field, &params::lod_selector(&config.lod));

    if config.output.write_png {
        let out_dir = &config.output.directory;
        std::fs::create_dir_all(out_dir).map_err(AppError::Output)?;

        let heightmap = render_heightmap_debug(field, config.generation.water_level);
        preview::write_png(&out_dir.join("heightmap.png"), &heightmap)?;

        if let Some(climate) = &terrain.output.climate {
            preview::write_png(&out_dir.join("biomes.png"), &render_biome_debug(climate))?;
        }
    }

    Ok(())
}

fn report_field(field: &HeightField) {
    let (min, max) = field.min_max();
    tracing::info!(
        width = field.width(),
        depth = field.depth(),
        min,
        max,
        volume = field.total_volume(),
        "heightfield summary"
    );
}

fn report_biomes(climate: &ClimateMaps) {
    let counts = climate.biome_counts();
    let total = counts.iter().sum::<usize>().max(1);
    for biome in Biome::ALL {
        let count = counts[biome.code() as usize];
        if count > 0 {
            tracing::info!(
                biome = biome.name(),
                texels = count,
                percent = 100.0 * count as f64 / total as f64,
                "biome coverage"
            );
        }
    }
}

fn report_lods(field: &HeightField, selector: &strata_lod::LodSelector) {
    for level in selector.levels() {
        let mesh = field.generate_mesh(level.level);
        tracing::info!(
            level = level.level,
            distance = level.distance,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            vertex_bytes = mesh.vertex_bytes().len(),
            "LOD mesh"
        );
    }
}
