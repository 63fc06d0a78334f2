//! Procedural terrain: layered-noise synthesis, climate and biome
//! classification, hydraulic and thermal erosion, debug previews, and a
//! background generation pool.

mod async_generation;
mod synthesis;

pub mod biome;
pub mod debug_viz;
pub mod erosion;

pub use async_generation::{
    BackgroundGenerator, GeneratedTerrain, GenerationError, GenerationJob, JobId, run_job,
};
pub use biome::{Biome, ClimateMaps, classify};
pub use debug_viz::{DebugImage, render_biome_debug, render_heightmap_debug};
pub use erosion::{
    ChangeBuffer, ErosionPipeline, ErosionReport, FlowTransfer, HydraulicErosion, HydraulicState,
    ThermalErosion,
};
pub use synthesis::{SynthesisOutput, SynthesisParams, TerrainSynthesizer};
