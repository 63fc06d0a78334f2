//! Layered-noise heightmap synthesis.
//!
//! Four fixed layers are blended per texel: a continental fBm for landmass
//! shape, a regional fBm for hills, a local fBm for fine detail, and a ridged
//! Perlin term for sharp crests. A `^1.3` contrast curve then flattens
//! lowlands and sharpens peaks before scaling to world units.

use strata_heightfield::{HeightField, HeightFieldError};
use strata_noise::NoiseSource;

use crate::biome::ClimateMaps;

/// Exponent of the contrast curve applied to the blended height.
const CONTRAST: f64 = 1.3;

/// Parameters for one synthesis run.
#[derive(Clone, Debug, PartialEq)]
pub struct SynthesisParams {
    /// Seed for the permutation table. Identical seeds give identical terrain.
    pub seed: u32,
    /// Samples along X.
    pub width: usize,
    /// Samples along Z.
    pub depth: usize,
    /// World-space size along X.
    pub world_width: f32,
    /// World-space size along Z.
    pub world_depth: f32,
    /// Multiplier from normalized height to world units.
    pub height_scale: f32,
    /// Normalized height below which texels are ocean.
    pub water_level: f32,
    /// Derive moisture, temperature, and biomes alongside the heights.
    pub generate_biomes: bool,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            width: 128,
            depth: 128,
            world_width: 256.0,
            world_depth: 256.0,
            height_scale: 100.0,
            water_level: 0.3,
            generate_biomes: true,
        }
    }
}

/// Result of [`TerrainSynthesizer::generate`].
#[derive(Clone, Debug)]
pub struct SynthesisOutput {
    /// The synthesized heightmap, declared range `[0, height_scale]`.
    pub field: HeightField,
    /// Climate grids, present when biome generation was requested.
    pub climate: Option<ClimateMaps>,
}

/// Builds heightmaps (and optionally climate maps) from a seeded noise source.
pub struct TerrainSynthesizer {
    noise: NoiseSource,
    params: SynthesisParams,
}

impl TerrainSynthesizer {
    /// Create a synthesizer; the noise table is built once here.
    pub fn new(params: SynthesisParams) -> Self {
        Self {
            noise: NoiseSource::new(params.seed),
            params,
        }
    }

    /// Generate a fresh field at the configured resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HeightFieldError`] if the resolution or extent is degenerate.
    pub fn generate(&self) -> Result<SynthesisOutput, HeightFieldError> {
        let p = &self.params;
        let mut field = HeightField::new(p.width, p.depth, p.world_width, p.world_depth)?
            .with_height_range(0.0, p.height_scale);

        tracing::info!(
            seed = p.seed,
            width = p.width,
            depth = p.depth,
            biomes = p.generate_biomes,
            "synthesizing terrain"
        );

        self.generate_heights(&mut field);
        let climate = p.generate_biomes.then(|| self.climate(&field));

        Ok(SynthesisOutput { field, climate })
    }

    /// Overwrite every sample of `field` with synthesized heights, using the
    /// field's own resolution.
    pub fn generate_heights(&self, field: &mut HeightField) {
        let width = field.width();
        let depth = field.depth();
        let scale = self.params.height_scale as f64;

        for z in 0..depth {
            for x in 0..width {
                let nx = x as f64 / width as f64;
                let nz = z as f64 / depth as f64;
                let height = self.normalized_height(nx, nz) * scale;
                field.set_height(x, z, height as f32);
            }
        }

        let (lo, hi) = field.min_max();
        tracing::debug!(min = lo, max = hi, "base heightmap complete");
    }

    /// Blended, contrast-shaped height in normalized units at grid fraction `(nx, nz)`.
    pub fn normalized_height(&self, nx: f64, nz: f64) -> f64 {
        let noise = &self.noise;
        let continental = noise.fbm2d(nx * 1.0, nz * 1.0, 3, 0.5);
        let regional = noise.fbm2d(nx * 4.0, nz * 4.0, 4, 0.6);
        let local = noise.fbm2d(nx * 16.0, nz * 16.0, 4, 0.5);
        let ridges = 1.0 - noise.perlin2d(nx * 8.0, nz * 8.0).abs();

        let blended = continental * 0.5
            + regional * 0.3
            + local * 0.15
            + ridges * ridges * ridges * 0.2;

        // The contrast curve is undefined for negative bases.
        libm::pow(blended.max(0.0), CONTRAST)
    }

    /// Derive climate grids for an existing field.
    pub fn climate(&self, field: &HeightField) -> ClimateMaps {
        ClimateMaps::derive(
            &self.noise,
            field,
            self.params.height_scale,
            self.params.water_level,
        )
    }

    /// Parameters this synthesizer was built with.
    pub fn params(&self) -> &SynthesisParams {
        &self.params
    }

    /// The shared noise source.
    pub fn noise(&self) -> &NoiseSource {
        &self.noise
    }
}
