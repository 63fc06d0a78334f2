//! Moisture and temperature fields derived from noise, latitude, and altitude.

use strata_heightfield::HeightField;
use strata_noise::NoiseSource;

use super::{Biome, classify};

/// Offset that decorrelates the moisture noise from the height noise.
const MOISTURE_OFFSET: f64 = 1000.0;
const MOISTURE_FREQUENCY: f64 = 3.0;

/// Per-texel climate and biome grids for one synthesis run.
///
/// Same resolution and row-major layout as the height field they were
/// derived from. They belong to the synthesis result, not to the field.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimateMaps {
    width: usize,
    depth: usize,
    /// Moisture in `[0, 1]`.
    pub moisture: Vec<f32>,
    /// Temperature in `[0, 1]`.
    pub temperature: Vec<f32>,
    /// Classified biome per texel.
    pub biomes: Vec<Biome>,
}

impl ClimateMaps {
    /// Derive moisture, temperature and biomes for every texel of `field`.
    pub fn derive(
        noise: &NoiseSource,
        field: &HeightField,
        height_scale: f32,
        water_level: f32,
    ) -> Self {
        let width = field.width();
        let depth = field.depth();
        let len = width * depth;
        let mut moisture = Vec::with_capacity(len);
        let mut temperature = Vec::with_capacity(len);
        let mut biomes = Vec::with_capacity(len);

        for z in 0..depth {
            for x in 0..width {
                let nx = x as f64 / width as f64;
                let nz = z as f64 / depth as f64;
                let normalized = normalized_height(field.height_at(x, z), height_scale);

                let m = moisture_at(noise, nx, nz, normalized);
                let t = temperature_at(nz, normalized);
                moisture.push(m);
                temperature.push(t);
                biomes.push(classify(normalized, m, t, water_level));
            }
        }

        Self {
            width,
            depth,
            moisture,
            temperature,
            biomes,
        }
    }

    /// Grid width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid depth in texels.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Biome at `(x, z)`, or `None` outside the grid.
    pub fn biome_at(&self, x: usize, z: usize) -> Option<Biome> {
        (x < self.width && z < self.depth).then(|| self.biomes[z * self.width + x])
    }

    /// Number of texels per biome, indexed by [`Biome::code`].
    pub fn biome_counts(&self) -> [usize; 8] {
        let mut counts = [0usize; 8];
        for biome in &self.biomes {
            counts[biome.code() as usize] += 1;
        }
        counts
    }
}

fn normalized_height(height: f32, height_scale: f32) -> f32 {
    if height_scale > 0.0 {
        height / height_scale
    } else {
        0.0
    }
}

/// Noise-driven base moisture plus a bonus for low-lying ground.
fn moisture_at(noise: &NoiseSource, nx: f64, nz: f64, normalized: f32) -> f32 {
    let base = noise.fbm2d(
        nx * MOISTURE_FREQUENCY + MOISTURE_OFFSET,
        nz * MOISTURE_FREQUENCY + MOISTURE_OFFSET,
        4,
        0.5,
    ) as f32;
    let lowland = (1.0 - normalized).max(0.0);
    (0.7 * base + 0.3 * lowland).clamp(0.0, 1.0)
}

/// Falls off with distance from the `nz = 0.5` midline and with altitude.
fn temperature_at(nz: f64, normalized: f32) -> f32 {
    let latitude = ((nz - 0.5).abs() * 2.0) as f32;
    let altitude = (normalized / 0.7).min(1.0);
    ((1.0 - 0.7 * latitude) - 0.6 * altitude).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_temperature_peaks_at_midline_sea_level() {
        assert!((temperature_at(0.5, 0.0) - 1.0).abs() < EPSILON);
        assert!(temperature_at(0.0, 0.0) < temperature_at(0.25, 0.0));
        assert!((temperature_at(0.0, 0.0) - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_temperature_falls_with_altitude() {
        let low = temperature_at(0.5, 0.1);
        let high = temperature_at(0.5, 0.6);
        assert!(high < low);
        assert!((temperature_at(0.5, 5.0) - 0.4).abs() < EPSILON);
    }

    #[test]
    fn test_temperature_never_negative() {
        assert_eq!(temperature_at(0.0, 1.0), 0.0);
    }

    #[test]
    fn test_moisture_in_unit_range() {
        let noise = NoiseSource::new(9);
        for i in 0..500 {
            let nx = i as f64 / 500.0;
            for normalized in [0.0, 0.5, 1.0, 3.0] {
                let m = moisture_at(&noise, nx, 1.0 - nx, normalized);
                assert!((0.0..=1.0).contains(&m), "moisture {m} at nx={nx}");
            }
        }
    }

    #[test]
    fn test_derive_matches_field_resolution() {
        let noise = NoiseSource::new(3);
        let field = HeightField::new(12, 7, 10.0, 10.0).unwrap();
        let maps = ClimateMaps::derive(&noise, &field, 100.0, 0.3);
        assert_eq!(maps.moisture.len(), 84);
        assert_eq!(maps.temperature.len(), 84);
        assert_eq!(maps.biomes.len(), 84);
        // a flat field at height 0 lies below the water level everywhere
        assert!(maps.biomes.iter().all(|&b| b == Biome::Ocean));
        assert_eq!(maps.biome_counts()[Biome::Ocean.code() as usize], 84);
        assert_eq!(maps.biome_at(12, 0), None);
    }
}
