//! Heightmap and biome preview renderers.

use strata_heightfield::HeightField;

use super::image::DebugImage;
use crate::biome::{Biome, ClimateMaps};

/// Render `field` with one pixel per sample, color-coded by elevation.
///
/// `water_level` is in normalized units of the field's declared height range.
pub fn render_heightmap_debug(field: &HeightField, water_level: f32) -> DebugImage {
    let mut image = DebugImage::new(field.width() as u32, field.depth() as u32);
    let range = field.max_height() - field.min_height();

    for z in 0..field.depth() {
        for x in 0..field.width() {
            let h = field.height_at(x, z);
            let normalized = if range > 0.0 {
                ((h - field.min_height()) / range).clamp(0.0, 1.0)
            } else {
                0.0
            };
            image.set_rgb(x as u32, z as u32, height_to_color(normalized, water_level));
        }
    }

    image
}

/// Map a normalized height to a preview color: grayscale by elevation, with
/// a blue tint below `water_level`.
pub fn height_to_color(normalized: f32, water_level: f32) -> [u8; 3] {
    let grey = (normalized.clamp(0.0, 1.0) * 255.0) as u8;
    if normalized < water_level {
        [grey / 3, grey / 2, grey.saturating_add(96)]
    } else {
        [grey, grey, grey]
    }
}

/// Render the biome grid using each biome's preview color.
pub fn render_biome_debug(climate: &ClimateMaps) -> DebugImage {
    let mut image = DebugImage::new(climate.width() as u32, climate.depth() as u32);
    for z in 0..climate.depth() {
        for x in 0..climate.width() {
            let biome = climate.biome_at(x, z).unwrap_or(Biome::Ocean);
            image.set_rgb(x as u32, z as u32, biome.color());
        }
    }
    image
}
