//! Conversions from config sections into runtime parameter types.

use strata_config::{BrushConfig, Config, ErosionConfig, LodConfig};
use strata_edit::{BrushKind, Falloff, HeightBrush, ParseBrushError};
use strata_heightfield::HeightField;
use strata_lod::{LodLevel, LodSelector};
use strata_terrain::{ErosionPipeline, HydraulicErosion, SynthesisParams, ThermalErosion};

pub fn synthesis_params(config: &Config) -> SynthesisParams {
    let g = &config.generation;
    SynthesisParams {
        seed: g.seed,
        width: g.width,
        depth: g.depth,
        world_width: g.world_width,
        world_depth: g.world_depth,
        height_scale: g.height_scale,
        water_level: g.water_level,
        generate_biomes: g.biomes,
    }
}

pub fn erosion_pipeline(config: &ErosionConfig) -> ErosionPipeline {
    ErosionPipeline {
        hydraulic: HydraulicErosion {
            rain_rate: config.rain_rate,
            evaporation_rate: config.evaporation_rate,
            sediment_capacity: config.sediment_capacity,
            deposition_rate: config.deposition_rate,
            erosion_rate: config.erosion_rate,
            ..Default::default()
        },
        thermal: ThermalErosion {
            talus: config.talus,
            erosion_rate: config.thermal_rate,
        },
        hydraulic_iterations: config.hydraulic_iterations,
        thermal_iterations: config.thermal_iterations,
        height_clamp: config.height_clamp,
    }
}

/// One level per configured distance, halving detail at each step.
pub fn lod_selector(config: &LodConfig) -> LodSelector {
    let levels = config
        .distances
        .iter()
        .enumerate()
        .map(|(i, &distance)| LodLevel::new(i as u8, distance, 0.5f32.powi(i as i32)))
        .collect();
    LodSelector::new(levels)
}

pub fn height_brush(config: &BrushConfig) -> Result<HeightBrush, ParseBrushError> {
    let falloff: Falloff = config.falloff.parse()?;
    Ok(HeightBrush::default()
        .with_radius(config.radius)
        .with_strength(config.strength)
        .with_falloff(falloff)
        .with_target_height(config.target_height))
}

/// Apply every configured stamp to `field`. Returns the number applied.
///
/// # Errors
///
/// Fails before touching `field` if any stamp or the falloff is misnamed.
pub fn apply_stamps(config: &BrushConfig, field: &mut HeightField) -> Result<usize, ParseBrushError> {
    let mut brush = height_brush(config)?;
    let stamps = config
        .stamps
        .iter()
        .map(|stamp| Ok((stamp.kind.parse::<BrushKind>()?, stamp.x, stamp.z)))
        .collect::<Result<Vec<_>, ParseBrushError>>()?;

    for &(kind, x, z) in &stamps {
        brush.set_kind(kind);
        brush.apply(field, x, z);
    }
    Ok(stamps.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_config::BrushStamp;

    #[test]
    fn test_default_config_matches_runtime_defaults() {
        let config = Config::default();
        assert_eq!(synthesis_params(&config), SynthesisParams::default());
        assert_eq!(erosion_pipeline(&config.erosion), ErosionPipeline::default());
        assert_eq!(lod_selector(&config.lod), LodSelector::default());
    }

    #[test]
    fn test_brush_from_config() {
        let brush = height_brush(&BrushConfig {
            falloff: "sharp".to_string(),
            radius: 0.0,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(brush.falloff(), Falloff::Sharp);
        assert_eq!(brush.radius(), strata_edit::MIN_RADIUS);
    }

    #[test]
    fn test_stamps_applied_in_order() {
        let mut field = HeightField::new(11, 11, 10.0, 10.0).unwrap();
        let config = BrushConfig {
            strength: 1.0,
            radius: 2.0,
            stamps: vec![
                BrushStamp {
                    kind: "raise".to_string(),
                    x: 0.0,
                    z: 0.0,
                },
                BrushStamp {
                    kind: "raise".to_string(),
                    x: 0.0,
                    z: 0.0,
                },
            ],
            ..Default::default()
        };
        assert_eq!(apply_stamps(&config, &mut field).unwrap(), 2);
        assert!((field.height_at(5, 5) - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_bad_stamp_leaves_field_untouched() {
        let mut field = HeightField::new(11, 11, 10.0, 10.0).unwrap();
        let before = field.clone();
        let config = BrushConfig {
            stamps: vec![
                BrushStamp {
                    kind: "raise".to_string(),
                    x: 0.0,
                    z: 0.0,
                },
                BrushStamp {
                    kind: "chisel".to_string(),
                    x: 0.0,
                    z: 0.0,
                },
            ],
            ..Default::default()
        };
        assert!(apply_stamps(&config, &mut field).is_err());
        assert_eq!(field, before);
    }
}
