//! Erosion passes that refine a synthesized height field in place.
//!
//! [`HydraulicErosion`] and [`ThermalErosion`] have different
//! contracts: the hydraulic pass mutates heights while it scans (single
//! buffered, scan-order dependent), the thermal pass reads a frozen field and
//! applies a [`ChangeBuffer`] afterwards (double buffered).
//!
//! Neither pass checks for convergence or guards against divergence. Rates
//! above 1 or a non-positive talus can make heights grow without bound; set
//! [`ErosionPipeline::height_clamp`] to bound them.

mod hydraulic;
mod thermal;

pub use hydraulic::{FlowTransfer, HydraulicErosion, HydraulicState};
pub use thermal::{ChangeBuffer, ThermalErosion};

use strata_heightfield::HeightField;

/// Hydraulic then thermal erosion with fixed iteration counts.
#[derive(Clone, Debug, PartialEq)]
pub struct ErosionPipeline {
    /// Hydraulic pass constants.
    pub hydraulic: HydraulicErosion,
    /// Thermal pass constants.
    pub thermal: ThermalErosion,
    /// Hydraulic iterations; 0 skips the pass.
    pub hydraulic_iterations: u32,
    /// Thermal iterations; 0 skips the pass.
    pub thermal_iterations: u32,
    /// When set, heights are clamped to `±height_clamp * height_scale` after
    /// each pass.
    pub height_clamp: Option<f32>,
}

impl Default for ErosionPipeline {
    fn default() -> Self {
        Self {
            hydraulic: HydraulicErosion::default(),
            thermal: ThermalErosion::default(),
            hydraulic_iterations: 50,
            thermal_iterations: 25,
            height_clamp: None,
        }
    }
}

/// Volume bookkeeping for one pipeline run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErosionReport {
    /// `Σ heights` before erosion.
    pub volume_before: f64,
    /// `Σ heights` after erosion.
    pub volume_after: f64,
    /// Sediment still suspended when the hydraulic pass ended.
    pub suspended_sediment: f64,
}

impl ErosionReport {
    /// Net material removed (positive) or added (negative).
    pub fn net_loss(&self) -> f64 {
        self.volume_before - self.volume_after
    }
}

impl ErosionPipeline {
    /// Run both passes on `field`. `height_scale` is only used by the clamp.
    pub fn run(&self, field: &mut HeightField, height_scale: f32) -> ErosionReport {
        let volume_before = field.total_volume();
        let mut suspended_sediment = 0.0;

        if self.hydraulic_iterations > 0 {
            let state = self.hydraulic.erode(field, self.hydraulic_iterations);
            suspended_sediment = state.total_sediment();
            self.clamp(field, height_scale);
        }
        if self.thermal_iterations > 0 {
            self.thermal.erode(field, self.thermal_iterations);
            self.clamp(field, height_scale);
        }

        let report = ErosionReport {
            volume_before,
            volume_after: field.total_volume(),
            suspended_sediment,
        };
        tracing::info!(
            before = report.volume_before,
            after = report.volume_after,
            net_loss = report.net_loss(),
            "erosion complete"
        );
        report
    }

    fn clamp(&self, field: &mut HeightField, height_scale: f32) {
        let Some(multiple) = self.height_clamp else {
            return;
        };
        let limit = (multiple * height_scale).abs();
        let mut clamped = 0usize;
        for h in field.heights_mut() {
            let bounded = (*h).clamp(-limit, limit);
            if bounded != *h {
                *h = bounded;
                clamped += 1;
            }
        }
        if clamped > 0 {
            tracing::warn!(clamped, limit, "erosion heights clamped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bumpy_field() -> HeightField {
        let heights = (0..24 * 24)
            .map(|i| {
                let (x, z) = ((i % 24) as f32, (i / 24) as f32);
                (x * 0.7).sin() * 3.0 + (z * 0.4).cos() * 2.0 + 5.0
            })
            .collect();
        HeightField::from_heights(24, 24, 24.0, 24.0, heights).unwrap()
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let mut field = bumpy_field();
        let before = field.clone();
        let report = ErosionPipeline {
            hydraulic_iterations: 0,
            thermal_iterations: 0,
            ..Default::default()
        }
        .run(&mut field, 10.0);
        assert_eq!(field, before);
        assert_eq!(report.net_loss(), 0.0);
    }

    #[test]
    fn test_default_pipeline_erodes() {
        let mut field = bumpy_field();
        let report = ErosionPipeline::default().run(&mut field, 10.0);
        assert!(report.net_loss() > 0.0, "expected net erosion: {report:?}");
        assert!(field.heights().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_clamp_bounds_unstable_parameters() {
        let mut field = bumpy_field();
        let pipeline = ErosionPipeline {
            thermal: ThermalErosion {
                talus: -1.0,
                erosion_rate: 4.0,
            },
            hydraulic_iterations: 0,
            thermal_iterations: 3,
            height_clamp: Some(2.0),
            ..Default::default()
        };
        pipeline.run(&mut field, 10.0);
        for &h in field.heights() {
            assert!(h.abs() <= 20.0 + 1e-3, "height {h} escaped the clamp");
        }
    }
}
