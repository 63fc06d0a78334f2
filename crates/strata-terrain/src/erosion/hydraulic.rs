//! Grid-based hydraulic erosion.
//!
//! Water rains uniformly onto every texel, flows toward the steepest
//! 4-neighbor (by water surface level), picks up sediment where it is under
//! capacity and drops it where it is over, then partially evaporates.
//!
//! The flow step is single-buffered: texels are visited in scanline order and
//! later texels see the water, sediment, and heights already written by
//! earlier ones in the same iteration. Results depend on that order.

use strata_heightfield::HeightField;

/// Tunable constants for the hydraulic pass.
#[derive(Clone, Debug, PartialEq)]
pub struct HydraulicErosion {
    /// Water added to every texel per iteration.
    pub rain_rate: f32,
    /// Fraction of water removed from every texel per iteration.
    pub evaporation_rate: f32,
    /// Sediment carried per unit of moved water per unit of height drop.
    pub sediment_capacity: f32,
    /// Fraction of excess sediment dropped per step.
    pub deposition_rate: f32,
    /// Fraction of spare capacity eroded from the source per step.
    pub erosion_rate: f32,
    /// Texels holding less water than this do not flow.
    pub min_water: f32,
}

impl Default for HydraulicErosion {
    fn default() -> Self {
        Self {
            rain_rate: 0.01,
            evaporation_rate: 0.5,
            sediment_capacity: 0.1,
            deposition_rate: 0.3,
            erosion_rate: 0.3,
            min_water: 1e-4,
        }
    }
}

/// Water and sediment carried across the iterations of one erosion call.
#[derive(Clone, Debug, PartialEq)]
pub struct HydraulicState {
    width: usize,
    depth: usize,
    water: Vec<f32>,
    sediment: Vec<f32>,
}

impl HydraulicState {
    /// Dry state for a `width x depth` grid.
    pub fn new(width: usize, depth: usize) -> Self {
        let len = width * depth;
        Self {
            width,
            depth,
            water: vec![0.0; len],
            sediment: vec![0.0; len],
        }
    }

    /// Dry state matching `field`.
    pub fn for_field(field: &HeightField) -> Self {
        Self::new(field.width(), field.depth())
    }

    /// Water per texel, row-major.
    pub fn water(&self) -> &[f32] {
        &self.water
    }

    /// Mutable water per texel.
    pub fn water_mut(&mut self) -> &mut [f32] {
        &mut self.water
    }

    /// Suspended sediment per texel, row-major.
    pub fn sediment(&self) -> &[f32] {
        &self.sediment
    }

    /// Returns `true` if this state was built for `field`'s resolution.
    pub fn matches(&self, field: &HeightField) -> bool {
        self.width == field.width() && self.depth == field.depth()
    }

    /// Total suspended sediment.
    pub fn total_sediment(&self) -> f64 {
        self.sediment.iter().map(|&s| s as f64).sum()
    }
}

/// What a single flow step moved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowTransfer {
    /// Source texel index.
    pub from: usize,
    /// Destination texel index.
    pub to: usize,
    /// Water moved from source to destination.
    pub water: f32,
    /// Sediment carried along with the water.
    pub sediment: f32,
    /// Height change applied to the source: negative for erosion, positive for deposition.
    pub height_change: f32,
}

impl HydraulicErosion {
    /// Run `iterations` full passes over `field`, starting from a dry state.
    ///
    /// Returns the final water/sediment state. Sediment still suspended at the
    /// end is material removed from the terrain.
    pub fn erode(&self, field: &mut HeightField, iterations: u32) -> HydraulicState {
        let mut state = HydraulicState::for_field(field);
        tracing::info!(
            iterations,
            width = field.width(),
            depth = field.depth(),
            "hydraulic erosion started"
        );

        for iteration in 0..iterations {
            let transfers = self.iterate(field, &mut state);
            tracing::debug!(iteration, transfers, "hydraulic iteration");
        }

        tracing::info!(
            suspended = state.total_sediment(),
            "hydraulic erosion finished"
        );
        state
    }

    /// One iteration: rain, a scanline flow pass over interior texels, evaporation.
    ///
    /// Returns the number of texels that moved water. A `state` sized for a
    /// different grid is left untouched and 0 is returned.
    pub fn iterate(&self, field: &mut HeightField, state: &mut HydraulicState) -> usize {
        if !state.matches(field) {
            tracing::warn!(
                state_width = state.width,
                state_depth = state.depth,
                field_width = field.width(),
                field_depth = field.depth(),
                "hydraulic state does not match height field, skipping iteration"
            );
            return 0;
        }

        self.rain(state);

        let width = field.width();
        let depth = field.depth();
        let heights = field.heights_mut();
        let mut transfers = 0;
        for z in 1..depth.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                if self.flow_cell(heights, state, x, z).is_some() {
                    transfers += 1;
                }
            }
        }

        self.evaporate(state);
        transfers
    }

    /// Add `rain_rate` water to every texel.
    pub fn rain(&self, state: &mut HydraulicState) {
        for w in &mut state.water {
            *w += self.rain_rate;
        }
    }

    /// Remove `evaporation_rate` of the water at every texel.
    pub fn evaporate(&self, state: &mut HydraulicState) {
        let keep = 1.0 - self.evaporation_rate;
        for w in &mut state.water {
            *w *= keep;
        }
    }

    /// Flow step for interior texel `(x, z)`, mutating `heights` and `state` in place.
    ///
    /// Returns `None` if the texel is dry, has no lower neighbor, or `heights`
    /// is not the grid `state` was built for. The water moved between source
    /// and destination is conserved exactly by this step.
    pub fn flow_cell(
        &self,
        heights: &mut [f32],
        state: &mut HydraulicState,
        x: usize,
        z: usize,
    ) -> Option<FlowTransfer> {
        let width = state.width;
        if heights.len() != state.water.len() {
            return None;
        }
        if x == 0 || z == 0 || x + 1 >= width || z + 1 >= state.depth {
            return None;
        }

        let i = z * width + x;
        let water = state.water[i];
        if water < self.min_water {
            return None;
        }

        let level = heights[i] + water;
        let mut target: Option<(usize, f32)> = None;
        for n in [i - 1, i + 1, i - width, i + width] {
            let diff = level - (heights[n] + state.water[n]);
            if diff > target.map_or(0.0, |(_, best)| best) {
                target = Some((n, diff));
            }
        }
        let (to, diff) = target?;

        let moved_water = water.min(diff) * 0.5;
        let moved_sediment = state.sediment[i] * (moved_water / water);
        state.water[i] -= moved_water;
        state.water[to] += moved_water;
        state.sediment[i] -= moved_sediment;
        state.sediment[to] += moved_sediment;

        let capacity = moved_water * self.sediment_capacity * diff;
        let carried = state.sediment[i];
        let height_change = if carried < capacity {
            let eroded = diff.min(capacity - carried) * self.erosion_rate;
            heights[i] -= eroded;
            state.sediment[i] += eroded;
            -eroded
        } else {
            let deposited = (carried - capacity) * self.deposition_rate;
            heights[i] += deposited;
            state.sediment[i] -= deposited;
            deposited
        };

        Some(FlowTransfer {
            from: i,
            to,
            water: moved_water,
            sediment: moved_sediment,
            height_change,
        })
    }
}
