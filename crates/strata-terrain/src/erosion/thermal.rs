//! Thermal erosion: slope relaxation toward a talus threshold.
//!
//! Each iteration reads the field without modifying it, accumulates every
//! transfer into a separate change buffer, and applies the buffer once the
//! scan is complete. The outcome of an iteration is therefore independent of
//! the order texels are visited in.

use strata_heightfield::HeightField;

/// Tunable constants for the thermal pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ThermalErosion {
    /// Height difference to a neighbor above which material slides.
    /// A plain height delta in world units, not an angle.
    pub talus: f32,
    /// Fraction of the excess over `talus` moved per neighbor per iteration
    /// (further scaled by 1/4 for the four neighbors).
    pub erosion_rate: f32,
}

impl Default for ThermalErosion {
    fn default() -> Self {
        Self {
            talus: 0.7,
            erosion_rate: 0.3,
        }
    }
}

/// Per-texel height deltas for one thermal iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeBuffer {
    deltas: Vec<f32>,
}

impl ChangeBuffer {
    /// Zeroed buffer sized for `field`.
    pub fn for_field(field: &HeightField) -> Self {
        Self {
            deltas: vec![0.0; field.heights().len()],
        }
    }

    /// Reset every delta to zero.
    pub fn clear(&mut self) {
        self.deltas.fill(0.0);
    }

    /// Accumulated deltas, row-major.
    pub fn deltas(&self) -> &[f32] {
        &self.deltas
    }

    /// Add the accumulated deltas onto `field`.
    pub fn apply(&self, field: &mut HeightField) {
        for (h, d) in field.heights_mut().iter_mut().zip(&self.deltas) {
            *h += d;
        }
    }
}

impl ThermalErosion {
    /// Run `iterations` relaxation passes over `field`.
    pub fn erode(&self, field: &mut HeightField, iterations: u32) {
        tracing::info!(
            iterations,
            talus = self.talus,
            width = field.width(),
            depth = field.depth(),
            "thermal erosion started"
        );

        let mut changes = ChangeBuffer::for_field(field);
        for iteration in 0..iterations {
            changes.clear();
            let moved = self.accumulate(field, &mut changes);
            changes.apply(field);
            tracing::debug!(iteration, moved, "thermal iteration");
        }
    }

    /// Scan every interior texel of a read-only `field` and record transfers
    /// into `changes`. Returns the total material moved, or 0 without touching
    /// `changes` when the buffer was sized for another field.
    pub fn accumulate(&self, field: &HeightField, changes: &mut ChangeBuffer) -> f32 {
        let width = field.width();
        let depth = field.depth();
        let heights = field.heights();
        if changes.deltas.len() != heights.len() {
            tracing::warn!(
                buffer = changes.deltas.len(),
                field = heights.len(),
                "change buffer does not match height field, skipping scan"
            );
            return 0.0;
        }
        let deltas = &mut changes.deltas;
        let mut moved = 0.0;

        for z in 1..depth.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                let i = z * width + x;
                let h = heights[i];
                for n in [i - 1, i + 1, i - width, i + width] {
                    let diff = h - heights[n];
                    if diff > self.talus {
                        let amount = (diff - self.talus) * self.erosion_rate * 0.25;
                        deltas[i] -= amount;
                        deltas[n] += amount;
                        moved += amount;
                    }
                }
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_change_buffer_is_ignored() {
        let thermal = ThermalErosion::default();
        let field = spike_field(7, 5.0);
        let mut small = ChangeBuffer::for_field(&spike_field(3, 0.0));
        assert_eq!(thermal.accumulate(&field, &mut small), 0.0);
        assert!(small.deltas().iter().all(|&d| d == 0.0));

        let mut matching = ChangeBuffer::for_field(&field);
        assert!(thermal.accumulate(&field, &mut matching) > 0.0);
    }

    fn spike_field(size: usize, peak: f32) -> HeightField {
        let mut field = HeightField::new(size, size, size as f32, size as f32).unwrap();
        field.set_height(size / 2, size / 2, peak);
        field
    }

    #[test]
    fn test_spike_converges_to_talus_limit() {
        let thermal = ThermalErosion::default();
        let mut field = spike_field(7, 5.0);
        let c = 3;
        let mut previous = field.height_at(c, c);

        for _ in 0..300 {
            thermal.erode(&mut field, 1);
            let current = field.height_at(c, c);
            assert!(
                current <= previous + 1e-6,
                "spike height must not increase: {previous} -> {current}"
            );
            previous = current;
        }

        let peak = field.height_at(c, c);
        for (nx, nz) in [(c - 1, c), (c + 1, c), (c, c - 1), (c, c + 1)] {
            let diff = peak - field.height_at(nx, nz);
            assert!(
                diff <= thermal.talus + 1e-3,
                "difference to ({nx}, {nz}) still {diff}"
            );
        }
        assert!(peak < 5.0);
    }

    #[test]
    fn test_conserves_volume() {
        let thermal = ThermalErosion::default();
        let mut field = spike_field(9, 10.0);
        let before = field.total_volume();
        thermal.erode(&mut field, 50);
        assert!((field.total_volume() - before).abs() < 1e-4);
    }

    #[test]
    fn test_gentle_slopes_untouched() {
        let heights = (0..64).map(|i| (i % 8) as f32 * 0.5).collect();
        let mut field = HeightField::from_heights(8, 8, 8.0, 8.0, heights).unwrap();
        let before = field.clone();
        ThermalErosion::default().erode(&mut field, 10);
        assert_eq!(field, before);
    }

    #[test]
    fn test_single_iteration_amount() {
        let thermal = ThermalErosion::default();
        let field = spike_field(5, 2.7);
        let mut changes = ChangeBuffer::for_field(&field);
        let moved = thermal.accumulate(&field, &mut changes);
        // four neighbors, each (2.7 - 0.7) * 0.3 * 0.25 = 0.15
        assert!((moved - 0.6).abs() < 1e-5);
        assert!((changes.deltas()[12] + 0.6).abs() < 1e-5);
        assert!((changes.deltas()[11] - 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_accumulate_is_order_independent() {
        // Two adjacent spikes: both read the original heights, so their
        // transfers are symmetric.
        let mut field = HeightField::new(6, 3, 6.0, 3.0).unwrap();
        field.set_height(2, 1, 4.0);
        field.set_height(3, 1, 4.0);
        let mut changes = ChangeBuffer::for_field(&field);
        ThermalErosion::default().accumulate(&field, &mut changes);
        let d = changes.deltas();
        // row 1 starts at index 6
        assert!((d[8] - d[9]).abs() < 1e-6);
        assert!((d[7] - d[10]).abs() < 1e-6);
        assert!(d[8] < 0.0 && d[7] > 0.0);
    }
}
