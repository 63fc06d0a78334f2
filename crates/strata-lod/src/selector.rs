//! Distance-based LOD selection over a sorted table of levels.

use strata_heightfield::{HeightField, TerrainMesh};

/// One entry of the LOD table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LodLevel {
    /// Mesh level passed to [`HeightField::generate_mesh`]; 0 is finest.
    pub level: u8,
    /// Minimum camera distance at which this level applies.
    pub distance: f32,
    /// Fraction of full resolution this level renders at.
    pub detail: f32,
}

impl LodLevel {
    /// Create a table entry.
    pub const fn new(level: u8, distance: f32, detail: f32) -> Self {
        Self {
            level,
            distance,
            detail,
        }
    }
}

/// Selects LOD levels based on horizontal distance from the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct LodSelector {
    levels: Vec<LodLevel>,
}

impl Default for LodSelector {
    /// Four levels at 0, 100, 200 and 400 world units, halving detail each step.
    fn default() -> Self {
        Self::new(vec![
            LodLevel::new(0, 0.0, 1.0),
            LodLevel::new(1, 100.0, 0.5),
            LodLevel::new(2, 200.0, 0.25),
            LodLevel::new(3, 400.0, 0.125),
        ])
    }
}

impl LodSelector {
    /// Create a selector from an arbitrary table; entries are sorted by distance.
    pub fn new(mut levels: Vec<LodLevel>) -> Self {
        sort_levels(&mut levels);
        Self { levels }
    }

    /// Determine the LOD level for a chunk centered at `(chunk_x, chunk_z)`.
    ///
    /// Returns the level of the farthest entry whose threshold is at or below
    /// the camera distance, or 0 when no entry matches.
    pub fn select(&self, camera_x: f32, camera_z: f32, chunk_x: f32, chunk_z: f32) -> u8 {
        let distance = chunk_distance_to_camera(camera_x, camera_z, chunk_x, chunk_z);
        self.levels
            .iter()
            .rev()
            .find(|level| level.distance <= distance)
            .map_or(0, |level| level.level)
    }

    /// Overwrite the first `distances.len()` thresholds, then re-sort.
    ///
    /// Extra distances beyond the table length are ignored. Monotonicity is
    /// not validated; sorting may reorder levels.
    pub fn set_lod_distances(&mut self, distances: &[f32]) {
        for (level, &distance) in self.levels.iter_mut().zip(distances) {
            level.distance = distance;
        }
        sort_levels(&mut self.levels);
        tracing::debug!(?distances, "LOD distances updated");
    }

    /// The table, ascending by distance.
    pub fn levels(&self) -> &[LodLevel] {
        &self.levels
    }

    /// Select a level for the chunk and build its mesh from `field`.
    pub fn select_mesh(
        &self,
        field: &HeightField,
        camera_x: f32,
        camera_z: f32,
        chunk_x: f32,
        chunk_z: f32,
    ) -> TerrainMesh {
        field.generate_mesh(self.select(camera_x, camera_z, chunk_x, chunk_z))
    }
}

fn sort_levels(levels: &mut [LodLevel]) {
    levels.sort_by(|a, b| a.distance.total_cmp(&b.distance));
}

/// Euclidean distance in the XZ plane between camera and chunk center.
pub fn chunk_distance_to_camera(camera_x: f32, camera_z: f32, chunk_x: f32, chunk_z: f32) -> f32 {
    let dx = chunk_x - camera_x;
    let dz = chunk_z - camera_z;
    (dx * dx + dz * dz).sqrt()
}
