//! Grid cells covered by a circular brush stamp.

use strata_heightfield::HeightField;

/// One grid cell inside a stamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootprintCell {
    /// Grid column.
    pub x: usize,
    /// Grid row.
    pub z: usize,
    /// World distance to the stamp center divided by the world radius, in `[0, 1]`.
    pub distance: f32,
}

/// A circular stamp converted to grid space and clipped to the field.
///
/// Cells need not be square, so the circle becomes an axis-aligned ellipse in
/// grid space with separate X and Z radii.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
    center_x: f32,
    center_z: f32,
    radius_x: f32,
    radius_z: f32,
    min_x: usize,
    max_x: usize,
    min_z: usize,
    max_z: usize,
    empty: bool,
}

impl Footprint {
    /// Convert a world-space stamp into grid space over `field`.
    pub fn new(field: &HeightField, world_x: f32, world_z: f32, world_radius: f32) -> Self {
        let center_x = field.world_to_grid_x(world_x);
        let center_z = field.world_to_grid_z(world_z);
        let radius_x = field.world_to_grid_distance_x(world_radius);
        let radius_z = field.world_to_grid_distance_z(world_radius);

        let last_x = (field.width() - 1) as f32;
        let last_z = (field.depth() - 1) as f32;
        let lo_x = (center_x - radius_x).floor().max(0.0);
        let hi_x = (center_x + radius_x).ceil().min(last_x);
        let lo_z = (center_z - radius_z).floor().max(0.0);
        let hi_z = (center_z + radius_z).ceil().min(last_z);

        let empty = !(radius_x > 0.0 && radius_z > 0.0 && lo_x <= hi_x && lo_z <= hi_z);

        Self {
            center_x,
            center_z,
            radius_x,
            radius_z,
            min_x: lo_x as usize,
            max_x: hi_x as usize,
            min_z: lo_z as usize,
            max_z: hi_z as usize,
            empty,
        }
    }

    /// Radii in grid columns and rows.
    pub fn grid_radii(&self) -> (f32, f32) {
        (self.radius_x, self.radius_z)
    }

    /// Cells within the radius, row-major.
    pub fn cells(&self) -> impl Iterator<Item = FootprintCell> + '_ {
        let (z_range, x_range) = if self.empty {
            (1..=0, 1..=0)
        } else {
            (self.min_z..=self.max_z, self.min_x..=self.max_x)
        };
        z_range.flat_map(move |z| {
            x_range.clone().filter_map(move |x| {
                let dx = (x as f32 - self.center_x) / self.radius_x;
                let dz = (z as f32 - self.center_z) / self.radius_z;
                let distance = (dx * dx + dz * dz).sqrt();
                (distance <= 1.0).then_some(FootprintCell { x, z, distance })
            })
        })
    }
}
