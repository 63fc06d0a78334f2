//! Dense heightmap grid with world-space queries and LOD mesh extraction.
//!
//! Samples are stored row-major (`index = z * width + x`). Sample `(0, 0)` sits
//! at world `(-world_width / 2, -world_depth / 2)` and sample
//! `(width - 1, depth - 1)` at `(+world_width / 2, +world_depth / 2)`.
//!
//! Every query is total: out-of-range grid reads return 0, out-of-range writes
//! are ignored, and world-space lookups clamp to the nearest edge.

use glam::Vec3;

use crate::error::HeightFieldError;
use crate::mesh::{MeshVertex, TerrainMesh};

/// A terrain heightmap spanning a rectangle of world space.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightField {
    width: usize,
    depth: usize,
    world_width: f32,
    world_depth: f32,
    /// Declared display/normalization range. Not enforced on writes.
    min_height: f32,
    max_height: f32,
    heights: Vec<f32>,
}

impl HeightField {
    /// Create a flat (all-zero) field with a `[0, 1]` declared height range.
    ///
    /// # Errors
    ///
    /// Returns [`HeightFieldError`] if either axis has fewer than 2 samples or
    /// the world extent is not positive and finite.
    pub fn new(
        width: usize,
        depth: usize,
        world_width: f32,
        world_depth: f32,
    ) -> Result<Self, HeightFieldError> {
        Self::from_heights(
            width,
            depth,
            world_width,
            world_depth,
            vec![0.0; width.saturating_mul(depth)],
        )
    }

    /// Wrap an existing row-major sample buffer.
    ///
    /// # Errors
    ///
    /// Returns [`HeightFieldError::SampleCountMismatch`] if
    /// `heights.len() != width * depth`, plus the checks of [`HeightField::new`].
    pub fn from_heights(
        width: usize,
        depth: usize,
        world_width: f32,
        world_depth: f32,
        heights: Vec<f32>,
    ) -> Result<Self, HeightFieldError> {
        if width < 2 || depth < 2 {
            return Err(HeightFieldError::InvalidResolution { width, depth });
        }
        let extent_ok = |v: f32| v.is_finite() && v > 0.0;
        if !extent_ok(world_width) || !extent_ok(world_depth) {
            return Err(HeightFieldError::InvalidExtent {
                world_width,
                world_depth,
            });
        }
        let expected = width * depth;
        if heights.len() != expected {
            return Err(HeightFieldError::SampleCountMismatch {
                expected,
                actual: heights.len(),
            });
        }

        Ok(Self {
            width,
            depth,
            world_width,
            world_depth,
            min_height: 0.0,
            max_height: 1.0,
            heights,
        })
    }

    /// Builder-style setter for the declared height range.
    pub fn with_height_range(mut self, min_height: f32, max_height: f32) -> Self {
        self.set_height_range(min_height, max_height);
        self
    }

    /// Set the declared height range. Existing samples are left untouched.
    pub fn set_height_range(&mut self, min_height: f32, max_height: f32) {
        self.min_height = min_height;
        self.max_height = max_height;
    }

    /// Samples along X.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Samples along Z.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// World-space size along X.
    pub fn world_width(&self) -> f32 {
        self.world_width
    }

    /// World-space size along Z.
    pub fn world_depth(&self) -> f32 {
        self.world_depth
    }

    /// Lower end of the declared height range.
    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    /// Upper end of the declared height range.
    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    /// Row-major sample buffer.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Mutable row-major sample buffer. The length cannot change.
    pub fn heights_mut(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    /// Linear index of `(x, z)`, or `None` if outside the grid.
    #[inline]
    pub fn index(&self, x: usize, z: usize) -> Option<usize> {
        (x < self.width && z < self.depth).then(|| z * self.width + x)
    }

    /// Height of grid sample `(x, z)`; 0 outside the grid.
    #[inline]
    pub fn height_at(&self, x: usize, z: usize) -> f32 {
        self.index(x, z).map_or(0.0, |i| self.heights[i])
    }

    /// Signed-coordinate variant of [`HeightField::height_at`].
    #[inline]
    pub fn height_at_signed(&self, x: i64, z: i64) -> f32 {
        if x < 0 || z < 0 {
            return 0.0;
        }
        self.height_at(x as usize, z as usize)
    }

    /// Overwrite grid sample `(x, z)`; ignored outside the grid.
    #[inline]
    pub fn set_height(&mut self, x: usize, z: usize, value: f32) {
        if let Some(i) = self.index(x, z) {
            self.heights[i] = value;
        }
    }

    /// Spacing used for gradient estimation: world size divided by sample count.
    pub fn cell_size(&self) -> (f32, f32) {
        (
            self.world_width / self.width as f32,
            self.world_depth / self.depth as f32,
        )
    }

    /// Fractional grid X for a world X. Not clamped.
    #[inline]
    pub fn world_to_grid_x(&self, world_x: f32) -> f32 {
        (world_x / self.world_width + 0.5) * (self.width - 1) as f32
    }

    /// Fractional grid Z for a world Z. Not clamped.
    #[inline]
    pub fn world_to_grid_z(&self, world_z: f32) -> f32 {
        (world_z / self.world_depth + 0.5) * (self.depth - 1) as f32
    }

    /// World X of (possibly fractional) grid column `x`.
    #[inline]
    pub fn grid_to_world_x(&self, x: f32) -> f32 {
        (x / (self.width - 1) as f32 - 0.5) * self.world_width
    }

    /// World Z of (possibly fractional) grid row `z`.
    #[inline]
    pub fn grid_to_world_z(&self, z: f32) -> f32 {
        (z / (self.depth - 1) as f32 - 0.5) * self.world_depth
    }

    /// Convert a world-space length along X into grid columns.
    #[inline]
    pub fn world_to_grid_distance_x(&self, distance: f32) -> f32 {
        distance / self.world_width * (self.width - 1) as f32
    }

    /// Convert a world-space length along Z into grid rows.
    #[inline]
    pub fn world_to_grid_distance_z(&self, distance: f32) -> f32 {
        distance / self.world_depth * (self.depth - 1) as f32
    }

    /// Bilinearly interpolated height at a world position.
    ///
    /// The position is clamped onto the grid first, so queries past an edge
    /// return the edge value.
    pub fn height(&self, world_x: f32, world_z: f32) -> f32 {
        let max_x = (self.width - 1) as f32;
        let max_z = (self.depth - 1) as f32;
        let gx = self.world_to_grid_x(world_x).clamp(0.0, max_x);
        let gz = self.world_to_grid_z(world_z).clamp(0.0, max_z);

        let x0 = gx.floor() as usize;
        let z0 = gz.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);
        let fx = gx - x0 as f32;
        let fz = gz - z0 as f32;

        let h00 = self.height_at(x0, z0);
        let h10 = self.height_at(x1, z0);
        let h01 = self.height_at(x0, z1);
        let h11 = self.height_at(x1, z1);

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }

    /// Un-normalized surface normal `(-dh/dx, 1, -dh/dz)` at grid sample `(x, z)`.
    ///
    /// Uses central differences over the 4-neighborhood. At the border the
    /// missing neighbor is replaced by the sample itself (one-sided difference).
    /// Coordinates outside the grid are clamped onto it.
    pub fn normal(&self, x: usize, z: usize) -> Vec3 {
        let x = x.min(self.width - 1);
        let z = z.min(self.depth - 1);
        let (spacing_x, spacing_z) = self.cell_size();

        let left = x.saturating_sub(1);
        let right = (x + 1).min(self.width - 1);
        let up = z.saturating_sub(1);
        let down = (z + 1).min(self.depth - 1);

        let dx = (self.height_at(right, z) - self.height_at(left, z))
            / ((right - left) as f32 * spacing_x);
        let dz = (self.height_at(x, down) - self.height_at(x, up))
            / ((down - up) as f32 * spacing_z);

        Vec3::new(-dx, 1.0, -dz)
    }

    /// Sum of all samples.
    pub fn total_volume(&self) -> f64 {
        self.heights.iter().map(|&h| h as f64).sum()
    }

    /// Smallest and largest sample actually present.
    pub fn min_max(&self) -> (f32, f32) {
        self.heights
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// Extract a triangle mesh, sampling every `2^lod`-th grid point.
    ///
    /// LOD 0 emits one vertex per sample. Adjacent meshes at different levels
    /// are not stitched.
    pub fn generate_mesh(&self, lod: u8) -> TerrainMesh {
        let step = 1usize.checked_shl(lod as u32).unwrap_or(usize::MAX);
        let xs: Vec<usize> = (0..self.width).step_by(step).collect();
        let zs: Vec<usize> = (0..self.depth).step_by(step).collect();

        let mut mesh = TerrainMesh::with_capacity(xs.len(), zs.len(), lod);
        let u_scale = 1.0 / (self.width - 1) as f32;
        let v_scale = 1.0 / (self.depth - 1) as f32;

        for &z in &zs {
            for &x in &xs {
                mesh.vertices.push(MeshVertex {
                    position: [
                        self.grid_to_world_x(x as f32),
                        self.height_at(x, z),
                        self.grid_to_world_z(z as f32),
                    ],
                    normal: self.normal(x, z).normalize().to_array(),
                    uv: [x as f32 * u_scale, z as f32 * v_scale],
                });
            }
        }

        for row in 0..zs.len().saturating_sub(1) {
            for column in 0..xs.len().saturating_sub(1) {
                mesh.push_quad(column, row);
            }
        }

        tracing::debug!(
            lod,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "extracted terrain mesh"
        );
        mesh
    }
}
