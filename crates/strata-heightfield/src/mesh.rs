//! Triangle mesh produced by height field extraction.
//!
//! Vertices are interleaved position/normal/UV and `Pod`, so the buffers can be
//! handed to a renderer without conversion.

use std::mem;

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

/// A single terrain vertex.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// World-space position; the field is centered on the origin.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Fractional grid position of the source sample, in `[0, 1]`.
    pub uv: [f32; 2],
}

const_assert_eq!(mem::size_of::<MeshVertex>(), 32);

/// Vertex and index buffers for one LOD level of a height field.
#[derive(Clone, Debug, Default)]
pub struct TerrainMesh {
    /// Vertex buffer, row-major over the strided grid.
    pub vertices: Vec<MeshVertex>,
    /// Triangle list, 3 indices per triangle, counter-clockwise seen from +Y.
    pub indices: Vec<u32>,
    /// Sampled columns (X) in the strided grid.
    pub columns: usize,
    /// Sampled rows (Z) in the strided grid.
    pub rows: usize,
    /// LOD level this mesh was extracted at.
    pub lod: u8,
}

impl TerrainMesh {
    /// Creates an empty mesh for the given strided grid size.
    pub fn with_capacity(columns: usize, rows: usize, lod: u8) -> Self {
        let quads = columns.saturating_sub(1) * rows.saturating_sub(1);
        Self {
            vertices: Vec::with_capacity(columns * rows),
            indices: Vec::with_capacity(quads * 6),
            columns,
            rows,
            lod,
        }
    }

    /// Append the two triangles covering the strided quad whose top-left
    /// vertex sits at `(column, row)`.
    pub fn push_quad(&mut self, column: usize, row: usize) {
        let stride = self.columns as u32;
        let top_left = (row * self.columns + column) as u32;
        let top_right = top_left + 1;
        let bottom_left = top_left + stride;
        let bottom_right = bottom_left + 1;

        self.indices.extend_from_slice(&[
            top_left,
            bottom_left,
            top_right,
            top_right,
            bottom_left,
            bottom_right,
        ]);
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw vertex bytes for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for GPU upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
