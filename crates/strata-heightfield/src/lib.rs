//! Heightmap grid: world-space sampling, gradient normals, and LOD mesh extraction.

mod error;
mod field;
mod mesh;

pub use error::HeightFieldError;
pub use field::HeightField;
pub use mesh::{MeshVertex, TerrainMesh};
