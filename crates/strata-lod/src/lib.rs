//! Level-of-detail management: distance-based LOD selection for terrain chunks.

mod selector;

pub use selector::{LodLevel, LodSelector, chunk_distance_to_camera};
