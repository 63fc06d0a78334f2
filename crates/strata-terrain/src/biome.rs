//! Biome system: climate derivation and per-texel classification.
//!
//! Moisture comes from a decorrelated fBm field plus a lowland bonus,
//! temperature from latitude and altitude. Both feed a fixed decision tree.

mod classify;
mod climate;

pub use classify::{Biome, classify};
pub use climate::ClimateMaps;
