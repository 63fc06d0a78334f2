//! Seeded 2D gradient noise: permutation table, Perlin evaluation, and fBm.

mod permutation;
mod source;

pub use permutation::{PermutationTable, TABLE_SIZE};
pub use source::NoiseSource;
