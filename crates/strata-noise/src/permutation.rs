//! Seeded permutation table for gradient noise.
//!
//! The table is a Fisher–Yates shuffle of `0..256` driven by a 32-bit linear
//! congruential generator, duplicated to 512 entries so that lattice lookups
//! of the form `perm[perm[x] + y + 1]` never need to wrap.

/// Number of distinct lattice cells before the noise pattern repeats.
pub const TABLE_SIZE: usize = 256;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;
const LCG_MODULUS: f64 = 4_294_967_296.0;

/// Minimal LCG used only for shuffling; `state = state * a + c mod 2^32`.
#[derive(Clone, Copy, Debug)]
struct Lcg {
    state: u32,
}

impl Lcg {
    fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Advance and return the new state as a fraction in `[0, 1)`.
    fn next_unit(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state as f64 / LCG_MODULUS
    }
}

/// A 512-entry permutation table (256 shuffled values, repeated once).
#[derive(Clone, PartialEq, Eq)]
pub struct PermutationTable {
    values: [u8; TABLE_SIZE * 2],
}

impl PermutationTable {
    /// Build the table for `seed`. Identical seeds produce identical tables.
    pub fn new(seed: u32) -> Self {
        let mut base = [0u8; TABLE_SIZE];
        for (i, slot) in base.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut rng = Lcg::new(seed);
        for i in (1..TABLE_SIZE).rev() {
            let j = (rng.next_unit() * (i + 1) as f64).floor() as usize;
            base.swap(i, j);
        }

        let mut values = [0u8; TABLE_SIZE * 2];
        values[..TABLE_SIZE].copy_from_slice(&base);
        values[TABLE_SIZE..].copy_from_slice(&base);
        Self { values }
    }

    /// Look up entry `index`, which must be below 512.
    #[inline]
    pub fn get(&self, index: usize) -> usize {
        self.values[index] as usize
    }

    /// Hash a lattice cell `(x, y)` with both coordinates in `0..256`.
    #[inline]
    pub fn hash2(&self, x: usize, y: usize) -> usize {
        self.get(self.get(x) + y)
    }

    /// The full 512-entry table.
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.values[..8])
            .finish_non_exhaustive()
    }
}
