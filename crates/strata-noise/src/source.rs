//! Seeded 2D gradient noise and fractal Brownian motion.

use noise::NoiseFn;

use crate::permutation::{PermutationTable, TABLE_SIZE};

/// Immutable seeded noise generator.
///
/// Holds only its permutation table, so a single instance can be shared by
/// reference across threads. Identical seeds yield bit-identical fields.
#[derive(Clone, Debug)]
pub struct NoiseSource {
    seed: u32,
    table: PermutationTable,
}

impl NoiseSource {
    /// Create a noise source from an integer seed.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            table: PermutationTable::new(seed),
        }
    }

    /// The seed this source was built from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Classic 2D gradient noise. Output lies in `[-1, 1]` for all finite inputs.
    pub fn perlin2d(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = lattice_index(x_floor);
        let yi = lattice_index(y_floor);

        let xf = x - x_floor;
        let yf = y - y_floor;
        let u = fade(xf);
        let v = fade(yf);

        let aa = self.table.hash2(xi, yi);
        let ab = self.table.hash2(xi, yi + 1);
        let ba = self.table.hash2(xi + 1, yi);
        let bb = self.table.hash2(xi + 1, yi + 1);

        let bottom = lerp(u, grad(aa, xf, yf), grad(ba, xf - 1.0, yf));
        let top = lerp(u, grad(ab, xf, yf - 1.0), grad(bb, xf - 1.0, yf - 1.0));
        lerp(v, bottom, top)
    }

    /// Fractal sum of `octaves` Perlin layers, doubling frequency each octave
    /// and scaling amplitude by `persistence`.
    ///
    /// The sum is divided by the total amplitude `Σ persistence^i`, which keeps
    /// the result in `[-1, 1]` regardless of octave count. Zero octaves yield 0.
    pub fn fbm2d(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.perlin2d(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_value == 0.0 {
            return 0.0;
        }
        total / max_value
    }

    /// Access the underlying permutation table.
    pub fn table(&self) -> &PermutationTable {
        &self.table
    }
}

impl NoiseFn<f64, 2> for NoiseSource {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.perlin2d(point[0], point[1])
    }
}

/// Wrap a floored coordinate into `0..256`. Non-finite inputs map to cell 0.
#[inline]
fn lattice_index(floored: f64) -> usize {
    (floored as i64).rem_euclid(TABLE_SIZE as i64) as usize
}

/// Quintic fade `6t^5 - 15t^4 + 10t^3`; first and second derivatives vanish at 0 and 1.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of four diagonal gradients picked by the low hash bits.
#[inline]
fn grad(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 3 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        _ => -x - y,
    }
}
