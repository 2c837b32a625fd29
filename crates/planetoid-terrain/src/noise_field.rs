//! Seeded, smoothed 2D value noise summed over octaves.
//!
//! Each integer lattice point gets a pseudo-random value from an integer
//! hash with three prime constants. Values are smoothed over a 3×3 kernel,
//! cosine-interpolated between lattice cells, then summed with frequency
//! `2^i` and amplitude `persistence^i` per octave.

use std::f64::consts::PI;

use rand::Rng;

/// Prime constants of the classic lattice hash, used until randomized.
const DEFAULT_PRIMES: [u32; 3] = [15_731, 789_221, 1_376_312_589];

/// Ranges the randomized primes are drawn from, one per hash constant.
const PRIME_RANGES: [(u32, u32); 3] = [
    (10_000, 100_000),
    (100_000, 1_000_000),
    (1_000_000_000, 4_000_000_000),
];

/// Deterministic smoothed noise field.
#[derive(Clone, Debug, PartialEq)]
pub struct NoiseField {
    primes: [u32; 3],
    octaves: u32,
    persistence: f64,
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new(1, 1.0)
    }
}

impl NoiseField {
    pub fn new(octaves: u32, persistence: f64) -> Self {
        Self {
            primes: DEFAULT_PRIMES,
            octaves,
            persistence,
        }
    }

    /// Replaces the hash constants.
    #[must_use]
    pub fn with_primes(mut self, primes: [u32; 3]) -> Self {
        self.primes = primes;
        self
    }

    pub fn primes(&self) -> [u32; 3] {
        self.primes
    }

    pub fn octaves(&self) -> u32 {
        self.octaves
    }

    pub fn persistence(&self) -> f64 {
        self.persistence
    }

    /// Picks new hash constants: the first prime at or above a random draw
    /// from each constant's range.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (prime, (lo, hi)) in self.primes.iter_mut().zip(PRIME_RANGES) {
            *prime = next_prime(rng.random_range(lo..hi));
        }
    }

    /// Hashed lattice value in `(-1, 1]`.
    fn lattice(&self, x: i32, y: i32) -> f64 {
        let [p0, p1, p2] = self.primes.map(|p| p as i32);
        let n = x.wrapping_add(y.wrapping_mul(57));
        let n = (n << 13) ^ n;
        let hashed = n
            .wrapping_mul(n.wrapping_mul(n).wrapping_mul(p0).wrapping_add(p1))
            .wrapping_add(p2)
            & 0x7fff_ffff;
        1.0 - f64::from(hashed) / 1_073_741_824.0
    }

    /// Lattice value blurred with a 3×3 kernel: corners 1/16, sides 1/8,
    /// center 1/4.
    fn smoothed(&self, x: i32, y: i32) -> f64 {
        let corners = (self.lattice(x - 1, y - 1)
            + self.lattice(x + 1, y - 1)
            + self.lattice(x - 1, y + 1)
            + self.lattice(x + 1, y + 1))
            / 16.0;
        let sides = (self.lattice(x - 1, y)
            + self.lattice(x + 1, y)
            + self.lattice(x, y - 1)
            + self.lattice(x, y + 1))
            / 8.0;
        let center = self.lattice(x, y) / 4.0;
        corners + sides + center
    }

    fn interpolated(&self, x: f64, y: f64) -> f64 {
        let (fx, fy) = (x.floor(), y.floor());
        let (ix, iy) = (fx as i32, fy as i32);
        let (tx, ty) = (x - fx, y - fy);

        let v1 = self.smoothed(ix, iy);
        let v2 = self.smoothed(ix + 1, iy);
        let v3 = self.smoothed(ix, iy + 1);
        let v4 = self.smoothed(ix + 1, iy + 1);

        let top = cosine_interpolate(v1, v2, tx);
        let bottom = cosine_interpolate(v3, v4, tx);
        cosine_interpolate(top, bottom, ty)
    }

    /// Sum of all octaves at `(x, y)`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut frequency = 1.0;
        let mut amplitude = 1.0;
        for _ in 0..self.octaves {
            total += self.interpolated(x * frequency, y * frequency) * amplitude;
            frequency *= 2.0;
            amplitude *= self.persistence;
        }
        total
    }

    /// [`sample`](Self::sample) re-centered on 0.5 and clamped to `[0, 1]`.
    pub fn sample_normalized(&self, x: f64, y: f64) -> f64 {
        (self.sample(x, y) + 0.5).clamp(0.0, 1.0)
    }
}

fn cosine_interpolate(a: f64, b: f64, t: f64) -> f64 {
    let f = (1.0 - (t * PI).cos()) * 0.5;
    a * (1.0 - f) + b * f
}

/// The smallest prime `>= start`.
pub fn next_prime(start: u32) -> u32 {
    let mut n = start.max(2);
    while !is_prime(n) {
        n += 1;
    }
    n
}

fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let n = u64::from(n);
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_same_primes_same_noise() {
        let a = NoiseField::new(6, 0.5);
        let b = NoiseField::new(6, 0.5);
        for i in 0..50 {
            let x = i as f64 * 0.37;
            assert_eq!(a.sample(x, 2.0 * x), b.sample(x, 2.0 * x));
        }
    }

    #[test]
    fn test_lattice_values_stay_in_range() {
        let field = NoiseField::default();
        for x in -50..50 {
            for y in -50..50 {
                let v = field.lattice(x, y);
                assert!(v > -1.0 && v <= 1.0, "lattice({x}, {y}) = {v}");
            }
        }
    }

    #[test]
    fn test_interpolation_hits_lattice_at_integers() {
        let field = NoiseField::default();
        for (x, y) in [(0, 0), (3, 7), (-4, 2), (11, -9)] {
            let expected = field.smoothed(x, y);
            let got = field.interpolated(f64::from(x), f64::from(y));
            assert!(
                (got - expected).abs() < EPSILON,
                "interpolated({x}, {y}) = {got}, smoothed = {expected}"
            );
        }
    }

    #[test]
    fn test_single_octave_is_continuous() {
        let field = NoiseField::new(1, 0.5);
        let step = 0.001;
        for i in 0..5_000 {
            let x = i as f64 * step;
            let delta = (field.sample(x + step, 0.3) - field.sample(x, 0.3)).abs();
            assert!(delta < 0.05, "jump of {delta} at x={x}");
        }
    }

    #[test]
    fn test_normalized_noise_is_clamped() {
        let field = NoiseField::new(20, 0.5);
        for i in 0..200 {
            let v = field.sample_normalized(i as f64 * 0.05, i as f64 * 0.11);
            assert!((0.0..=1.0).contains(&v), "normalized noise {v} out of range");
        }
    }

    #[test]
    fn test_zero_octaves_is_silent() {
        let field = NoiseField::new(0, 0.5);
        assert_eq!(field.sample(1.5, 2.5), 0.0);
        assert_eq!(field.sample_normalized(1.5, 2.5), 0.5);
    }

    #[test]
    fn test_randomize_picks_primes_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut field = NoiseField::default();
        field.randomize(&mut rng);
        let primes = field.primes();
        assert_ne!(primes, DEFAULT_PRIMES);
        for (p, (lo, _)) in primes.iter().zip(PRIME_RANGES) {
            assert!(is_prime(*p), "{p} is not prime");
            assert!(*p >= lo, "{p} below its range");
        }
    }

    #[test]
    fn test_randomize_changes_output() {
        let base = NoiseField::new(4, 0.5);
        let mut shuffled = base.clone();
        shuffled.randomize(&mut ChaCha8Rng::seed_from_u64(99));
        let differs = (0..20).any(|i| {
            let x = i as f64 * 0.7;
            (base.sample(x, x) - shuffled.sample(x, x)).abs() > EPSILON
        });
        assert!(differs, "new primes should change the field");
    }

    #[test]
    fn test_next_prime() {
        assert_eq!(next_prime(0), 2);
        assert_eq!(next_prime(14), 17);
        assert_eq!(next_prime(15_731), 15_731);
        assert!(is_prime(next_prime(1_000_000_000)));
    }
}
