//! Deterministic PRNG based on the Xorshift64 algorithm.
//!
//! Used to scatter particles at start-up. The same seed always produces the
//! same sequence on every platform (pure integer arithmetic in the core
//! algorithm), which is what makes a [`Seed`](crate::seed::Seed) replayable.

use glam::DVec2;

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// Seed 0 is a fixed point of xorshift and is replaced with a non-zero
/// fallback.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Uniform f64 in [0, 1) built from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform f64 in [min, max).
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform point in `[0, width) × [0, height)`. The x coordinate is drawn first.
    pub fn next_point(&mut self, width: f64, height: f64) -> DVec2 {
        let x = self.next_range(0.0, width);
        let y = self.next_range(0.0, height);
        DVec2::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_u64_produces_known_golden_value_for_seed_42() {
        // If this breaks, the PRNG changed and every saved seed file
        // scatters its particles differently.
        let mut rng = Xorshift64::new(42);
        assert_eq!(rng.next_u64(), 45_454_805_674);
    }

    #[test]
    fn seed_zero_does_not_stick_at_zero() {
        let mut rng = Xorshift64::new(0);
        assert!((0..3).all(|_| rng.next_u64() != 0));
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Xorshift64::new(2024);
        let mut b = Xorshift64::new(2024);
        for i in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64(), "diverged at index {i}");
        }
    }

    #[test]
    fn next_point_stays_inside_canvas() {
        let mut rng = Xorshift64::new(12345);
        for i in 0..10_000 {
            let p = rng.next_point(800.0, 600.0);
            assert!(
                (0.0..800.0).contains(&p.x) && (0.0..600.0).contains(&p.y),
                "point {p} out of canvas at iteration {i}"
            );
        }
    }

    #[test]
    fn next_point_covers_the_canvas() {
        let mut rng = Xorshift64::new(99);
        let mut quadrants = [0u32; 4];
        for _ in 0..4000 {
            let p = rng.next_point(800.0, 800.0);
            let q = usize::from(p.x >= 400.0) + 2 * usize::from(p.y >= 400.0);
            quadrants[q] += 1;
        }
        // Expected ~1000 each; loose bound to avoid flakiness.
        for (i, &count) in quadrants.iter().enumerate() {
            assert!(count > 700, "quadrant {i} only got {count} points");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn next_f64_in_unit_interval_for_any_seed(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "next_f64() = {v} for seed {seed}");
                }
            }

            #[test]
            fn next_range_in_bounds_for_any_seed_and_range(
                seed: u64,
                min in -1e6_f64..1e6,
                max in -1e6_f64..1e6,
            ) {
                prop_assume!(min < max);
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v < max, "next_range({min}, {max}) = {v}");
                }
            }
        }
    }
}
