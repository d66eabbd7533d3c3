//! Coherent noise sources sampled by the flow field.
//!
//! A [`NoiseSource`] maps a 3D point to a scalar in `[0, 1)`. Nearby inputs
//! give nearby outputs, which is what makes neighbouring flow-field cells
//! point in similar directions and lets the field drift smoothly as the
//! third coordinate (time) advances.
//!
//! All implementations are deterministic: same inputs produce the same output.

use noise::{NoiseFn, Perlin};

/// Largest `f64` strictly below 1.0.
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// Default number of Perlin octaves layered by [`PerlinNoise`].
pub const DEFAULT_OCTAVES: u32 = 4;

/// Default per-octave amplitude falloff for [`PerlinNoise`].
pub const DEFAULT_FALLOFF: f64 = 0.5;

/// A smooth, deterministic 3D noise function with values in `[0, 1)`.
pub trait NoiseSource: Send + Sync {
    /// Sample the noise at `(x, y, z)`.
    fn noise(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Layered Perlin noise normalised into `[0, 1)`.
///
/// Each octave doubles the sampling frequency and multiplies the amplitude by
/// `falloff`. The weighted sum is divided by the total amplitude, so the
/// result keeps Perlin's `[-1, 1]` range before being remapped.
pub struct PerlinNoise {
    perlin: Perlin,
    octaves: u32,
    falloff: f64,
}

impl PerlinNoise {
    /// Creates a layered Perlin source. `octaves` below 1 is treated as 1.
    pub fn new(seed: u32, octaves: u32, falloff: f64) -> Self {
        Self {
            perlin: Perlin::new(seed),
            octaves: octaves.max(1),
            falloff,
        }
    }

    /// Creates a source with the default octave count and falloff.
    pub fn with_seed(seed: u32) -> Self {
        Self::new(seed, DEFAULT_OCTAVES, DEFAULT_FALLOFF)
    }

    /// Folds a 64-bit run seed into the 32-bit seed the Perlin table takes.
    pub fn fold_seed(seed: u64) -> u32 {
        (seed ^ (seed >> 32)) as u32
    }
}

impl NoiseSource for PerlinNoise {
    fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let (sum, total, _, _) =
            (0..self.octaves).fold((0.0, 0.0, 1.0, 1.0), |(sum, total, amp, freq), _| {
                (
                    sum + self.perlin.get([x * freq, y * freq, z * freq]) * amp,
                    total + amp,
                    amp * self.falloff,
                    freq * 2.0,
                )
            });
        let signed = if total.abs() < f64::EPSILON {
            0.0
        } else {
            sum / total
        };
        let unit = (signed + 1.0) * 0.5;
        if unit.is_nan() {
            return 0.0;
        }
        unit.clamp(0.0, BELOW_ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_stays_in_half_open_unit_interval() {
        let source = PerlinNoise::with_seed(42);
        for i in 0..2000 {
            let x = i as f64 * 0.037;
            let y = i as f64 * 0.051;
            let z = i as f64 * 0.01;
            let v = source.noise(x, y, z);
            assert!((0.0..1.0).contains(&v), "noise({x}, {y}, {z}) = {v}");
        }
    }

    #[test]
    fn deterministic_for_fixed_inputs() {
        let a = PerlinNoise::with_seed(7);
        let b = PerlinNoise::with_seed(7);
        assert_eq!(
            a.noise(1.5, 2.3, 0.7).to_bits(),
            b.noise(1.5, 2.3, 0.7).to_bits()
        );
    }

    #[test]
    fn nearby_inputs_give_nearby_outputs() {
        let source = PerlinNoise::with_seed(3);
        let base = source.noise(2.2, 3.3, 0.4);
        let near = source.noise(2.2 + 1e-4, 3.3, 0.4);
        assert!(
            (base - near).abs() < 1e-2,
            "noise should be continuous: {base} vs {near}"
        );
    }

    #[test]
    fn zero_octaves_is_treated_as_one() {
        let source = PerlinNoise::new(1, 0, 0.5);
        let single = PerlinNoise::new(1, 1, 0.5);
        let v = source.noise(0.3, 0.6, 0.9);
        assert!((0.0..1.0).contains(&v));
        assert_eq!(v, single.noise(0.3, 0.6, 0.9));
    }

    #[test]
    fn zero_falloff_keeps_only_first_octave() {
        let layered = PerlinNoise::new(9, 4, 0.0);
        let single = PerlinNoise::new(9, 1, 0.5);
        let a = layered.noise(1.1, 0.4, 0.2);
        let b = single.noise(1.1, 0.4, 0.2);
        assert!((a - b).abs() < 1e-12, "{a} vs {b}");
    }

    #[test]
    fn fold_seed_mixes_high_bits() {
        assert_ne!(
            PerlinNoise::fold_seed(1),
            PerlinNoise::fold_seed(1 | (1 << 40))
        );
        assert_eq!(PerlinNoise::fold_seed(42), 42);
    }

    /// Captures the golden value so we can pin it. Intentionally panics
    /// with the bit pattern to be hardcoded into `perlin_golden_value_seed_42`.
    #[test]
    #[ignore = "run once to capture golden bits, then pin in perlin_golden_value_seed_42"]
    fn perlin_capture_golden_bits() {
        let val = Perlin::new(42).get([1.3, 2.7, 0.5]);
        panic!(
            "GOLDEN: Perlin(42).get([1.3, 2.7, 0.5]) = {val} (bits: {:#018x})",
            val.to_bits()
        );
    }

    #[test]
    fn perlin_golden_value_seed_42() {
        // Pin: the exact bit pattern for noise = "=0.9.0", Perlin::new(42).
        // If this changes, every seed file renders differently.
        const GOLDEN_BITS: u64 = 0x3fd3_f04b_8ca2_cd01;
        let raw = Perlin::new(42).get([1.3, 2.7, 0.5]);
        assert_eq!(
            raw.to_bits(),
            GOLDEN_BITS,
            "Perlin noise golden value changed! Got {raw} (bits: {:#018x})",
            raw.to_bits()
        );

        let single_octave = PerlinNoise::new(42, 1, DEFAULT_FALLOFF);
        let expected = (f64::from_bits(GOLDEN_BITS) + 1.0) * 0.5;
        assert_eq!(
            single_octave.noise(1.3, 2.7, 0.5).to_bits(),
            expected.to_bits()
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn any_finite_point_maps_into_unit_interval(
                seed: u32,
                x in -1e4_f64..1e4,
                y in -1e4_f64..1e4,
                z in 0.0_f64..100.0,
                octaves in 1_u32..=8,
                falloff in 0.0_f64..=1.0,
            ) {
                let source = PerlinNoise::new(seed, octaves, falloff);
                let v = source.noise(x, y, z);
                prop_assert!((0.0..1.0).contains(&v), "noise = {v}");
            }
        }
    }
}
