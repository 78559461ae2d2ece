// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Quantization bit policy over a single singular value.
//!
//! A bit is stored by snapping the value onto the quantization lattice of
//! step `d`: bit 1 lands at 3/4 of a cell, bit 0 at 1/4. Reading recovers
//! the fractional cell position, which degrades gracefully: recompression
//! nudges the value but rarely across the 0.5 midline.
//!
//! Callers iterating a block grid conventionally skip the last row and
//! column of blocks. Those blocks carry edge padding and distort more under
//! recompression, so bits written there are the first to flip. The policy
//! itself does not enforce this.

/// Quantize `s` to carry `bit` with step `d`.
///
/// `(floor(s / d) + (bit ? 0.75 : 0.25)) * d`: the value moves by at most
/// `3/4 d` and its cell remainder becomes exactly `0.75 d` or `0.25 d`.
pub fn embed_bit(s: f64, d: f64, bit: bool) -> f64 {
    let offset = if bit { 0.75 } else { 0.25 };
    ((s / d).floor() + offset) * d
}

/// Fractional position of `s` inside its quantization cell, in [0, 1).
pub fn read_fraction(s: f64, d: f64) -> f64 {
    (s % d) / d
}

/// Decide the stored bit: cell remainder at or above the midline reads as 1.
pub fn read_bit(s: f64, d: f64) -> bool {
    read_fraction(s, d) >= 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn embedded_bits_read_back() {
        let mut rng = ChaCha8Rng::seed_from_u64(4242);
        for i in 0..2000 {
            let s = rng.gen_range(0.0..4096.0);
            let d = rng.gen_range(20.0..150.0);
            let bit = i % 2 == 0;
            let marked = embed_bit(s, d, bit);
            assert_eq!(read_bit(marked, d), bit, "s={s} d={d} bit={bit}");
            let frac = read_fraction(marked, d);
            let want = if bit { 0.75 } else { 0.25 };
            assert!((frac - want).abs() < 1e-9, "s={s} d={d}: frac={frac}");
        }
    }

    #[test]
    fn embedding_moves_value_less_than_one_step() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            let s = rng.gen_range(0.0..4096.0);
            let d = rng.gen_range(20.0..150.0);
            for bit in [false, true] {
                assert!((embed_bit(s, d, bit) - s).abs() < d);
            }
        }
    }

    #[test]
    fn read_survives_small_perturbation() {
        // A nudge below d/4 never crosses the midline.
        let d = 46.0;
        for bit in [false, true] {
            let marked = embed_bit(523.7, d, bit);
            for noise in [-10.0, -5.0, 0.0, 5.0, 10.0] {
                assert_eq!(read_bit(marked + noise, d), bit, "noise {noise}");
            }
        }
    }

    #[test]
    fn embedding_is_idempotent() {
        let d = 58.0;
        for bit in [false, true] {
            let once = embed_bit(777.7, d, bit);
            assert!((embed_bit(once, d, bit) - once).abs() < 1e-9);
        }
    }
}
