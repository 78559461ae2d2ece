// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Singular value decomposition of single blocks.
//!
//! Wraps nalgebra's SVD with a bounded iteration count so a pathological
//! block surfaces as an error instead of hanging, and keeps the factors
//! around so a block can be recomposed from modified singular values.
//! nalgebra returns singular values sorted descending, so index 0 is the
//! dominant value the watermark policy quantizes.

use nalgebra::{DMatrix, DVector};

use super::Block;

const SVD_EPS: f64 = f64::EPSILON;
const SVD_MAX_ITER: usize = 250;

/// Why a block's decomposition failed. The caller adds grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SvdFailure {
    /// Iteration budget exhausted without convergence.
    NonConvergence,
    /// The block or its factors contain NaN or infinite values.
    NonFinite,
}

/// The factors `U`, `S`, `V^T` of one block, with `S` mutable by proxy:
/// [`recompose`] takes replacement singular values.
///
/// [`recompose`]: BlockSvd::recompose
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSvd {
    size: usize,
    u: DMatrix<f64>,
    v_t: DMatrix<f64>,
    singular: DVector<f64>,
}

impl BlockSvd {
    pub fn compute(block: &Block) -> Result<Self, SvdFailure> {
        if block.has_non_finite() {
            return Err(SvdFailure::NonFinite);
        }
        let n = block.size();
        let m = DMatrix::from_row_slice(n, n, block.data());
        let svd = m
            .try_svd(true, true, SVD_EPS, SVD_MAX_ITER)
            .ok_or(SvdFailure::NonConvergence)?;
        // try_svd(true, true, ..) always populates both factors.
        let u = svd.u.ok_or(SvdFailure::NonConvergence)?;
        let v_t = svd.v_t.ok_or(SvdFailure::NonConvergence)?;
        let singular = DVector::from_iterator(n, svd.singular_values.iter().copied());
        if singular.iter().any(|v| !v.is_finite()) {
            return Err(SvdFailure::NonFinite);
        }
        Ok(Self { size: n, u, v_t, singular })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Singular values, sorted descending.
    pub fn singular(&self) -> &DVector<f64> {
        &self.singular
    }

    /// Rebuild the block as `U * diag(values) * V^T`.
    pub fn recompose(&self, values: &DVector<f64>) -> Block {
        let m = &self.u * DMatrix::from_diagonal(values) * &self.v_t;
        let mut block = Block::new(self.size);
        for y in 0..self.size {
            for x in 0..self.size {
                block.set(x, y, m[(y, x)]);
            }
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_block(size: usize, seed: u64) -> Block {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data = (0..size * size).map(|_| rng.gen_range(-128.0..128.0)).collect();
        Block::from_data(size, data)
    }

    #[test]
    fn factors_recompose_the_block() {
        for seed in 0..10 {
            let block = random_block(4, seed);
            let svd = BlockSvd::compute(&block).unwrap();
            let back = svd.recompose(&svd.singular().clone());
            for i in 0..16 {
                assert!(
                    (back.data()[i] - block.data()[i]).abs() < 1e-9,
                    "seed {seed} index {i}"
                );
            }
        }
    }

    #[test]
    fn singular_values_are_descending_and_nonnegative() {
        let block = random_block(8, 42);
        let svd = BlockSvd::compute(&block).unwrap();
        let s = svd.singular();
        for i in 1..s.len() {
            assert!(s[i - 1] >= s[i], "not sorted at {i}");
        }
        assert!(s[s.len() - 1] >= 0.0);
    }

    #[test]
    fn zero_block_has_zero_spectrum() {
        let svd = BlockSvd::compute(&Block::new(4)).unwrap();
        assert!(svd.singular().iter().all(|&v| v == 0.0));
        let back = svd.recompose(&svd.singular().clone());
        assert!(back.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn dominant_value_responds_to_scaling() {
        let block = random_block(4, 7);
        let mut doubled = block.clone();
        for y in 0..4 {
            for x in 0..4 {
                doubled.set(x, y, 2.0 * block.get(x, y));
            }
        }
        let a = BlockSvd::compute(&block).unwrap();
        let b = BlockSvd::compute(&doubled).unwrap();
        assert!((b.singular()[0] - 2.0 * a.singular()[0]).abs() < 1e-9);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let mut block = Block::new(4);
        block.set(1, 2, f64::NAN);
        assert_eq!(BlockSvd::compute(&block), Err(SvdFailure::NonFinite));
        block.set(1, 2, f64::INFINITY);
        assert_eq!(BlockSvd::compute(&block), Err(SvdFailure::NonFinite));
    }

    #[test]
    fn modified_dominant_value_survives_recompose() {
        let block = random_block(4, 13);
        let svd = BlockSvd::compute(&block).unwrap();
        let mut values = svd.singular().clone();
        values[0] = 321.5;
        let rebuilt = svd.recompose(&values);
        let again = BlockSvd::compute(&rebuilt).unwrap();
        assert!((again.singular()[0] - 321.5).abs() < 1e-6);
    }
}
