// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Wavelet filter banks.
//!
//! A [`FilterBank`] is an immutable description of a wavelet: decompose and
//! reconstruct tap pairs for the low-pass and high-pass branches. The
//! transform engine never hardcodes taps; everything goes through this type.

use crate::error::{MarkError, Result};

/// Immutable wavelet description: decompose/reconstruct low/high-pass taps.
///
/// Invariants, checked at construction:
/// - the two decompose filters have the same non-zero length,
/// - the two reconstruct filters have the same non-zero length,
/// - the reconstruct length is even (the inverse transform consumes
///   reconstruction taps in `(2l, 2l+1)` pairs).
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBank {
    low_decompose: Vec<f64>,
    high_decompose: Vec<f64>,
    low_reconstruct: Vec<f64>,
    high_reconstruct: Vec<f64>,
}

impl FilterBank {
    pub fn new(
        low_decompose: Vec<f64>,
        high_decompose: Vec<f64>,
        low_reconstruct: Vec<f64>,
        high_reconstruct: Vec<f64>,
    ) -> Result<Self> {
        if low_decompose.is_empty() || low_reconstruct.is_empty() {
            return Err(MarkError::EmptyFilter);
        }
        if low_decompose.len() != high_decompose.len() {
            return Err(MarkError::FilterLengthMismatch {
                low: low_decompose.len(),
                high: high_decompose.len(),
            });
        }
        if low_reconstruct.len() != high_reconstruct.len() {
            return Err(MarkError::FilterLengthMismatch {
                low: low_reconstruct.len(),
                high: high_reconstruct.len(),
            });
        }
        if low_reconstruct.len() % 2 != 0 {
            return Err(MarkError::OddReconstructFilter { len: low_reconstruct.len() });
        }
        Ok(Self { low_decompose, high_decompose, low_reconstruct, high_reconstruct })
    }

    /// The Haar wavelet: the shortest orthonormal filter bank, and the one
    /// the watermark engine uses (short support keeps the low band aligned
    /// to the pixel block grid).
    pub fn haar() -> Self {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        Self {
            low_decompose: vec![s, s],
            high_decompose: vec![-s, s],
            low_reconstruct: vec![s, s],
            high_reconstruct: vec![s, -s],
        }
    }

    pub fn decompose_len(&self) -> usize {
        self.low_decompose.len()
    }

    pub fn reconstruct_len(&self) -> usize {
        self.low_reconstruct.len()
    }

    pub fn low_decompose(&self) -> &[f64] {
        &self.low_decompose
    }

    pub fn high_decompose(&self) -> &[f64] {
        &self.high_decompose
    }

    pub fn low_reconstruct(&self) -> &[f64] {
        &self.low_reconstruct
    }

    pub fn high_reconstruct(&self) -> &[f64] {
        &self.high_reconstruct
    }
}
