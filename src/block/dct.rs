// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Orthonormal 2D DCT over single square blocks.
//!
//! The forward transform is the separable type-II DCT, the inverse is
//! type-III, both scaled so that inverse(forward(b)) == b up to float
//! rounding. Cosine factors depend only on the block size, so they are
//! precomputed once per size in a [`CosTable`] and shared process-wide
//! through [`CosTable::shared`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::{MarkError, Result};

use super::Block;

/// Precomputed cosine factors and normalization for one block size.
///
/// `cos[k * n + i] = cos(pi / n * (i + 0.5) * k)` is the factor shared by
/// the type-II and type-III kernels; `alpha[k]` is the orthonormal scale.
#[derive(Debug)]
pub struct CosTable {
    size: usize,
    cos: Vec<f64>,
    alpha: Vec<f64>,
}

static TABLES: OnceLock<Mutex<HashMap<usize, Arc<CosTable>>>> = OnceLock::new();

impl CosTable {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "DCT block size must be positive");
        let n = size as f64;
        let mut cos = vec![0.0; size * size];
        for k in 0..size {
            for i in 0..size {
                cos[k * size + i] =
                    (std::f64::consts::PI / n * (i as f64 + 0.5) * k as f64).cos();
            }
        }
        let mut alpha = vec![(2.0 / n).sqrt(); size];
        alpha[0] = (1.0 / n).sqrt();
        Self { size, cos, alpha }
    }

    /// Process-wide shared table for `size`, built on first use.
    pub fn shared(size: usize) -> Arc<CosTable> {
        let tables = TABLES.get_or_init(|| Mutex::new(HashMap::new()));
        let mut map = tables.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(map.entry(size).or_insert_with(|| Arc::new(CosTable::new(size))))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn check(&self, block: &Block) -> Result<()> {
        if block.size() != self.size {
            return Err(MarkError::BlockSizeMismatch {
                expected: self.size,
                actual: block.size(),
            });
        }
        Ok(())
    }

    /// One type-II pass over a single vector.
    fn dct_1d(&self, fetch: impl Fn(usize) -> f64, out: &mut [f64]) {
        for k in 0..self.size {
            let mut acc = 0.0;
            for i in 0..self.size {
                acc += fetch(i) * self.cos[k * self.size + i];
            }
            out[k] = self.alpha[k] * acc;
        }
    }

    /// One type-III pass over a single vector.
    fn idct_1d(&self, fetch: impl Fn(usize) -> f64, out: &mut [f64]) {
        for i in 0..self.size {
            let mut acc = 0.0;
            for k in 0..self.size {
                acc += self.alpha[k] * fetch(k) * self.cos[k * self.size + i];
            }
            out[i] = acc;
        }
    }

    /// Forward 2D DCT: rows first, then columns.
    pub fn forward(&self, block: &Block) -> Result<Block> {
        self.check(block)?;
        let n = self.size;
        let mut rows = Block::new(n);
        let mut line = vec![0.0; n];
        for y in 0..n {
            self.dct_1d(|i| block.get(i, y), &mut line);
            for (x, &v) in line.iter().enumerate() {
                rows.set(x, y, v);
            }
        }
        let mut out = Block::new(n);
        for x in 0..n {
            self.dct_1d(|i| rows.get(x, i), &mut line);
            for (y, &v) in line.iter().enumerate() {
                out.set(x, y, v);
            }
        }
        Ok(out)
    }

    /// Inverse 2D DCT: columns first, then rows, undoing [`forward`].
    ///
    /// [`forward`]: CosTable::forward
    pub fn inverse(&self, block: &Block) -> Result<Block> {
        self.check(block)?;
        let n = self.size;
        let mut cols = Block::new(n);
        let mut line = vec![0.0; n];
        for x in 0..n {
            self.idct_1d(|k| block.get(x, k), &mut line);
            for (y, &v) in line.iter().enumerate() {
                cols.set(x, y, v);
            }
        }
        let mut out = Block::new(n);
        for y in 0..n {
            self.idct_1d(|k| cols.get(k, y), &mut line);
            for (x, &v) in line.iter().enumerate() {
                out.set(x, y, v);
            }
        }
        Ok(out)
    }
}
