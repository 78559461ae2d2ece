// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Square block processing: partitioning a plane into blocks, the 2D DCT
//! over single blocks, and the per-block singular value decomposition.

pub mod dct;
pub mod partition;
pub mod svd;

pub use dct::CosTable;
pub use partition::BlockGrid;
pub use svd::BlockSvd;

/// A square `size` x `size` tile of reals in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    size: usize,
    data: Vec<f64>,
}

impl Block {
    /// A zero-filled block.
    pub fn new(size: usize) -> Self {
        Self { size, data: vec![0.0; size * size] }
    }

    /// Wrap existing row-major data. Panics if `data` is not `size * size`
    /// long; the partitioner is the only producer and always fits.
    pub fn from_data(size: usize, data: Vec<f64>) -> Self {
        assert_eq!(data.len(), size * size, "block data must be {size}x{size}");
        Self { size, data }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.data[y * self.size + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        self.data[y * self.size + x] = v;
    }

    /// Row-major backing slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// True if any coefficient is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|v| !v.is_finite())
    }
}
