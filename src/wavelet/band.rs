// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Value types produced by the wavelet transform.
//!
//! [`SubRegion`] is a plain 2D grid of reals with zero-padded reads past the
//! edge; [`Decomposition`] groups the three detail bands of one level. Both
//! have structural equality and are never mutated once the transform has
//! produced them -- only the low band downstream of a decomposition changes.

use crate::error::{MarkError, Result};

/// A 2D grid of reals with explicit width and height.
///
/// Reads outside `[0, width) x [0, height)` return 0.0, which is what gives
/// the block partitioner its implicit zero padding. Writes outside the grid
/// panic.
#[derive(Debug, Clone, PartialEq)]
pub struct SubRegion {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl SubRegion {
    /// A zero-filled region.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0.0; width * height] }
    }

    /// Build from row vectors, validating that every row has the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(MarkError::RaggedRows { width, row: i, len: row.len() });
            }
        }
        let mut data = Vec::with_capacity(width * height);
        for row in rows {
            data.extend_from_slice(&row);
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at (x, y), 0.0 when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        if x < self.width && y < self.height {
            self.data[y * self.width + x]
        } else {
            0.0
        }
    }

    /// Write a value. Panics when (x, y) is out of range.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f64) {
        assert!(x < self.width && y < self.height, "write at ({x}, {y}) outside {}x{}", self.width, self.height);
        self.data[y * self.width + x] = v;
    }

    /// One row as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [f64] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    /// Largest absolute value, 0.0 for an empty region.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0f64, |m, v| m.max(v.abs()))
    }
}

/// The three detail bands of one decomposition level, all the same size.
///
/// LH holds horizontal edges, HL vertical edges, HH diagonal edges. Never
/// mutated after creation; reconstruction reads them back verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    lh: SubRegion,
    hl: SubRegion,
    hh: SubRegion,
}

impl Decomposition {
    /// Panics if the three bands differ in size; the transform is the only
    /// producer and always emits equal-sized bands.
    pub fn new(lh: SubRegion, hl: SubRegion, hh: SubRegion) -> Self {
        assert_eq!((lh.width(), lh.height()), (hl.width(), hl.height()));
        assert_eq!((lh.width(), lh.height()), (hh.width(), hh.height()));
        Self { lh, hl, hh }
    }

    pub fn width(&self) -> usize {
        self.lh.width()
    }

    pub fn height(&self) -> usize {
        self.lh.height()
    }

    /// LH band.
    pub fn horizontal_edge(&self) -> &SubRegion {
        &self.lh
    }

    /// HL band.
    pub fn vertical_edge(&self) -> &SubRegion {
        &self.hl
    }

    /// HH band.
    pub fn diagonal_edge(&self) -> &SubRegion {
        &self.hh
    }
}
