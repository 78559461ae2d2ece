// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Partitioning a plane into square blocks and putting them back.
//!
//! The grid covers the plane with `ceil(w / n) x ceil(h / n)` blocks. When
//! the plane dimensions are not multiples of the block size, the rightmost
//! column and bottom row of blocks read past the edge and pick up the zero
//! padding of [`SubRegion::get`]. Reassembly writes only in-range samples,
//! so partition -> reassemble is exact on the original footprint.

use crate::wavelet::SubRegion;

use super::Block;

/// Blocks of one plane, addressed by (block row, block column).
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGrid {
    cols: usize,
    rows: usize,
    block_size: usize,
    blocks: Vec<Block>,
}

impl BlockGrid {
    /// Build a grid from row-major blocks. Panics on a count or size
    /// mismatch; producers always hand over a full uniform grid.
    pub fn from_blocks(rows: usize, cols: usize, blocks: Vec<Block>) -> Self {
        assert_eq!(blocks.len(), rows * cols, "expected {rows}x{cols} blocks");
        let block_size = blocks.first().map_or(0, Block::size);
        assert!(blocks.iter().all(|b| b.size() == block_size));
        Self { cols, rows, block_size, blocks }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> &Block {
        &self.blocks[row * self.cols + col]
    }

    /// Replace one block. Panics if the replacement has a different size.
    pub fn set(&mut self, row: usize, col: usize, block: Block) {
        assert_eq!(block.size(), self.block_size);
        self.blocks[row * self.cols + col] = block;
    }

    /// All blocks in row-major grid order.
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }
}

/// Cut `plane` into `block_size`-square tiles, zero padded past the edge.
pub fn partition(plane: &SubRegion, block_size: usize) -> BlockGrid {
    assert!(block_size > 0, "block size must be positive");
    let cols = plane.width().div_ceil(block_size);
    let rows = plane.height().div_ceil(block_size);
    let mut blocks = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            let mut block = Block::new(block_size);
            for y in 0..block_size {
                for x in 0..block_size {
                    block.set(x, y, plane.get(col * block_size + x, row * block_size + y));
                }
            }
            blocks.push(block);
        }
    }
    BlockGrid { cols, rows, block_size, blocks }
}

/// Write the grid back into a `width` x `height` plane, dropping the
/// padding samples of edge blocks.
pub fn reassemble(grid: &BlockGrid, width: usize, height: usize) -> SubRegion {
    let n = grid.block_size();
    let mut plane = SubRegion::new(width, height);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let block = grid.get(row, col);
            for y in 0..n {
                for x in 0..n {
                    let px = col * n + x;
                    let py = row * n + y;
                    if px < width && py < height {
                        plane.set(px, py, block.get(x, y));
                    }
                }
            }
        }
    }
    plane
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_plane(width: usize, height: usize) -> SubRegion {
        let mut plane = SubRegion::new(width, height);
        for y in 0..height {
            for x in 0..width {
                plane.set(x, y, (y * width + x) as f64);
            }
        }
        plane
    }

    #[test]
    fn exact_fit_partition() {
        let plane = ramp_plane(8, 8);
        let grid = partition(&plane, 4);
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        // Top-left sample of the bottom-right block is (4, 4).
        assert_eq!(grid.get(1, 1).get(0, 0), plane.get(4, 4));
        assert_eq!(grid.get(0, 1).get(3, 2), plane.get(7, 2));
    }

    #[test]
    fn ragged_edge_is_zero_padded() {
        let plane = ramp_plane(6, 5);
        let grid = partition(&plane, 4);
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        let edge = grid.get(0, 1);
        assert_eq!(edge.get(0, 0), plane.get(4, 0));
        assert_eq!(edge.get(2, 0), 0.0, "x=6 is past the plane");
        let bottom = grid.get(1, 1);
        assert_eq!(bottom.get(1, 0), plane.get(5, 4));
        assert_eq!(bottom.get(0, 1), 0.0, "y=5 is past the plane");
    }

    #[test]
    fn reassemble_inverts_partition() {
        for &(w, h) in &[(8usize, 8usize), (6, 5), (7, 9), (4, 4), (3, 3)] {
            let plane = ramp_plane(w, h);
            let grid = partition(&plane, 4);
            let back = reassemble(&grid, w, h);
            assert_eq!(back, plane, "{w}x{h}");
        }
    }

    #[test]
    fn set_replaces_one_block() {
        let plane = ramp_plane(8, 8);
        let mut grid = partition(&plane, 4);
        let mut patch = Block::new(4);
        patch.set(0, 0, -1.0);
        grid.set(1, 0, patch.clone());
        assert_eq!(grid.get(1, 0), &patch);
        assert_eq!(grid.get(0, 0).get(0, 0), 0.0);
        assert_eq!(grid.get(0, 0).get(1, 0), 1.0);
    }

    #[test]
    #[should_panic]
    fn set_rejects_wrong_block_size() {
        let plane = ramp_plane(8, 8);
        let mut grid = partition(&plane, 4);
        grid.set(0, 0, Block::new(8));
    }
}
