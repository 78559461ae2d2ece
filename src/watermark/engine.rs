// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! The prepared watermark pipeline.
//!
//! [`WatermarkEngine::prepare`] runs the expensive forward half once per
//! source image: RGB to YUV planes, one-level Haar DWT per channel, the low
//! band cut into blocks, forward DCT and SVD per block. Everything is cached
//! in the engine. [`WatermarkEngine::embed`] then only copies the singular
//! value grids, lets the caller mutate them, and runs the inverse half.
//! Repeated embeds with different payloads or steps reuse the same engine,
//! and an engine is safe to embed from on several threads at once.
//!
//! Per-block work fans out over rayon when the `parallel` feature is on.
//! The fan-outs collect into `Result`, so the first failing block stops its
//! siblings from being consumed and propagates with its grid coordinates.

use image::RgbImage;
use nalgebra::DVector;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::block::dct::CosTable;
use crate::block::partition::{self, BlockGrid};
use crate::block::svd::{BlockSvd, SvdFailure};
use crate::block::Block;
use crate::error::{MarkError, Result};
use crate::pixels;
use crate::progress;
use crate::wavelet::{decompose, reconstruct, Decomposition, FilterBank, SubRegion};

use super::policy;

/// Block edge length used when none is given. Four is small enough that a
/// 512 pixel image still offers thousands of carrier blocks, and large
/// enough that the dominant singular value dwarfs the embedding step.
pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Owned per-block singular values of one channel, rows x cols.
///
/// Handed to the [`WatermarkEngine::embed`] mutator as the only writable
/// surface of the pipeline. The shape is fixed; only values change.
#[derive(Debug, Clone, PartialEq)]
pub struct SigmaGrid {
    rows: usize,
    cols: usize,
    values: Vec<DVector<f64>>,
}

impl SigmaGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The dominant (largest) singular value of block (row, col).
    pub fn dominant(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.cols + col][0]
    }

    pub fn set_dominant(&mut self, row: usize, col: usize, value: f64) {
        self.values[row * self.cols + col][0] = value;
    }

    /// Quantize the dominant value of block (row, col) to carry `bit` with
    /// step `d`. See [`policy::embed_bit`].
    pub fn embed_bit(&mut self, row: usize, col: usize, bit: bool, d: f64) {
        let s = self.dominant(row, col);
        self.set_dominant(row, col, policy::embed_bit(s, d, bit));
    }

    /// Read the bit carried by the dominant value of block (row, col),
    /// assuming step `d`. See [`policy::read_bit`].
    pub fn read_bit(&self, row: usize, col: usize, d: f64) -> bool {
        policy::read_bit(self.dominant(row, col), d)
    }

    fn block_values(&self, row: usize, col: usize) -> &DVector<f64> {
        &self.values[row * self.cols + col]
    }
}

/// Cached forward half of one channel.
struct ChannelPipeline {
    ll_width: usize,
    ll_height: usize,
    decompositions: Vec<Decomposition>,
    rows: usize,
    cols: usize,
    svds: Vec<BlockSvd>,
}

impl ChannelPipeline {
    fn build(plane: &SubRegion, bank: &FilterBank, block_size: usize) -> Result<Self> {
        let (ll, decompositions) = decompose(plane, bank, 1)?;
        let grid = partition::partition(&ll, block_size);
        let table = CosTable::shared(block_size);
        let (rows, cols) = (grid.rows(), grid.cols());

        let analyze = |idx: usize| -> Result<BlockSvd> {
            let (row, col) = (idx / cols, idx % cols);
            let freq = table.forward(grid.get(row, col))?;
            BlockSvd::compute(&freq).map_err(|failure| match failure {
                SvdFailure::NonConvergence => MarkError::SvdDidNotConverge { row, col },
                SvdFailure::NonFinite => MarkError::DegenerateBlock { row, col },
            })
        };

        #[cfg(feature = "parallel")]
        let svds = (0..rows * cols)
            .into_par_iter()
            .map(analyze)
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let svds = (0..rows * cols).map(analyze).collect::<Result<Vec<_>>>()?;

        Ok(Self {
            ll_width: ll.width(),
            ll_height: ll.height(),
            decompositions,
            rows,
            cols,
            svds,
        })
    }

    /// Fresh copy of the singular values, the only mutable state of a run.
    fn sigma_copy(&self) -> SigmaGrid {
        SigmaGrid {
            rows: self.rows,
            cols: self.cols,
            values: self.svds.iter().map(|svd| svd.singular().clone()).collect(),
        }
    }

    /// Inverse half up to the channel plane: per block U * S' * V^T and
    /// inverse DCT, reassemble the low band, inverse DWT.
    fn rebuild(
        &self,
        sigma: &SigmaGrid,
        bank: &FilterBank,
        block_size: usize,
    ) -> Result<SubRegion> {
        let table = CosTable::shared(block_size);
        let synthesize = |idx: usize| -> Result<Block> {
            let (row, col) = (idx / self.cols, idx % self.cols);
            let freq = self.svds[idx].recompose(sigma.block_values(row, col));
            table.inverse(&freq)
        };

        #[cfg(feature = "parallel")]
        let blocks = (0..self.rows * self.cols)
            .into_par_iter()
            .map(synthesize)
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let blocks = (0..self.rows * self.cols)
            .map(synthesize)
            .collect::<Result<Vec<_>>>()?;

        let grid = BlockGrid::from_blocks(self.rows, self.cols, blocks);
        let ll = partition::reassemble(&grid, self.ll_width, self.ll_height);
        Ok(reconstruct(&ll, &self.decompositions, bank))
    }
}

/// A source image with its forward transform fully cached, ready to embed
/// any number of payloads.
pub struct WatermarkEngine {
    block_size: usize,
    image_width: u32,
    image_height: u32,
    bank: FilterBank,
    y: ChannelPipeline,
    u: ChannelPipeline,
    v: ChannelPipeline,
}

impl WatermarkEngine {
    /// Prepare `image` with the default block size.
    pub fn prepare(image: &RgbImage) -> Result<Self> {
        Self::prepare_with_block_size(image, DEFAULT_BLOCK_SIZE)
    }

    /// Prepare `image`: YUV planes, one-level Haar DWT per channel, then
    /// per-block DCT and SVD over each low band. All of it is cached; the
    /// returned engine never touches the pixels again.
    pub fn prepare_with_block_size(image: &RgbImage, block_size: usize) -> Result<Self> {
        progress::init(progress::PREPARE_STEPS);
        progress::check_cancelled()?;

        let planes = pixels::image_to_planes(image);
        progress::advance();
        progress::check_cancelled()?;

        let bank = FilterBank::haar();
        let y = ChannelPipeline::build(&planes.y, &bank, block_size)?;
        progress::advance();
        progress::check_cancelled()?;
        let u = ChannelPipeline::build(&planes.u, &bank, block_size)?;
        let v = ChannelPipeline::build(&planes.v, &bank, block_size)?;

        // The three planes share one footprint, so the low bands must too.
        for channel in [&u, &v] {
            if (channel.ll_width, channel.ll_height) != (y.ll_width, y.ll_height) {
                return Err(MarkError::ChannelShapeMismatch {
                    expected: (y.ll_width, y.ll_height),
                    actual: (channel.ll_width, channel.ll_height),
                });
            }
        }
        progress::finish();

        Ok(Self {
            block_size,
            image_width: planes.image_width,
            image_height: planes.image_height,
            bank,
            y,
            u,
            v,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Block grid shape shared by all three channels: (rows, cols).
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.y.rows, self.y.cols)
    }

    /// Run one embedding: copy the cached singular value grids, hand them to
    /// `mutator` (Y, U, V order), then run the inverse pipeline over the
    /// modified values and return the marked image.
    ///
    /// The engine itself is not modified, so embeds can run concurrently
    /// and a no-op mutator reproduces the source image up to the round-trip
    /// tolerance of the float pipeline.
    pub fn embed(
        &self,
        mutator: impl FnOnce(&mut SigmaGrid, &mut SigmaGrid, &mut SigmaGrid),
    ) -> Result<RgbImage> {
        progress::init(progress::EMBED_STEPS);
        progress::check_cancelled()?;

        let mut y_sigma = self.y.sigma_copy();
        let mut u_sigma = self.u.sigma_copy();
        let mut v_sigma = self.v.sigma_copy();
        mutator(&mut y_sigma, &mut u_sigma, &mut v_sigma);
        progress::advance();
        progress::check_cancelled()?;

        let y_plane = self.y.rebuild(&y_sigma, &self.bank, self.block_size)?;
        let u_plane = self.u.rebuild(&u_sigma, &self.bank, self.block_size)?;
        let v_plane = self.v.rebuild(&v_sigma, &self.bank, self.block_size)?;
        progress::advance();
        progress::check_cancelled()?;

        let image = pixels::planes_to_image(
            &y_plane,
            &u_plane,
            &v_plane,
            self.image_width,
            self.image_height,
        );
        progress::finish();
        Ok(image)
    }
}

/// Decode surface: run the forward pipeline over `image` and return the
/// per-block singular values of the three channels (Y, U, V).
///
/// Thresholding the read fractions into bits is the caller's job, as is
/// skipping the last block row and column if the encoder did.
pub fn dominant_values(
    image: &RgbImage,
    block_size: usize,
) -> Result<(SigmaGrid, SigmaGrid, SigmaGrid)> {
    let engine = WatermarkEngine::prepare_with_block_size(image, block_size)?;
    Ok((
        engine.y.sigma_copy(),
        engine.u.sigma_copy(),
        engine.v.sigma_copy(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            let r = ((x * 255) / width.max(1)) as u8;
            let g = ((y * 255) / height.max(1)) as u8;
            image::Rgb([r, g, 128])
        })
    }

    #[test]
    fn grid_shape_matches_low_band() {
        // 64x48 -> even, LL 32x24 -> 6 rows x 8 cols of 4x4 blocks.
        let engine = WatermarkEngine::prepare(&gradient_image(64, 48)).unwrap();
        assert_eq!(engine.grid_shape(), (6, 8));
        assert_eq!(engine.block_size(), 4);
    }

    #[test]
    fn odd_image_pads_before_decomposition() {
        // 63x47 pads to 64x48, same grid as above.
        let engine = WatermarkEngine::prepare(&gradient_image(63, 47)).unwrap();
        assert_eq!(engine.grid_shape(), (6, 8));
        let marked = engine.embed(|_, _, _| {}).unwrap();
        assert_eq!(marked.dimensions(), (63, 47));
    }

    #[test]
    fn sigma_copies_are_independent() {
        let engine = WatermarkEngine::prepare(&gradient_image(32, 32)).unwrap();
        let mut first = engine.y.sigma_copy();
        let before = first.dominant(0, 0);
        first.set_dominant(0, 0, before + 100.0);
        let second = engine.y.sigma_copy();
        assert_eq!(second.dominant(0, 0), before);
    }

    #[test]
    fn embed_bit_changes_only_the_dominant_value() {
        let engine = WatermarkEngine::prepare(&gradient_image(32, 32)).unwrap();
        let mut sigma = engine.y.sigma_copy();
        let untouched = sigma.block_values(0, 1).clone();
        sigma.embed_bit(1, 1, true, 46.0);
        assert!(sigma.read_bit(1, 1, 46.0));
        assert_eq!(sigma.block_values(0, 1), &untouched);
        let tail = sigma.block_values(1, 1).rows(1, 3).clone_owned();
        let cached = engine.y.svds[engine.y.cols + 1]
            .singular()
            .rows(1, 3)
            .clone_owned();
        assert_eq!(tail, cached, "non-dominant values must not move");
    }

    #[test]
    fn repeated_embeds_are_deterministic() {
        let engine = WatermarkEngine::prepare(&gradient_image(32, 32)).unwrap();
        let mark = |y: &mut SigmaGrid, _: &mut SigmaGrid, _: &mut SigmaGrid| {
            y.embed_bit(0, 0, true, 46.0);
            y.embed_bit(0, 1, false, 46.0);
        };
        let first = engine.embed(mark).unwrap();
        let second = engine.embed(mark).unwrap();
        assert_eq!(first, second);
    }
}
