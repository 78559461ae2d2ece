// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Multi-level 2D discrete wavelet transform with symmetric extension.
//!
//! [`decompose`] runs a separable 1D filter over rows then columns per level,
//! downsampling 2:1 after each pass, and yields the terminal low band plus
//! one [`Decomposition`] (LH/HL/HH) per level, finest first. [`reconstruct`]
//! is the exact inverse and consumes the decompositions coarsest to finest.
//!
//! Boundary handling is symmetric extension without repeating the edge
//! sample: `... x2 x1 | x1 x2 ... xn | xn xn-1 ...`. The filtered length
//! before downsampling is `len + filter_len - 2`, so each level outputs
//! `ceil((len + filter_len - 2) / 2)` samples per axis.
//!
//! Row and column passes are data-parallel: each task owns one row or one
//! column, and the `collect` between passes is the join barrier. The column
//! pass reads every row's output for its column, so the barrier is load
//! bearing, as is the one between levels.

use crate::error::{MarkError, Result};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::band::{Decomposition, SubRegion};
use super::filter::FilterBank;

/// Maximum decomposition level for a signal of `signal_len` samples:
/// `log2(signal_len / (filter_len - 1))`, truncated, never below zero.
pub fn max_decompose_level(signal_len: usize, filter_len: usize) -> usize {
    if filter_len < 2 {
        return 0;
    }
    let ratio = signal_len as f64 / (filter_len as f64 - 1.0);
    let level = ratio.log2();
    if level.is_finite() && level > 0.0 {
        level as usize
    } else {
        0
    }
}

/// Filtered-and-downsampled output length for one axis of one level.
#[inline]
fn level_len(input_len: usize, filter_len: usize) -> usize {
    (input_len + filter_len - 2).div_ceil(2)
}

/// Map a convolution index onto the signal using symmetric extension.
/// Mirrors without repeating the edge sample: -1 -> 0 is wrong here,
/// -1 maps to 0 via `-x-1`, and `len` maps to `len-1` via `2*len-x-1`.
#[inline]
fn mirror(x: isize, len: usize) -> usize {
    if x < 0 {
        (-x - 1) as usize
    } else if (x as usize) < len {
        x as usize
    } else {
        2 * len - x as usize - 1
    }
}

/// One 1D analysis pass: convolve with both decompose filters at tap offset
/// `t = 2i + 1` (filter-then-downsample folded into one loop) and write
/// `out_len` low/high samples.
fn filter_down(
    fetch: impl Fn(usize) -> f64,
    input_len: usize,
    bank: &FilterBank,
    out_len: usize,
) -> (Vec<f64>, Vec<f64>) {
    let low_taps = bank.low_decompose();
    let high_taps = bank.high_decompose();
    let mut low = vec![0.0; out_len];
    let mut high = vec![0.0; out_len];
    for i in 0..out_len {
        let t = (2 * i + 1) as isize;
        let mut lo = 0.0;
        let mut hi = 0.0;
        for (l, (&fl, &fh)) in low_taps.iter().zip(high_taps).enumerate() {
            let v = fetch(mirror(t - l as isize, input_len));
            lo += fl * v;
            hi += fh * v;
        }
        low[i] = lo;
        high[i] = hi;
    }
    (low, high)
}

/// One 1D synthesis pass: upsample `input_len` low/high samples into
/// `2 * input_len` output samples, consuming reconstruction taps in
/// `(2l, 2l+1)` pairs.
fn upsample(
    low: impl Fn(usize) -> f64,
    high: impl Fn(usize) -> f64,
    out: &mut [f64],
    input_len: usize,
    bank: &FilterBank,
) {
    let lpr = bank.low_reconstruct();
    let hpr = bank.high_reconstruct();
    let pairs = lpr.len() / 2;
    for v in 0..input_len {
        let m = 2 * v;
        let n = m + 1;
        out[m] = 0.0;
        out[n] = 0.0;
        for l in 0..pairs {
            if v >= l {
                let lo = low(v - l);
                let hi = high(v - l);
                let t = 2 * l;
                out[m] += lpr[t] * lo + hpr[t] * hi;
                out[n] += lpr[t + 1] * lo + hpr[t + 1] * hi;
            }
        }
    }
}

/// Decompose `plane` into `levels` levels.
///
/// Returns the terminal low band and the per-level detail decompositions,
/// index 0 = finest. Fails with [`MarkError::LevelOutOfRange`] naming the
/// maximum derivable level when `levels` is 0 or exceeds
/// `min(max_level(height), max_level(width))`.
pub fn decompose(
    plane: &SubRegion,
    bank: &FilterBank,
    levels: usize,
) -> Result<(SubRegion, Vec<Decomposition>)> {
    let filter_len = bank.decompose_len();
    let max = max_decompose_level(plane.height(), filter_len)
        .min(max_decompose_level(plane.width(), filter_len));
    if levels == 0 || levels > max {
        return Err(MarkError::LevelOutOfRange { requested: levels, max });
    }

    let mut input = plane.clone();
    let mut decompositions = Vec::with_capacity(levels);

    for _ in 0..levels {
        let in_w = input.width();
        let in_h = input.height();
        let level_w = level_len(in_w, filter_len);
        let level_h = level_len(in_h, filter_len);

        // Row pass: each task filters one row into private low/high buffers.
        let row_pass = |y: usize| filter_down(|i| input.row(y)[i], in_w, bank, level_w);

        #[cfg(feature = "parallel")]
        let filtered: Vec<(Vec<f64>, Vec<f64>)> =
            (0..in_h).into_par_iter().map(row_pass).collect();
        #[cfg(not(feature = "parallel"))]
        let filtered: Vec<(Vec<f64>, Vec<f64>)> = (0..in_h).map(row_pass).collect();

        let (low_rows, high_rows): (Vec<Vec<f64>>, Vec<Vec<f64>>) =
            filtered.into_iter().unzip();

        // Column pass: each task owns one output column and reads every
        // row's output for it.
        let col_pass = |x: usize| {
            let (ll, lh) = filter_down(|i| low_rows[i][x], in_h, bank, level_h);
            let (hl, hh) = filter_down(|i| high_rows[i][x], in_h, bank, level_h);
            (ll, lh, hl, hh)
        };

        #[cfg(feature = "parallel")]
        let columns: Vec<(Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> =
            (0..level_w).into_par_iter().map(col_pass).collect();
        #[cfg(not(feature = "parallel"))]
        let columns: Vec<(Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>)> =
            (0..level_w).map(col_pass).collect();

        let mut ll = SubRegion::new(level_w, level_h);
        let mut lh = SubRegion::new(level_w, level_h);
        let mut hl = SubRegion::new(level_w, level_h);
        let mut hh = SubRegion::new(level_w, level_h);
        for (x, (c_ll, c_lh, c_hl, c_hh)) in columns.iter().enumerate() {
            for y in 0..level_h {
                ll.set(x, y, c_ll[y]);
                lh.set(x, y, c_lh[y]);
                hl.set(x, y, c_hl[y]);
                hh.set(x, y, c_hh[y]);
            }
        }

        decompositions.push(Decomposition::new(lh, hl, hh));
        // The low-low band feeds the next level.
        input = ll;
    }

    Ok((input, decompositions))
}

/// Inverse of [`decompose`], consuming decompositions coarsest to finest.
///
/// When a coarse level had odd dimensions, the recovered low band of the
/// next-finer level is one sample larger than that level's detail bands;
/// the extra row/column is redundant mirror energy and is ignored by the
/// finer level. Consequently the returned plane can exceed the original
/// dimensions -- only the original-sized prefix is meaningful.
pub fn reconstruct(
    ll: &SubRegion,
    decompositions: &[Decomposition],
    bank: &FilterBank,
) -> SubRegion {
    let mut current = ll.clone();

    for dec in decompositions.iter().rev() {
        let level_w = dec.width();
        let level_h = dec.height();

        // Column pass: recover L from LL+LH and H from HL+HH per column.
        let col_pass = |x: usize| {
            let mut c_low = vec![0.0; 2 * level_h];
            let mut c_high = vec![0.0; 2 * level_h];
            upsample(
                |i| current.get(x, i),
                |i| dec.horizontal_edge().get(x, i),
                &mut c_low,
                level_h,
                bank,
            );
            upsample(
                |i| dec.vertical_edge().get(x, i),
                |i| dec.diagonal_edge().get(x, i),
                &mut c_high,
                level_h,
                bank,
            );
            (c_low, c_high)
        };

        #[cfg(feature = "parallel")]
        let columns: Vec<(Vec<f64>, Vec<f64>)> =
            (0..level_w).into_par_iter().map(col_pass).collect();
        #[cfg(not(feature = "parallel"))]
        let columns: Vec<(Vec<f64>, Vec<f64>)> = (0..level_w).map(col_pass).collect();

        let (col_low, col_high): (Vec<Vec<f64>>, Vec<Vec<f64>>) =
            columns.into_iter().unzip();

        // Row pass: merge L and H into the full-resolution plane.
        let row_pass = |y: usize| {
            let mut row = vec![0.0; 2 * level_w];
            upsample(|i| col_low[i][y], |i| col_high[i][y], &mut row, level_w, bank);
            row
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<Vec<f64>> = (0..2 * level_h).into_par_iter().map(row_pass).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<Vec<f64>> = (0..2 * level_h).map(row_pass).collect();

        let mut image = SubRegion::new(2 * level_w, 2 * level_h);
        for (y, row) in rows.iter().enumerate() {
            image.row_mut(y).copy_from_slice(row);
        }
        current = image;
    }

    current
}
