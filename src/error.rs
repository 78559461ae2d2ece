// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Error types for the watermarking pipeline.
//!
//! [`MarkError`] covers all failure modes from filter-bank construction
//! through transform preparation and embedding. Errors propagate
//! synchronously to the caller; there is no internal retry, and no partial
//! computation is ever returned on error.

use core::fmt;

/// Errors that can occur while preparing or embedding a watermark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkError {
    /// A filter tap array was empty.
    EmptyFilter,
    /// The low-pass and high-pass taps of a filter pair differ in length.
    FilterLengthMismatch { low: usize, high: usize },
    /// The reconstruction filter has an odd number of taps.
    /// The inverse transform consumes reconstruction taps in pairs.
    OddReconstructFilter { len: usize },
    /// The requested decomposition level exceeds what the signal supports
    /// with the given filter bank.
    LevelOutOfRange { requested: usize, max: usize },
    /// A block handed to the DCT engine does not match the table's size.
    BlockSizeMismatch { expected: usize, actual: usize },
    /// The row data used to build a sub-region was not rectangular.
    RaggedRows { width: usize, row: usize, len: usize },
    /// The three channel planes decomposed to different low-band shapes.
    ChannelShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// The SVD iteration did not converge for the block at (row, col)
    /// of the block grid. The bit embedded in this block is unrecoverable.
    SvdDidNotConverge { row: usize, col: usize },
    /// The block at (row, col) produced NaN/Inf values in its decomposition.
    DegenerateBlock { row: usize, col: usize },
    /// The operation was cancelled via [`crate::progress::cancel`].
    Cancelled,
}

impl fmt::Display for MarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFilter => write!(f, "filter tap array is empty"),
            Self::FilterLengthMismatch { low, high } => {
                write!(f, "filter pair length mismatch: low-pass {low} vs high-pass {high}")
            }
            Self::OddReconstructFilter { len } => {
                write!(f, "reconstruction filter length {len} is odd, must be even")
            }
            Self::LevelOutOfRange { requested, max } => {
                write!(f, "the signal can only be decomposed {max} times with this filter bank, {requested} requested")
            }
            Self::BlockSizeMismatch { expected, actual } => {
                write!(f, "block size must be {expected}, but {actual} was given")
            }
            Self::RaggedRows { width, row, len } => {
                write!(f, "row {row} has length {len}, expected {width}")
            }
            Self::ChannelShapeMismatch { expected, actual } => {
                write!(
                    f,
                    "channel low-band shape mismatch: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            Self::SvdDidNotConverge { row, col } => {
                write!(f, "SVD did not converge for block ({row}, {col})")
            }
            Self::DegenerateBlock { row, col } => {
                write!(f, "block ({row}, {col}) produced non-finite values")
            }
            Self::Cancelled => write!(f, "operation cancelled by user"),
        }
    }
}

impl std::error::Error for MarkError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, MarkError>;
