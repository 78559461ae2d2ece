// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Discrete wavelet transform: filter banks, band containers, and the
//! multi-level separable 2D transform itself.

pub mod band;
pub mod filter;
pub mod transform;

pub use band::{Decomposition, SubRegion};
pub use filter::FilterBank;
pub use transform::{decompose, max_decompose_level, reconstruct};
