// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! The watermarking surface: the prepared engine and the bit policy.

pub mod engine;
pub mod policy;

pub use engine::{dominant_values, SigmaGrid, WatermarkEngine, DEFAULT_BLOCK_SIZE};
