// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! # tidemark-core
//!
//! Blind image watermarking engine: hides binary data in the dominant
//! singular values of small DCT blocks cut from the one-level Haar wavelet
//! low band of each YUV channel. Quantization-based embedding survives
//! moderate lossy recompression without access to the original image.
//!
//! The pipeline is split into a cached forward half and a cheap inverse
//! half: [`WatermarkEngine::prepare`] runs color conversion, DWT, block DCT
//! and SVD exactly once per source image, and every [`WatermarkEngine::embed`]
//! call only copies the singular value grids, applies the caller's mutation
//! and inverts. One prepared engine serves any number of payloads and
//! quantization steps.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use tidemark_core::{dominant_values, WatermarkEngine};
//!
//! let image = image::open("photo.png").unwrap().to_rgb8();
//! let engine = WatermarkEngine::prepare(&image).unwrap();
//! let marked = engine.embed(|y, _u, _v| y.embed_bit(0, 0, true, 46.0)).unwrap();
//!
//! let (y, _u, _v) = dominant_values(&marked, 4).unwrap();
//! assert!(tidemark_core::watermark::policy::read_bit(y.dominant(0, 0), 46.0));
//! ```

pub mod block;
pub mod error;
pub mod pixels;
pub mod progress;
pub mod watermark;
pub mod wavelet;

pub use error::{MarkError, Result};
pub use pixels::{image_to_planes, planes_to_image, ChannelPlanes};
pub use watermark::{dominant_values, SigmaGrid, WatermarkEngine, DEFAULT_BLOCK_SIZE};
pub use wavelet::{decompose, max_decompose_level, reconstruct, Decomposition, FilterBank, SubRegion};
