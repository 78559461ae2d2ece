// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Progress and cancellation lifecycle.
//!
//! The progress module is global atomic state, so everything lives in one
//! sequential test to keep the observations deterministic.

use image::RgbImage;
use tidemark_core::{progress, MarkError, WatermarkEngine};

#[test]
fn lifecycle() {
    // Plain counter mechanics: advance caps below total until finish.
    progress::init(3);
    assert_eq!(progress::get(), (0, 3));
    progress::advance();
    progress::advance();
    assert_eq!(progress::get(), (2, 3));
    progress::advance();
    assert_eq!(progress::get(), (2, 3), "step must stay below total");
    progress::finish();
    assert_eq!(progress::get(), (3, 3));

    // Cancellation is sticky until the next init.
    assert!(progress::check_cancelled().is_ok());
    progress::cancel();
    assert!(progress::is_cancelled());
    assert_eq!(progress::check_cancelled(), Err(MarkError::Cancelled));
    progress::init(1);
    assert!(progress::check_cancelled().is_ok());

    // A pipeline run drives the counter to completion and clears any stale
    // cancellation from a previous run.
    progress::cancel();
    let img = RgbImage::from_pixel(32, 32, image::Rgb([90, 120, 150]));
    let engine = WatermarkEngine::prepare(&img).unwrap();
    assert_eq!(progress::get(), (progress::PREPARE_STEPS, progress::PREPARE_STEPS));

    let marked = engine.embed(|_, _, _| {}).unwrap();
    assert_eq!(marked.dimensions(), (32, 32));
    assert_eq!(progress::get(), (progress::EMBED_STEPS, progress::EMBED_STEPS));
}
