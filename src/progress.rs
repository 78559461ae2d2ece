// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/tidemark

//! Global progress tracking for prepare/embed.
//!
//! Uses atomics so it is safe to read from UI threads while rayon workers
//! advance the pipeline. Frontends poll [`get`]; long operations check
//! [`check_cancelled`] at phase boundaries and bail out with
//! [`MarkError::Cancelled`].

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::error::MarkError;

static STEP: AtomicU32 = AtomicU32::new(0);
static TOTAL: AtomicU32 = AtomicU32::new(0);
static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Phase count reported by [`crate::watermark::WatermarkEngine::prepare`]:
/// plane conversion, luma analysis, chroma analysis.
pub const PREPARE_STEPS: u32 = 3;

/// Phase count reported by [`crate::watermark::WatermarkEngine::embed`]:
/// sigma copy + mutation, channel rebuilds, pixel output.
pub const EMBED_STEPS: u32 = 3;

/// Reset progress to 0 and set the total step count.
/// Also resets the cancellation flag so a fresh run starts clean.
pub fn init(total: u32) {
    CANCELLED.store(false, Ordering::Relaxed);
    STEP.store(0, Ordering::Relaxed);
    TOTAL.store(total, Ordering::Relaxed);
}

/// Request cancellation of the current operation.
///
/// The pipeline checks this flag between phases and returns
/// `Err(MarkError::Cancelled)` when set.
pub fn cancel() {
    CANCELLED.store(true, Ordering::Relaxed);
}

/// Returns `true` if cancellation has been requested.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::Relaxed)
}

/// Check for cancellation and return an error if requested.
pub fn check_cancelled() -> Result<(), MarkError> {
    if is_cancelled() {
        Err(MarkError::Cancelled)
    } else {
        Ok(())
    }
}

/// Advance progress by one step, capped at total-1 so the bar never hits
/// 100% before [`finish`].
pub fn advance() {
    let total = TOTAL.load(Ordering::Relaxed);
    if total == 0 {
        STEP.fetch_add(1, Ordering::Relaxed);
    } else {
        let _ = STEP.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
            if s + 1 < total { Some(s + 1) } else { Some(s) }
        });
    }
}

/// Read the current (step, total) progress.
pub fn get() -> (u32, u32) {
    (STEP.load(Ordering::Relaxed), TOTAL.load(Ordering::Relaxed))
}

/// Mark progress as complete (step = total).
pub fn finish() {
    let t = TOTAL.load(Ordering::Relaxed);
    STEP.store(t, Ordering::Relaxed);
}
