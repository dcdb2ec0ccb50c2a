//! Derived metrics
//!
//! The facility reports raw counters only; the used-memory percentage shown
//! in reports is computed here. [`derive`] is pure and assumes the parser has
//! already rejected records with a non-positive memory total.

use serde::{Deserialize, Serialize};

use crate::GpuSample;

/// A [`GpuSample`] augmented with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSample {
    pub sample: GpuSample,

    /// memory_used_mb / memory_total_mb, as a percentage
    pub memory_used_ratio_pct: f64,
}

/// Compute the derived metrics for one sample.
pub fn derive(sample: GpuSample) -> DerivedSample {
    let memory_used_ratio_pct =
        sample.memory_used_mb as f64 / sample.memory_total_mb as f64 * 100.0;

    DerivedSample {
        sample,
        memory_used_ratio_pct,
    }
}
