pub mod actors;
pub mod config;
pub mod metrics;
pub mod parser;
pub mod provider;
pub mod report;
pub mod sinks;
pub mod util;

use serde::{Deserialize, Serialize};

/// One device's state as reported by the monitoring facility at a single tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuSample {
    pub device_index: u32,
    pub device_name: String,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub memory_free_mb: u64,
    pub gpu_utilization_pct: u8,
    pub memory_utilization_pct: u8,
    pub temperature_c: i32,
}
