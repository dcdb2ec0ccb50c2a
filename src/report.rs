//! Report formatting
//!
//! Renders a [`Tick`] into the fixed multi-line text block that both sinks
//! receive: one timestamped header line, one line per successfully parsed
//! device in facility order, and a single blank separator line. An empty body
//! (zero devices, or every record rejected) is a valid block.

use chrono::{DateTime, Local};

use crate::metrics::DerivedSample;

/// Timestamp format used in tick headers and the file header (second resolution).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const HEADER_DELIMITER: &str = "========================================";

/// An ordered set of device samples collected at a single wall-clock instant.
///
/// Ticks are ephemeral: built fresh each interval, formatted, emitted and
/// dropped. No history is kept in memory across ticks.
#[derive(Debug, Clone)]
pub struct Tick {
    pub timestamp: DateTime<Local>,
    pub samples: Vec<DerivedSample>,
}

impl Tick {
    pub fn new(timestamp: DateTime<Local>, samples: Vec<DerivedSample>) -> Self {
        Self { timestamp, samples }
    }
}

/// Render one tick as a report block.
pub fn format_tick(tick: &Tick) -> String {
    let mut block = format!("[{}]\n", tick.timestamp.format(TIMESTAMP_FORMAT));

    for derived in &tick.samples {
        let sample = &derived.sample;
        block.push_str(&format!(
            "GPU {} ({}): {}/{} MB ({:.1}%), util {}%, {}°C\n",
            sample.device_index,
            sample.device_name,
            sample.memory_used_mb,
            sample.memory_total_mb,
            derived.memory_used_ratio_pct,
            sample.gpu_utilization_pct,
            sample.temperature_c,
        ));
    }

    block.push('\n');
    block
}

/// Render the one-time header block written to the durable log at startup.
pub fn format_file_header(program: &str, start: DateTime<Local>) -> String {
    format!(
        "{HEADER_DELIMITER}\n{program} telemetry log\nstart time: {}\n{HEADER_DELIMITER}\n\n",
        start.format(TIMESTAMP_FORMAT)
    )
}
