//! Parser for raw telemetry records
//!
//! The monitoring facility reports one comma-delimited record per device with
//! exactly eight fields (see [`FIELDS`]). This module turns such a record into
//! a typed [`GpuSample`], rejecting anything malformed with a [`ParseError`]
//! that names the offending field. A rejected record skips that device for
//! the current tick only; callers must not treat it as fatal.

use std::fmt;
use std::str::FromStr;

use crate::GpuSample;

/// Field names in record order, used for error reporting.
pub const FIELDS: [&str; 8] = [
    "index",
    "name",
    "memory.used",
    "memory.total",
    "memory.free",
    "utilization.gpu",
    "utilization.memory",
    "temperature.gpu",
];

/// Result type alias for record parsing
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors that can occur while parsing a single raw record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Record did not split into exactly eight fields
    FieldCount { found: usize },

    /// A numeric field did not parse as a number
    InvalidNumber { field: &'static str, value: String },

    /// Total memory must be positive for the derived ratio to be defined
    NonPositiveTotal,

    /// Reported used memory exceeds reported total memory
    UsedExceedsTotal { used: u64, total: u64 },

    /// A utilization percentage was outside 0..=100
    UtilizationOutOfRange { field: &'static str, value: u8 },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::FieldCount { found } => {
                write!(f, "expected {} fields, found {}", FIELDS.len(), found)
            }
            ParseError::InvalidNumber { field, value } => {
                write!(f, "field '{field}' is not a valid number: '{value}'")
            }
            ParseError::NonPositiveTotal => {
                write!(f, "field 'memory.total' must be positive")
            }
            ParseError::UsedExceedsTotal { used, total } => {
                write!(f, "used memory {used} MiB exceeds total {total} MiB")
            }
            ParseError::UtilizationOutOfRange { field, value } => {
                write!(f, "field '{field}' is out of range 0..=100: {value}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

fn numeric<T: FromStr>(field: &'static str, value: &str) -> ParseResult<T> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn utilization(field: &'static str, value: &str) -> ParseResult<u8> {
    let pct: u8 = numeric(field, value)?;
    if pct > 100 {
        return Err(ParseError::UtilizationOutOfRange { field, value: pct });
    }
    Ok(pct)
}

/// Parse one raw record into a [`GpuSample`].
///
/// Fields may carry surrounding whitespace (the facility delimits with ", "),
/// which is stripped before validation.
pub fn parse_record(raw: &str) -> ParseResult<GpuSample> {
    let fields = raw.split(',').map(str::trim).collect::<Vec<_>>();

    if fields.len() != FIELDS.len() {
        return Err(ParseError::FieldCount {
            found: fields.len(),
        });
    }

    let memory_total_mb: u64 = numeric("memory.total", fields[3])?;
    if memory_total_mb == 0 {
        return Err(ParseError::NonPositiveTotal);
    }

    let memory_used_mb: u64 = numeric("memory.used", fields[2])?;
    if memory_used_mb > memory_total_mb {
        return Err(ParseError::UsedExceedsTotal {
            used: memory_used_mb,
            total: memory_total_mb,
        });
    }

    Ok(GpuSample {
        device_index: numeric("index", fields[0])?,
        device_name: fields[1].to_string(),
        memory_used_mb,
        memory_total_mb,
        memory_free_mb: numeric("memory.free", fields[4])?,
        gpu_utilization_pct: utilization("utilization.gpu", fields[5])?,
        memory_utilization_pct: utilization("utilization.memory", fields[6])?,
        temperature_c: numeric("temperature.gpu", fields[7])?,
    })
}
