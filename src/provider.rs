//! Telemetry provider adapter
//!
//! All knowledge of the external monitoring facility lives here. The
//! production provider shells out to `nvidia-smi`, requesting one
//! comma-delimited record per installed device with exactly the fields the
//! parser expects. Everything downstream of this module only ever sees raw
//! record lines.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::trace;

use crate::parser::FIELDS;

/// Source of raw per-device telemetry records.
///
/// Implementations must be `Send + Sync` as the sampler actor holds them
/// across await points. Tests substitute scripted implementations.
#[async_trait]
pub trait TelemetryProvider: Send + Sync {
    /// Query the facility once, returning one raw record per device.
    ///
    /// A failure here is a per-tick collection error, not a process-fatal
    /// condition; the sampler skips the tick and retries on the next one.
    async fn collect(&self) -> Result<Vec<String>>;

    /// Startup validation: verify the facility exists and is invocable.
    ///
    /// Called exactly once before the sampling loop starts. Failure is fatal.
    async fn probe(&self) -> Result<()> {
        self.collect().await.map(|_| ())
    }
}

/// Provider backed by the `nvidia-smi` command line tool.
#[derive(Debug, Clone)]
pub struct NvidiaSmi {
    binary: String,
}

impl Default for NvidiaSmi {
    fn default() -> Self {
        Self::with_binary("nvidia-smi")
    }
}

impl NvidiaSmi {
    /// Use an alternative binary. Mainly for tests.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl TelemetryProvider for NvidiaSmi {
    async fn collect(&self) -> Result<Vec<String>> {
        let query = format!("--query-gpu={}", FIELDS.join(","));

        trace!("invoking {} {query}", self.binary);

        let output = Command::new(&self.binary)
            .arg(&query)
            .arg("--format=csv,noheader,nounits")
            .output()
            .await
            .with_context(|| format!("failed to invoke '{}'", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "'{}' exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            );
        }

        let records = String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();

        trace!("collected {} raw records", records.len());

        Ok(records)
    }
}
