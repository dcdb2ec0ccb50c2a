//! Report sinks
//!
//! Every tick's report block is emitted to two sinks with identical content:
//! the interactive console and the append-only durable log. Failure semantics
//! differ per sink and are owned by [`SinkFanOut`]:
//!
//! - console write failures are best-effort: logged and swallowed
//! - durable log write failures are fatal: the log is the only persistent
//!   record, so they propagate and stop the sampling loop

pub mod console;
pub mod file;

pub use console::ConsoleSink;
pub use file::FileLogSink;

use async_trait::async_trait;
use tracing::warn;

/// A destination for formatted report blocks.
#[async_trait]
pub trait Sink: Send {
    /// Write one complete report block.
    ///
    /// Implementations must write the block in a single append so that a
    /// block is either fully present or absent, never truncated mid-tick.
    async fn emit(&mut self, block: &str) -> std::io::Result<()>;
}

/// Writes each block to the interactive console and the durable log.
pub struct SinkFanOut {
    console: Box<dyn Sink>,
    log: Box<dyn Sink>,
}

impl SinkFanOut {
    pub fn new(console: Box<dyn Sink>, log: Box<dyn Sink>) -> Self {
        Self { console, log }
    }

    /// Emit one block to both sinks.
    ///
    /// Returns `Err` only for durable log failures.
    pub async fn emit(&mut self, block: &str) -> std::io::Result<()> {
        if let Err(e) = self.console.emit(block).await {
            warn!("interactive sink write failed: {e}");
        }

        self.log.emit(block).await
    }
}
