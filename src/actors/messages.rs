//! Message types for sampler control and observation

use tokio::sync::oneshot;

use crate::report::Tick;

/// Event published after a tick has been fully emitted to both sinks
///
/// The broadcast channel is an observation tap only; emission to the sinks
/// has already completed when this event is sent, so subscribers cannot
/// perturb the ordering of the log. Slow subscribers may lag and drop
/// events, which is acceptable for observers.
#[derive(Debug, Clone)]
pub struct TickEvent {
    /// The collected and derived samples
    pub tick: Tick,

    /// The rendered report block, exactly as written to the sinks
    pub report: String,
}

/// Commands that can be sent to a [`SamplerActor`](super::sampler::SamplerActor)
#[derive(Debug)]
pub enum SamplerCommand {
    /// Run one tick immediately (bypassing the interval timer)
    ///
    /// Used for testing and manual refresh operations.
    SampleNow {
        /// Channel to send the result back
        respond_to: oneshot::Sender<anyhow::Result<()>>,
    },

    /// Update the sampling interval
    UpdateInterval {
        /// New interval in seconds
        interval_secs: u64,
    },

    /// Gracefully shut down the sampler
    ///
    /// The actor finishes any in-flight tick and then exits; no partial
    /// block is ever left in the durable log.
    Shutdown,
}
