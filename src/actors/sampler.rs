//! SamplerActor - Periodically samples device telemetry and emits reports
//!
//! One actor owns the whole per-tick pipeline and both sinks. A tick runs to
//! completion inside a single select arm, so ticks are strictly sequential
//! and each report block reaches both sinks before the next collection
//! begins. Commands are only processed between ticks; an interrupt therefore
//! never leaves a partially written block in the durable log.
//!
//! ## Error policy
//!
//! - collection failure: tick skipped, loop continues
//! - malformed device record: device skipped, remaining devices emitted
//! - console write failure: swallowed by the fan-out
//! - durable log write failure: fatal, the actor exits with an error

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{debug, error, instrument, trace, warn};

use crate::metrics::derive;
use crate::parser::parse_record;
use crate::provider::TelemetryProvider;
use crate::report::{Tick, format_tick};
use crate::sinks::SinkFanOut;

use super::messages::{SamplerCommand, TickEvent};

/// Actor that runs the fixed-interval sampling loop
///
/// The first tick fires immediately on spawn, then once per interval. If a
/// tick's work overruns the interval, the next tick starts immediately after
/// it; ticks never run concurrently.
pub struct SamplerActor {
    /// Source of raw telemetry records
    provider: Box<dyn TelemetryProvider>,

    /// Console and durable log sinks
    sinks: SinkFanOut,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<SamplerCommand>,

    /// Broadcast sender for publishing completed ticks
    tick_tx: broadcast::Sender<TickEvent>,

    /// Current sampling interval
    interval_duration: Duration,
}

impl SamplerActor {
    /// Create a new sampler actor
    pub fn new(
        provider: Box<dyn TelemetryProvider>,
        sinks: SinkFanOut,
        command_rx: mpsc::Receiver<SamplerCommand>,
        tick_tx: broadcast::Sender<TickEvent>,
        interval_duration: Duration,
    ) -> Self {
        Self {
            provider,
            sinks,
            command_rx,
            tick_tx,
            interval_duration,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command is received, the command channel is
    /// closed, or a durable log write fails.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Result<()> {
        debug!("starting sampler actor");

        let mut ticker = interval(self.interval_duration);

        loop {
            tokio::select! {
                // Timer tick - sample all devices
                _ = ticker.tick() => {
                    self.sample_tick().await?;
                }

                // Handle commands
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        SamplerCommand::SampleNow { respond_to } => {
                            debug!("received SampleNow command");
                            let result = self.sample_tick().await;
                            let failed = result.is_err();
                            let _ = respond_to.send(result);
                            if failed {
                                anyhow::bail!("durable log sink failed, stopping sampler");
                            }
                        }

                        SamplerCommand::UpdateInterval { interval_secs } => {
                            debug!("updating interval to {interval_secs}s");
                            self.interval_duration = Duration::from_secs(interval_secs);
                            ticker = interval(self.interval_duration);
                        }

                        SamplerCommand::Shutdown => {
                            debug!("received shutdown command");
                            break;
                        }
                    }
                }

                // Command channel closed - exit
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("sampler actor stopped");
        Ok(())
    }

    /// Collect, parse, format and emit one tick
    ///
    /// Returns `Err` only when the durable log write fails; all other
    /// failures are local to the tick or to a single device.
    #[instrument(skip(self))]
    async fn sample_tick(&mut self) -> Result<()> {
        let records = match self.provider.collect().await {
            Ok(records) => records,
            Err(e) => {
                error!("collection failed, skipping tick: {e:#}");
                return Ok(());
            }
        };

        let mut samples = Vec::with_capacity(records.len());
        for raw in &records {
            match parse_record(raw) {
                Ok(sample) => samples.push(derive(sample)),
                Err(e) => warn!("skipping device record '{raw}': {e}"),
            }
        }

        let tick = Tick::new(Local::now(), samples);
        let report = format_tick(&tick);

        self.sinks
            .emit(&report)
            .await
            .context("failed to append to durable log")?;

        trace!("emitted tick with {} devices", tick.samples.len());

        // Note: We ignore send errors. It's OK if there are no subscribers;
        // the sinks have already received this tick.
        match self.tick_tx.send(TickEvent { tick, report }) {
            Ok(num_receivers) => {
                trace!("published tick event to {num_receivers} receivers");
            }
            Err(_) => {
                trace!("no receivers for tick event (this is OK)");
            }
        }

        Ok(())
    }
}

/// Handle for controlling a [`SamplerActor`]
///
/// This handle provides a typed API for sending commands to the actor.
/// It can be cloned and shared across tasks.
#[derive(Clone)]
pub struct SamplerHandle {
    sender: mpsc::Sender<SamplerCommand>,
}

impl SamplerHandle {
    /// Spawn a new sampler actor
    ///
    /// Creates the actor, spawns it as a tokio task, and returns a handle
    /// plus the task's join handle. The join handle resolves when the actor
    /// stops; a fatal durable log failure surfaces there as `Err`.
    pub fn spawn(
        provider: Box<dyn TelemetryProvider>,
        sinks: SinkFanOut,
        interval_duration: Duration,
        tick_tx: broadcast::Sender<TickEvent>,
    ) -> (Self, JoinHandle<Result<()>>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = SamplerActor::new(provider, sinks, cmd_rx, tick_tx, interval_duration);
        let task = tokio::spawn(actor.run());

        (Self { sender: cmd_tx }, task)
    }

    /// Trigger an immediate tick, bypassing the interval timer
    pub async fn sample_now(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(SamplerCommand::SampleNow { respond_to: tx })
            .await
            .context("failed to send SampleNow command")?;

        rx.await.context("failed to receive response")??;
        Ok(())
    }

    /// Update the sampling interval
    pub async fn update_interval(&self, interval_secs: u64) -> Result<()> {
        self.sender
            .send(SamplerCommand::UpdateInterval { interval_secs })
            .await
            .context("failed to send UpdateInterval command")?;
        Ok(())
    }

    /// Gracefully shut down the sampler
    pub async fn shutdown(&self) -> Result<()> {
        self.sender
            .send(SamplerCommand::Shutdown)
            .await
            .context("failed to send Shutdown command")?;
        Ok(())
    }
}
