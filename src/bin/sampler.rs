use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use gpu_telemetry::{
    actors::sampler::SamplerHandle,
    config::{Config, read_config_file},
    provider::{NvidiaSmi, TelemetryProvider},
    report::format_file_header,
    sinks::{ConsoleSink, FileLogSink, SinkFanOut},
};
use tokio::sync::broadcast;
use tracing::{debug, level_filters::LevelFilter, trace};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt};

const PROGRAM: &str = "gpu-sampler";

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Destination path for the durable log
    log: Option<PathBuf>,

    /// Config file
    #[arg(short, long)]
    config: Option<String>,

    /// Sampling interval in seconds
    #[arg(long)]
    interval: Option<u64>,

    /// Disable ANSI color on the console timestamp
    #[arg(long)]
    no_color: bool,
}

fn init() {
    dotenv::dotenv().ok();

    let filter = filter::Targets::new().with_targets(vec![
        ("gpu_telemetry", LevelFilter::DEBUG),
        ("sampler", LevelFilter::DEBUG),
    ]);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

fn resolve_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    if let Some(log) = &args.log {
        config.log = log.clone();
    }
    if let Some(interval) = args.interval {
        config.interval = interval;
    }
    if args.no_color {
        config.color = false;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = resolve_config(&args)?;
    anyhow::ensure!(
        config.interval > 0,
        "sampling interval must be at least 1 second"
    );

    // Initializing: the facility must be invocable and the log writable
    // before the loop starts. Either failing here is fatal.
    let provider = NvidiaSmi::default();
    provider
        .probe()
        .await
        .context("accelerator monitoring facility is not available")?;

    let header = format_file_header(PROGRAM, Local::now());
    let log_sink = FileLogSink::open(&config.log, &header)
        .await
        .with_context(|| format!("cannot open durable log at {}", config.log.display()))?;
    let console = ConsoleSink::new(config.color);
    let sinks = SinkFanOut::new(Box::new(console), Box::new(log_sink));

    debug!(
        "sampling every {}s into {}",
        config.interval,
        config.log.display()
    );

    let (tick_tx, _) = broadcast::channel(16);
    let (handle, mut task) = SamplerHandle::spawn(
        Box::new(provider),
        sinks,
        Duration::from_secs(config.interval),
        tick_tx,
    );

    tokio::select! {
        // the actor only stops on its own after a durable log failure
        res = &mut task => {
            res.context("sampler task panicked")??;
            anyhow::bail!("sampler stopped unexpectedly");
        }

        _ = tokio::signal::ctrl_c() => {
            debug!("interrupt received, shutting down");
            handle.shutdown().await?;
        }
    }

    // the in-flight tick, if any, finishes before the actor exits
    task.await.context("sampler task panicked")??;

    Ok(())
}
