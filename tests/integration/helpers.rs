//! Helper functions for integration tests

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use gpu_telemetry::actors::messages::TickEvent;
use gpu_telemetry::provider::TelemetryProvider;
use gpu_telemetry::sinks::Sink;
use tokio::sync::broadcast;

pub const VALID_RECORD: &str = "0,TestGPU,1024,8192,7168,50,20,60";
pub const SECOND_RECORD: &str = "1,OtherGPU,4096,16384,12288,90,35,70";

/// Interval long enough that only the immediate startup tick and explicit
/// SampleNow commands produce ticks during a test.
pub fn long_interval() -> Duration {
    Duration::from_secs(3600)
}

/// Provider that replays a script of responses, then falls back to a fixed
/// set of records.
pub struct FakeProvider {
    script: Mutex<VecDeque<anyhow::Result<Vec<String>>>>,
    fallback: Vec<String>,
}

impl FakeProvider {
    pub fn with_records(records: &[&str]) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: records.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn with_script(script: Vec<anyhow::Result<Vec<String>>>, fallback: &[&str]) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: fallback.iter().map(|r| r.to_string()).collect(),
        }
    }
}

#[async_trait]
impl TelemetryProvider for FakeProvider {
    async fn collect(&self) -> anyhow::Result<Vec<String>> {
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        Ok(self.fallback.clone())
    }
}

/// Console stand-in that records every block it receives.
pub struct RecordingSink {
    blocks: Arc<Mutex<Vec<String>>>,
}

pub fn create_recording_sink() -> (RecordingSink, Arc<Mutex<Vec<String>>>) {
    let blocks = Arc::new(Mutex::new(vec![]));
    (
        RecordingSink {
            blocks: blocks.clone(),
        },
        blocks,
    )
}

#[async_trait]
impl Sink for RecordingSink {
    async fn emit(&mut self, block: &str) -> io::Result<()> {
        self.blocks.lock().unwrap().push(block.to_string());
        Ok(())
    }
}

pub async fn next_event(rx: &mut broadcast::Receiver<TickEvent>) -> TickEvent {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for tick event")
        .expect("tick channel closed")
}
