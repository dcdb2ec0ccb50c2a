//! End-to-end tests: fake provider through the sampler actor into a real
//! durable log file.

use chrono::Local;
use gpu_telemetry::actors::sampler::SamplerHandle;
use gpu_telemetry::report::format_file_header;
use gpu_telemetry::sinks::{FileLogSink, SinkFanOut};
use tokio::sync::broadcast;

use crate::helpers::*;

const PROGRAM: &str = "gpu-sampler";

async fn file_fan_out(path: &std::path::Path) -> SinkFanOut {
    let header = format_file_header(PROGRAM, Local::now());
    let log = FileLogSink::open(path, &header).await.unwrap();
    let (console, _) = create_recording_sink();
    SinkFanOut::new(Box::new(console), Box::new(log))
}

#[tokio::test]
async fn test_pipeline_writes_header_then_tick_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry.log");

    let provider = Box::new(FakeProvider::with_records(&[VALID_RECORD, SECOND_RECORD]));
    let sinks = file_fan_out(&path).await;
    let (tick_tx, mut tick_rx) = broadcast::channel(16);

    let (handle, task) = SamplerHandle::spawn(provider, sinks, long_interval(), tick_tx);

    let _startup = next_event(&mut tick_rx).await;
    handle.sample_now().await.unwrap();
    let _second = next_event(&mut tick_rx).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();

    assert!(content.starts_with("========================================\n"));
    assert!(content.contains("gpu-sampler telemetry log"));
    assert_eq!(
        content
            .matches("GPU 0 (TestGPU): 1024/8192 MB (12.5%), util 50%, 60°C")
            .count(),
        2
    );
    assert_eq!(
        content
            .matches("GPU 1 (OtherGPU): 4096/16384 MB (25.0%), util 90%, 70°C")
            .count(),
        2
    );
}

#[tokio::test]
async fn test_header_appears_once_regardless_of_tick_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry.log");

    let provider = Box::new(FakeProvider::with_records(&[VALID_RECORD]));
    let sinks = file_fan_out(&path).await;
    let (tick_tx, mut tick_rx) = broadcast::channel(16);

    let (handle, task) = SamplerHandle::spawn(provider, sinks, long_interval(), tick_tx);

    let _startup = next_event(&mut tick_rx).await;
    for _ in 0..5 {
        handle.sample_now().await.unwrap();
        let _event = next_event(&mut tick_rx).await;
    }

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();

    assert_eq!(content.matches("telemetry log").count(), 1);
    assert_eq!(content.matches("GPU 0 (TestGPU)").count(), 6);
}

#[tokio::test]
async fn test_tick_blocks_appear_in_collection_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry.log");

    let provider = Box::new(FakeProvider::with_script(
        vec![
            Ok(vec!["0,FirstTick,100,1000,900,10,5,50".to_string()]),
            Ok(vec!["0,SecondTick,200,1000,800,20,10,51".to_string()]),
            Ok(vec!["0,ThirdTick,300,1000,700,30,15,52".to_string()]),
        ],
        &[],
    ));
    let sinks = file_fan_out(&path).await;
    let (tick_tx, mut tick_rx) = broadcast::channel(16);

    let (handle, task) = SamplerHandle::spawn(provider, sinks, long_interval(), tick_tx);

    let _startup = next_event(&mut tick_rx).await;
    for _ in 0..2 {
        handle.sample_now().await.unwrap();
        let _event = next_event(&mut tick_rx).await;
    }

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let first = content.find("FirstTick").unwrap();
    let second = content.find("SecondTick").unwrap();
    let third = content.find("ThirdTick").unwrap();

    assert!(first < second);
    assert!(second < third);
}

#[tokio::test]
async fn test_shutdown_mid_sleep_leaves_complete_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry.log");

    let provider = Box::new(FakeProvider::with_records(&[VALID_RECORD]));
    let sinks = file_fan_out(&path).await;
    let (tick_tx, mut tick_rx) = broadcast::channel(16);

    let (handle, task) = SamplerHandle::spawn(provider, sinks, long_interval(), tick_tx);

    // the startup tick has been fully emitted; the actor is now in its sleep
    let _startup = next_event(&mut tick_rx).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();

    // exactly one complete tick block, terminated by its blank separator
    assert_eq!(content.matches("GPU 0 (TestGPU)").count(), 1);
    assert!(content.ends_with("\n\n"));
}

#[tokio::test]
async fn test_console_and_log_receive_identical_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("telemetry.log");

    let header = format_file_header(PROGRAM, Local::now());
    let log = FileLogSink::open(&path, &header).await.unwrap();
    let (console, console_blocks) = create_recording_sink();
    let sinks = SinkFanOut::new(Box::new(console), Box::new(log));

    let provider = Box::new(FakeProvider::with_records(&[VALID_RECORD, SECOND_RECORD]));
    let (tick_tx, mut tick_rx) = broadcast::channel(16);

    let (handle, task) = SamplerHandle::spawn(provider, sinks, long_interval(), tick_tx);

    let _startup = next_event(&mut tick_rx).await;
    handle.sample_now().await.unwrap();
    let _second = next_event(&mut tick_rx).await;

    handle.shutdown().await.unwrap();
    task.await.unwrap().unwrap();

    // the log body (everything after the one-time header) matches the
    // console stream byte for byte
    let content = std::fs::read_to_string(&path).unwrap();
    let body = content.strip_prefix(&header).unwrap();
    let console_content = console_blocks.lock().unwrap().concat();

    assert_eq!(body, console_content);
}
