//! Process profiling tests

use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use wireup_domain::error::Error;
use wireup_infrastructure::di::App;
use wireup_infrastructure::infrastructure::profiling::measure_process;
use wireup_infrastructure::infrastructure::{ProcessSample, ProcessSampler, ProfileRecorder, profiling};

fn samples(path: &std::path::Path) -> Vec<ProcessSample> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_sampler_reads_current_process() {
    let mut sampler = ProcessSampler::new().unwrap();
    let sample = sampler.sample().unwrap();

    assert_eq!(sample.pid, std::process::id());
    assert!(sample.memory_bytes > 0);
}

#[test]
fn test_measure_process_clamps_short_windows() {
    let sample = measure_process(Duration::ZERO).unwrap();
    assert_eq!(sample.pid, std::process::id());
}

#[tokio::test]
async fn test_recorder_writes_json_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.jsonl");
    let recorder = ProfileRecorder::new(&path, false).with_interval(Duration::from_millis(10));

    let session = recorder.start().unwrap();
    assert_eq!(session.path(), path.as_path());
    tokio::time::sleep(Duration::from_millis(60)).await;
    let written = session.stop().await.unwrap();

    assert!(written >= 1);
    let recorded = samples(&path);
    assert_eq!(recorded.len(), written);
    assert!(recorded.iter().all(|sample| sample.pid == std::process::id()));
}

#[tokio::test]
async fn test_existing_output_needs_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("profile.jsonl");
    fs::write(&path, "previous run\n").unwrap();

    let err = ProfileRecorder::new(&path, false).start().err().unwrap();
    assert!(matches!(err, Error::Configuration { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "previous run\n");

    let session = ProfileRecorder::new(&path, true)
        .with_interval(Duration::from_millis(10))
        .start()
        .unwrap();
    session.stop().await.unwrap();
    assert!(!fs::read_to_string(&path).unwrap().contains("previous run"));
}

#[tokio::test]
async fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("profile.jsonl");

    let err = ProfileRecorder::new(&path, true).start().err().unwrap();
    assert!(matches!(err, Error::Io { .. }));
}

#[tokio::test]
async fn test_profiling_follows_application_lifecycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.jsonl");
    let app = App::new(profiling(&path, false)).unwrap();
    assert!(!path.exists());

    app.start().await.unwrap();
    assert!(path.exists());
    app.stop().await.unwrap();

    assert!(!samples(&path).is_empty());
}

#[tokio::test]
async fn test_profiling_start_failure_fails_app_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("taken.jsonl");
    fs::write(&path, "").unwrap();
    let app = App::new(profiling(&path, false)).unwrap();

    let err = app.start().await.unwrap_err();
    assert!(matches!(err, Error::Lifecycle { ref hook, .. } if hook == "profiling"));
}
