//! Process profiling
//!
//! [`ProfileRecorder`] samples the current process (CPU share, resident and
//! virtual memory) at a fixed interval and appends each sample as one JSON
//! line to a file. [`profiling`] ties a recorder to the application
//! lifecycle: recording starts with the start hooks and ends with the stop
//! hooks.

use crate::constants::{MAX_PROFILE_WINDOW_SECS, PROFILE_SAMPLE_INTERVAL_MS};
use crate::di::lifecycle::{Hook, Lifecycle};
use crate::di::wiring::Wiring;
use crate::error_ext::ErrorContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::task::JoinHandle;
use tracing::info;
use wireup_domain::error::{Error, Result};

/// One observation of the current process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessSample {
    /// When the sample was taken
    pub timestamp: DateTime<Utc>,
    /// Process id
    pub pid: u32,
    /// CPU usage since the previous refresh, in percent of one core
    pub cpu_percent: f32,
    /// Resident memory in bytes
    pub memory_bytes: u64,
    /// Virtual memory in bytes
    pub virtual_memory_bytes: u64,
}

/// Repeatedly samples the current process
pub struct ProcessSampler {
    system: System,
    pid: Pid,
}

impl ProcessSampler {
    /// Sampler for the current process
    pub fn new() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|err| Error::internal(format!("Cannot determine current process: {err}")))?;
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        Ok(Self { system, pid })
    }

    /// Refresh and read the current process
    pub fn sample(&mut self) -> Result<ProcessSample> {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);
        let process = self
            .system
            .process(self.pid)
            .ok_or_else(|| Error::internal("Current process is not visible to the sampler"))?;
        Ok(ProcessSample {
            timestamp: Utc::now(),
            pid: self.pid.as_u32(),
            cpu_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
            virtual_memory_bytes: process.virtual_memory(),
        })
    }
}

/// Sample the current process after observing it for `window`
///
/// Blocks the calling thread; the window is clamped to what the platform
/// needs for a meaningful CPU reading and to a one-minute maximum.
pub fn measure_process(window: Duration) -> Result<ProcessSample> {
    let window = window
        .max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
        .min(Duration::from_secs(MAX_PROFILE_WINDOW_SECS));
    let mut sampler = ProcessSampler::new()?;
    std::thread::sleep(window);
    sampler.sample()
}

/// Records process samples to a file
#[derive(Debug, Clone)]
pub struct ProfileRecorder {
    path: PathBuf,
    overwrite: bool,
    interval: Duration,
}

impl ProfileRecorder {
    /// Recorder writing to `path`; an existing file is only replaced with `overwrite`
    pub fn new(path: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            path: path.into(),
            overwrite,
            interval: Duration::from_millis(PROFILE_SAMPLE_INTERVAL_MS),
        }
    }

    /// Sample every `interval` instead of the default
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the output file and start sampling on a blocking thread
    pub fn start(&self) -> Result<ProfileSession> {
        let file = open_output(&self.path, self.overwrite)?;
        let (stop, stopped) = mpsc::channel();
        let interval = self.interval;
        let handle = tokio::task::spawn_blocking(move || record(file, interval, &stopped));
        info!(path = %self.path.display(), "Profiling started");
        Ok(ProfileSession {
            path: self.path.clone(),
            stop,
            handle,
        })
    }
}

/// A running recording
pub struct ProfileSession {
    path: PathBuf,
    stop: mpsc::Sender<()>,
    handle: JoinHandle<Result<usize>>,
}

impl ProfileSession {
    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stop sampling, flush the file and return the number of samples written
    pub async fn stop(self) -> Result<usize> {
        // The sampler may already have exited on an error, which the join reports
        let _ = self.stop.send(());
        let written = self
            .handle
            .await
            .map_err(|err| Error::internal(format!("Profiler thread failed: {err}")))??;
        info!(path = %self.path.display(), samples = written, "Profiling stopped");
        Ok(written)
    }
}

fn open_output(path: &Path, overwrite: bool) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true);
    if overwrite {
        options.create(true).truncate(true);
    } else {
        options.create_new(true);
    }
    options.open(path).map_err(|err| {
        if err.kind() == ErrorKind::AlreadyExists {
            Error::configuration(format!(
                "Profile output {} already exists and overwrite is disabled",
                path.display()
            ))
        } else {
            Error::Io {
                message: format!("Failed to open profile output {}", path.display()),
                source: Some(Box::new(err)),
            }
        }
    })
}

fn record(file: File, interval: Duration, stopped: &mpsc::Receiver<()>) -> Result<usize> {
    let mut writer = BufWriter::new(file);
    let mut sampler = ProcessSampler::new()?;
    let mut written = 0;
    loop {
        let sample = sampler.sample()?;
        serde_json::to_writer(&mut writer, &sample)?;
        writer
            .write_all(b"\n")
            .io_context("Failed to write profile sample")?;
        written += 1;
        match stopped.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => continue,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    writer.flush().io_context("Failed to flush profile output")?;
    Ok(written)
}

/// Record a profile for as long as the application runs
pub fn profiling(path: impl Into<PathBuf>, overwrite: bool) -> Wiring {
    let recorder = ProfileRecorder::new(path, overwrite);
    Wiring::invoke(move |lifecycle: Arc<Lifecycle>| -> Result<()> {
        attach_recorder(&lifecycle, recorder.clone());
        Ok(())
    })
}

/// Start `recorder` with the start hooks and stop it with the stop hooks
pub fn attach_recorder(lifecycle: &Lifecycle, recorder: ProfileRecorder) {
    let session: Arc<Mutex<Option<ProfileSession>>> = Arc::default();
    let started = Arc::clone(&session);

    lifecycle.append(
        Hook::new("profiling")
            .on_start(move || async move { begin(&recorder, &started) })
            .on_stop(move || async move {
                let running = session
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .take();
                match running {
                    Some(running) => running.stop().await.map(drop),
                    None => Ok(()),
                }
            }),
    );
}

fn begin(recorder: &ProfileRecorder, slot: &Mutex<Option<ProfileSession>>) -> Result<()> {
    let running = recorder.start()?;
    *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(running);
    Ok(())
}
