//! Periodic log rotation.
//!
//! # Responsibilities
//! - On a fixed interval, list active streams and rotate each one
//! - Keep going when a single stream fails; report every outcome
//! - Never run two passes at once
//!
//! # Design Decisions
//! - Each pass runs as its own task; the loop waits for it before exiting
//! - A tick that arrives while a pass is still running is skipped
//! - Failures are reported through `tracing`, not through the log files

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::logs::error::LogError;
use crate::logs::manager::LogManager;
use crate::observability::metrics;

/// Result of rotating one stream.
#[derive(Debug)]
pub struct StreamRotation {
    pub stream: String,
    /// `Ok(Some(id))` archived, `Ok(None)` nothing to archive.
    pub result: Result<Option<String>, LogError>,
}

/// Result of one rotation pass.
#[derive(Debug, Default)]
pub struct RotationReport {
    /// True when the pass did not run because another was in progress.
    pub skipped: bool,
    pub streams: Vec<StreamRotation>,
}

impl RotationReport {
    pub fn archived(&self) -> impl Iterator<Item = (&str, &str)> {
        self.streams.iter().filter_map(|s| match &s.result {
            Ok(Some(id)) => Some((s.stream.as_str(), id.as_str())),
            _ => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &LogError)> {
        self.streams.iter().filter_map(|s| match &s.result {
            Err(e) => Some((s.stream.as_str(), e)),
            Ok(_) => None,
        })
    }
}

/// Background worker compressing and truncating active log streams.
#[derive(Debug, Clone)]
pub struct LogRotator {
    manager: LogManager,
    interval: Duration,
    running: Arc<AtomicBool>,
}

struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl LogRotator {
    pub fn new(manager: LogManager, interval: Duration) -> Self {
        Self {
            manager,
            interval,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until the shutdown signal fires. The first pass happens one
    /// interval after start. A pass still running at shutdown is awaited, so
    /// a stream is never left archived but not yet truncated.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval = ?self.interval, "Log rotation loop starting");

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut passes = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    while passes.try_join_next().is_some() {}
                    let rotator = self.clone();
                    passes.spawn(async move {
                        rotator.rotate_all().await;
                    });
                }
                _ = shutdown.recv() => {
                    tracing::info!(in_flight = passes.len(), "Log rotation received shutdown signal, exiting loop");
                    break;
                }
            }
        }

        while passes.join_next().await.is_some() {}
    }

    /// One rotation pass over every active stream.
    pub async fn rotate_all(&self) -> RotationReport {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Previous log rotation still running, skipping this tick");
            metrics::record_log_rotation("skipped");
            return RotationReport {
                skipped: true,
                streams: Vec::new(),
            };
        }
        let _guard = PassGuard(&self.running);

        let streams = match self.manager.list(false).await {
            Ok(streams) => streams,
            Err(e) => {
                tracing::error!(error = %e, "Could not list log streams for rotation");
                metrics::record_log_rotation("list_failed");
                return RotationReport::default();
            }
        };

        let mut report = RotationReport::default();
        for stream in streams {
            let result = self.manager.rotate(&stream).await;

            match &result {
                Ok(Some(archive_id)) => {
                    tracing::debug!(stream = %stream, archive = %archive_id, "Log stream compressed and truncated");
                    metrics::record_log_rotation("archived");
                }
                Ok(None) => {
                    tracing::trace!(stream = %stream, "Log stream empty, nothing to rotate");
                    metrics::record_log_rotation("empty");
                }
                Err(e) => {
                    tracing::error!(stream = %stream, error = %e, "Log rotation failed");
                    metrics::record_log_rotation(e.kind_str());
                }
            }

            report.streams.push(StreamRotation { stream, result });
        }

        report
    }
}
