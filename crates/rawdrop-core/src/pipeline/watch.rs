//! The polling watch loop.
//!
//! ```text
//! IDLE → SCANNING → DISPATCHING → SLEEPING → SCANNING → … → CANCELLED
//! ```
//!
//! Each cycle scans the root, diffs against the previous snapshot and runs a
//! [`ConversionJob`] for every newly appeared file. Cancellation is checked
//! before every scan, before starting each job, and while sleeping. Jobs that
//! already started always finish.

use futures_util::future;
use futures_util::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::RawdropError;
use crate::types::{JobOutcome, WatchSummary};

use super::discovery::DirectoryScanner;
use super::job::{ConversionJob, ConversionSpec, Services};
use super::snapshot::ScanSnapshot;

/// Loop-level settings.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory (or single file) to watch
    pub root: PathBuf,
    /// Sleep between cycles
    pub poll_interval: Duration,
    /// Stop after this many cycles; `None` runs until cancelled
    pub max_cycles: Option<u64>,
    /// Maximum concurrent jobs per cycle
    pub parallel_workers: usize,
    /// Raw file extensions
    pub extensions: Vec<String>,
}

impl WatchOptions {
    /// Build options from config. Fails when no watch root is configured.
    pub fn from_config(config: &Config) -> Result<Self, RawdropError> {
        let root = config
            .watch_root()
            .ok_or_else(|| RawdropError::InvalidRoot {
                path: PathBuf::new(),
                reason: "no watch root configured".to_string(),
            })?;

        Ok(Self {
            root,
            poll_interval: Duration::from_secs(config.watch.poll_interval_secs),
            max_cycles: config.watch.run_once.then_some(1),
            parallel_workers: config.watch.parallel_workers.max(1),
            extensions: config.watch.raw_extensions.clone(),
        })
    }
}

/// State carried from one cycle to the next. Owned by a single loop run.
#[derive(Debug, Default)]
struct WatcherState {
    prior: ScanSnapshot,
    cycles: u64,
}

/// Repeatedly scans a root and converts new raw files.
pub struct WatchLoop {
    options: WatchOptions,
    spec: ConversionSpec,
    services: Services,
    scanner: DirectoryScanner,
}

impl WatchLoop {
    /// Create a loop over an existing root.
    pub fn new(
        options: WatchOptions,
        spec: ConversionSpec,
        services: Services,
    ) -> Result<Self, RawdropError> {
        if !options.root.exists() {
            return Err(RawdropError::InvalidRoot {
                path: options.root.clone(),
                reason: "path does not exist".to_string(),
            });
        }
        let scanner = DirectoryScanner::new(&options.extensions);
        Ok(Self {
            options,
            spec,
            services,
            scanner,
        })
    }

    pub fn root(&self) -> &Path {
        &self.options.root
    }

    /// Run until cancelled or until `max_cycles` cycles have completed.
    ///
    /// `on_outcome` receives every job's outcome as soon as it finishes.
    pub async fn run<F>(&self, cancel: CancellationToken, mut on_outcome: F) -> WatchSummary
    where
        F: FnMut(&JobOutcome),
    {
        let start = Instant::now();
        let mut state = WatcherState::default();
        let mut summary = WatchSummary::default();

        tracing::info!(
            "Watching {:?} every {:?} (overwrite: {})",
            self.options.root,
            self.options.poll_interval,
            self.spec.overwrite
        );

        loop {
            if cancel.is_cancelled() {
                tracing::debug!("Cancelled before scan");
                break;
            }

            // SCANNING
            let snapshot = self.scan().await;

            // DISPATCHING
            let new_files = snapshot.newly_appeared(&state.prior);
            let first_cycle = state.cycles == 0;
            if !new_files.is_empty() {
                tracing::info!("Found {} new raw file(s)", new_files.len());
            }
            self.dispatch(new_files, first_cycle, &cancel, |outcome| {
                summary.record(outcome);
                on_outcome(outcome);
            })
            .await;

            state.prior = snapshot;
            state.cycles += 1;
            summary.cycles = state.cycles;

            if self
                .options
                .max_cycles
                .is_some_and(|max| state.cycles >= max)
            {
                tracing::debug!("Reached {} cycle(s), stopping", state.cycles);
                break;
            }

            // SLEEPING
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Cancelled while sleeping");
                    break;
                }
                _ = tokio::time::sleep(self.options.poll_interval) => {}
            }
        }

        summary.elapsed = start.elapsed();
        summary
    }

    async fn scan(&self) -> ScanSnapshot {
        let scanner = self.scanner.clone();
        let root = self.options.root.clone();
        match tokio::task::spawn_blocking(move || scanner.scan(&root)).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Scan task failed: {e}");
                ScanSnapshot::new()
            }
        }
    }

    /// Run one job per new file with bounded concurrency and wait for all of
    /// them. No job starts once `cancel` is triggered.
    async fn dispatch<F>(
        &self,
        new_files: Vec<PathBuf>,
        first_cycle: bool,
        cancel: &CancellationToken,
        mut on_outcome: F,
    ) where
        F: FnMut(&JobOutcome),
    {
        let services = &self.services;
        let mut outcomes = stream::iter(new_files)
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|source| {
                let job = ConversionJob::builder(source)
                    .spec(self.spec.clone())
                    .first_cycle(first_cycle)
                    .build();
                job.execute(services)
            })
            .buffer_unordered(self.options.parallel_workers);

        while let Some(outcome) = outcomes.next().await {
            tracing::info!("{} {}", outcome.source().display(), outcome);
            on_outcome(&outcome);
        }
    }
}
