// src/harvest/mod.rs
//! Drives a harvest run over the repository list.
//!
//! Repositories are processed on a bounded `rayon` pool; each one is handled
//! start to finish on a single worker by [`Harvester::process_repository`].
//! A failing repository is logged and never stops the others.

mod download;
mod repository;

pub use download::{download_blob, DownloadOutcome};
pub use repository::{RepositoryOutcome, RepositoryStats, Strategy};

use crate::config::Config;
use crate::errors::{io_error_with_path, ConfigError, Result};
use crate::forge::Transport;
use crate::progress::ProgressReporter;
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Reads the repository list: one URL per line, trimmed, blank lines dropped.
///
/// # Errors
/// Returns `Error::Io` if the file is missing or unreadable.
pub fn read_repository_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| io_error_with_path(e, path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Totals for one harvest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestSummary {
    pub harvested: usize,
    pub skipped: usize,
    pub failed: usize,
    pub files_downloaded: usize,
}

impl fmt::Display for HarvestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} harvested, {} skipped, {} failed, {} files downloaded",
            self.harvested, self.skipped, self.failed, self.files_downloaded
        )
    }
}

/// Processes repositories with a shared transport and configuration.
pub struct Harvester<'a> {
    config: &'a Config,
    transport: &'a dyn Transport,
}

impl<'a> Harvester<'a> {
    pub fn new(config: &'a Config, transport: &'a dyn Transport) -> Self {
        Self { config, transport }
    }

    /// Processes every reference (up to the configured limit) with at most
    /// `repo_concurrency` repositories in flight.
    ///
    /// Per-repository failures are logged and counted in the returned
    /// summary, never returned as errors.
    ///
    /// # Errors
    /// Only fails if the worker pool cannot be created.
    pub fn harvest(
        &self,
        references: &[String],
        progress: &dyn ProgressReporter,
    ) -> Result<HarvestSummary> {
        let references = self.config.limit(references);
        log::info!(
            "Harvesting {} repositories ({} at a time)",
            references.len(),
            self.config.repo_concurrency
        );
        progress.set_length(references.len() as u64);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.repo_concurrency)
            .thread_name(|i| format!("harvest-{}", i))
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                option: "--repo-concurrency".to_string(),
                reason: format!("could not start worker pool: {}", e),
            })?;

        let harvested = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);
        let files = AtomicUsize::new(0);

        pool.install(|| {
            references.par_iter().for_each(|line| {
                let span = tracing::info_span!("repository", url = %line);
                let _guard = span.enter();
                match self.process_repository(line) {
                    Ok(RepositoryOutcome::Skipped) => {
                        skipped.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(RepositoryOutcome::Harvested(stats)) => {
                        harvested.fetch_add(1, Ordering::Relaxed);
                        files.fetch_add(stats.downloaded, Ordering::Relaxed);
                    }
                    Err(e) => {
                        log::error!("Error processing {}: {}", line, e);
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
                progress.set_message(line.clone());
                progress.inc(1);
            });
        });

        let summary = HarvestSummary {
            harvested: harvested.into_inner(),
            skipped: skipped.into_inner(),
            failed: failed.into_inner(),
            files_downloaded: files.into_inner(),
        };
        log::info!("Harvest complete: {}", summary);
        progress.finish_with_message(summary.to_string());
        Ok(summary)
    }
}
