// src/harvest/repository.rs
//! Processes one repository from the input list.

use super::download::{download_blob, DownloadOutcome};
use super::Harvester;
use crate::core_types::DownloadTask;
use crate::errors::{io_error_with_path, Result};
use crate::forge::{list_tree, resolve_default_branch, walk_contents, RepositoryReference};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// How a repository's files were enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// The recursive tree listing.
    Tree,
    /// The directory-by-directory contents walk.
    Contents,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Tree => f.write_str("tree"),
            Strategy::Contents => f.write_str("contents"),
        }
    }
}

/// Per-repository download counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryStats {
    pub strategy: Strategy,
    pub downloaded: usize,
    pub already_present: usize,
    pub failed: usize,
}

impl RepositoryStats {
    fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            downloaded: 0,
            already_present: 0,
            failed: 0,
        }
    }

    fn record(&mut self, outcome: DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded => self.downloaded += 1,
            DownloadOutcome::AlreadyPresent => self.already_present += 1,
            DownloadOutcome::Failed => self.failed += 1,
        }
    }
}

/// Result of processing one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOutcome {
    /// The output directory already existed; nothing was requested.
    Skipped,
    /// The repository was enumerated and its matching files fetched.
    Harvested(RepositoryStats),
}

impl<'a> Harvester<'a> {
    /// Harvests every matching file of the repository named by `line`.
    ///
    /// A repository whose directory already exists under the output root is
    /// skipped without any API call. Otherwise the default branch is resolved
    /// (falling back to the configured branch), the recursive tree is listed,
    /// and, if that listing is unavailable, the contents API is walked.
    /// Matching files are downloaded one after another.
    ///
    /// # Errors
    /// * [`crate::Error::InvalidReferenceFormat`] if `line` is not a repository URL.
    /// * Filesystem errors creating the repository directory or writing files.
    /// * Transport failures while resolving the branch or listing the tree.
    pub fn process_repository(&self, line: &str) -> Result<RepositoryOutcome> {
        let reference = RepositoryReference::parse(line)?;
        let config = self.config;
        let repo_dir = config.output_dir.join(&reference.name);

        if repo_dir.exists() {
            log::info!("Skipping already processed repository: {}", reference.name);
            return Ok(RepositoryOutcome::Skipped);
        }
        fs::create_dir_all(&config.output_dir)
            .map_err(|e| io_error_with_path(e, &config.output_dir))?;
        match fs::create_dir(&repo_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                log::info!("Skipping already processed repository: {}", reference.name);
                return Ok(RepositoryOutcome::Skipped);
            }
            Err(e) => return Err(io_error_with_path(e, &repo_dir)),
        }
        log::info!("Processing repository: {}", reference);

        let branch = match resolve_default_branch(self.transport, &config.endpoints, &reference)? {
            Some(branch) => branch,
            None => {
                log::info!(
                    "Could not resolve default branch of {}, using '{}'",
                    reference,
                    config.fallback_branch
                );
                config.fallback_branch.clone()
            }
        };

        let listing = list_tree(
            self.transport,
            &config.endpoints,
            &reference,
            &branch,
            config.tree_rate_limit_backoff,
        )?;

        let stats = match listing {
            Some(entries) => {
                let mut stats = RepositoryStats::new(Strategy::Tree);
                for entry in entries.into_iter().filter(|e| e.matches(&config.extension)) {
                    let task = self.task(&reference, &branch, entry.path, &repo_dir);
                    stats.record(download_blob(self.transport, &config.endpoints, &task)?);
                }
                stats
            }
            None => {
                log::info!("Falling back to contents API for {}", reference);
                let mut stats = RepositoryStats::new(Strategy::Contents);
                walk_contents(
                    self.transport,
                    &config.endpoints,
                    &reference,
                    &branch,
                    &repo_dir,
                    &config.extension,
                    |task| {
                        stats.record(download_blob(self.transport, &config.endpoints, &task)?);
                        Ok(())
                    },
                )?;
                stats
            }
        };

        log::info!(
            "Finished {} via {}: {} downloaded, {} already present, {} failed",
            reference,
            stats.strategy,
            stats.downloaded,
            stats.already_present,
            stats.failed
        );
        Ok(RepositoryOutcome::Harvested(stats))
    }

    fn task(
        &self,
        reference: &RepositoryReference,
        branch: &str,
        path: String,
        repo_dir: &Path,
    ) -> DownloadTask {
        DownloadTask {
            owner: reference.owner.clone(),
            name: reference.name.clone(),
            branch: branch.to_string(),
            path,
            destination_root: repo_dir.to_path_buf(),
        }
    }
}
