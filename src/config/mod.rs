//! Defines the core `Config` struct for application configuration.
//!
//! Every setting the harvester reads is gathered here once, at startup, and
//! the resulting `Config` is passed by reference to every component. Nothing
//! downstream reads the process environment.

use crate::forge::{Endpoints, RetryPolicy};
use std::path::PathBuf;
use std::time::Duration;

pub use builder::ConfigBuilder;
mod builder;
mod parsing;

/// The validated configuration for one harvest run.
#[derive(Debug, Clone)]
pub struct Config {
    /// File listing one repository URL per line.
    pub repositories_file: PathBuf,
    /// Root of the output tree; each repository gets `output_dir/<name>`.
    pub output_dir: PathBuf,
    /// Suffix a file path must end with to be harvested (always starts with `.`).
    pub extension: String,
    /// Number of repositories processed in parallel.
    pub repo_concurrency: usize,
    /// Process at most this many repositories from the list.
    pub max_repositories: Option<usize>,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    /// Retry policy for transient transport failures.
    pub retry: RetryPolicy,
    /// API and raw-content base URLs.
    pub endpoints: Endpoints,
    /// Branch used when the default branch cannot be resolved.
    pub fallback_branch: String,
    /// Apply rate-limit backoff to the tree listing as well as the contents walk.
    pub tree_rate_limit_backoff: bool,
    /// Token file read when `GITHUB_TOKEN` is unset.
    pub token_file: PathBuf,
}

impl Config {
    /// Returns the repository list truncated to `max_repositories`.
    pub fn limit<'a, T>(&self, references: &'a [T]) -> &'a [T] {
        match self.max_repositories {
            Some(max) if max < references.len() => &references[..max],
            _ => references,
        }
    }
}
