// src/config/builder.rs

use super::parsing::{
    normalize_extension, normalize_limit, parse_timeout, validate_backoff_factor,
    validate_branch, validate_concurrency,
};
use super::Config;
use crate::cli::Cli;
use crate::constants::{
    DEFAULT_API_URL, DEFAULT_BACKOFF_FACTOR, DEFAULT_EXTENSION, DEFAULT_FALLBACK_BRANCH,
    DEFAULT_OUTPUT_DIR, DEFAULT_RAW_URL, DEFAULT_REPOSITORIES_FILE, DEFAULT_REPO_CONCURRENCY,
    DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_FILE,
};
use crate::errors::Result;
use crate::forge::{Endpoints, RetryPolicy};
use std::path::PathBuf;

/// A builder for creating a `Config` instance.
///
/// Every setting is optional; unset settings take the same defaults as the
/// command line.
///
/// # Examples
///
/// ```
/// use repo_harvester::ConfigBuilder;
/// use std::time::Duration;
///
/// let config = ConfigBuilder::new()
///     .output_dir("harvest")
///     .extension("rs")
///     .repo_concurrency(2)
///     .request_timeout_secs(5.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.extension, ".rs");
/// assert_eq!(config.repo_concurrency, 2);
/// assert_eq!(config.request_timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    repositories_file: Option<String>,
    output_dir: Option<String>,
    extension: Option<String>,
    repo_concurrency: Option<usize>,
    max_repositories: Option<usize>,
    request_timeout_secs: Option<f64>,
    retries: Option<u32>,
    backoff_factor: Option<f64>,
    tree_rate_limit_backoff: Option<bool>,
    token_file: Option<String>,
    api_url: Option<String>,
    raw_url: Option<String>,
    fallback_branch: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new `ConfigBuilder` with all settings unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-filled from parsed command-line arguments.
    pub fn from_cli(cli: Cli) -> Self {
        Self {
            repositories_file: Some(cli.repositories_file),
            output_dir: Some(cli.output_dir),
            extension: Some(cli.extension),
            repo_concurrency: Some(cli.repo_concurrency),
            max_repositories: cli.limit,
            request_timeout_secs: Some(cli.timeout),
            retries: Some(cli.retries),
            backoff_factor: Some(cli.backoff_factor),
            tree_rate_limit_backoff: Some(cli.tree_rate_limit_backoff),
            token_file: Some(cli.token_file),
            api_url: Some(cli.api_url),
            raw_url: Some(cli.raw_url),
            fallback_branch: Some(cli.fallback_branch),
        }
    }

    /// Sets the file listing repository URLs.
    pub fn repositories_file(mut self, path: impl Into<String>) -> Self {
        self.repositories_file = Some(path.into());
        self
    }

    /// Sets the root of the output tree.
    pub fn output_dir(mut self, path: impl Into<String>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Sets the extension to harvest. A leading `.` is added if missing.
    pub fn extension(mut self, ext: impl Into<String>) -> Self {
        self.extension = Some(ext.into());
        self
    }

    /// Sets the number of repositories processed in parallel.
    pub fn repo_concurrency(mut self, n: usize) -> Self {
        self.repo_concurrency = Some(n);
        self
    }

    /// Limits the run to the first `n` repositories (0 = no limit).
    pub fn max_repositories(mut self, n: usize) -> Self {
        self.max_repositories = Some(n);
        self
    }

    /// Sets the per-request timeout, in seconds.
    pub fn request_timeout_secs(mut self, secs: f64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Sets the number of retries for transient failures.
    pub fn retries(mut self, n: u32) -> Self {
        self.retries = Some(n);
        self
    }

    /// Sets the exponential backoff factor, in seconds.
    pub fn backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = Some(factor);
        self
    }

    /// Applies rate-limit backoff to the tree listing too.
    pub fn tree_rate_limit_backoff(mut self, enabled: bool) -> Self {
        self.tree_rate_limit_backoff = Some(enabled);
        self
    }

    /// Sets the token file read when `GITHUB_TOKEN` is unset.
    pub fn token_file(mut self, path: impl Into<String>) -> Self {
        self.token_file = Some(path.into());
        self
    }

    /// Sets the REST API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Sets the raw content base URL.
    pub fn raw_url(mut self, url: impl Into<String>) -> Self {
        self.raw_url = Some(url.into());
        self
    }

    /// Sets the branch used when the default branch cannot be resolved.
    pub fn fallback_branch(mut self, branch: impl Into<String>) -> Self {
        self.fallback_branch = Some(branch.into());
        self
    }

    /// Validates the settings and builds the final `Config`.
    ///
    /// # Errors
    /// Returns `Error::Config` if any value is out of range or a base URL does
    /// not parse.
    pub fn build(self) -> Result<Config> {
        let endpoints = Endpoints::new(
            self.api_url.as_deref().unwrap_or(DEFAULT_API_URL),
            self.raw_url.as_deref().unwrap_or(DEFAULT_RAW_URL),
        )?;

        Ok(Config {
            repositories_file: PathBuf::from(
                self.repositories_file
                    .unwrap_or_else(|| DEFAULT_REPOSITORIES_FILE.to_string()),
            ),
            output_dir: PathBuf::from(
                self.output_dir
                    .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            extension: normalize_extension(
                self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION),
            )?,
            repo_concurrency: validate_concurrency(
                self.repo_concurrency.unwrap_or(DEFAULT_REPO_CONCURRENCY),
            )?,
            max_repositories: normalize_limit(self.max_repositories),
            request_timeout: parse_timeout(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_TIMEOUT_SECS as f64),
            )?,
            retry: RetryPolicy {
                retries: self.retries.unwrap_or(DEFAULT_RETRIES),
                backoff_factor: validate_backoff_factor(
                    self.backoff_factor.unwrap_or(DEFAULT_BACKOFF_FACTOR),
                )?,
            },
            endpoints,
            fallback_branch: validate_branch(
                self.fallback_branch
                    .as_deref()
                    .unwrap_or(DEFAULT_FALLBACK_BRANCH),
            )?,
            tree_rate_limit_backoff: self.tree_rate_limit_backoff.unwrap_or(false),
            token_file: PathBuf::from(
                self.token_file
                    .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string()),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use clap::Parser;
    use std::time::Duration;

    #[test]
    fn test_defaults_match_cli_defaults() -> Result<()> {
        let from_builder = ConfigBuilder::new().build()?;
        let from_cli = ConfigBuilder::from_cli(Cli::parse_from(["repo-harvester"])).build()?;

        for config in [&from_builder, &from_cli] {
            assert_eq!(config.repositories_file, PathBuf::from("repositories.txt"));
            assert_eq!(config.output_dir, PathBuf::from("projects"));
            assert_eq!(config.extension, ".c");
            assert_eq!(config.repo_concurrency, 3);
            assert_eq!(config.max_repositories, None);
            assert_eq!(config.request_timeout, Duration::from_secs(10));
            assert_eq!(
                config.retry,
                RetryPolicy {
                    retries: 3,
                    backoff_factor: 1.0
                }
            );
            assert_eq!(config.endpoints, Endpoints::github());
            assert_eq!(config.fallback_branch, "master");
            assert!(!config.tree_rate_limit_backoff);
            assert_eq!(config.token_file, PathBuf::from("github_token.txt"));
        }
        Ok(())
    }

    #[test]
    fn test_cli_flags_are_applied() -> Result<()> {
        let cli = Cli::parse_from([
            "repo-harvester",
            "-r",
            "list.txt",
            "-o",
            "out",
            "-e",
            "h",
            "-j",
            "8",
            "-n",
            "20",
            "--timeout",
            "2.5",
            "--retries",
            "1",
            "--backoff-factor",
            "0",
            "--tree-rate-limit-backoff",
            "--fallback-branch",
            "main",
        ]);
        let config = ConfigBuilder::from_cli(cli).build()?;
        assert_eq!(config.repositories_file, PathBuf::from("list.txt"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.extension, ".h");
        assert_eq!(config.repo_concurrency, 8);
        assert_eq!(config.max_repositories, Some(20));
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.retry.retries, 1);
        assert_eq!(config.retry.backoff_factor, 0.0);
        assert!(config.tree_rate_limit_backoff);
        assert_eq!(config.fallback_branch, "main");
        Ok(())
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = ConfigBuilder::new().repo_concurrency(0).build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("--repo-concurrency"));

        assert!(ConfigBuilder::new().extension("").build().is_err());
        assert!(ConfigBuilder::new().request_timeout_secs(0.0).build().is_err());
        assert!(ConfigBuilder::new().backoff_factor(-0.5).build().is_err());
        assert!(ConfigBuilder::new().api_url("nope").build().is_err());
    }

    #[test]
    fn test_limit_truncates() -> Result<()> {
        let refs = ["a", "b", "c"];
        let limited = ConfigBuilder::new().max_repositories(2).build()?;
        assert_eq!(limited.limit(&refs), &["a", "b"]);
        let larger = ConfigBuilder::new().max_repositories(10).build()?;
        assert_eq!(larger.limit(&refs), &refs);
        let unlimited = ConfigBuilder::new().max_repositories(0).build()?;
        assert_eq!(unlimited.limit(&refs), &refs);
        Ok(())
    }
}
