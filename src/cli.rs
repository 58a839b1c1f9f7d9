// src/cli.rs

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_BACKOFF_FACTOR, DEFAULT_EXTENSION, DEFAULT_FALLBACK_BRANCH,
    DEFAULT_OUTPUT_DIR, DEFAULT_RAW_URL, DEFAULT_REPOSITORIES_FILE, DEFAULT_REPO_CONCURRENCY,
    DEFAULT_RETRIES, DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_FILE,
};
use clap::Parser;

/// Harvests source files with a given extension from a list of GitHub repositories.
///
/// Each repository listed in the input file is enumerated through the GitHub
/// REST API (bulk tree listing, falling back to a directory-by-directory walk)
/// and every matching file is downloaded under `<output-dir>/<repository>/`.
/// Runs are idempotent: repositories whose directory already exists and files
/// already on disk are skipped.
///
/// Every option can also be set through the environment variable shown in
/// its help text.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    // --- Input & Output ---
    /// File listing one repository URL per line (blank lines are ignored).
    #[arg(short = 'r', long = "repositories", value_name = "FILE", env = "HARVEST_REPOSITORIES", default_value = DEFAULT_REPOSITORIES_FILE)]
    pub repositories_file: String,

    /// Directory receiving one subdirectory per repository.
    #[arg(short = 'o', long, value_name = "DIR", env = "HARVEST_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Harvest files whose path ends with this extension (e.g. ".c").
    #[arg(short = 'e', long = "ext", value_name = "EXT", env = "HARVEST_EXTENSION", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    // --- Concurrency ---
    /// Number of repositories processed in parallel.
    #[arg(short = 'j', long, value_name = "N", env = "REPO_CONCURRENCY", default_value_t = DEFAULT_REPO_CONCURRENCY)]
    pub repo_concurrency: usize,

    /// Process at most this many repositories from the list (0 = no limit).
    #[arg(short = 'n', long, value_name = "COUNT", env = "DOWNLOAD_LIMIT")]
    pub limit: Option<usize>,

    // --- Network ---
    /// Per-request timeout, in seconds.
    #[arg(long, value_name = "SECS", env = "HARVEST_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS as f64)]
    pub timeout: f64,

    /// Retries for transient failures (HTTP 500/502/503/504, connection errors).
    #[arg(long, value_name = "N", env = "HARVEST_RETRIES", default_value_t = DEFAULT_RETRIES)]
    pub retries: u32,

    /// Exponential backoff factor between retries, in seconds.
    #[arg(long, value_name = "SECS", env = "HARVEST_BACKOFF_FACTOR", default_value_t = DEFAULT_BACKOFF_FACTOR)]
    pub backoff_factor: f64,

    /// Also wait out rate limits on the bulk tree listing instead of falling back
    /// to the directory walk.
    #[arg(long, env = "HARVEST_TREE_RATE_LIMIT_BACKOFF", action = clap::ArgAction::SetTrue)]
    pub tree_rate_limit_backoff: bool,

    // --- GitHub ---
    /// File holding the GitHub token, read when GITHUB_TOKEN is not set.
    #[arg(long, value_name = "FILE", env = "HARVEST_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    pub token_file: String,

    /// Base URL of the GitHub REST API.
    #[arg(long, value_name = "URL", env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL serving raw file contents.
    #[arg(long, value_name = "URL", env = "GITHUB_RAW_URL", default_value = DEFAULT_RAW_URL)]
    pub raw_url: String,

    /// Branch used when a repository's default branch cannot be resolved.
    #[arg(long, value_name = "BRANCH", env = "HARVEST_FALLBACK_BRANCH", default_value = DEFAULT_FALLBACK_BRANCH)]
    pub fallback_branch: String,
}
