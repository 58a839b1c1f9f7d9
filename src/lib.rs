//! `repo-harvester` is a library and command-line tool for collecting every
//! source file with a given extension from a list of GitHub repositories.
//!
//! Each repository is handled in the same way:
//! 1.  **Resolve**: Parse the repository URL and find its default branch.
//! 2.  **Enumerate**: List every file through the recursive tree endpoint, or
//!     walk the contents API directory by directory when that listing is
//!     unavailable (waiting out rate limits as it goes).
//! 3.  **Download**: Fetch each matching file from the raw content host into
//!     `<output_dir>/<repository>/<path>`, skipping files already on disk.
//!
//! Repositories are processed in parallel on a bounded worker pool, and a run
//! can be repeated safely: repositories whose output directory exists are
//! skipped without any API call.
//!
//! # Example: Library Usage
//!
//! The HTTP layer sits behind the [`forge::Transport`] trait, so the pipeline
//! can be driven without a network.
//!
//! ```
//! use repo_harvester::forge::{ApiResponse, Transport};
//! use repo_harvester::progress::NoOpProgress;
//! use repo_harvester::{ConfigBuilder, Harvester, Result};
//! use reqwest::header::HeaderMap;
//! use reqwest::StatusCode;
//! use tempfile::tempdir;
//! use url::Url;
//!
//! // A forge on which every repository is empty.
//! struct EmptyForge;
//! impl Transport for EmptyForge {
//!     fn get(&self, url: &Url) -> Result<ApiResponse> {
//!         let body = if url.path().contains("/git/trees/") {
//!             br#"{"tree": []}"#.to_vec()
//!         } else {
//!             br#"{"default_branch": "main"}"#.to_vec()
//!         };
//!         Ok(ApiResponse { status: StatusCode::OK, headers: HeaderMap::new(), body })
//!     }
//! }
//!
//! let temp = tempdir().unwrap();
//! let config = ConfigBuilder::new()
//!     .output_dir(temp.path().to_string_lossy())
//!     .build()
//!     .unwrap();
//!
//! let references = vec!["https://github.com/madler/zlib".to_string()];
//! Harvester::new(&config, &EmptyForge)
//!     .harvest(&references, &NoOpProgress)
//!     .unwrap();
//!
//! // The repository directory marks it as processed.
//! assert!(temp.path().join("zlib").is_dir());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod errors;
pub mod forge;
pub mod harvest;
pub mod prelude;
pub mod progress;
pub mod token;

pub use config::{Config, ConfigBuilder};
pub use errors::{Error, Result};
pub use harvest::{read_repository_list, HarvestSummary, Harvester};

use crate::forge::ApiSession;
use crate::progress::{NoOpProgress, ProgressReporter};
use std::sync::Arc;

/// Executes a complete harvest run as the command line does.
///
/// The token and the repository list are checked before any request is made;
/// a problem with either aborts the run. After that, per-repository failures
/// are logged and never abort it.
///
/// # Arguments
/// * `config` - The configuration for the entire run.
/// * `progress` - An optional reporter notified as repositories finish.
///
/// # Errors
/// * `Error::TokenNotFound` / `Error::EmptyToken` if no token is available.
/// * `Error::Io` if the token or repository list cannot be read.
/// * `Error::HttpClient` if the HTTP client cannot be built.
/// * `Error::Config` if the worker pool cannot be built.
pub fn run(config: &Config, progress: Option<Arc<dyn ProgressReporter>>) -> Result<()> {
    let token = token::load_token(&config.token_file)?;
    let references = read_repository_list(&config.repositories_file)?;
    log::debug!(
        "Read {} repositories from '{}'",
        references.len(),
        config.repositories_file.display()
    );

    let session = ApiSession::new(&token, config)?;
    let progress = progress.unwrap_or_else(|| Arc::new(NoOpProgress));
    Harvester::new(config, &session).harvest(&references, progress.as_ref())?;
    Ok(())
}
