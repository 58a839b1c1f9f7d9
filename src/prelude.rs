//! The `repo-harvester` prelude for convenient library usage.
//!
//! This module re-exports the most commonly used types, traits, and functions.
//!
//! # Example
//!
//! ```
//! use repo_harvester::prelude::*;
//! # fn main() -> Result<()> {
//!
//! let config = ConfigBuilder::new().extension("h").build()?;
//! let reference = RepositoryReference::parse("https://github.com/madler/zlib")?;
//! assert_eq!(config.extension, ".h");
//! assert_eq!(reference.to_string(), "madler/zlib");
//!
//! # Ok(())
//! # }
//! ```

pub use crate::config::{Config, ConfigBuilder};
pub use crate::core_types::{DirectoryListingEntry, DownloadTask, TreeEntry, TreeEntryKind};
pub use crate::errors::{Error, Result};
pub use crate::forge::{
    ApiResponse, ApiSession, Endpoints, RepositoryReference, RetryPolicy, Transport,
};
pub use crate::harvest::{
    download_blob, read_repository_list, DownloadOutcome, HarvestSummary, Harvester,
    RepositoryOutcome, RepositoryStats, Strategy,
};
pub use crate::progress::{NoOpProgress, ProgressReporter};
pub use crate::run;
