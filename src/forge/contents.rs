// src/forge/contents.rs
//! Directory-by-directory enumeration through the contents API.
//!
//! Used when the recursive tree listing is unavailable. The walk keeps an
//! explicit LIFO work-list of directory paths instead of recursing, so deep
//! trees cost heap, not stack.

use super::rate_limit::{wait_for_reset, RateLimitState};
use super::{Endpoints, RepositoryReference, Transport};
use crate::core_types::{DirectoryListingEntry, DownloadTask, ListingKind};
use crate::errors::{Error, Result};
use reqwest::StatusCode;
use serde_json::Value;
use std::path::Path;
use url::Url;

/// Counters describing one walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directory listings that were fetched and processed.
    pub directories_listed: usize,
    /// Directories given up on (error status, transport failure, bad payload).
    pub directories_abandoned: usize,
    /// Times a listing was re-queued after a rate-limit wait.
    pub rate_limit_waits: usize,
    /// Tasks handed to `emit`.
    pub tasks_emitted: usize,
}

/// Walks the repository from its root and calls `emit` for every file whose
/// name ends with `extension`.
///
/// A 403 carrying a rate-limit reset blocks until the reset and puts the same
/// directory back on the work-list. Any other failure abandons only that
/// directory. The walk ends when the work-list is empty.
///
/// # Errors
/// Listing failures never end the walk; only an error returned by `emit`
/// does, and it is passed through unchanged.
pub fn walk_contents<F>(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    reference: &RepositoryReference,
    branch: &str,
    destination_root: &Path,
    extension: &str,
    mut emit: F,
) -> Result<WalkStats>
where
    F: FnMut(DownloadTask) -> Result<()>,
{
    let mut stats = WalkStats::default();
    let mut pending: Vec<String> = vec![String::new()];

    while let Some(path) = pending.pop() {
        let url = endpoints.contents(&reference.owner, &reference.name, &path, branch);
        log::debug!("Fetching directory contents from: {}", url);

        let response = match transport.get(&url) {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Error accessing {}: {}", url, e);
                stats.directories_abandoned += 1;
                continue;
            }
        };

        if response.status == StatusCode::FORBIDDEN {
            if let Some(reset) =
                RateLimitState::from_headers(&response.headers).and_then(|s| s.reset_at())
            {
                wait_for_reset(reset);
                stats.rate_limit_waits += 1;
                pending.push(path);
                continue;
            }
        }

        if response.status != StatusCode::OK {
            log::warn!("Non-200 listing {}: {}", url, response.status);
            stats.directories_abandoned += 1;
            continue;
        }

        let items = match response.json::<Value>(&url).and_then(|v| listing_items(v, &url)) {
            Ok(items) => items,
            Err(e) => {
                log::warn!("Unreadable listing {}: {}", url, e);
                stats.directories_abandoned += 1;
                continue;
            }
        };

        stats.directories_listed += 1;
        for item in items {
            match item.kind {
                ListingKind::File if item.name.ends_with(extension) => {
                    stats.tasks_emitted += 1;
                    emit(DownloadTask {
                        owner: reference.owner.clone(),
                        name: reference.name.clone(),
                        branch: branch.to_string(),
                        path: item.path,
                        destination_root: destination_root.to_path_buf(),
                    })?;
                }
                ListingKind::Dir => pending.push(item.path),
                _ => {}
            }
        }
    }

    log::debug!("Contents walk of {} finished: {:?}", reference, stats);
    Ok(stats)
}

/// The API returns an array for a directory and a single object for a file.
fn listing_items(value: Value, url: &Url) -> Result<Vec<DirectoryListingEntry>> {
    let decode = |source| Error::Decode {
        url: url.to_string(),
        source,
    };
    if value.is_array() {
        serde_json::from_value(value).map_err(decode)
    } else if value.is_object() {
        Ok(vec![serde_json::from_value(value).map_err(decode)?])
    } else {
        Ok(vec![])
    }
}
