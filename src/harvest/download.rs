// src/harvest/download.rs
//! Idempotent single-file download.

use crate::core_types::DownloadTask;
use crate::errors::{io_error_with_path, Result};
use crate::forge::{Endpoints, Transport};
use reqwest::StatusCode;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::Builder as TempFileBuilder;

/// What happened to one download task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The file was fetched and written.
    Downloaded,
    /// The file was already on disk; no request was made.
    AlreadyPresent,
    /// The fetch failed or the path was refused; nothing was written.
    Failed,
}

/// Downloads the file described by `task`, unless it is already on disk.
///
/// The existence of the local file is the only check; its content is never
/// compared with the remote one. Failed fetches leave no file behind, so the
/// next run tries again.
///
/// # Errors
/// Only local filesystem failures are errors. Network failures and non-200
/// statuses are logged and reported as [`DownloadOutcome::Failed`].
pub fn download_blob(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    task: &DownloadTask,
) -> Result<DownloadOutcome> {
    let Some(local_path) = task.local_path() else {
        log::warn!(
            "Refusing to write '{}' outside of '{}'",
            task.path,
            task.destination_root.display()
        );
        return Ok(DownloadOutcome::Failed);
    };

    if let Some(parent) = local_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error_with_path(e, parent))?;
    }
    if local_path.exists() {
        log::debug!("File exists, skipping: {}", local_path.display());
        return Ok(DownloadOutcome::AlreadyPresent);
    }

    let url = endpoints.raw_file(&task.owner, &task.name, &task.branch, &task.path);
    let response = match transport.get(&url) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("Request failed for {}: {}", url, e);
            return Ok(DownloadOutcome::Failed);
        }
    };
    if response.status != StatusCode::OK {
        log::warn!("Failed to download {}: status {}", url, response.status);
        return Ok(DownloadOutcome::Failed);
    }

    write_fully(&local_path, &response.body)?;
    log::info!("Downloaded {}", local_path.display());
    Ok(DownloadOutcome::Downloaded)
}

/// Writes `contents` to a temporary file next to `path`, then moves it into
/// place. `path` never exists in a partially written state.
fn write_fully(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = TempFileBuilder::new()
        .prefix(".harvest-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(|e| io_error_with_path(e, dir))?;
    temp.write_all(contents)
        .and_then(|_| temp.flush())
        .map_err(|e| io_error_with_path(e, path))?;
    temp.persist(path)
        .map_err(|e| io_error_with_path(e.error, path))?;
    Ok(())
}
