// src/forge/branch.rs
//! Resolves a repository's default branch.

use super::{Endpoints, RepositoryReference, Transport};
use crate::errors::Result;
use reqwest::StatusCode;
use serde::Deserialize;

/// The repository metadata we care about.
#[derive(Deserialize, Debug)]
struct RepoInfo {
    default_branch: Option<String>,
}

/// Fetches the default branch name for a repository.
///
/// Returns `Ok(None)` when the metadata request answers anything but 200 or
/// the payload carries no `default_branch`; the caller picks a fallback.
///
/// # Errors
/// Transport failures (after the session's own retries) and undecodable
/// payloads are returned as errors.
pub fn resolve_default_branch(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    reference: &RepositoryReference,
) -> Result<Option<String>> {
    let url = endpoints.repository(&reference.owner, &reference.name);
    log::debug!("Fetching repo metadata from: {}", url);
    let response = transport.get(&url)?;

    if response.status != StatusCode::OK {
        log::debug!(
            "Could not get repo info {}: {}",
            reference,
            response.status
        );
        return Ok(None);
    }

    let info: RepoInfo = response.json(&url)?;
    Ok(info.default_branch.filter(|b| !b.is_empty()))
}
