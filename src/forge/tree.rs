// src/forge/tree.rs
//! Bulk listing of a branch through the recursive git trees endpoint.

use super::rate_limit::{wait_for_reset, RateLimitState};
use super::{Endpoints, RepositoryReference, Transport};
use crate::core_types::TreeEntry;
use crate::errors::Result;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct TreeResponse {
    tree: Option<Vec<TreeEntry>>,
    #[serde(default)]
    truncated: bool,
}

/// Lists every entry of `branch` in a single request.
///
/// Returns `Ok(None)` when the listing is unavailable (non-200 status, or a
/// 200 without a `tree` field), which tells the caller to fall back to the
/// contents walker. `Ok(Some(vec![]))` is an empty repository, not a failure.
/// Entries keep the order the API sent them in.
///
/// When `rate_limit_backoff` is set, a 403 carrying a reset timestamp blocks
/// until the reset and re-issues the request instead of reporting the
/// listing as unavailable.
///
/// # Errors
/// Transport failures and undecodable payloads.
pub fn list_tree(
    transport: &dyn Transport,
    endpoints: &Endpoints,
    reference: &RepositoryReference,
    branch: &str,
    rate_limit_backoff: bool,
) -> Result<Option<Vec<TreeEntry>>> {
    let url = endpoints.tree(&reference.owner, &reference.name, branch);
    loop {
        log::debug!("Fetching recursive tree from: {}", url);
        let response = transport.get(&url)?;

        if response.status == StatusCode::FORBIDDEN && rate_limit_backoff {
            if let Some(reset) =
                RateLimitState::from_headers(&response.headers).and_then(|s| s.reset_at())
            {
                wait_for_reset(reset);
                continue;
            }
        }

        if response.status != StatusCode::OK {
            log::debug!(
                "git/trees failed for {} (branch={}): {}",
                reference,
                branch,
                response.status
            );
            return Ok(None);
        }

        let payload: TreeResponse = response.json(&url)?;
        if payload.truncated {
            log::warn!(
                "Tree listing for {} (branch={}) was truncated by the API; some files may be missing",
                reference,
                branch
            );
        }
        return Ok(payload.tree);
    }
}
