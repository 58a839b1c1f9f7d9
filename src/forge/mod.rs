// src/forge/mod.rs
//! Talks to the hosted forge (GitHub) over its REST API.
//!
//! This module provides functionality to:
//! - Build an authenticated, retrying HTTP session shared by every worker.
//! - Parse repository URLs into owner/name references.
//! - Resolve a repository's default branch.
//! - Enumerate files via the recursive tree listing, or walk the contents API
//!   directory by directory when that listing is unavailable.
//! - Interpret rate-limit headers and block until the quota resets.

mod branch;
mod contents;
mod rate_limit;
mod reference;
mod session;
mod tree;

pub use branch::resolve_default_branch;
pub use contents::{walk_contents, WalkStats};
pub use rate_limit::{wait_for_reset, RateLimitState};
pub use reference::RepositoryReference;
pub use session::{ApiResponse, ApiSession, RetryPolicy, Transport};
pub use tree::list_tree;

use crate::errors::{ConfigError, Result};
use url::Url;

/// Base URLs of the REST API and of the raw content host.
///
/// # Examples
///
/// ```
/// use repo_harvester::forge::Endpoints;
///
/// let endpoints = Endpoints::github();
/// assert_eq!(
///     endpoints.tree("madler", "zlib", "develop").as_str(),
///     "https://api.github.com/repos/madler/zlib/git/trees/develop?recursive=1"
/// );
/// assert_eq!(
///     endpoints.raw_file("madler", "zlib", "develop", "contrib/minizip/zip.c").as_str(),
///     "https://raw.githubusercontent.com/madler/zlib/develop/contrib/minizip/zip.c"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: Url,
    raw: Url,
}

impl Endpoints {
    /// Creates endpoints from two base URLs, which may carry a path prefix.
    pub fn new(api: &str, raw: &str) -> Result<Self> {
        Ok(Self {
            api: parse_base(api, "--api-url")?,
            raw: parse_base(raw, "--raw-url")?,
        })
    }

    /// The public GitHub endpoints.
    pub fn github() -> Self {
        Self {
            api: Url::parse(crate::constants::DEFAULT_API_URL).expect("constant URL is valid"),
            raw: Url::parse(crate::constants::DEFAULT_RAW_URL).expect("constant URL is valid"),
        }
    }

    /// `GET /repos/{owner}/{name}`
    pub fn repository(&self, owner: &str, name: &str) -> Url {
        join(&self.api, ["repos", owner, name])
    }

    /// `GET /repos/{owner}/{name}/git/trees/{branch}?recursive=1`
    pub fn tree(&self, owner: &str, name: &str, branch: &str) -> Url {
        let mut url = join(&self.api, ["repos", owner, name, "git", "trees"]);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(branch.split('/'));
        }
        url.query_pairs_mut().append_pair("recursive", "1");
        url
    }

    /// `GET /repos/{owner}/{name}/contents/{path}?ref={branch}`
    ///
    /// An empty `path` lists the repository root.
    pub fn contents(&self, owner: &str, name: &str, path: &str, branch: &str) -> Url {
        let mut url = join(&self.api, ["repos", owner, name, "contents"]);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
        }
        url.query_pairs_mut().append_pair("ref", branch);
        url
    }

    /// `{raw}/{owner}/{name}/{branch}/{path}`
    pub fn raw_file(&self, owner: &str, name: &str, branch: &str, path: &str) -> Url {
        let mut url = join(&self.raw, [owner, name]);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(branch.split('/'));
            segments.extend(path.split('/'));
        }
        url
    }
}

fn parse_base(value: &str, option: &str) -> Result<Url> {
    let url = Url::parse(value).map_err(|e| ConfigError::InvalidValue {
        option: option.to_string(),
        reason: format!("'{}' is not a valid URL: {}", value, e),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidValue {
            option: option.to_string(),
            reason: format!("'{}' cannot be used as a base URL", value),
        }
        .into());
    }
    Ok(url)
}

/// Appends percent-encoded path segments to a base URL.
fn join<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    // Bases are validated by `parse_base`, so this cannot fail.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
