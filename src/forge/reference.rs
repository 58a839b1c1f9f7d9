// src/forge/reference.rs
//! Parses repository URLs into owner/name pairs.

use crate::errors::{Error, Result};
use std::fmt;
use url::Url;

/// A repository on the forge, identified by owner and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl RepositoryReference {
    /// Parses a repository URL.
    ///
    /// The first two segments of the URL path are taken as owner and name;
    /// anything after them (`/tree/main/src`, ...) is ignored. Input without
    /// a scheme is treated as a bare path.
    ///
    /// # Errors
    /// Returns [`Error::InvalidReferenceFormat`] if the path has fewer than
    /// two segments.
    ///
    /// # Examples
    /// ```
    /// use repo_harvester::forge::RepositoryReference;
    ///
    /// let r = RepositoryReference::parse("https://github.com/madler/zlib").unwrap();
    /// assert_eq!(r.owner, "madler");
    /// assert_eq!(r.name, "zlib");
    ///
    /// assert!(RepositoryReference::parse("https://github.com/madler").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let path = match Url::parse(input) {
            Ok(url) => url.path().to_string(),
            Err(url::ParseError::RelativeUrlWithoutBase) => input.to_string(),
            Err(_) => return Err(Error::InvalidReferenceFormat(input.to_string())),
        };

        let mut segments = path.trim_matches('/').split('/');
        match (segments.next(), segments.next()) {
            (Some(owner), Some(name)) => {
                log::debug!(
                    "Extracted repository info - Owner: {}, Repository: {}",
                    owner,
                    name
                );
                Ok(Self {
                    owner: owner.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(Error::InvalidReferenceFormat(input.to_string())),
        }
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
