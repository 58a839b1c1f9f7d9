//! Defines application-specific error types.
//!
//! This module provides the `Error` enum, which categorizes the failures the
//! harvester can hit: bad repository references, network failures that outlive
//! the session's retry budget, undecodable API payloads, filesystem errors and
//! configuration problems.

use thiserror::Error;

/// A specialized `Result` type for harvester operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while validating configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An option was given a value it cannot accept.
    #[error("Invalid value for {option}: {reason}")]
    InvalidValue {
        /// The option name, as spelled on the command line.
        option: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Application-specific errors used throughout `repo-harvester`.
#[derive(Error, Debug)]
pub enum Error {
    /// An input line could not be split into an owner and a repository name.
    #[error("Invalid repository reference '{0}': expected a URL of the form <host>/<owner>/<name>")]
    InvalidReferenceFormat(String),

    /// The request failed at the transport level (connect, timeout, body read)
    /// and the session's retry budget is exhausted.
    #[error("Network error requesting '{url}': {source}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// The underlying `reqwest` error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be constructed (TLS backend, bad settings).
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The server kept answering with a transient error status.
    #[error("Request to '{url}' still failing with HTTP {status} after {attempts} attempts")]
    RetriesExhausted {
        /// The URL that was requested.
        url: String,
        /// The last status code received.
        status: u16,
        /// How many attempts were made in total.
        attempts: u32,
    },

    /// A response body was not the JSON shape we expected.
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        /// The URL whose response failed to decode.
        url: String,
        /// The underlying `serde_json` error.
        #[source]
        source: serde_json::Error,
    },

    /// Error occurring during file or directory access (read, write, create).
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Neither the `GITHUB_TOKEN` variable nor the token file provided a token.
    #[error("GitHub token not found. Set the GITHUB_TOKEN environment variable or create '{0}' containing the token.")]
    TokenNotFound(String),

    /// The token file exists but contains nothing.
    #[error("Token file '{0}' is empty. Add your GitHub token to it or set GITHUB_TOKEN.")]
    EmptyToken(String),
}

impl Error {
    /// Returns `true` for failures that happened on the wire rather than in
    /// our own decoding or on the local filesystem.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Network { .. } | Error::RetriesExhausted { .. })
    }
}

/// Helper function to create an `Error::Io` with path context.
///
/// # Arguments
/// * `source` - The original `std::io::Error`.
/// * `path` - The path associated with the error, convertible to `AsRef<std::path::Path>`.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}
