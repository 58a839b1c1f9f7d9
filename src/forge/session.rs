// src/forge/session.rs
//! The authenticated HTTP session shared by every worker.

use crate::config::Config;
use crate::constants::{
    ACCEPT_HEADER, API_VERSION, API_VERSION_HEADER, MAX_BACKOFF_SECS, RETRY_STATUSES,
};
use crate::errors::{ConfigError, Error, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::thread;
use std::time::Duration;
use url::Url;

/// A fully-read HTTP response.
///
/// Non-2xx statuses are ordinary values here; callers inspect `status`
/// themselves.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| Error::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// A blocking `GET` capability, safe to share across worker threads.
///
/// [`ApiSession`] is the production implementation; tests substitute
/// in-memory fakes.
///
/// # Examples
///
/// ```
/// use repo_harvester::forge::{ApiResponse, Transport};
/// use repo_harvester::errors::Result;
/// use reqwest::{header::HeaderMap, StatusCode};
/// use url::Url;
///
/// // A transport that answers every request with an empty JSON array.
/// struct EmptyForge;
/// impl Transport for EmptyForge {
///     fn get(&self, _url: &Url) -> Result<ApiResponse> {
///         Ok(ApiResponse {
///             status: StatusCode::OK,
///             headers: HeaderMap::new(),
///             body: b"[]".to_vec(),
///         })
///     }
/// }
///
/// let url = Url::parse("https://api.github.com/repos/o/r/contents").unwrap();
/// let response = EmptyForge.get(&url).unwrap();
/// assert_eq!(response.status, StatusCode::OK);
/// ```
pub trait Transport: Send + Sync {
    /// Issues a `GET` and reads the whole body.
    ///
    /// # Errors
    /// Only transport-level failures are errors. Any HTTP status, including
    /// 4xx and 5xx, is returned as an `ApiResponse`.
    fn get(&self, url: &Url) -> Result<ApiResponse>;
}

/// Bounded retry with exponential backoff for transient transport failures.
///
/// Statuses 500, 502, 503 and 504 and transport errors are retried. The
/// sleep before retry `n` is `0` for the first retry and
/// `backoff_factor * 2^(n-1)` seconds afterwards, capped at two minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,
    /// Backoff factor, in seconds.
    pub backoff_factor: f64,
}

/// The result of one attempt, as seen by [`RetryPolicy::execute`].
enum Attempt {
    Done(ApiResponse),
    Transient(ApiResponse),
    Failed(Error),
}

impl RetryPolicy {
    /// Total number of attempts this policy allows.
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// The sleep before the `retry`-th retry (1-based).
    ///
    /// # Examples
    ///
    /// ```
    /// use repo_harvester::forge::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy { retries: 3, backoff_factor: 1.0 };
    /// assert_eq!(policy.backoff(1), Duration::ZERO);
    /// assert_eq!(policy.backoff(2), Duration::from_secs(2));
    /// assert_eq!(policy.backoff(3), Duration::from_secs(4));
    /// ```
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = (retry - 1).min(31) as i32;
        let secs = (self.backoff_factor * 2f64.powi(exponent)).min(MAX_BACKOFF_SECS);
        Duration::from_secs_f64(secs)
    }

    /// Runs `send` until it yields a non-transient outcome or the attempt
    /// budget is spent.
    pub fn execute<F>(&self, url: &Url, mut send: F) -> Result<ApiResponse>
    where
        F: FnMut() -> Result<ApiResponse>,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;
        loop {
            let outcome = match send() {
                Ok(response) if is_retryable_status(response.status) => {
                    Attempt::Transient(response)
                }
                Ok(response) => Attempt::Done(response),
                Err(e) if e.is_transport() => Attempt::Failed(e),
                Err(e) => return Err(e),
            };

            let last_error = match outcome {
                Attempt::Done(response) => return Ok(response),
                Attempt::Transient(response) => Error::RetriesExhausted {
                    url: url.to_string(),
                    status: response.status.as_u16(),
                    attempts: attempt,
                },
                Attempt::Failed(e) => e,
            };

            if attempt >= max_attempts {
                return Err(last_error);
            }

            let delay = self.backoff(attempt);
            log::debug!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                max_attempts,
                url,
                last_error,
                delay
            );
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status.as_u16())
}

/// A `reqwest` blocking client carrying authentication and API-version
/// headers, with transient-failure retry.
///
/// Constructed once per run and shared by reference across the worker pool;
/// the underlying connection pool is thread-safe.
#[derive(Debug, Clone)]
pub struct ApiSession {
    client: Client,
    retry: RetryPolicy,
}

impl ApiSession {
    /// Builds the session from a token and the run configuration.
    ///
    /// # Errors
    /// * `Error::Config` if the token cannot be used as a header value.
    /// * `Error::HttpClient` if the client cannot be built (for example, the
    ///   TLS backend fails to initialize).
    pub fn new(token: &str, config: &Config) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(token)?)
            .timeout(config.request_timeout)
            .build()
            .map_err(Error::HttpClient)?;
        log::debug!(
            "API session ready (timeout {:?}, {} retries, backoff factor {})",
            config.request_timeout,
            config.retry.retries,
            config.retry.backoff_factor
        );
        Ok(Self {
            client,
            retry: config.retry,
        })
    }

    fn send_once(&self, url: &Url) -> Result<ApiResponse> {
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url.clone()).send().map_err(network)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(network)?.to_vec();
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for ApiSession {
    fn get(&self, url: &Url) -> Result<ApiResponse> {
        log::trace!("GET {}", url);
        self.retry.execute(url, || self.send_once(url))
    }
}

/// Builds the headers attached to every request.
pub(crate) fn default_headers(token: &str) -> Result<HeaderMap> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        option: "token".to_string(),
        reason,
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
    headers.insert(
        HeaderName::from_static(API_VERSION_HEADER),
        HeaderValue::from_static(API_VERSION),
    );
    let agent = format!("repo-harvester/{}", env!("CARGO_PKG_VERSION"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&agent).map_err(|e| invalid(e.to_string()))?,
    );
    let mut auth = HeaderValue::from_str(&format!("token {}", token))
        .map_err(|_| invalid("contains characters not allowed in an HTTP header".to_string()))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    Ok(headers)
}
