// src/constants.rs

/// Base URL of the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Base URL serving raw file contents.
pub const DEFAULT_RAW_URL: &str = "https://raw.githubusercontent.com";

/// `Accept` header sent with every API request.
pub const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";

/// Header carrying the REST API version.
pub const API_VERSION_HEADER: &str = "x-github-api-version";

/// REST API version we speak.
pub const API_VERSION: &str = "2022-11-28";

/// Branch used when the default branch cannot be resolved.
pub const DEFAULT_FALLBACK_BRANCH: &str = "master";

/// Extension harvested when none is configured.
pub const DEFAULT_EXTENSION: &str = ".c";

/// Default number of repositories processed in parallel.
pub const DEFAULT_REPO_CONCURRENCY: usize = 3;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of retries for transient transport failures.
pub const DEFAULT_RETRIES: u32 = 3;

/// Default exponential backoff factor, in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.0;

/// Upper bound for a single transport backoff sleep, in seconds.
pub const MAX_BACKOFF_SECS: f64 = 120.0;

/// Status codes treated as transient server failures.
pub const RETRY_STATUSES: [u16; 4] = [500, 502, 503, 504];

/// Default repository list file.
pub const DEFAULT_REPOSITORIES_FILE: &str = "repositories.txt";

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "projects";

/// Default token file, read when `GITHUB_TOKEN` is unset.
pub const DEFAULT_TOKEN_FILE: &str = "github_token.txt";

/// Environment variable holding the GitHub token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
