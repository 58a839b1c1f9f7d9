// src/config/parsing.rs

use crate::errors::{ConfigError, Result};
use std::time::Duration;

/// Normalizes the target extension: trims it and adds a leading `.` if missing.
pub(super) fn normalize_extension(ext: &str) -> Result<String> {
    let ext = ext.trim();
    if ext.is_empty() || ext == "." {
        return Err(ConfigError::InvalidValue {
            option: "--ext".to_string(),
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    if ext.starts_with('.') {
        Ok(ext.to_string())
    } else {
        Ok(format!(".{}", ext))
    }
}

/// A limit of zero means "no limit".
pub(super) fn normalize_limit(limit: Option<usize>) -> Option<usize> {
    limit.filter(|&n| n > 0)
}

pub(super) fn validate_concurrency(concurrency: usize) -> Result<usize> {
    if concurrency == 0 {
        return Err(ConfigError::InvalidValue {
            option: "--repo-concurrency".to_string(),
            reason: "must be at least 1".to_string(),
        }
        .into());
    }
    Ok(concurrency)
}

pub(super) fn parse_timeout(secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        return Err(ConfigError::InvalidValue {
            option: "--timeout".to_string(),
            reason: format!("must be a positive number of seconds, got {}", secs),
        }
        .into());
    }
    Ok(Duration::from_secs_f64(secs))
}

pub(super) fn validate_backoff_factor(factor: f64) -> Result<f64> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(ConfigError::InvalidValue {
            option: "--backoff-factor".to_string(),
            reason: format!("must be a non-negative number, got {}", factor),
        }
        .into());
    }
    Ok(factor)
}

pub(super) fn validate_branch(branch: &str) -> Result<String> {
    let branch = branch.trim();
    if branch.is_empty() {
        return Err(ConfigError::InvalidValue {
            option: "--fallback-branch".to_string(),
            reason: "must not be empty".to_string(),
        }
        .into());
    }
    Ok(branch.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_extension() -> Result<()> {
        assert_eq!(normalize_extension(".c")?, ".c");
        assert_eq!(normalize_extension("c")?, ".c");
        assert_eq!(normalize_extension(" .rs ")?, ".rs");
        assert_eq!(normalize_extension("tar.gz")?, ".tar.gz");
        assert!(normalize_extension("").is_err());
        assert!(normalize_extension(".").is_err());
        Ok(())
    }

    #[test]
    fn test_zero_limit_means_unlimited() {
        assert_eq!(normalize_limit(Some(0)), None);
        assert_eq!(normalize_limit(Some(5)), Some(5));
        assert_eq!(normalize_limit(None), None);
    }

    #[test]
    fn test_numeric_validation() {
        assert!(validate_concurrency(0).is_err());
        assert_eq!(validate_concurrency(2).unwrap(), 2);
        assert!(parse_timeout(0.0).is_err());
        assert!(parse_timeout(f64::NAN).is_err());
        assert_eq!(parse_timeout(1.5).unwrap(), Duration::from_millis(1500));
        assert!(validate_backoff_factor(-1.0).is_err());
        assert!(validate_backoff_factor(f64::INFINITY).is_err());
        assert_eq!(validate_backoff_factor(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_branch_validation() {
        assert!(validate_branch("  ").is_err());
        assert_eq!(validate_branch(" main ").unwrap(), "main");
    }
}
