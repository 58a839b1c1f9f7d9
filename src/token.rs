// src/token.rs

//! Locates the GitHub token.

use crate::constants::TOKEN_ENV_VAR;
use crate::errors::{io_error_with_path, Error, Result};
use std::env;
use std::fs;
use std::path::Path;

/// Returns the GitHub token.
///
/// The `GITHUB_TOKEN` environment variable wins when it is set to something
/// other than whitespace; otherwise `token_file` is read.
///
/// # Errors
/// * [`Error::TokenNotFound`] if neither source exists.
/// * [`Error::EmptyToken`] if the file exists but is blank.
/// * [`Error::Io`] if the file cannot be read.
pub fn load_token(token_file: &Path) -> Result<String> {
    resolve_token(env::var(TOKEN_ENV_VAR).ok(), token_file)
}

fn resolve_token(env_value: Option<String>, token_file: &Path) -> Result<String> {
    if let Some(token) = env_value.map(|t| t.trim().to_string()) {
        if !token.is_empty() {
            log::debug!("Using {} for authentication.", TOKEN_ENV_VAR);
            return Ok(token);
        }
    }

    if !token_file.exists() {
        return Err(Error::TokenNotFound(token_file.display().to_string()));
    }
    let token = fs::read_to_string(token_file)
        .map_err(|e| io_error_with_path(e, token_file))?
        .trim()
        .to_string();
    if token.is_empty() {
        return Err(Error::EmptyToken(token_file.display().to_string()));
    }
    log::debug!("Using token from '{}'.", token_file.display());
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_value_wins() -> Result<()> {
        let temp = tempdir().unwrap();
        let file = temp.path().join("github_token.txt");
        fs::write(&file, "from-file").unwrap();
        assert_eq!(
            resolve_token(Some("  from-env\n".to_string()), &file)?,
            "from-env"
        );
        Ok(())
    }

    #[test]
    fn test_blank_env_falls_back_to_file() -> Result<()> {
        let temp = tempdir().unwrap();
        let file = temp.path().join("github_token.txt");
        fs::write(&file, "ghp_abc\n").unwrap();
        assert_eq!(resolve_token(Some("   ".to_string()), &file)?, "ghp_abc");
        assert_eq!(resolve_token(None, &file)?, "ghp_abc");
        Ok(())
    }

    #[test]
    fn test_missing_everything() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("github_token.txt");
        assert!(matches!(
            resolve_token(None, &file),
            Err(Error::TokenNotFound(_))
        ));
    }

    #[test]
    fn test_empty_file() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("github_token.txt");
        fs::write(&file, " \n").unwrap();
        assert!(matches!(resolve_token(None, &file), Err(Error::EmptyToken(_))));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        // A directory exists but cannot be read as a file.
        let temp = tempdir().unwrap();
        assert!(matches!(
            resolve_token(None, temp.path()),
            Err(Error::Io { .. })
        ));
    }
}
