// tests/cli.rs

mod common;

use assert_cmd::prelude::*;
use common::{create_file, harvester_cmd, list_files, StubServer};
use predicates::prelude::*;
use std::collections::BTreeSet;
use tempfile::tempdir;

#[test]
fn test_help_lists_options() {
    harvester_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--repositories"))
        .stdout(predicate::str::contains("--repo-concurrency"))
        .stdout(predicate::str::contains("--ext"));
}

#[test]
fn test_missing_token_is_fatal() -> anyhow::Result<()> {
    let temp = tempdir()?;
    create_file(temp.path(), "repositories.txt", "https://github.com/o/r\n");

    harvester_cmd()
        .current_dir(temp.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("HARVEST_TOKEN_FILE")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("GitHub token not found"));

    assert!(!temp.path().join("projects").exists());
    Ok(())
}

#[test]
fn test_empty_token_file_is_fatal() -> anyhow::Result<()> {
    let temp = tempdir()?;
    create_file(temp.path(), "repositories.txt", "https://github.com/o/r\n");
    create_file(temp.path(), "github_token.txt", "\n");

    harvester_cmd()
        .current_dir(temp.path())
        .env_remove("GITHUB_TOKEN")
        .env_remove("HARVEST_TOKEN_FILE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is empty"));
    Ok(())
}

#[test]
fn test_missing_repository_list_is_fatal() -> anyhow::Result<()> {
    let temp = tempdir()?;

    harvester_cmd()
        .current_dir(temp.path())
        .env("GITHUB_TOKEN", "ghp_test")
        .env_remove("HARVEST_REPOSITORIES")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("repositories.txt"));
    Ok(())
}

#[test]
fn test_zero_concurrency_is_rejected() -> anyhow::Result<()> {
    let temp = tempdir()?;

    harvester_cmd()
        .current_dir(temp.path())
        .env("GITHUB_TOKEN", "ghp_test")
        .args(["--repo-concurrency", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--repo-concurrency"));
    Ok(())
}

#[test]
fn test_harvests_against_local_server() -> anyhow::Result<()> {
    let server = StubServer::start(|target| match target {
        "/repos/owner/alpha" => (200, r#"{"default_branch": "main"}"#.to_string()),
        "/repos/owner/alpha/git/trees/main?recursive=1" => (
            200,
            r#"{"tree": [
                {"path": "src/alpha.c", "type": "blob"},
                {"path": "src/alpha.h", "type": "blob"},
                {"path": "src", "type": "tree"}
            ]}"#
            .to_string(),
        ),
        "/raw/owner/alpha/main/src/alpha.c" => (200, "int alpha;\n".to_string()),
        "/raw/owner/alpha/main/src/alpha.h" => (200, "int alpha(void);\n".to_string()),
        _ => (404, r#"{"message": "Not Found"}"#.to_string()),
    });
    let temp = tempdir()?;
    create_file(
        temp.path(),
        "list.txt",
        "https://github.com/owner/alpha\n\nhttps://github.com/owner\n",
    );

    harvester_cmd()
        .current_dir(temp.path())
        .env("GITHUB_TOKEN", "ghp_test")
        .env("RUST_LOG", "repo_harvester=info")
        .args(["-r", "list.txt", "-o", "out", "-e", "c"])
        .args(["--api-url", &server.url("")])
        .args(["--raw-url", &server.url("/raw")])
        .args(["--retries", "0"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid repository reference"));

    let expected: BTreeSet<String> = ["alpha/src/alpha.c".to_string()].into_iter().collect();
    assert_eq!(list_files(&temp.path().join("out")), expected);
    assert!(server
        .targets()
        .iter()
        .all(|t| t != "/raw/owner/alpha/main/src/alpha.h"));
    Ok(())
}
