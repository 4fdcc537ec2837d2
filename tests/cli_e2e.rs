//! End-to-end CLI tests for the papers-dl binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::socket_guard::start_mock_server_or_skip;

/// Binary with an isolated config home so a developer's own config never leaks in.
fn papers_dl(config_home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("papers-dl").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write_config(dir: &Path, server: &MockServer) -> std::path::PathBuf {
    let config = dir.join("papers-dl.toml");
    fs::write(
        &config,
        format!(
            "# test config\nproviders = \"scidb\"\nscidb_base_url = \"{}\"\nread_timeout_secs = 10\n",
            server.uri()
        ),
    )
    .unwrap();
    config
}

async fn mount_scidb_paper(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/scidb/10.1234/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            br#"<embed type="application/pdf" src="/files/abc.pdf">"#.to_vec(),
            "text/html",
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/abc.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 e2e".to_vec(), "application/pdf"),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog/post"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            b"<p>nothing citable</p>".to_vec(),
            "text/html",
        ))
        .mount(server)
        .await;
}

#[test]
fn test_binary_help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse").and(predicate::str::contains("fetch")));
}

#[test]
fn test_binary_version_displays_name() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("papers-dl"));
}

#[test]
fn test_binary_without_subcommand_is_usage_error() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path()).assert().code(2);
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .args(["fetch", "--invalid-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_parse_reads_stdin_raw() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .arg("parse")
        .write_stdin("see doi:10.1000/xyz123 and ISBN 0-306-40615-2 for details")
        .assert()
        .success()
        .stdout("0-306-40615-2\n10.1000/xyz123\n");
}

#[test]
fn test_parse_file_as_csv() {
    let home = TempDir::new().unwrap();
    let input = home.path().join("refs.txt");
    fs::write(&input, "Paper: https://doi.org/10.1000/xyz123\n").unwrap();

    papers_dl(home.path())
        .args(["parse", "-f", "csv", "-p"])
        .arg(&input)
        .assert()
        .success()
        .stdout("10.1000/xyz123,doi\n");
}

#[test]
fn test_parse_jsonl_with_match_filter() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .args(["parse", "-m", "isbn", "--format", "jsonl"])
        .write_stdin("10.1000/xyz123 ISBN 978-0-306-40615-7")
        .assert()
        .success()
        .stdout("{\"id\":\"978-0-306-40615-7\",\"type\":\"isbn\"}\n");
}

#[test]
fn test_parse_drops_invalid_isbn() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .args(["parse", "-m", "isbn"])
        .write_stdin("ISBN 978-0-306-40615-8")
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_parse_missing_file_fails() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .args(["parse", "-p", "/definitely/not/here.txt"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to read input file"));
}

#[test]
fn test_fetch_name_with_several_queries_rejected() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .args(["fetch", "-n", "paper", "10.1000/a", "10.1000/b"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--name can only be used with a single query"));
}

#[test]
fn test_fetch_without_queries_is_noop() {
    let home = TempDir::new().unwrap();
    papers_dl(home.path())
        .arg("fetch")
        .write_stdin("")
        .assert()
        .success();
}

#[test]
fn test_fetch_rejects_unknown_config_key() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    fs::write(&config, "concurrency = 4\n").unwrap();

    papers_dl(home.path())
        .arg("--config")
        .arg(&config)
        .args(["fetch", "10.1000/a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_default_config_location_is_used() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("papers-dl");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "read_timeout_secs = 0\n").unwrap();

    papers_dl(home.path())
        .args(["fetch", "10.1000/a"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("read_timeout_secs"));
}

#[tokio::test]
async fn test_fetch_partial_success_exits_one() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_scidb_paper(&server).await;

    let home = TempDir::new().unwrap();
    let out = home.path().join("library");
    let config = write_config(home.path(), &server);
    let queries = home.path().join("queries.txt");
    fs::write(
        &queries,
        format!("# reading list\n10.1234/abc\n\n{}/blog/post\n", server.uri()),
    )
    .unwrap();

    let mut cmd = papers_dl(home.path());
    cmd.arg("--config")
        .arg(&config)
        .args(["fetch", "-i"])
        .arg(&queries)
        .arg("-o")
        .arg(&out);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .code(1)
        .stdout(predicate::str::contains("OK [doi] 10.1234/abc"))
        .stdout(predicate::str::contains("FAILED"))
        .stdout(predicate::str::contains("[NotFoundError]"))
        .stdout(predicate::str::contains("1 downloaded, 1 failed"));

    assert_eq!(fs::read(out.join("10.1234_abc.pdf")).unwrap(), b"%PDF-1.4 e2e");
}

#[tokio::test]
async fn test_fetch_with_name_and_total_failure() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_scidb_paper(&server).await;

    let home = TempDir::new().unwrap();
    let out = home.path().join("library");
    let config = write_config(home.path(), &server);

    let mut named = papers_dl(home.path());
    named
        .arg("--config")
        .arg(&config)
        .args(["-q", "fetch", "10.1234/abc", "-n", "smith 2020"])
        .arg("-o")
        .arg(&out);
    let assert = tokio::task::spawn_blocking(move || named.assert())
        .await
        .unwrap();
    assert.success();
    assert!(out.join("smith_2020.pdf").exists());

    let mut missing = papers_dl(home.path());
    missing
        .arg("--config")
        .arg(&config)
        .args(["fetch", "10.1234/missing"])
        .arg("-o")
        .arg(&out);
    let assert = tokio::task::spawn_blocking(move || missing.assert())
        .await
        .unwrap();
    assert
        .code(2)
        .stdout(predicate::str::contains("0 downloaded, 1 failed"));
}
