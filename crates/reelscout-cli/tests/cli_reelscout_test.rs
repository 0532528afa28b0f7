#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Writes a config file pointing at `base_url`.
fn write_config(dir: &Path, base_url: &str) {
    let content = format!("[omdb]\nbase_url = \"{base_url}\"\ntimeout_secs = 5\n");
    std::fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("details"))
        .stdout(predicate::str::contains("browse"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pages"))
        .stdout(predicate::str::contains("--type"));
}

#[test]
fn test_search_missing_query() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.arg("search")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--query"));
}

#[test]
fn test_search_rejects_zero_pages() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.args(["search", "--query", "batman", "--pages", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pages"));
}

#[test]
fn test_search_rejects_unknown_type() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.args(["search", "--query", "batman", "--type", "podcast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("podcast"));
}

#[test]
fn test_search_without_api_key() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.env_remove("OMDB_API_KEY")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["search", "--query", "batman"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OMDB_API_KEY"));
}

#[test]
fn test_details_missing_id() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.arg("details")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--id"));
}

#[test]
fn test_config_set_key_and_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let dir_arg = dir.path().to_str().unwrap();

    // Act
    let mut set_key = cargo_bin_cmd!("reelscout");
    set_key
        .args(["--dir", dir_arg, "config", "set-key", "secret-key"])
        .assert()
        .success();

    // Assert
    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("api_key = \"secret-key\""));

    let mut show = cargo_bin_cmd!("reelscout");
    show.env_remove("OMDB_API_KEY")
        .args(["--dir", dir_arg, "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("set (config file)"))
        .stdout(predicate::str::contains("secret-key").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_against_mock_server() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .and(query_param("page", "1"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/omdb/search_batman_page1.json"
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &mock_server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.env("OMDB_API_KEY", "test-key")
        .env("NO_COLOR", "1")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["search", "--query", "batman"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total results: 50"))
        .stdout(predicate::str::contains("Batman Begins"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_loads_requested_pages() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/omdb/search_batman_page1.json"
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("s", "batman"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/omdb/search_batman_page2.json"
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &mock_server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.env("OMDB_API_KEY", "test-key")
        .env("NO_COLOR", "1")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["search", "--query", "batman", "--pages", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("showing 20, pages 1-2"))
        .stdout(predicate::str::contains("Batman Begins"))
        .stdout(predicate::str::contains("Batman: Mask of the Phantasm"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_blank_query_sends_nothing() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/omdb/search_batman_page1.json"
        )))
        .expect(0)
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &mock_server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.env("OMDB_API_KEY", "test-key")
        .env("NO_COLOR", "1")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["search", "--query", "   "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Empty query, nothing to search."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_search_not_found_is_not_an_error() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("s", "zzzzqqqq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/omdb/search_not_found.json"
        )))
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &mock_server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.env("OMDB_API_KEY", "test-key")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["search", "--query", "zzzzqqqq"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_details_unknown_id_fails() {
    // Arrange
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("i", "tt0000000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
            "../../../fixtures/omdb/title_not_found.json"
        )))
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    write_config(dir.path(), &mock_server.uri());

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("reelscout");
    cmd.env("OMDB_API_KEY", "test-key")
        .args(["--dir", dir.path().to_str().unwrap()])
        .args(["details", "--id", "tt0000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Incorrect IMDb ID."));
}
