//! CLI integration tests
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("gleaner").unwrap()
}

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

#[test]
fn test_cli_file_input() {
    cmd().arg(get_fixture_path("news_article.html")).assert().success();
}

#[test]
fn test_cli_stdin_input() {
    let html = std::fs::read_to_string(get_fixture_path("news_article.html")).unwrap();
    cmd()
        .arg("-")
        .write_stdin(html)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rivers Return to the Valley"));
}

#[test]
fn test_cli_json_report() {
    let output = cmd()
        .arg(get_fixture_path("news_article.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metadata"]["title"], "Rivers Return to the Valley");
    assert_eq!(report["metadata"]["author"], "Ana Ortiz, Sam Lee");
    assert_eq!(report["metadata"]["domain"], "valleycourier.example");
    assert_eq!(report["content"]["tag"], "article");
    assert!(report["content"]["score"].as_f64().unwrap() > 50.0);
}

#[test]
fn test_cli_url_argument() {
    let output = cmd()
        .args(["--url", "https://www.example.com/page", &get_fixture_path("legacy_layout.html")])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(report["metadata"]["domain"], "example.com");
    assert_eq!(report["metadata"]["favicon"], "https://www.example.com/favicon.ico");
    assert_eq!(report["content"]["id"], "main-cell");
}

#[test]
fn test_cli_text_format() {
    cmd()
        .args(["-f", "text", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Valley Courier"))
        .stdout(predicate::str::contains("article"));
}

#[test]
fn test_cli_no_content_is_not_an_error() {
    let output = cmd()
        .arg(get_fixture_path("empty_content.html"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["content"].is_null());
    assert_eq!(report["metadata"]["title"], "Nothing here");
}

#[test]
fn test_cli_min_score() {
    let output = cmd()
        .args(["--min-score", "0", &get_fixture_path("empty_content.html")])
        .output()
        .unwrap();
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["content"]["tag"], "div");
}

#[test]
fn test_cli_output_file() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("report.json");

    cmd()
        .args(["-o", output.to_str().unwrap()])
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Output written"));

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("\"metadata\""));
}

#[test]
fn test_cli_text_output_file_is_plain() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("report.txt");

    cmd()
        .args(["-f", "text", "-o", output.to_str().unwrap()])
        .arg(get_fixture_path("news_article.html"))
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(!written.contains('\u{1b}'));
    assert!(written.contains("Title:       Rivers Return to the Valley\n"));
    assert!(written.contains("Description: "));
    assert!(written.contains("Content: <article>"));
}

#[test]
fn test_cli_invalid_file() {
    cmd().arg("nonexistent.html").assert().failure();
}

#[test]
fn test_cli_invalid_format() {
    cmd()
        .args(["-f", "yaml", &get_fixture_path("news_article.html")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid format"));
}

#[test]
fn test_cli_verbose() {
    cmd()
        .args(["-v", &get_fixture_path("news_article.html")])
        .assert()
        .success()
        .stderr(predicate::str::contains("Gleaner"));
}
