// End-to-end tests of the profileprobe binary that need no browser
use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper to run the profileprobe binary
fn run_profileprobe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_profileprobe"))
        .args(args)
        .env_remove("PROFILEPROBE_WEBDRIVER_URL")
        .env_remove("PROFILEPROBE_BROWSER")
        .output()
        .expect("Failed to execute profileprobe command")
}

fn stdout_json(output: &Output) -> Result<Value> {
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn test_normalize_simple() {
    let output = run_profileprobe(&[
        "normalize",
        "https://www.tiktok.com/@jane.doe/video/7301234567890?is_from_webapp=1",
    ]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://www.tiktok.com/@jane.doe"
    );
}

#[test]
fn test_normalize_json() -> Result<()> {
    let output = run_profileprobe(&["normalize", "--format", "json", "tiktok.com/@jane.doe/"]);

    assert!(output.status.success());
    let json = stdout_json(&output)?;
    assert_eq!(json["input"], "tiktok.com/@jane.doe/");
    assert_eq!(json["url"], "https://tiktok.com/@jane.doe");
    assert_eq!(json["handle"], "@jane.doe");
    Ok(())
}

#[test]
fn test_normalize_without_handle_passes_through() {
    let output = run_profileprobe(&["normalize", "https://example.com/about/"]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "https://example.com/about"
    );
}

#[test]
fn test_extract_rejects_non_url() -> Result<()> {
    let output = run_profileprobe(&["extract", "not a url"]);

    assert_eq!(output.status.code(), Some(2));
    let json = stdout_json(&output)?;
    assert_eq!(json["error"], true);
    assert_eq!(json["exit_code"], 2);
    assert!(json["message"].as_str().unwrap().contains("Not a profile URL"));
    Ok(())
}

#[test]
fn test_extract_rejects_bad_viewport() -> Result<()> {
    let output = run_profileprobe(&[
        "extract",
        "https://www.tiktok.com/@jane.doe",
        "--viewport",
        "wide",
    ]);

    assert!(!output.status.success());
    let json = stdout_json(&output)?;
    assert_eq!(json["error"], true);
    Ok(())
}

#[test]
fn test_extract_unreachable_webdriver_yields_empty_record() -> Result<()> {
    let dir = TempDir::new()?;
    let saved = dir.path().join("record.json");

    let output = run_profileprobe(&[
        "extract",
        "https://www.tiktok.com/@jane.doe/video/1",
        "--webdriver-url",
        "http://127.0.0.1:9",
        "--settle-ms",
        "0",
        "--output",
        saved.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let json = stdout_json(&output)?;
    assert_eq!(json["tiktok_url"], "https://www.tiktok.com/@jane.doe");
    assert!(json["name"].is_null());
    assert!(json["followers"].is_null());

    let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&saved)?)?;
    assert_eq!(on_disk, json);
    Ok(())
}

#[test]
fn test_extract_simple_format() {
    let output = run_profileprobe(&[
        "extract",
        "@jane.doe",
        "--format",
        "simple",
        "--webdriver-url",
        "http://127.0.0.1:9",
        "--settle-ms",
        "0",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://www.tiktok.com/@jane.doe"));
    assert!(stdout.contains("Followers: -"));
}
