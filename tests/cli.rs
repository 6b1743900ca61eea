//! End-to-end tests of the suite-replay binary

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Temp dir holding a colourless config so user settings never leak in
fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[reporter]\ncolors = false\nslow_ms = 75\n").unwrap();
    (dir, config)
}

fn suite_replay(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_suite-replay"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_run_json_reproduces_snapshot() {
    let (_dir, config) = workspace();
    let input = fixture("full_run.json");
    let output = suite_replay(
        &config,
        &["run", input.to_str().unwrap(), "--reporter", "json", "--compact"],
    );

    // a failure was replayed
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 1);

    let written: serde_json::Value = serde_json::from_str(&text).unwrap();
    let original: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&input).unwrap()).unwrap();
    assert_eq!(written, original);
}

#[test]
fn test_run_json_without_stats() {
    let (_dir, config) = workspace();
    let input = fixture("hooks.json");
    let output = suite_replay(
        &config,
        &["run", input.to_str().unwrap(), "-r", "json", "--no-stats"],
    );

    assert_eq!(output.status.code(), Some(0));
    let written: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(written.get("stats").is_none());
}

#[test]
fn test_run_spec_reporter() {
    let (_dir, config) = workspace();
    let input = fixture("full_run.json");
    let output = suite_replay(&config, &["run", input.to_str().unwrap()]);

    let text = stdout(&output);
    assert!(text.contains("  parser\n"), "{text}");
    assert!(text.contains("✓ reads numbers"));
    assert!(text.contains("1) reads strings\n"));
    assert!(text.contains("3 passing (106ms)"));
    assert!(text.contains("1 failing"));
    assert!(text.contains("2 pending"));
    assert!(text.contains("1) parser reads strings:"));
}

#[test]
fn test_run_events_from_stdin() {
    let (_dir, config) = workspace();
    let mut child = Command::new(env!("CARGO_BIN_EXE_suite-replay"))
        .arg("--config")
        .arg(&config)
        .args(["run", "-", "--reporter", "events"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(br#"{"title": "", "tests": [{"title": "t", "state": "passed"}]}"#)
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "run-begin\nsuite-begin\ntest-pass\ntest-end\nsuite-end\nrun-end\n"
    );
}

#[test]
fn test_inspect_prints_outline() {
    let (_dir, config) = workspace();
    let input = fixture("hooks.json");
    let output = suite_replay(&config, &["inspect", input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("database"));
    assert!(text.contains("beforeEach×1"));
    assert!(text.contains("✓ inserts"));
    assert!(text.contains("2 suites, 2 tests: 2 passed, 0 failed, 0 pending"));
}

#[test]
fn test_error_exit_codes() {
    let (dir, config) = workspace();

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{ \"suite\": ").unwrap();
    let output = suite_replay(&config, &["run", broken.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error: "));

    let rootless = dir.path().join("rootless.json");
    std::fs::write(&rootless, r#"{ "stats": {} }"#).unwrap();
    let output = suite_replay(&config, &["inspect", rootless.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("missing root suite"));

    let unresolved = dir.path().join("unresolved.json");
    std::fs::write(
        &unresolved,
        r#"{ "title": "", "tests": [{ "title": "limbo", "pending": false }] }"#,
    )
    .unwrap();
    let output = suite_replay(&config, &["run", unresolved.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("test: limbo"));

    let missing = dir.path().join("missing.json");
    let output = suite_replay(&config, &["run", missing.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to read file"));
}

#[test]
fn test_config_command_shows_effective_values() {
    let (_dir, config) = workspace();
    let output = suite_replay(&config, &["config"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains(&format!("Config file: {}", config.display())));
    assert!(text.contains("colors = false"));
    assert!(text.contains("slow_ms = 75"));
    assert!(text.contains("reporter = \"spec\""));
}
