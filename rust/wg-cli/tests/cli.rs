use std::fs;
use std::io::Write;
use std::process::{Command, Output, Stdio};

use serde_json::Value;

fn wiega_bin() -> String {
    env!("CARGO_BIN_EXE_wiega").to_string()
}

fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(wiega_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn version_prints_package_version() {
    let out = Command::new(wiega_bin()).arg("--version").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("wiega "), "stdout={stdout}");
}

#[test]
fn unknown_command_fails() {
    let out = Command::new(wiega_bin()).arg("frobnicate").output().unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Unknown command"));
}

#[test]
fn range_prints_the_band() {
    let out = Command::new(wiega_bin())
        .args(["range", "650", "630", "640g"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "Target range: 550g - 620g"
    );
}

#[test]
fn range_reports_auto_target_when_weights_diverge() {
    let out = Command::new(wiega_bin())
        .args(["range", "700", "600"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout).trim(),
        "Auto target: 590g (spread 100g)"
    );
}

#[test]
fn range_rejects_garbage() {
    let out = Command::new(wiega_bin())
        .args(["range", "heavy"])
        .output()
        .unwrap();
    assert!(!out.status.success());
}

#[test]
fn range_rejects_non_positive_weights() {
    for args in [
        vec!["range", "-50", "-20"],
        vec!["range", "650", "0"],
        vec!["range", "-2147483648", "100"],
    ] {
        let out = Command::new(wiega_bin()).args(&args).output().unwrap();
        assert!(!out.status.success(), "args={args:?}");
        assert!(out.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Invalid weight"), "stderr={stderr}");
        assert!(!stderr.contains("panicked"), "stderr={stderr}");
    }
}

#[test]
fn config_validate_accepts_shipped_configs_and_rejects_bad_ones() {
    let ok = Command::new(wiega_bin())
        .args(["config", "validate", "--config", "../../configs/default.yaml"])
        .output()
        .unwrap();
    assert!(ok.status.success(), "stderr={}", String::from_utf8_lossy(&ok.stderr));

    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "game:\n  min_players: 5\n  max_players: 3\n").unwrap();
    let out = Command::new(wiega_bin())
        .args(["config", "validate", "--config", bad.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid config"));
}

#[test]
fn config_show_prints_yaml() {
    let out = Command::new(wiega_bin())
        .args(["config", "show", "--config", "../../configs/small_vessel.yaml"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("vessel: small"), "stdout={stdout}");
    assert!(stdout.contains("tolerance: 50"));
}

#[test]
fn play_runs_a_piped_game_and_logs_events() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("events.ndjson");

    // Both players miss by more than 50g in round one.
    let script = "2\nAnna\n650\nBen\n640\n600\n500\n700\n";
    let out = run_with_stdin(&["play", "--log", log.to_str().unwrap()], script);
    assert!(
        out.status.success(),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("--- Round 1 summary ---"));
    assert!(stdout.contains("Eliminated: Ben (+100g from 600g)"));
    assert!(stdout.contains("=== Results ==="));

    let text = fs::read_to_string(&log).unwrap();
    let events: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["event"], "session_started");
    assert!(events[0]["config_hash"].is_null());
    assert_eq!(events[1]["summary"]["furthest_player_ids"].as_array().unwrap().len(), 2);
    assert_eq!(events[2]["event"], "session_finished");
}

#[test]
fn play_fails_when_input_runs_out() {
    let out = run_with_stdin(&["play"], "2\nAnna\n");
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("input ended"));
}
