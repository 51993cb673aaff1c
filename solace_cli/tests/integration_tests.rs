//! Integration tests for the solace binary.
//!
//! These tests verify end-to-end behavior including:
//! - Mood classification output
//! - Scripted chat replies and notices
//! - Exercise listing and full exercise runs
//! - Config file handling

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a temp dir holding a config file
fn setup_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("solace"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wellness companion"));
}

#[test]
fn test_classify_plain() {
    cli()
        .args(["classify", "I", "feel", "SO", "stressed"])
        .assert()
        .success()
        .stdout("stressed\n");
}

#[test]
fn test_classify_crisis_priority() {
    cli()
        .args(["classify", "too much pressure, I want to end it all"])
        .assert()
        .success()
        .stdout("crisis\n");
}

#[test]
fn test_classify_json() {
    let output = cli()
        .args(["classify", "--json", "I'm", "nervous"])
        .output()
        .expect("Failed to run classify");
    assert!(output.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("classify --json should print JSON");
    assert_eq!(value["mood"], "anxious");
    assert_eq!(value["notice"]["level"], "info");
    assert_eq!(value["notice"]["text"], "Coping strategy suggested");
}

#[test]
fn test_classify_json_calm_has_no_notice() {
    let output = cli()
        .args(["classify", "--json", "nothing much"])
        .output()
        .expect("Failed to run classify");

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mood"], "calm");
    assert!(value["notice"].is_null());
}

#[test]
fn test_chat_work_stress_reply() {
    cli()
        .args(["chat", "--no-delay", "-m", "I'm overwhelmed at work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi friend!"))
        .stdout(predicate::str::contains("Work stress can feel overwhelming"))
        .stdout(predicate::str::contains("[i] Coping strategy suggested"));
}

#[test]
fn test_chat_crisis_reply() {
    cli()
        .args(["chat", "--no-delay", "-m", "I don't want to live anymore"])
        .assert()
        .success()
        .stdout(predicate::str::contains("988"))
        .stdout(predicate::str::contains("[!] Crisis support resources have been shared"));
}

#[test]
fn test_chat_seeded_default_is_reproducible() {
    let run = || {
        cli()
            .args(["chat", "--no-delay", "--seed", "3", "-m", "hello there"])
            .output()
            .expect("Failed to run chat")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_chat_reads_stdin_until_quit() {
    cli()
        .args(["chat", "--no-delay"])
        .write_stdin("I feel lonely\n/quit\nI feel happy\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("sadness in your words"))
        .stdout(predicate::str::contains("Your happiness").not())
        .stdout(predicate::str::contains("Take care of yourself"));
}

#[test]
fn test_chat_uses_configured_name() {
    let (_dir, path) = setup_config("[chat]\nuser_name = \"Robin\"\ntyping_delay_ms = 0\n");

    cli()
        .arg("--config")
        .arg(&path)
        .args(["chat", "-m", "ok"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hi Robin!"));
}

#[test]
fn test_exercises_lists_catalog() {
    cli()
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("box-breathing"))
        .stdout(predicate::str::contains("54321-grounding"))
        .stdout(predicate::str::contains("gentle-movement"));
}

#[test]
fn test_exercises_category_filter() {
    cli()
        .args(["exercises", "--category", "breathing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wave-breathing"))
        .stdout(predicate::str::contains("body-scan").not());
}

#[test]
fn test_exercises_favorites() {
    cli()
        .args(["exercises", "--favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("body-scan"))
        .stdout(predicate::str::contains("thought-stop").not());
}

#[test]
fn test_run_fast_to_completion() {
    cli()
        .args(["run", "thought-stop", "--fast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("▶ Starting"))
        .stdout(predicate::str::contains("[5/5]"))
        .stdout(predicate::str::contains("■ Finished"))
        .stdout(predicate::str::contains("✓ Exercise complete!"));
}

#[test]
fn test_run_breathing_pulses() {
    cli()
        .args(["run", "box-breathing", "--fast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~ breathe ~"));
}

#[test]
fn test_run_auto_complete() {
    cli()
        .args(["run", "body-scan", "--auto-complete"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[2/11]").not())
        .stdout(predicate::str::contains("✓ Exercise complete!"));
}

#[test]
fn test_run_quiet() {
    cli()
        .args(["run", "thought-stop", "--fast", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Starting").not())
        .stdout(predicate::str::contains("✓ Exercise complete!"));
}

#[test]
fn test_run_unknown_exercise_fails() {
    cli()
        .args(["run", "no-such-exercise", "--fast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-exercise"));
}

#[test]
fn test_invalid_config_fails() {
    let (_dir, path) = setup_config("[player]\ntick_interval_ms = 0\n");

    cli()
        .arg("--config")
        .arg(&path)
        .args(["classify", "hi"])
        .assert()
        .failure();
}

#[test]
fn test_huge_typing_delay_rejected() {
    let (_dir, path) = setup_config("[chat]\ntyping_delay_ms = 9223372036854775807\n");

    cli()
        .arg("--config")
        .arg(&path)
        .args(["chat", "-m", "hello"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("typing_delay_ms"));
}

#[test]
fn test_verbose_shows_info_logs() {
    let (_dir, path) = setup_config("[chat]\nuser_name = \"Robin\"\n");

    cli()
        .env_remove("RUST_LOG")
        .args(["--verbose", "--config"])
        .arg(&path)
        .args(["classify", "hi"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded config"));

    cli()
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&path)
        .args(["classify", "hi"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Loaded config").not());
}

#[test]
fn test_run_interactive_pause_resume_reset() {
    cli()
        .args(["run", "thought-stop", "--interactive"])
        .write_stdin("p\np\nr\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("▶ Starting"))
        .stdout(predicate::str::contains("⏸ Paused at step 1/5"))
        .stdout(predicate::str::contains("▶ Resuming"))
        .stdout(predicate::str::contains("↺ Back to the first step"))
        .stdout(predicate::str::contains("Stopped at step 1/5 (0% done)"));
}

#[test]
fn test_run_interactive_done() {
    cli()
        .args(["run", "body-scan", "--interactive"])
        .write_stdin("d\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("■ Finished"))
        .stdout(predicate::str::contains("✓ Exercise complete!"));
}

#[test]
fn test_run_interactive_conflicts_with_fast() {
    cli()
        .args(["run", "thought-stop", "--interactive", "--fast"])
        .assert()
        .failure();
}
