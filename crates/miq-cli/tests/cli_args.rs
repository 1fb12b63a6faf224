//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.
//! None of these require model weights.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;

fn miq() -> Command {
    Command::cargo_bin("miq").unwrap()
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    miq().assert().failure().stderr(
        predicate::str::contains("No paths specified").or(predicate::str::contains("required")),
    );
}

#[test]
fn test_help_mentions_scoring() {
    miq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("focus-quality"));
}

// === Model Selection Tests ===

#[test]
fn test_unsupported_model_id_is_rejected() {
    miq()
        .arg("--model-id")
        .arg("7")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported model id 7"));
}

#[test]
fn test_model_and_model_id_conflict() {
    miq()
        .arg("--model")
        .arg("dilated")
        .arg("--model-id")
        .arg("0")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_model_name_rejected() {
    miq()
        .arg("--model")
        .arg("turbo")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("standard").or(predicate::str::contains("dilated")));
}

// === Numeric Validation Tests ===

#[test]
fn test_tiny_patch_width_rejected() {
    miq()
        .arg("--patch-width")
        .arg("2")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 4"));
}

#[test]
fn test_zero_classes_rejected() {
    miq()
        .arg("--num-classes")
        .arg("0")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_fail_below_out_of_range() {
    // Default class count is 11, so class 11 cannot be a threshold.
    miq()
        .arg("--fail-below")
        .arg("11")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    miq()
        .arg("--format")
        .arg("xml")
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

// === Weights Resolution Tests ===

#[test]
fn test_missing_weights_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    miq()
        .arg("--weights")
        .arg(dir.path().join("absent.safetensors"))
        .arg("some-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("weights file not found"));
}
