//! Configuration layering tests.
//!
//! Verifies project-local `.miq.toml` discovery and CLI-over-config
//! precedence by observing which weights path the binary reports.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use assert_cmd::Command;
use predicates::prelude::*;

fn miq() -> Command {
    Command::cargo_bin("miq").unwrap()
}

#[test]
fn test_config_weights_path_is_used() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".miq.toml"),
        "[model]\nweights = \"/no/such/place/miq.safetensors\"\n",
    )
    .unwrap();

    miq()
        .current_dir(dir.path())
        .arg("image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/place/miq.safetensors"));
}

#[test]
fn test_cli_weights_override_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".miq.toml"),
        "[model]\nweights = \"/from/config.safetensors\"\n",
    )
    .unwrap();

    miq()
        .current_dir(dir.path())
        .arg("--weights")
        .arg("/from/cli.safetensors")
        .arg("image.png")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("/from/cli.safetensors")
                .and(predicate::str::contains("/from/config.safetensors").not()),
        );
}

#[test]
fn test_config_variant_selects_default_weights_name() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".miq.toml"), "[model]\nvariant = \"dilated\"\n").unwrap();

    miq()
        .current_dir(dir.path())
        .arg("image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("miq_dilated.safetensors"));
}

#[test]
fn test_invalid_config_value_warns() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".miq.toml"), "[output]\nformat = \"xml\"\n").unwrap();

    miq()
        .current_dir(dir.path())
        .arg("image.png")
        .assert()
        .stderr(predicate::str::contains("output.format"));
}

#[test]
fn test_malformed_config_warns_and_continues() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".miq.toml"), "not [valid toml").unwrap();

    miq()
        .current_dir(dir.path())
        .arg("image.png")
        .assert()
        .stderr(predicate::str::contains("invalid config"));
}
