//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("evc-config"));
    cmd.current_dir(fixtures()).env_remove("EVC_CONFIG_ROOT").env_remove("RUST_LOG");
    cmd
}

const EXPERIMENT: &str = "configs/exps/surf/actor1_4d.yaml";

#[test]
fn test_cli_version() {
    cmd().arg("--version").assert().success().stdout(predicate::str::contains("evc-config"));
}

#[test]
fn test_cli_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("layered experiment configs"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("chain"));
}

#[test]
fn test_check_prints_summary() {
    cmd()
        .args(["check", EXPERIMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("Experiment: actor1_4d"))
        .stdout(predicate::str::contains("Layers: 5"))
        .stdout(predicate::str::contains("Train frames: [0, 300, 1] (300 frames)"))
        .stdout(predicate::str::contains("Val frames: [0, 300, 1] (300 frames)"))
        .stdout(predicate::str::contains("Sampler points: 390516"))
        .stdout(predicate::str::contains("Background radius: shift -2.5 max 0.1"))
        .stdout(predicate::str::contains("jpeg 80"))
        .stdout(predicate::str::ends_with("OK\n"));
}

#[test]
fn test_check_applies_overrides() {
    cmd()
        .args(["check", EXPERIMENT, "--set", "model_cfg.sampler_cfg.n_points=4096"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sampler points: 4096"));
}

#[test]
fn test_check_rejects_invalid_frame_range() {
    cmd()
        .args(["check", EXPERIMENT, "--set", "dataloader_cfg.dataset_cfg.frame_sample=[10, 5, 1]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("dataloader_cfg.dataset_cfg.frame_sample"))
        .stderr(predicate::str::contains("start must be less than end"));
}

#[test]
fn test_check_no_validate_accepts_invalid_frame_range() {
    cmd()
        .args([
            "check",
            EXPERIMENT,
            "--no-validate",
            "--set",
            "dataloader_cfg.dataset_cfg.frame_sample=[10, 5, 1]",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Train frames: [10, 5, 1] (0 frames)"))
        .stdout(predicate::str::contains("OK"));
}

#[test]
fn test_no_validate_still_applies_schema() {
    cmd()
        .args(["check", EXPERIMENT, "--no-validate", "--set", "model_cfg.sampler_cfg.n_points=1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("model_cfg.sampler_cfg.n_points"));
}

#[test]
fn test_check_rejects_malformed_override() {
    cmd()
        .args(["check", EXPERIMENT, "--set", "exp_name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

#[test]
fn test_show_yaml_contains_merged_values() {
    cmd()
        .args(["show", EXPERIMENT])
        .assert()
        .success()
        .stdout(predicate::str::contains("n_points: 390516"))
        .stdout(predicate::str::contains("data_root: data/actor1"))
        .stdout(predicate::str::contains("exp_name: actor1_4d"))
        .stdout(predicate::str::contains("<<").not());
}

#[test]
fn test_show_json_is_parseable() {
    let output = cmd().args(["show", EXPERIMENT, "--format", "json"]).output().expect("run");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["model_cfg"]["sampler_cfg"]["n_points"], 390516);
    assert_eq!(json["model_cfg"]["sampler_cfg"]["bg_sampler_cfg"]["radius_shift"], -2.5);
    assert_eq!(json["val_dataloader_cfg"]["dataset_cfg"]["frame_sample"], serde_json::json!([0, 300, 1]));
}

#[test]
fn test_show_raw_skips_schema() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("partial.yaml");
    fs::write(&path, "runner_cfg:\n  epochs: 3\n").expect("write");

    cmd()
        .args(["show", path.to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));

    cmd()
        .args(["show", "--raw", path.to_str().expect("utf8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("epochs: 3"))
        .stdout(predicate::str::contains("exp_name: partial"));
}

#[test]
fn test_chain_lists_layers_in_merge_order() {
    let output = cmd().args(["chain", EXPERIMENT]).output().expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with(" 1.") && lines[0].ends_with("base.yaml"), "{stdout}");
    assert!(lines[3].ends_with("mask.yaml"), "{stdout}");
    assert!(lines[4].ends_with("actor1_4d.yaml"), "{stdout}");
}

#[test]
fn test_root_flag_controls_include_resolution() {
    let tmp = TempDir::new().expect("tmp");
    cmd()
        .args(["chain", EXPERIMENT, "--root", tmp.path().to_str().expect("utf8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config not found: configs/base.yaml"));
}

#[test]
fn test_include_cycle_is_reported() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("a.yaml"), "configs: [b.yaml]\n").expect("write a");
    fs::write(tmp.path().join("b.yaml"), "configs: [a.yaml]\n").expect("write b");

    cmd()
        .current_dir(tmp.path())
        .args(["chain", "a.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config include cycle"));
}

#[test]
fn test_unknown_placeholder_is_reported() {
    let tmp = TempDir::new().expect("tmp");
    fs::write(tmp.path().join("exp.yaml"), "exp_name: {{workspaceFolder}}\n").expect("write");

    cmd()
        .current_dir(tmp.path())
        .args(["show", "--raw", "exp.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unresolved placeholder {{workspaceFolder}}"));
}
