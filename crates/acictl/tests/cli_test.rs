//! Integration tests for the `acictl` binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live APIC.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `acictl` binary with env isolation.
///
/// Clears all `ACI_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn acictl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("acictl");
    cmd.env("HOME", "/tmp/acictl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/acictl-test-nonexistent")
        .env_remove("ACI_PROFILE")
        .env_remove("ACI_CONTROLLER")
        .env_remove("ACI_USERNAME")
        .env_remove("ACI_PASSWORD")
        .env_remove("ACI_OUTPUT")
        .env_remove("ACI_INSECURE")
        .env_remove("ACI_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = acictl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    acictl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ACI")
            .and(predicate::str::contains("tenant"))
            .and(predicate::str::contains("vrf"))
            .and(predicate::str::contains("bridge-domain"))
            .and(predicate::str::contains("contract")),
    );
}

#[test]
fn test_version_flag() {
    acictl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("acictl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    acictl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    acictl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    acictl_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = acictl_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_apply_no_controller() {
    acictl_cmd()
        .args(["tenant", "apply", "lab"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("controller"))
                .or(predicate::str::contains("profile")),
        );
}

#[test]
fn test_apply_controller_without_credentials() {
    acictl_cmd()
        .args(["--controller", "https://192.0.2.1", "tenant", "apply", "lab"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("credentials").or(predicate::str::contains("Credentials")),
        );
}

#[test]
fn test_vrf_apply_requires_tenant() {
    let output = acictl_cmd().args(["vrf", "apply", "ctx1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage error");
    let text = combined_output(&output);
    assert!(
        text.contains("--tenant") || text.contains("required"),
        "Expected missing --tenant error:\n{text}"
    );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    acictl_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path_prints_path() {
    acictl_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_invalid_output_format() {
    let output = acictl_cmd()
        .args(["--output", "invalid", "tenant", "apply", "lab"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing controller config, not about argument parsing.
    acictl_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--check",
            "--timeout",
            "60",
            "tenant",
            "apply",
            "lab",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("controller"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_tenant_subcommands_exist() {
    acictl_cmd()
        .args(["tenant", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apply").and(predicate::str::contains("remove")));
}

#[test]
fn test_subject_apply_flags_exist() {
    acictl_cmd()
        .args(["subject", "apply", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--contract")
                .and(predicate::str::contains("--filters"))
                .and(predicate::str::contains("--in-filters"))
                .and(predicate::str::contains("--out-filters"))
                .and(predicate::str::contains("--both-directions")),
        );
}

#[test]
fn test_bridge_domain_alias() {
    acictl_cmd()
        .args(["bd", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn test_config_subcommands_exist() {
    acictl_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("path")),
        );
}

#[test]
fn test_contract_scope_values() {
    let output = acictl_cmd()
        .args([
            "contract",
            "apply",
            "web",
            "--tenant",
            "t1",
            "--scope",
            "bogus",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage error");
    let text = combined_output(&output);
    assert!(
        text.contains("context") && text.contains("global"),
        "Expected scope value list in error:\n{text}"
    );
}
