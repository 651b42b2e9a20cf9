//! Integration tests for the `farepass` CLI binary.
//!
//! Every test gets its own temporary home and ticket store, so nothing
//! touches the user's real configuration or tickets.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn store(&self) -> PathBuf {
        self.dir.path().join("tickets.json")
    }

    /// `farepass` with env isolation and `--store` pointed into the sandbox.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = self.bare_cmd();
        cmd.arg("--store").arg(self.store());
        cmd
    }

    /// `farepass` with env isolation only.
    fn bare_cmd(&self) -> assert_cmd::Command {
        let home = self.dir.path();
        let mut cmd = cargo_bin_cmd!("farepass");
        cmd.env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join("config"))
            .env("XDG_DATA_HOME", home.join("data"))
            .env_remove("FAREPASS_OUTPUT")
            .env_remove("FAREPASS_STORE__PATH")
            .env_remove("FAREPASS_STORE__ON_CORRUPT")
            .env_remove("FAREPASS_DEFAULTS__OUTPUT")
            .env_remove("RUST_LOG");
        cmd
    }

    fn issue_trips(&self, id: &str, trips: u32) {
        self.cmd()
            .args(["issue", "trips", id, "--trips", &trips.to_string()])
            .assert()
            .success();
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let sandbox = Sandbox::new();
    let output = sandbox.bare_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in output:\n{stderr}");
}

#[test]
fn test_help_flag() {
    Sandbox::new().bare_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("fare tickets")
            .and(predicate::str::contains("issue"))
            .and(predicate::str::contains("redeem"))
            .and(predicate::str::contains("set-balance")),
    );
}

#[test]
fn test_version_flag() {
    Sandbox::new()
        .bare_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("farepass"));
}

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .bare_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("farepass"));
}

// ── Issue & redeem ──────────────────────────────────────────────────

#[test]
fn test_trip_pass_redeems_until_refused() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);

    for _ in 0..2 {
        sandbox.cmd().args(["redeem", "T1"]).assert().success();
    }

    sandbox
        .cmd()
        .args(["redeem", "T1"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("refused"));

    let stored = read_json(&sandbox.store());
    assert_eq!(stored[0]["type"], "TripLimitedPass");
    assert_eq!(stored[0]["balance"], 0);
    assert_eq!(stored[0]["history"].as_array().unwrap().len(), 2);
    assert_eq!(
        stored[0]["history"][1]["description"],
        "Trip redeemed, 0 remaining"
    );
}

#[test]
fn test_plain_redeem_prints_status() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["issue", "unlimited", "U1"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["-o", "plain", "redeem", "U1"])
        .assert()
        .success()
        .stdout("active\n");
}

#[test]
fn test_reissue_replaces_ticket() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["issue", "unlimited", "X"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["issue", "time-limited", "X", "--days", "7"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Replaced existing unlimited ticket X"));

    let stored = read_json(&sandbox.store());
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["type"], "TimeLimitedPass");
}

#[test]
fn test_issue_with_blank_id_is_usage_error() {
    Sandbox::new()
        .cmd()
        .args(["issue", "unlimited", " "])
        .assert()
        .code(2);
}

#[test]
fn test_far_future_expiry_is_rejected_and_store_kept() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);

    sandbox
        .cmd()
        .args(["issue", "time-limited", "M1", "--days", "3000000"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("validity_days"));

    sandbox
        .cmd()
        .args(["--strict", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout("T1\n");
}

// ── Administrative operations ───────────────────────────────────────

#[test]
fn test_negative_balance_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 3);

    sandbox
        .cmd()
        .args(["set-balance", "T1", "-1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("balance"));

    assert_eq!(read_json(&sandbox.store())[0]["balance"], 3);
}

#[test]
fn test_set_balance_logs_event() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 3);

    sandbox
        .cmd()
        .args(["set-balance", "T1", "10"])
        .assert()
        .success();

    let stored = read_json(&sandbox.store());
    assert_eq!(stored[0]["balance"], 10);
    assert_eq!(stored[0]["history"][0]["description"], "Balance set to 10");
}

#[test]
fn test_deactivate_trip_pass_is_unsupported() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 3);

    sandbox
        .cmd()
        .args(["deactivate", "T1"])
        .assert()
        .code(5);
}

#[test]
fn test_deactivated_pass_refuses_redemption() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["issue", "unlimited", "U1"])
        .assert()
        .success();
    sandbox.cmd().args(["deactivate", "U1"]).assert().success();

    sandbox.cmd().args(["redeem", "U1"]).assert().code(6);
    sandbox
        .cmd()
        .args(["-o", "plain", "status", "U1"])
        .assert()
        .success()
        .stdout("deactivated\n");
}

// ── Queries ─────────────────────────────────────────────────────────

#[test]
fn test_unknown_ticket_is_not_found() {
    Sandbox::new()
        .cmd()
        .args(["show", "nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn test_list_json_uses_stored_format() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);
    sandbox
        .cmd()
        .args(["issue", "unlimited", "U1"])
        .assert()
        .success();

    let output = sandbox.cmd().args(["list", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(listed[0]["id"], "T1");
    assert_eq!(listed[0]["trip_allowance"], 2);
    assert_eq!(listed[1]["type"], "UnlimitedPass");
    assert_eq!(listed[1]["active"], true);
}

#[test]
fn test_list_filters_by_kind() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);
    sandbox
        .cmd()
        .args(["issue", "unlimited", "U1"])
        .assert()
        .success();

    sandbox
        .cmd()
        .args(["list", "-o", "plain", "--kind", "unlimited"])
        .assert()
        .success()
        .stdout("U1\n");
}

#[test]
fn test_history_lists_events() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);
    sandbox.cmd().args(["redeem", "T1"]).assert().success();

    sandbox
        .cmd()
        .args(["history", "T1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Trip redeemed, 1 remaining"));
}

// ── Remove ──────────────────────────────────────────────────────────

#[test]
fn test_remove_requires_yes_when_not_interactive() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);

    sandbox
        .cmd()
        .args(["remove", "T1"])
        .write_stdin("")
        .assert()
        .code(2);
    sandbox.cmd().args(["show", "T1"]).assert().success();
}

#[test]
fn test_remove_with_yes() {
    let sandbox = Sandbox::new();
    sandbox.issue_trips("T1", 2);

    sandbox.cmd().args(["remove", "T1", "-y"]).assert().success();
    sandbox.cmd().args(["show", "T1"]).assert().code(4);
    sandbox.cmd().args(["remove", "T1", "-y"]).assert().code(4);
}

// ── Store recovery ──────────────────────────────────────────────────

#[test]
fn test_corrupt_store_strict_fails() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.store(), "{not json").unwrap();

    sandbox
        .cmd()
        .args(["--strict", "list"])
        .assert()
        .code(9)
        .stderr(predicate::str::contains("unreadable"));

    assert_eq!(std::fs::read_to_string(sandbox.store()).unwrap(), "{not json");
}

#[test]
fn test_corrupt_store_recovers_empty() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.store(), "{not json").unwrap();

    sandbox
        .cmd()
        .args(["list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));

    let backup = sandbox.dir.path().join("tickets.json.corrupt");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "{not json");
}

#[test]
fn test_unknown_record_types_are_skipped() {
    let sandbox = Sandbox::new();
    std::fs::write(
        sandbox.store(),
        r#"[
  {"type": "SeasonPass", "id": "S1"},
  {"type": "UnlimitedPass", "id": "U1", "activated_at": "2026-01-01T08:00:00Z",
   "history": [], "balance": 0, "active": true}
]"#,
    )
    .unwrap();

    sandbox
        .cmd()
        .args(["--strict", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout("U1\n");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_reports_store() {
    let sandbox = Sandbox::new();
    let store = sandbox.store();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("config.toml")
                .and(predicate::str::contains(store.display().to_string())),
        );
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let sandbox = Sandbox::new();
    sandbox.bare_cmd().args(["config", "init"]).assert().success();
    sandbox.bare_cmd().args(["config", "init"]).assert().code(7);
    sandbox
        .bare_cmd()
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_env_overrides_store_path() {
    let sandbox = Sandbox::new();
    let store = sandbox.dir.path().join("from-env.json");

    sandbox
        .bare_cmd()
        .env("FAREPASS_STORE__PATH", &store)
        .args(["issue", "unlimited", "U1"])
        .assert()
        .success();

    assert!(store.exists());
}

#[test]
fn test_config_show_reports_effective_store_in_every_format() {
    let sandbox = Sandbox::new();
    let store = sandbox.store().display().to_string();

    let output = sandbox
        .cmd()
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["store"]["path"], store.as_str());

    sandbox
        .cmd()
        .args(["config", "show", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(store.as_str()));

    sandbox
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(store.as_str()));
}
