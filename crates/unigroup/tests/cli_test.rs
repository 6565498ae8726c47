//! Integration tests for the `unigroup` CLI binary.
//!
//! Every test runs against its own temporary groups file and a config
//! directory that does not exist, so the user's real data is never touched.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Isolated environment: a temp dir holding the store and the fake HOME.
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
        self.dir.path().join("groups.json")
    }

    fn file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Build a [`Command`] for the `unigroup` binary with env isolation.
    fn cmd(&self) -> assert_cmd::Command {
        let home = self.dir.path().join("home");
        let mut cmd = cargo_bin_cmd!("unigroup");
        cmd.env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("NO_COLOR", "1")
            .env_remove("UNIGROUP_STORE")
            .env_remove("UNIGROUP_OUTPUT")
            .env_remove("UNIGROUP_GROUPS_FILE")
            .env_remove("UNIGROUP_DEFAULTS__OUTPUT")
            .env_remove("UNIGROUP_DEFAULTS__COLOR")
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(self.store());
        cmd
    }

    fn run(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.cmd().args(args).assert()
    }

    fn stdout(&self, args: &[&str]) -> String {
        let output = self.run(args).success().get_output().stdout.clone();
        String::from_utf8(output).unwrap()
    }
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.is_empty()).collect()
}

const CLIENTS: &str = r#"[
    { "mac": "f0:18:98:00:00:01", "name": "iPhone", "oui": "Apple", "is_wired": false, "ip": "192.168.1.120" },
    { "mac": "f0:18:98:00:00:02", "hostname": "imac", "oui": "Apple", "is_wired": true, "ip": "192.168.1.20" },
    { "mac": "00:17:88:00:00:03", "hostname": "hue-bridge", "oui": "Philips", "is_wired": true, "ip": "10.0.20.5" }
]"#;

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let sandbox = Sandbox::new();
    let output = cargo_bin_cmd!("unigroup")
        .env("HOME", sandbox.dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = String::from_utf8_lossy(&output.stderr);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    Sandbox::new().run(&["--help"]).success().stdout(
        predicate::str::contains("auto")
            .and(predicate::str::contains("members"))
            .and(predicate::str::contains("match"))
            .and(predicate::str::contains("import")),
    );
}

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .run(&["completions", "bash"])
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_config_path_points_at_toml() {
    Sandbox::new()
        .run(&["config", "path"])
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ── Group lifecycle ─────────────────────────────────────────────────

#[test]
fn test_create_and_list() {
    let sandbox = Sandbox::new();
    sandbox
        .run(&["create", "Kids Devices", "-d", "School tablets"])
        .success()
        .stderr(predicate::str::contains("kids-devices"));

    assert_eq!(lines(&sandbox.stdout(&["list", "-o", "plain"])), vec!["kids-devices"]);

    let json: serde_json::Value =
        serde_json::from_str(&sandbox.stdout(&["list", "-o", "json"])).unwrap();
    assert_eq!(json[0]["slug"], "kids-devices");
    assert_eq!(json[0]["type"], "static");
    assert_eq!(json[0]["description"], "School tablets");
}

#[test]
fn test_create_duplicate_is_conflict() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Kids"]).success();
    sandbox
        .run(&["create", "kids"])
        .code(6)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_show_missing_group_is_not_found() {
    Sandbox::new()
        .run(&["show", "ghost"])
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_edit_renames_group() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Lab"]).success();
    sandbox.run(&["edit", "lab", "--name", "Robotics Lab"]).success();

    assert_eq!(lines(&sandbox.stdout(&["list", "-o", "plain"])), vec!["robotics-lab"]);
}

#[test]
fn test_edit_collision_needs_confirmation() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Alpha"]).success();
    sandbox.run(&["create", "Beta"]).success();

    sandbox
        .run(&["edit", "alpha", "--name", "Beta"])
        .code(2)
        .stderr(predicate::str::contains("--yes"));
    sandbox.run(&["-y", "edit", "alpha", "--name", "Beta"]).success();

    assert_eq!(lines(&sandbox.stdout(&["list", "-o", "plain"])), vec!["beta"]);
}

#[test]
fn test_delete_requires_confirmation() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Temp"]).success();

    sandbox.run(&["delete", "temp"]).code(2);
    sandbox.run(&["delete", "temp", "--yes"]).success();

    assert!(sandbox.stdout(&["list", "-o", "plain"]).trim().is_empty());
}

// ── Membership ──────────────────────────────────────────────────────

#[test]
fn test_add_members_normalizes_and_lists() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Kids"]).success();
    sandbox
        .run(&["add", "kids", "f0-18-98-00-00-01", "--alias", "Tablet"])
        .success();
    sandbox.run(&["add", "kids", "F01898000001"]).success();
    sandbox.run(&["add", "kids", "aabbccddeeff"]).success();

    assert_eq!(
        lines(&sandbox.stdout(&["members", "kids", "-o", "plain"])),
        vec!["F0:18:98:00:00:01", "AA:BB:CC:DD:EE:FF"]
    );

    let json: serde_json::Value =
        serde_json::from_str(&sandbox.stdout(&["members", "kids", "-o", "json"])).unwrap();
    assert_eq!(json[0]["alias"], "Tablet");
}

#[test]
fn test_alias_and_remove_by_alias() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Kids"]).success();
    sandbox.run(&["add", "kids", "aa:bb:cc:dd:ee:ff"]).success();

    sandbox.run(&["alias", "kids", "AA-BB-CC-DD-EE-FF", "Switch"]).success();
    sandbox
        .run(&["remove", "kids", "Switch", "Console"])
        .success()
        .stderr(predicate::str::contains("Removed: Switch").and(predicate::str::contains("Not found: Console")));

    assert!(sandbox.stdout(&["members", "kids", "-o", "plain"]).trim().is_empty());
}

#[test]
fn test_alias_unknown_member_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Kids"]).success();
    sandbox.run(&["alias", "kids", "nobody", "x"]).code(4);
}

#[test]
fn test_alias_with_multiple_macs_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Kids"]).success();
    sandbox
        .run(&["add", "kids", "aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02", "-a", "Both"])
        .code(2);
}

#[test]
fn test_clear_members() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Kids"]).success();
    sandbox
        .run(&["add", "kids", "aa:bb:cc:dd:ee:01", "aa:bb:cc:dd:ee:02"])
        .success();

    sandbox
        .run(&["clear", "kids", "-y"])
        .success()
        .stderr(predicate::str::contains("2 members"));
    assert!(sandbox.stdout(&["members", "kids", "-o", "plain"]).trim().is_empty());
}

// ── Auto groups ─────────────────────────────────────────────────────

#[test]
fn test_auto_group_matches_clients() {
    let sandbox = Sandbox::new();
    let clients = sandbox.file("clients.json", CLIENTS);

    sandbox
        .run(&["auto", "Apple Wireless", "--vendor", "Apple", "--type", "wireless"])
        .success();

    let out = sandbox.stdout(&[
        "match",
        "apple-wireless",
        "--clients",
        clients.to_str().unwrap(),
        "-o",
        "plain",
    ]);
    assert_eq!(lines(&out), vec!["f0:18:98:00:00:01"]);
}

#[test]
fn test_match_reads_stdin_envelope() {
    let sandbox = Sandbox::new();
    sandbox.run(&["auto", "IoT", "--ip", "10.0.20.0/24"]).success();

    let envelope = format!(r#"{{"data": {CLIENTS}}}"#);
    sandbox
        .cmd()
        .args(["match", "iot", "--clients", "-", "-o", "plain"])
        .write_stdin(envelope)
        .assert()
        .success()
        .stdout(predicate::str::contains("00:17:88:00:00:03").and(predicate::str::contains("f0:18").not()));
}

#[test]
fn test_match_static_group_uses_members() {
    let sandbox = Sandbox::new();
    let clients = sandbox.file("clients.json", CLIENTS);
    sandbox.run(&["create", "Desk"]).success();
    sandbox.run(&["add", "desk", "F0-18-98-00-00-02"]).success();

    let out = sandbox.stdout(&["match", "desk", "-c", clients.to_str().unwrap(), "-o", "plain"]);
    assert_eq!(lines(&out), vec!["f0:18:98:00:00:02"]);
}

#[test]
fn test_auto_dry_run_does_not_create() {
    let sandbox = Sandbox::new();
    let clients = sandbox.file("clients.json", CLIENTS);

    sandbox
        .run(&[
            "auto",
            "Apple",
            "--vendor",
            "Apple",
            "--dry-run",
            "--clients",
            clients.to_str().unwrap(),
            "-o",
            "plain",
        ])
        .success()
        .stdout(predicate::str::contains("f0:18:98:00:00:02"))
        .stderr(predicate::str::contains("Dry run"));

    assert!(!sandbox.store().exists());
}

#[test]
fn test_auto_without_rules_is_rejected() {
    Sandbox::new().run(&["auto", "Empty"]).code(2);
}

#[test]
fn test_members_on_auto_group_cannot_add() {
    let sandbox = Sandbox::new();
    sandbox.run(&["auto", "Apple", "--vendor", "Apple"]).success();
    sandbox
        .run(&["add", "apple", "aa:bb:cc:dd:ee:ff"])
        .code(2)
        .stderr(predicate::str::contains("Cannot add members"));
}

#[test]
fn test_rules_replaces_rules() {
    let sandbox = Sandbox::new();
    let clients = sandbox.file("clients.json", CLIENTS);
    sandbox.run(&["auto", "Devices", "--vendor", "Apple"]).success();
    sandbox.run(&["rules", "devices", "--hostname", "hue-*"]).success();

    let out = sandbox.stdout(&["match", "devices", "-c", clients.to_str().unwrap(), "-o", "plain"]);
    assert_eq!(lines(&out), vec!["00:17:88:00:00:03"]);
}

// ── Import / export ─────────────────────────────────────────────────

#[test]
fn test_export_import_round_trip() {
    let source = Sandbox::new();
    source.run(&["create", "Kids"]).success();
    source.run(&["add", "kids", "aa:bb:cc:dd:ee:ff", "-a", "Tablet"]).success();
    source.run(&["auto", "Apple", "--vendor", "Apple*"]).success();

    let export_path = source.dir.path().join("export.json");
    source
        .run(&["export", "--file", export_path.to_str().unwrap()])
        .success();

    let target = Sandbox::new();
    target.run(&["create", "Leftover"]).success();
    target
        .run(&["import", export_path.to_str().unwrap(), "--replace", "-y"])
        .success()
        .stderr(predicate::str::contains("2 groups"));

    assert_eq!(
        lines(&target.stdout(&["list", "-o", "plain"])),
        vec!["kids", "apple"]
    );
    assert_eq!(
        read_json(&export_path),
        serde_json::from_str::<serde_json::Value>(&target.stdout(&["export"])).unwrap()
    );
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_import_merge_keeps_existing() {
    let sandbox = Sandbox::new();
    sandbox.run(&["create", "Existing"]).success();
    let file = sandbox.file(
        "import.json",
        r#"{"version": 1, "groups": {"new": {"name": "New", "type": "static", "members": [],
            "created_at": "2024-01-15T10:30:00Z", "updated_at": "2024-01-15T10:30:00Z"}}}"#,
    );

    sandbox.run(&["import", file.to_str().unwrap()]).success();
    assert_eq!(
        lines(&sandbox.stdout(&["list", "-o", "plain"])),
        vec!["existing", "new"]
    );
}

#[test]
fn test_import_invalid_document() {
    let sandbox = Sandbox::new();
    let file = sandbox.file("bad.json", r#"{"groups": {"x": {"name": 5}}}"#);
    sandbox
        .run(&["import", file.to_str().unwrap()])
        .code(2)
        .stderr(predicate::str::contains("Invalid groups document"));
}

// ── Store handling ──────────────────────────────────────────────────

#[test]
fn test_corrupted_store_lists_empty() {
    let sandbox = Sandbox::new();
    std::fs::write(sandbox.store(), "{ not json").unwrap();
    sandbox.run(&["list", "-o", "plain"]).success().stdout(predicate::str::is_empty());
}

#[test]
fn test_store_env_var_is_honored() {
    let sandbox = Sandbox::new();
    let store = sandbox.dir.path().join("from-env.json");
    cargo_bin_cmd!("unigroup")
        .env("HOME", sandbox.dir.path().join("home"))
        .env("XDG_CONFIG_HOME", sandbox.dir.path().join("home/.config"))
        .env("UNIGROUP_STORE", &store)
        .args(["create", "Env"])
        .assert()
        .success();
    assert!(store.exists());
}
