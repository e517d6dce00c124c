//! CLI integration tests
//!
//! Each test runs the `stockist` binary against its own temporary store and
//! settings file.

use std::path::PathBuf;
use std::process::{Command, Output};

use rusqlite::Connection;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn database(&self) -> PathBuf {
        self.dir.path().join("stock.db")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("stockistconfig")
    }

    fn run(&self, args: &[&str]) -> Output {
        let output = Command::new(env!("CARGO_BIN_EXE_stockist"))
            .current_dir(self.dir.path())
            .arg("--database")
            .arg(self.database())
            .arg("--config")
            .arg(self.config())
            .args(args)
            .output()
            .expect("Failed to execute CLI");
        assert!(
            output.status.success(),
            "CLI command {:?} should succeed. Stderr: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        output
    }

    fn stdout(&self, args: &[&str]) -> String {
        String::from_utf8_lossy(&self.run(args).stdout).to_string()
    }

    fn stderr(&self, args: &[&str]) -> String {
        String::from_utf8_lossy(&self.run(args).stderr).to_string()
    }

    fn stored(&self) -> Vec<(i64, String, i64)> {
        let conn = Connection::open(self.database()).unwrap();
        let mut stmt = conn
            .prepare("SELECT pk, name, count FROM stock ORDER BY pk")
            .unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }
}

#[test]
fn test_stock_persists_between_runs() {
    // Given: an empty store
    let ws = Workspace::new();

    // When: stock is added in two separate invocations
    ws.run(&["stock", "widget", "3"]);
    ws.run(&["stock", "widget", "--create"]);

    // Then: the store holds both records and a third run sees them
    assert_eq!(
        ws.stored(),
        vec![(0, "widget_#0".to_string(), 3), (1, "widget_#1".to_string(), 1)]
    );
    let listing = ws.stdout(&["listname", "widget"]);
    assert!(listing.contains("> widget_#0: 3"));
    assert!(listing.contains("> widget_#1: 1"));
}

#[test]
fn test_count_by_id_and_by_name() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget", "4"]);

    assert_eq!(ws.stdout(&["count", "0"]).trim(), "4");
    assert!(ws.stdout(&["count", "widget"]).contains("> widget_#0: 4"));
    assert!(ws.stderr(&["count", "gadget"]).contains("Not found."));
}

#[test]
fn test_remove_with_delete_if_zero() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget", "2"]);

    ws.run(&["remove", "widget"]);
    assert_eq!(ws.stored(), vec![(0, "widget_#0".to_string(), 1)]);

    let out = ws.stdout(&["--verbose", "remove", "widget", "-5", "--delete-if-zero"]);
    assert!(out.contains("Deleted."));
    assert!(ws.stored().is_empty());
}

#[test]
fn test_delete_last_then_all() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget"]);
    ws.run(&["stock", "widget", "--create"]);
    ws.run(&["stock", "widget", "--create"]);

    ws.run(&["delete", "widget"]);
    assert_eq!(ws.stored().len(), 2);

    ws.run(&["delete", "widget", "--delete-all"]);
    assert!(ws.stored().is_empty());
}

#[test]
fn test_lock_flag_refuses_mutation() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget"]);

    let stderr = ws.stderr(&["--lock", "stock", "widget", "5"]);

    assert!(stderr.contains("Locked."));
    assert_eq!(ws.stored(), vec![(0, "widget_#0".to_string(), 1)]);
}

#[test]
fn test_stored_lock_default_applies() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget"]);
    ws.run(&["set", "lock", "true"]);

    assert!(ws.stdout(&["defaults"]).contains("lock: true"));
    assert!(ws.stderr(&["delete", "0"]).contains("Locked."));

    ws.run(&["reset"]);
    ws.run(&["delete", "0"]);
    assert!(ws.stored().is_empty());
}

#[test]
fn test_silent_suppresses_output() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget"]);

    assert!(ws.stdout(&["--silent", "listall"]).is_empty());
    assert!(ws.stdout(&["listall"]).contains("widget"));
}

#[test]
fn test_clear_with_confirmation_flag() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget"]);

    ws.run(&["clear", "--yes"]);

    assert!(ws.stored().is_empty());
}

#[test]
fn test_export_prints_script() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget", "2"]);

    let script = ws.stdout(&["export"]);

    assert!(script.starts_with("BEGIN TRANSACTION;"));
    assert!(script.contains("VALUES (0, 'widget_#0', 2);"));
}

#[test]
fn test_unknown_setting_is_reported() {
    let ws = Workspace::new();
    assert!(ws.stderr(&["set", "colour", "red"]).contains("Invalid name."));
}

#[test]
fn test_overflowing_stock_is_rejected() {
    let ws = Workspace::new();
    ws.run(&["stock", "widget", "9223372036854775807"]);

    let stderr = ws.stderr(&["stock", "widget", "9223372036854775807"]);

    assert!(stderr.contains("Invalid value."));
    assert_eq!(ws.stored(), vec![(0, "widget_#0".to_string(), i64::MAX)]);
}
