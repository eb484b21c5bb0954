//! CLI integration tests for the sleepos admin commands.
//!
//! Each test points the binary at its own SQLite file so tests can run in
//! parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::PathBuf;

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use sleepos::store::{SqliteStore, Store};

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("sleepos.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("sleepos").expect("failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env("STORE_URL", format!("sqlite://{}", self.db_path().display()))
            .env("STORE_KEY", "local");
        cmd
    }

    fn init(&self, password: &str) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--email",
                "admin@sleepos.org",
                "--password",
                password,
                "--non-interactive",
            ])
            .assert()
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.db_path()).expect("open store")
    }
}

#[test]
fn test_help_lists_commands() {
    let ctx = TestContext::new();
    ctx.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn test_init_seeds_admin() {
    let ctx = TestContext::new();
    ctx.init("night-mode-2024")
        .success()
        .stdout(predicate::str::contains("admin@sleepos.org"));

    let user = ctx.store().first_user().unwrap().expect("admin exists");
    assert_eq!(user.email, "admin@sleepos.org");
    assert!(user.role.is_admin());
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[test]
fn test_init_twice_fails() {
    let ctx = TestContext::new();
    ctx.init("night-mode-2024").success();
    ctx.init("night-mode-2024")
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_non_interactive_requires_password() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["admin", "init", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password"));
}

#[test]
fn test_init_without_store_fails() {
    let ctx = TestContext::new();
    ctx.cmd()
        .env_remove("STORE_URL")
        .env_remove("STORE_KEY")
        .args(["admin", "init", "--password", "night-mode-2024", "--non-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Store not configured"));
}

#[test]
fn test_set_password_replaces_hash() {
    let ctx = TestContext::new();
    ctx.init("night-mode-2024").success();
    let before = ctx.store().first_user().unwrap().unwrap().password_hash;

    ctx.cmd()
        .args(["admin", "set-password", "--password", "a-brand-new-pass"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password updated"));

    let after = ctx.store().first_user().unwrap().unwrap().password_hash;
    assert_ne!(before, after);
    assert!(sleepos::auth::verify_password("a-brand-new-pass", &after));
}

#[test]
fn test_set_password_before_init_fails() {
    let ctx = TestContext::new();
    ctx.cmd()
        .args(["admin", "set-password", "--password", "a-brand-new-pass"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("admin init"));
}
