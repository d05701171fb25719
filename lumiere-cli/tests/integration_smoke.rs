//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lumiere(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lumiere").unwrap();
    // Keep the developer's config and .env out of the tests
    cmd.current_dir(home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env_remove("DATABASE_URL")
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_ANON_KEY");
    cmd
}

// === Help ===

#[test]
fn test_top_level_help() {
    let home = TempDir::new().unwrap();
    lumiere(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("openapi"));
}

#[test]
fn test_serve_help() {
    let home = TempDir::new().unwrap();
    lumiere(&home)
        .arg("serve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skip schema migrations"));
}

// === OpenAPI ===

#[test]
fn test_openapi_prints_json() {
    let home = TempDir::new().unwrap();
    let output = lumiere(&home).arg("openapi").output().unwrap();
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(doc["paths"]["/api/photos"].is_object());
    assert!(doc["paths"]["/api/media/upload"].is_object());
}

#[test]
fn test_openapi_writes_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("openapi.json");

    lumiere(&home)
        .arg("openapi")
        .arg("--output")
        .arg(&path)
        .assert()
        .success();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("/api/categories/{id}"));
}

// === Database commands ===

#[test]
fn test_migrate_without_database_url_fails() {
    let home = TempDir::new().unwrap();
    lumiere(&home)
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_serve_rejects_bad_bind() {
    let home = TempDir::new().unwrap();
    lumiere(&home)
        .arg("serve")
        .arg("--bind")
        .arg("not-an-address")
        .assert()
        .failure();
}
