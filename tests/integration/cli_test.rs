use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

use super::{clisso_cmd, write_config, CONFIG};

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    clisso_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("temporary cloud credentials"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    clisso_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("clisso"));
}

#[test]
fn test_get_help_lists_flags() {
    let home = TempDir::new().unwrap();
    clisso_cmd(&home)
        .args(["get", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--shell"))
        .stdout(predicate::str::contains("--write-to-file"))
        .stdout(predicate::str::contains("--save-password"));
}

#[test]
fn test_apps_list_marks_selected() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    clisso_cmd(&home)
        .args(["apps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* prod (acme)"))
        .stdout(predicate::str::contains("  staging (acme)"))
        .stdout(predicate::str::contains("  orphan (-)"));
}

#[test]
fn test_apps_list_without_config_is_empty() {
    let home = TempDir::new().unwrap();
    clisso_cmd(&home)
        .args(["apps", "list"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_apps_select_persists() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    clisso_cmd(&home)
        .args(["apps", "select", "staging"])
        .assert()
        .success()
        .stderr(predicate::str::contains("App 'staging' selected."));

    let saved = fs::read_to_string(home.path().join(".clisso.yaml")).unwrap();
    assert!(saved.contains("selected-app: staging"));

    clisso_cmd(&home)
        .args(["apps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* staging (acme)"));
}

#[test]
fn test_apps_select_unknown_app() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    clisso_cmd(&home)
        .args(["apps", "select", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("App not found: ghost"));
}

#[test]
fn test_providers_list() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    clisso_cmd(&home)
        .args(["providers", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("acme (okta)"))
        .stdout(predicate::str::contains("adfs-corp (adfs)"))
        .stdout(predicate::str::contains("untyped (?)"));
}

#[test]
fn test_config_flag_overrides_home() {
    let home = TempDir::new().unwrap();
    let other = home.path().join("team.yaml");
    fs::write(&other, "apps:\n  sandbox:\n    provider: acme\n").unwrap();

    clisso_cmd(&home)
        .args(["apps", "list", "--config", other.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("sandbox (acme)"));
}

#[test]
fn test_config_env_var() {
    let home = TempDir::new().unwrap();
    let other = home.path().join("team.yaml");
    fs::write(&other, "apps:\n  sandbox:\n    provider: acme\n").unwrap();

    clisso_cmd(&home)
        .env("CLISSO_CONFIG", other.to_str().unwrap())
        .args(["apps", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sandbox (acme)"));
}
