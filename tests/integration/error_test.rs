use tempfile::TempDir;

use super::{clisso_cmd, write_config, CONFIG};

#[test]
fn test_exit_code_no_app() {
    let home = TempDir::new().unwrap();
    write_config(&home, "apps:\n  prod:\n    provider: acme\n");

    let output = clisso_cmd(&home).args(["get"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3)); // NoAppSpecified
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No app specified and no default app configured"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_exit_code_provider_not_configured() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    let output = clisso_cmd(&home)
        .args(["get", "orphan", "--shell"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not get provider for app 'orphan'"));
}

#[test]
fn test_exit_code_provider_type_not_configured() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    let output = clisso_cmd(&home)
        .args(["get", "untyped-app"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Could not get provider type for provider 'untyped'"));
}

#[test]
fn test_exit_code_unsupported_provider_type() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    let output = clisso_cmd(&home)
        .args(["get", "legacy", "--save-password"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4)); // UnsupportedProviderType
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported identity provider type 'adfs' for app 'legacy'"));
    assert!(!home.path().join(".aws").exists());
}

#[test]
fn test_unknown_app_is_not_written() {
    let home = TempDir::new().unwrap();
    write_config(&home, CONFIG);

    let output = clisso_cmd(&home)
        .args(["get", "ghost"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(!home.path().join(".aws").exists());
}

#[test]
fn test_exit_code_invalid_config() {
    let home = TempDir::new().unwrap();
    write_config(&home, "apps: [not, a, map");

    let output = clisso_cmd(&home).args(["get", "prod"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3)); // InvalidConfig
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

#[test]
fn test_exit_code_config_path_for_other_user() {
    let home = TempDir::new().unwrap();

    let output = clisso_cmd(&home)
        .args(["apps", "list", "--config", "~bob/.clisso.yaml"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3)); // InvalidConfig
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot expand user-specific home dir"));
}
