//! CLI tests for `profile-split`.
//!
//! Spawns the binary in a scratch directory and checks exit codes and the
//! resulting file tree.

use std::fs;
use std::process::Command;

use profile_split::exit_codes;
use profile_split::test_support::{ProfileWorkspace, entry, sample_profile};
use serde_json::{Value, json};

fn profile_split() -> Command {
    Command::new(env!("CARGO_BIN_EXE_profile-split"))
}

#[test]
fn split_writes_tree_and_exits_ok() {
    let workspace = ProfileWorkspace::new().expect("workspace");
    workspace
        .write_profile("Admin", &sample_profile())
        .expect("write profile");

    let status = profile_split()
        .current_dir(workspace.path())
        .args(["split", "Admin"])
        .status()
        .expect("profile-split split");
    assert_eq!(status.code(), Some(exit_codes::OK));

    let root = workspace.path().join("profile/Admin");
    let contact: Value = serde_json::from_str(
        &fs::read_to_string(root.join("objectPermissions/Contact/Contact.json")).expect("read"),
    )
    .expect("json");
    assert_eq!(contact, json!({"allowRead": true, "object": "Contact"}));
    assert!(root.join("objectPermissions/Contact/fieldPermissions").is_dir());
    assert!(
        fs::read_dir(root.join("objectPermissions/Contact/fieldPermissions"))
            .expect("read dir")
            .next()
            .is_none()
    );
}

#[test]
fn malformed_entry_exits_with_malformed_input_code() {
    let workspace = ProfileWorkspace::new().expect("workspace");
    let mut profile = sample_profile();
    profile.field_permissions = vec![entry(json!({"field": "NoSeparator", "readable": true}))];
    workspace.write_profile("Admin", &profile).expect("write profile");

    let output = profile_split()
        .current_dir(workspace.path())
        .args(["split", "Admin"])
        .output()
        .expect("profile-split split");
    assert_eq!(output.status.code(), Some(exit_codes::MALFORMED_INPUT));
    assert!(String::from_utf8_lossy(&output.stderr).contains("NoSeparator"));
}

#[test]
fn missing_source_exits_with_failure_code() {
    let workspace = ProfileWorkspace::new().expect("workspace");
    let status = profile_split()
        .current_dir(workspace.path())
        .args(["split", "Ghost"])
        .status()
        .expect("profile-split split");
    assert_eq!(status.code(), Some(exit_codes::FAILED));
}

#[test]
fn dry_run_lists_plan_without_writing() {
    let workspace = ProfileWorkspace::new().expect("workspace");
    workspace
        .write_profile("Admin", &sample_profile())
        .expect("write profile");

    let output = profile_split()
        .current_dir(workspace.path())
        .args(["split", "Admin", "--dry-run"])
        .output()
        .expect("profile-split split --dry-run");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.lines().next().expect("first line");
    assert_eq!(first, "unit Admin.profile-meta.xml");
    assert!(stdout.contains("folder objectPermissions/Account/fieldPermissions"));
    assert!(!workspace.path().join("profile").exists());
}

#[test]
fn summary_prints_application_listing() {
    let workspace = ProfileWorkspace::new().expect("workspace");
    workspace
        .write_profile("Admin", &sample_profile())
        .expect("write profile");

    let output = profile_split()
        .current_dir(workspace.path())
        .args(["summary", "Admin"])
        .output()
        .expect("profile-split summary");
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Sales\n    custom: false\n"));
    assert!(stdout.contains("InvoiceService\n    enabled: true\n"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let workspace = ProfileWorkspace::new().expect("workspace");
    let first = profile_split()
        .current_dir(workspace.path())
        .arg("init")
        .status()
        .expect("init");
    assert_eq!(first.code(), Some(exit_codes::OK));
    assert!(workspace.path().join("profile-split.toml").is_file());

    let second = profile_split()
        .current_dir(workspace.path())
        .arg("init")
        .status()
        .expect("init again");
    assert_eq!(second.code(), Some(exit_codes::FAILED));

    let forced = profile_split()
        .current_dir(workspace.path())
        .args(["init", "--force"])
        .status()
        .expect("init --force");
    assert_eq!(forced.code(), Some(exit_codes::OK));
}
