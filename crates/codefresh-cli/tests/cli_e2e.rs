use std::process::Command;

use tempfile::tempdir;

mod support;

use support::{bin_path, run_command};

#[test]
fn validate_accepts_manifest() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("main.yaml");
    std::fs::write(
        &manifest,
        r#"resources:
  - type: codefresh_project
    name: alpha
    attrs:
      name: alpha
data:
  - type: codefresh_current_account
    name: me
"#,
    )
    .unwrap();

    let mut command = Command::new(bin_path());
    command.arg("validate").arg("-f").arg(&manifest);
    let output = run_command(command, "validate");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "ok");
}

#[test]
fn validate_rejects_unknown_type() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("main.yaml");
    std::fs::write(
        &manifest,
        r#"resources:
  - type: codefresh_nope
    name: alpha
"#,
    )
    .unwrap();

    let output = Command::new(bin_path())
        .arg("validate")
        .arg("-f")
        .arg(&manifest)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("codefresh_nope"));
}

#[test]
fn plan_prints_json_without_output_file() {
    let dir = tempdir().unwrap();
    let manifest = dir.path().join("main.yaml");
    std::fs::write(
        &manifest,
        r#"resources:
  - type: codefresh_project
    name: alpha
    attrs:
      name: alpha
"#,
    )
    .unwrap();

    let mut command = Command::new(bin_path());
    command
        .arg("plan")
        .arg("-f")
        .arg(&manifest)
        .arg("--state")
        .arg(dir.path().join("state.json"))
        .arg("--api-key")
        .arg("t")
        .arg("--no-refresh");
    let output = run_command(command, "plan");
    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(plan["ops"][0]["op"], "create");
    assert_eq!(plan["ops"][0]["address"], "codefresh_project.alpha");
}
