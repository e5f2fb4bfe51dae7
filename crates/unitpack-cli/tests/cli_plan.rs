use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn unitpack_cmd() -> Command {
    Command::cargo_bin("unitpack").unwrap()
}

const COMPONENT_TRACE: &str = r#"{
  "project": { "group": "com.example", "name": "app", "version": "1.0" },
  "unit": "component",
  "dependencies": [
    { "group": "com.example", "name": "shared", "version": "1.0", "packaging": "jbi-shared-library", "direct": true },
    { "group": "org.x", "name": "x", "version": "1.0", "packaging": "jar" },
    { "group": "org.y", "name": "y", "version": "2.0", "packaging": "jar", "direct": true }
  ],
  "events": [
    { "event": "include-artifact", "artifact": { "group": "com.example", "name": "app", "version": "1.0" } },
    { "event": "start-process-children", "artifact": { "group": "com.example", "name": "app", "version": "1.0" } },
    { "event": "include-artifact", "artifact": { "group": "com.example", "name": "shared", "version": "1.0" } },
    { "event": "start-process-children", "artifact": { "group": "com.example", "name": "shared", "version": "1.0" } },
    { "event": "include-artifact", "artifact": { "group": "org.x", "name": "x", "version": "1.0" } },
    { "event": "end-process-children", "artifact": { "group": "com.example", "name": "shared", "version": "1.0" } },
    { "event": "include-artifact", "artifact": { "group": "org.y", "name": "y", "version": "2.0" } },
    { "event": "end-process-children", "artifact": { "group": "com.example", "name": "app", "version": "1.0" } }
  ]
}"#;

fn write_trace(tmp: &TempDir, content: &str) -> PathBuf {
    let path = tmp.path().join("trace.json");
    fs::write(&path, content).unwrap();
    path
}

/// Point HOME at the temp dir so a developer's own config never leaks in.
fn isolated(tmp: &TempDir) -> Command {
    let mut cmd = unitpack_cmd();
    cmd.env("HOME", tmp.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_plan_lists_bundled_files() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, COMPONENT_TRACE);

    isolated(&tmp)
        .arg("plan")
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaging component"))
        .stdout(predicate::str::contains("lib/app-1.0.jar"))
        .stdout(predicate::str::contains("lib/y-2.0.jar"))
        .stdout(predicate::str::contains("lib/x-1.0.jar").not())
        .stdout(predicate::str::contains(
            "Shared libraries (supplied at runtime):",
        ));
}

#[test]
fn test_plan_json_output() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, COMPONENT_TRACE);

    isolated(&tmp)
        .args(["plan", "--json"])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"unit\": \"component\""))
        .stdout(predicate::str::contains("\"path\": \"lib/y-2.0.jar\""));
}

#[test]
fn test_plan_unit_override() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, COMPONENT_TRACE);

    isolated(&tmp)
        .args(["plan", "--unit", "shared-library"])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("Packaging shared-library"))
        .stdout(predicate::str::contains("lib/x-1.0.jar"));
}

#[test]
fn test_plan_invalid_unit_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, COMPONENT_TRACE);

    isolated(&tmp)
        .args(["plan", "--unit", "installer"])
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown unit kind"));
}

#[test]
fn test_plan_with_config_file() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, COMPONENT_TRACE);
    let config = tmp.path().join("unitpack.toml");
    fs::write(&config, "[packaging]\nlib-dir = \"jars\"\n").unwrap();

    isolated(&tmp)
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("jars/y-2.0.jar"));
}

#[test]
fn test_plan_invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, COMPONENT_TRACE);
    let config = tmp.path().join("unitpack.toml");
    fs::write(&config, "[packaging\n").unwrap();

    isolated(&tmp)
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_plan_missing_trace_fails() {
    let tmp = TempDir::new().unwrap();

    isolated(&tmp)
        .arg("plan")
        .arg(tmp.path().join("absent.json"))
        .assert()
        .failure();
}

#[test]
fn test_plan_malformed_trace_fails() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(&tmp, "{ \"project\": ");

    isolated(&tmp)
        .arg("plan")
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Trace error"));
}

#[test]
fn test_plan_unbalanced_events_fail() {
    let tmp = TempDir::new().unwrap();
    let trace = write_trace(
        &tmp,
        r#"{
  "project": { "group": "com.example", "name": "app", "version": "1.0" },
  "events": [
    { "event": "include-artifact", "artifact": { "group": "com.example", "name": "app", "version": "1.0" } },
    { "event": "start-process-children", "artifact": { "group": "com.example", "name": "app", "version": "1.0" } }
  ]
}"#,
    );

    isolated(&tmp)
        .arg("plan")
        .arg(&trace)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Graph consistency error"));
}
