//! Integration tests for the envsnag binary
//!
//! Only local sources (`file://`, `manifest://`) are used so the tests never
//! reach AWS or Vault.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const TRICKY: &str = "@^*309_!~`:*/\\{}%()>$t'";

fn envsnag(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("envsnag"));
    cmd.current_dir(dir.path())
        .env_remove("ENVSNAG_SOURCE")
        .env_remove("ENVSNAG_LOG")
        .env_remove("RUST_LOG");
    cmd
}

fn fixtures() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("base.env"),
        "# shared defaults\nHOST=db.internal\nPORT=5432\n",
    )
    .unwrap();
    fs::write(dir.path().join("override.env"), "port=6543\nMODE=prod\n").unwrap();
    fs::write(
        dir.path().join("deploy.yaml"),
        "sources:\n  - file://base.env\nenv:\n  REPLICAS: 3\n  ENABLED: true\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_version_banner() {
    let dir = TempDir::new().unwrap();
    envsnag(&dir)
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("envsnag version "))
        .stdout(predicate::str::contains("aws sdk: "))
        .stdout(predicate::str::contains("vault client: vaultrs "))
        .stdout(predicate::str::contains("rust: "));
}

#[test]
fn test_invalid_format_exits_two() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["-o", "invalid_format", "file://base.env"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No formatter found for 'invalid_format'"));
}

#[test]
fn test_env_output_later_source_wins() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["file://base.env", "file://override.env"])
        .assert()
        .success()
        .stdout("export HOST=db.internal\nexport PORT=6543\nexport MODE=prod\n");
}

#[test]
fn test_json_output_is_flat() {
    let dir = fixtures();
    let output = envsnag(&dir)
        .args(["-output=json", "manifest://deploy.yaml"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let object = value.as_object().unwrap();
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["HOST", "PORT", "REPLICAS", "ENABLED"]);
    assert!(object.values().all(serde_json::Value::is_string));
    assert_eq!(object["ENABLED"], "1");
}

#[test]
fn test_envfile_output() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["-o", "envfile", "file://override.env"])
        .assert()
        .success()
        .stdout("PORT=6543\nMODE=prod\n");
}

#[test]
fn test_show_summary_goes_to_stderr() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["-show-summary", "file://base.env", "file://override.env"])
        .assert()
        .success()
        .stdout(predicate::str::contains("export MODE=prod"))
        .stdout(predicate::str::contains("summary").not())
        .stderr(predicate::str::contains("envsnag summary:"))
        .stderr(predicate::str::contains(
            "\tfile://base.env: 2 keys (HOST, -PORT)",
        ))
        .stderr(predicate::str::contains(
            "\tfile://override.env: 2 keys (+PORT, MODE)",
        ));
}

#[test]
fn test_strict_failure() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["-e", "file://base.env", "file://missing.env"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Error processing source: file://missing.env: ",
        ));
}

#[test]
fn test_lenient_failure_continues() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["file://missing.env", "file://override.env"])
        .assert()
        .success()
        .stdout("export PORT=6543\nexport MODE=prod\n")
        .stderr(predicate::str::contains(
            "Error processing source: file://missing.env: ",
        ));
}

#[test]
fn test_malformed_source() {
    let dir = fixtures();
    envsnag(&dir)
        .args(["file://base.env", "ftp://nowhere"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error parsing sources: "));
}

#[test]
fn test_sources_from_environment() {
    let dir = fixtures();
    envsnag(&dir)
        .env("ENVSNAG_SOURCE", "file://base.env|file://override.env")
        .args(["-o", "envfile"])
        .assert()
        .success()
        .stdout("HOST=db.internal\nPORT=6543\nMODE=prod\n");
}

#[test]
fn test_no_sources_is_empty_success() {
    let dir = TempDir::new().unwrap();
    envsnag(&dir).assert().success().stdout(predicate::str::is_empty());
}

#[cfg(unix)]
#[test]
fn test_env_output_round_trips_through_sh() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tricky.yaml"),
        format!(
            "env:\n  TRICKY: {}\n",
            serde_json::to_string(TRICKY).unwrap()
        ),
    )
    .unwrap();

    let output = envsnag(&dir)
        .arg("manifest://tricky.yaml")
        .output()
        .unwrap();
    assert!(output.status.success());

    let script = format!(
        "{}printf '%s' \"$TRICKY\"",
        String::from_utf8(output.stdout).unwrap()
    );
    let evaluated = std::process::Command::new("sh")
        .arg("-c")
        .arg(script)
        .output()
        .unwrap();
    assert!(evaluated.status.success());
    assert_eq!(String::from_utf8(evaluated.stdout).unwrap(), TRICKY);
}
