//! Smoke tests -- verify the binary runs, parses flags, and sets the exit code.

mod common;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    Command::cargo_bin("prodcheck")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Production smoke-test harness"))
        .stdout(predicates::str::contains("--backend"))
        .stdout(predicates::str::contains("--frontend"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("prodcheck")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("prodcheck"));
}

#[test]
fn test_missing_config_file_exits_nonzero() {
    let dir = tempfile::TempDir::new().unwrap();
    Command::cargo_bin("prodcheck")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read config file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreadable_env_config_warns_and_runs_defaults() {
    let url = common::closed_url().await;
    let dir = tempfile::TempDir::new().unwrap();
    let report_path = dir.path().join("report.json");

    let mut cmd = Command::cargo_bin("prodcheck").unwrap();
    cmd.env("PRODCHECK_CONFIG", dir.path().join("absent.toml"))
        .env_remove("RUST_LOG")
        .args(["--backend", &url, "--frontend", &url])
        .arg("--report")
        .arg(&report_path);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .code(1)
        .stderr(predicates::str::contains(
            "PRODCHECK_CONFIG set but file could not be loaded",
        ))
        .stderr(predicates::str::contains("failed to read config file"));
    assert!(report_path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_config_is_loaded() {
    let url = common::closed_url().await;
    let dir = tempfile::TempDir::new().unwrap();
    let report_path = dir.path().join("from-env.json");
    std::fs::write(
        dir.path().join("prodcheck.toml"),
        format!(
            "[run]\npause_ms = 0\nreport_path = {:?}\n",
            report_path.display().to_string()
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("prodcheck").unwrap();
    cmd.env("PRODCHECK_CONFIG", dir.path().join("prodcheck.toml"))
        .env_remove("RUST_LOG")
        .args(["--backend", &url, "--frontend", &url]);

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .code(1)
        .stderr(predicates::str::contains("loaded harness configuration"))
        .stderr(predicates::str::contains("could not be loaded").not());
    assert!(report_path.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failing_run_exits_one_and_writes_report() {
    let url = common::closed_url().await;
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("prodcheck.toml");
    std::fs::write(&config_path, "[run]\npause_ms = 0\n").unwrap();
    let report_path = dir.path().join("report.json");

    let mut cmd = Command::cargo_bin("prodcheck").unwrap();
    cmd.args(["--backend", &url, "--frontend", &url])
        .arg("--config")
        .arg(&config_path)
        .arg("--report")
        .arg(&report_path)
        .arg("--json");

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .code(1)
        .stdout(predicates::str::contains("FAILED TESTS"))
        .stdout(predicates::str::contains("\"success_rate\": 0.0"));

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(value["summary"]["total"], 9);
    assert_eq!(value["summary"]["passed"], 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_passing_run_exits_zero() {
    let service = common::spawn(common::Behaviour {
        throttle_on: vec![5],
        ..common::Behaviour::default()
    })
    .await;
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("prodcheck.toml");
    std::fs::write(&config_path, "[run]\npause_ms = 0\n").unwrap();

    let mut cmd = Command::cargo_bin("prodcheck").unwrap();
    cmd.args(["--backend", &service.url, "--frontend", &service.url])
        .arg("--config")
        .arg(&config_path)
        .arg("--report")
        .arg(dir.path().join("report.json"));

    let assert = tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap();
    assert
        .success()
        .stdout(predicates::str::contains("All tests passed"));
}
