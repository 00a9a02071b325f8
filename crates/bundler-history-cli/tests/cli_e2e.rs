use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use tempfile::TempDir;

const HISTORY: &str = r#"{
  "20240102_120000": {
    "rundler": {"testcase": {
      "a": {"name": "test_send"},
      "b": {"name": "test_sim", "error": {"message": "timeout"}}
    }},
    "skandha": {"testcase": {"c": {"name": "test_send"}}}
  },
  "20231231_235959": {
    "rundler": {"testcase": {
      "a": {"name": "test_send", "failure": "assert"}
    }}
  }
}"#;

fn bin() -> Command {
    let mut cmd = Command::cargo_bin("bundler-history").unwrap();
    cmd.env_remove("BUNDLER_HISTORY_URL")
        .env_remove("BUNDLER_HISTORY_LOG");
    cmd
}

#[test]
fn test_writes_one_csv_per_bundler() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.json");
    let out = dir.path().join("out");
    fs::write(&input, HISTORY).unwrap();

    bin()
        .arg("--input")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .success()
        .stderr(contains("rundler.csv"))
        .stderr(contains("Summary: 2 components, 3 tests, 1 flipped"));

    let rundler = fs::read_to_string(out.join("rundler.csv")).unwrap();
    assert_eq!(
        rundler,
        "OH NO!,Test Name,2023-12-31T23:59:59.000Z,2024-01-02T12:00:00.000Z\n\
         true,test_send,false,true\n\
         ,test_sim,false,false\n"
    );

    let skandha = fs::read_to_string(out.join("skandha.csv")).unwrap();
    assert_eq!(
        skandha,
        "OH NO!,Test Name,2024-01-02T12:00:00.000Z\n,test_send,true\n"
    );
}

#[test]
fn test_input_wins_over_url_from_env() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.json");
    fs::write(&input, HISTORY).unwrap();

    // Unreachable URL: the run only succeeds if the file is used.
    bin()
        .env("BUNDLER_HISTORY_URL", "http://127.0.0.1:1")
        .arg("--input")
        .arg(&input)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .success();

    assert!(dir.path().join("rundler.csv").exists());
}

#[test]
fn test_invalid_log_level_warns_and_continues() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.json");
    fs::write(&input, HISTORY).unwrap();

    bin()
        .arg("--input")
        .arg(&input)
        .arg("--out-dir")
        .arg(dir.path())
        .arg("--log-level")
        .arg("bundler_history_core=loud")
        .assert()
        .success()
        .stderr(contains("invalid log level 'bundler_history_core=loud'"));
}

#[test]
fn test_quiet_skips_summary() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.json");
    fs::write(&input, HISTORY).unwrap();

    bin()
        .arg("--input")
        .arg(&input)
        .arg("--out-dir")
        .arg(dir.path())
        .arg("--quiet")
        .assert()
        .success()
        .stderr(contains("Summary:").not());
}

#[test]
fn test_invalid_token_exits_nonzero_without_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.json");
    let out = dir.path().join("out");
    fs::write(
        &input,
        r#"{"20240101_000000": {"a": {"testcase": {"t": {"name": "t"}}}},
            "20241301_000000": {"b": {"testcase": {"t": {"name": "t"}}}}}"#,
    )
    .unwrap();

    bin()
        .arg("--input")
        .arg(&input)
        .arg("--out-dir")
        .arg(&out)
        .assert()
        .code(4)
        .stderr(contains("invalid timestamp token '20241301_000000'"));

    assert!(!out.exists());
}

#[test]
fn test_unparseable_input_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("history.json");
    fs::write(&input, "not json").unwrap();

    bin()
        .arg("--input")
        .arg(&input)
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .code(3)
        .stderr(contains("parse error"));
}

#[test]
fn test_missing_input_exits_with_io_code() {
    let dir = TempDir::new().unwrap();

    bin()
        .arg("--input")
        .arg(dir.path().join("missing.json"))
        .arg("--out-dir")
        .arg(dir.path())
        .assert()
        .code(5)
        .stderr(contains("io error"));
}

#[test]
fn test_rejects_unknown_version() {
    bin()
        .arg("--version")
        .arg("05")
        .assert()
        .failure()
        .stderr(contains("unsupported results version '05'"));
}

#[test]
fn test_help_mentions_version_choices() {
    bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--version"))
        .stdout(contains("06 or 07"));
}
