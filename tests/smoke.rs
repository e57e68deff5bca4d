//! Smoke tests -- verify the binary runs and key subcommands work.

use assert_cmd::Command;
use predicates::prelude::*;

fn bandstat() -> Command {
    let mut cmd = Command::cargo_bin("bandstat").unwrap();
    // Keep a developer's local config from leaking into the tests.
    cmd.env_remove("BANDSTAT_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    bandstat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Per-band statistics"));
}

#[test]
fn test_cli_version() {
    bandstat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("bandstat"));
}

#[test]
fn test_run_default_block() {
    bandstat()
        .args(["run", "--backend", "scalar"])
        .assert()
        .success()
        .stdout(predicates::str::contains("SumOfSquares"))
        .stdout(predicates::str::contains("4 bands x 100 pixels via scalar"));
}

#[test]
fn test_run_centroid_only() {
    bandstat()
        .args(["run", "--centroid-only", "--bands", "3", "--fill", "9"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Centroid[2] = 9"));
}

#[test]
fn test_run_json() {
    let output = bandstat()
        .args(["run", "--json", "--bands", "2", "--block-size", "10"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["statistics"]["bands"].as_array().unwrap().len(), 2);
    assert_eq!(value["statistics"]["bands"][0]["sum"], 10);
}

#[test]
fn test_run_zero_block_size_fails() {
    bandstat()
        .args(["run", "--block-size", "0"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("block_size"));
}

#[test]
fn test_backends_subcommand() {
    bandstat()
        .arg("backends")
        .assert()
        .success()
        .stdout(predicates::str::contains("parallel"))
        .stdout(predicates::str::contains("scalar"));
}

#[test]
fn test_config_file_is_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bandstat.toml");
    std::fs::write(&path, "[block]\nbands = 5\nblock_size = 20\nfill = 3\n").unwrap();
    bandstat()
        .arg("--config")
        .arg(&path)
        .args(["run", "--centroid-only"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Centroid[4] = 3"));
}

#[test]
fn test_bad_env_config_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[block]\nbands = 8\nblock_size = 0\n").unwrap();
    bandstat()
        .env("BANDSTAT_CONFIG", &path)
        .args(["run", "--centroid-only"])
        .assert()
        .failure()
        .stdout(predicates::str::contains("Centroid").not())
        .stderr(predicates::str::contains("BANDSTAT_CONFIG"))
        .stderr(predicates::str::contains("block_size"));
}
