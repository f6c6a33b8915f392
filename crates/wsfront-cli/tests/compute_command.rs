//! Compute Command Tests

use anyhow::Result;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wsfront_testing::cli::CliWorld;

#[test]
fn test_compute_plain() -> Result<()> {
    let world = CliWorld::new()?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .args(["compute", "--phases", "pending,running", "--ide", "ready"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("pending       loading"))
        .stdout(predicate::str::contains("running       local_ide"));
    Ok(())
}

#[test]
fn test_compute_json_reload() -> Result<()> {
    let world = CliWorld::new()?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world.configure_command(&mut cmd).args([
        "--format",
        "json",
        "compute",
        "--phases",
        "running,stopped,preparing,running",
    ]);
    let output = cmd.output()?;
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let reloads: Vec<bool> = steps
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["must_reload"].as_bool().unwrap())
        .collect();
    assert_eq!(reloads, vec![false, false, true, true]);
    Ok(())
}

#[test]
fn test_compute_rejects_unknown_phase() -> Result<()> {
    let world = CliWorld::new()?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .args(["compute", "--phases", "running,sleeping"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown instance phase: sleeping"));
    Ok(())
}
