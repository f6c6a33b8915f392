//! Simulate Command Tests
//!
//! Verifies that `wsfront simulate`:
//! - Prints surface swaps, analytics events and heartbeats in order
//! - Opens the desktop hand-off link and honours "open web IDE"
//! - Reloads after a stop/restart cycle
//! - Rejects malformed scenario files

use anyhow::Result;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wsfront_testing::cli::CliWorld;
use wsfront_testing::fixtures;

#[test]
fn test_simulate_local_ide_plain() -> Result<()> {
    let world = CliWorld::new()?;
    let scenario = world.write_scenario("local.toml", fixtures::LOCAL_IDE_SCENARIO)?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .arg("simulate")
        .arg(&scenario)
        .args(["--session-id", "sim-session"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"simulated workspace\""))
        .stdout(predicate::str::contains("loading -> local_ide"))
        .stdout(predicate::str::contains("status_rendered ide-ready instance=i-1"))
        .stdout(predicate::str::contains("heartbeat i-1"))
        .stdout(predicate::str::contains("ide starts:   1"));
    Ok(())
}

#[test]
fn test_simulate_json_lines() -> Result<()> {
    let world = CliWorld::new()?;
    let scenario = world.write_scenario("local.toml", fixtures::LOCAL_IDE_SCENARIO)?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .args(["--format", "json", "simulate"])
        .arg(&scenario);
    let output = cmd.output()?;
    assert!(output.status.success());

    let lines: Vec<serde_json::Value> = String::from_utf8(output.stdout)?
        .lines()
        .map(serde_json::from_str)
        .collect::<Result<_, _>>()?;

    assert_eq!(lines[0]["kind"], "concealed");
    let ready = lines
        .iter()
        .filter(|l| l["kind"] == "event" && l["phase"] == "ide-ready")
        .count();
    assert_eq!(ready, 1);

    let summary = lines.last().unwrap();
    assert_eq!(summary["kind"], "summary");
    assert_eq!(summary["presentation"], "shutdown");
    assert_eq!(summary["start_calls"], 1);
    assert_eq!(summary["connections_opened"], 1);
    Ok(())
}

#[test]
fn test_simulate_handoff_then_web_ide() -> Result<()> {
    let world = CliWorld::new()?;
    let scenario = world.write_scenario("handoff.toml", fixtures::HANDOFF_SCENARIO)?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .arg("simulate")
        .arg(&scenario);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("loading -> desktop_handoff"))
        .stdout(predicate::str::contains(
            "open      desktop-ide://open?workspace=ws-sim",
        ))
        .stdout(predicate::str::contains("-> local_ide"))
        .stdout(predicate::str::contains("ide starts:   1"));
    Ok(())
}

#[test]
fn test_simulate_restart_reloads() -> Result<()> {
    let world = CliWorld::new()?.with_config("restart_url = \"/restart/here\"\n")?;
    let scenario = world.write_scenario("restart.toml", fixtures::RESTART_SCENARIO)?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .arg("simulate")
        .arg(&scenario);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("navigate  /restart/here"))
        .stdout(predicate::str::contains("status_rendered reload"))
        .stdout(predicate::str::contains("status_rendered window-unload"))
        .stdout(predicate::str::contains("presentation: reloaded"));
    Ok(())
}

#[test]
fn test_simulate_invalid_scenario() -> Result<()> {
    let world = CliWorld::new()?;
    let scenario = world.write_scenario("bad.toml", "[readiness]\nkind = \"desktop_handoff\"\n")?;

    let mut cmd = cargo_bin_cmd!("wsfront");
    world
        .configure_command(&mut cmd)
        .arg("simulate")
        .arg(&scenario);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario"))
        .stderr(predicate::str::contains("action_link"));
    Ok(())
}
