//! Session snapshots and scenario files used across test suites.

use wsfront_types::{DesktopHandoff, InstancePhase, Readiness, SessionInfo, WorkspaceType};

pub const WORKSPACE_ID: &str = "ws-fixture";
pub const DESCRIPTION: &str = "fixture workspace";
pub const HANDOFF_LINK: &str = "desktop-ide://open?workspace=ws-fixture";

/// Regular workspace without an instance yet.
pub fn regular_session() -> SessionInfo {
    SessionInfo::new(WORKSPACE_ID, WorkspaceType::Regular).with_description(DESCRIPTION)
}

/// Regular workspace whose latest instance is `instance_id` in `phase`.
pub fn session_in(instance_id: &str, phase: InstancePhase) -> SessionInfo {
    regular_session().with_instance(instance_id, phase)
}

pub fn desktop_handoff() -> Readiness {
    Readiness::DesktopHandoff(DesktopHandoff::new(HANDOFF_LINK))
}

/// Scenario replaying pending, creating and running with a local IDE.
pub const LOCAL_IDE_SCENARIO: &str = r#"
workspace_id = "ws-sim"
description = "simulated workspace"
settle_ms = 400

[readiness]
kind = "local_only"

[ide]
outcome = "ready"
boot_ms = 50

[[timeline]]
phase = "pending"

[[timeline]]
after_ms = 50
phase = "creating"

[[timeline]]
after_ms = 50
phase = "running"
"#;

/// Scenario offering a desktop hand-off and then clicking "open web IDE".
pub const HANDOFF_SCENARIO: &str = r#"
workspace_id = "ws-sim"
settle_ms = 300

[readiness]
kind = "desktop_handoff"
action_link = "desktop-ide://open?workspace=ws-sim"

[[timeline]]
phase = "running"

[[timeline]]
after_ms = 100
action = "open_web_ide"
"#;

/// Scenario stopping and restarting the instance, which forces a reload.
pub const RESTART_SCENARIO: &str = r#"
[[timeline]]
phase = "running"

[[timeline]]
after_ms = 50
phase = "stopped"

[[timeline]]
after_ms = 50
phase = "preparing"
"#;
