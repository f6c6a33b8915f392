use wsfront_types::{InstancePhase, SessionInfo};

/// Instance id the heartbeat must be armed for, if any.
///
/// Only a running instance of a regular workspace is kept alive.
pub fn heartbeat_target(session: &SessionInfo) -> Option<&str> {
    if !session.is_regular() {
        return None;
    }
    session
        .latest_instance
        .as_ref()
        .filter(|instance| instance.phase == InstancePhase::Running)
        .map(|instance| instance.id.as_str())
}

/// What the scheduler has to do to satisfy "armed iff running, for the
/// current instance only".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeartbeatPlan {
    /// Already armed for the right instance, or idle and nothing to arm.
    Keep,
    Arm(String),
    /// Cancel the timer of the previous instance, then arm for the new one.
    Rearm(String),
    Disarm,
}

pub fn plan_heartbeat(armed: Option<&str>, session: &SessionInfo) -> HeartbeatPlan {
    match (armed, heartbeat_target(session)) {
        (Some(current), Some(target)) if current == target => HeartbeatPlan::Keep,
        (Some(_), Some(target)) => HeartbeatPlan::Rearm(target.to_string()),
        (None, Some(target)) => HeartbeatPlan::Arm(target.to_string()),
        (Some(_), None) => HeartbeatPlan::Disarm,
        (None, None) => HeartbeatPlan::Keep,
    }
}
