// Engine module - pure decision logic for the frontend supervisor.
// Sits between the session/readiness types and the runtime that applies effects.
// Nothing here performs I/O; every side effect is returned as data.

pub mod heartbeat;
pub mod latches;
pub mod presentation;
pub mod status;

pub use heartbeat::{HeartbeatPlan, heartbeat_target, plan_heartbeat};
pub use latches::SessionLatches;
pub use presentation::{Effect, Transition, compute};
pub use status::{StatusTracker, status_tag};
