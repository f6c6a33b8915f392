pub mod bootstrap;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod heartbeat;
pub mod lifecycle;
pub mod memory;
pub mod signal;
pub mod supervisor;

pub use bootstrap::{Collaborators, Frontend, FrontendExit, FrontendHandle};
pub use collaborators::{
    AnalyticsSink, Connection, HeartbeatSink, IdeReadinessSource, InstanceInfoSource,
    LocalIdeService, Navigator, Subscription, SurfaceRenderer, WorkspaceConnector,
};
pub use config::{AnalyticsConfig, FrontendConfig, HeartbeatConfig};
pub use error::{Error, Result};
pub use heartbeat::{ActivityClock, HeartbeatScheduler};
pub use lifecycle::{IdeLifecycle, IdeStarts, LifecycleOutcome};
pub use memory::{
    MemoryConnector, MemoryInstanceSource, MemoryLocalIde, MemoryReadiness, StartPlan,
};
pub use signal::OnceSignal;
pub use supervisor::{Command, Input, PageOutputs, PresentationSupervisor, SupervisorExit};
