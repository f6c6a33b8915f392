use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a remote workspace instance.
///
/// Phases are delivered, not polled: a subscriber may see values skipped or
/// repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstancePhase {
    #[default]
    Unknown,
    Preparing,
    Pending,
    Creating,
    Initializing,
    Running,
    Interrupted,
    Stopping,
    Stopped,
}

impl InstancePhase {
    pub const ALL: [InstancePhase; 9] = [
        InstancePhase::Unknown,
        InstancePhase::Preparing,
        InstancePhase::Pending,
        InstancePhase::Creating,
        InstancePhase::Initializing,
        InstancePhase::Running,
        InstancePhase::Interrupted,
        InstancePhase::Stopping,
        InstancePhase::Stopped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstancePhase::Unknown => "unknown",
            InstancePhase::Preparing => "preparing",
            InstancePhase::Pending => "pending",
            InstancePhase::Creating => "creating",
            InstancePhase::Initializing => "initializing",
            InstancePhase::Running => "running",
            InstancePhase::Interrupted => "interrupted",
            InstancePhase::Stopping => "stopping",
            InstancePhase::Stopped => "stopped",
        }
    }

    /// Phases a restarted instance passes through before it runs again.
    pub fn is_starting(&self) -> bool {
        matches!(
            self,
            InstancePhase::Preparing
                | InstancePhase::Pending
                | InstancePhase::Creating
                | InstancePhase::Initializing
        )
    }

    pub fn is_shutting_down(&self) -> bool {
        matches!(self, InstancePhase::Stopping | InstancePhase::Stopped)
    }
}

impl fmt::Display for InstancePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InstancePhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InstancePhase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| format!("unknown instance phase: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceType {
    #[default]
    Regular,
    Prebuild,
    Probe,
}

impl WorkspaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceType::Regular => "regular",
            WorkspaceType::Prebuild => "prebuild",
            WorkspaceType::Probe => "probe",
        }
    }
}

impl fmt::Display for WorkspaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub id: String,
    #[serde(rename = "type", default)]
    pub workspace_type: WorkspaceType,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceInfo {
    pub id: String,
    pub phase: InstancePhase,
}

/// Most recent snapshot of a remote session, as published by the info source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub workspace: WorkspaceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_instance: Option<InstanceInfo>,
}

impl SessionInfo {
    pub fn new(workspace_id: impl Into<String>, workspace_type: WorkspaceType) -> Self {
        Self {
            workspace: WorkspaceInfo {
                id: workspace_id.into(),
                workspace_type,
                description: String::new(),
            },
            latest_instance: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.workspace.description = description.into();
        self
    }

    pub fn with_instance(mut self, instance_id: impl Into<String>, phase: InstancePhase) -> Self {
        self.latest_instance = Some(InstanceInfo {
            id: instance_id.into(),
            phase,
        });
        self
    }

    pub fn is_regular(&self) -> bool {
        self.workspace.workspace_type == WorkspaceType::Regular
    }

    pub fn phase(&self) -> Option<InstancePhase> {
        self.latest_instance.as_ref().map(|instance| instance.phase)
    }

    pub fn instance_id(&self) -> Option<&str> {
        self.latest_instance
            .as_ref()
            .map(|instance| instance.id.as_str())
    }

    pub fn is_phase(&self, phase: InstancePhase) -> bool {
        self.phase() == Some(phase)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.phase().is_some_and(|phase| phase.is_shutting_down())
    }
}
