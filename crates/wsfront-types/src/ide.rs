use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_HANDOFF_LABEL: &str = "Open IDE";

/// Metadata for handing the session off to a desktop IDE.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopHandoff {
    pub action_link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_label: Option<String>,
}

impl DesktopHandoff {
    pub fn new(action_link: impl Into<String>) -> Self {
        Self {
            action_link: action_link.into(),
            action_label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }

    pub fn label(&self) -> &str {
        self.action_label.as_deref().unwrap_or(DEFAULT_HANDOFF_LABEL)
    }
}

/// Resolved value of the "ide ready" signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Readiness {
    /// Plain in-browser IDE.
    #[default]
    LocalOnly,
    DesktopHandoff(DesktopHandoff),
}

impl Readiness {
    /// A hand-off without a link cannot be opened and counts as local-only.
    pub fn from_handoff(handoff: Option<DesktopHandoff>) -> Self {
        match handoff {
            Some(handoff) if !handoff.action_link.trim().is_empty() => {
                Readiness::DesktopHandoff(handoff)
            }
            _ => Readiness::LocalOnly,
        }
    }

    pub fn desktop_handoff(&self) -> Option<&DesktopHandoff> {
        match self {
            Readiness::DesktopHandoff(handoff) if !handoff.action_link.trim().is_empty() => {
                Some(handoff)
            }
            _ => None,
        }
    }

    pub fn is_local_only(&self) -> bool {
        self.desktop_handoff().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LocalIdeState {
    #[default]
    Uninitialized,
    Starting,
    Ready,
    Failed,
}

impl LocalIdeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocalIdeState::Uninitialized => "uninitialized",
            LocalIdeState::Starting => "starting",
            LocalIdeState::Ready => "ready",
            LocalIdeState::Failed => "failed",
        }
    }
}

impl fmt::Display for LocalIdeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCause {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl FailureCause {
    /// Payload reported to analytics: message and stack joined by a newline.
    pub fn report(&self) -> String {
        match &self.stack {
            Some(stack) => format!("{}\n{}", self.message, stack),
            None => self.message.clone(),
        }
    }
}

/// Snapshot of the local IDE service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalIdeStatus {
    pub state: LocalIdeState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_cause: Option<FailureCause>,
}

impl LocalIdeStatus {
    pub fn new(state: LocalIdeState) -> Self {
        Self {
            state,
            failure_cause: None,
        }
    }

    pub fn failed(cause: FailureCause) -> Self {
        Self {
            state: LocalIdeState::Failed,
            failure_cause: Some(cause),
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        self.failure_cause
            .as_ref()
            .map(|cause| cause.message.as_str())
    }
}
