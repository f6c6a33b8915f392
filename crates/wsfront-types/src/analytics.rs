use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::presentation::StatusTag;
use crate::session::{SessionInfo, WorkspaceType};

pub const STATUS_RENDERED_EVENT: &str = "status_rendered";

/// Properties of a `status_rendered` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRendered {
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    pub workspace_id: String,
    #[serde(rename = "type")]
    pub workspace_type: WorkspaceType,
    pub phase: StatusTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusRendered {
    pub fn new(session_id: &str, info: &SessionInfo, phase: StatusTag) -> Self {
        Self {
            session_id: session_id.to_string(),
            instance_id: info.instance_id().map(str::to_string),
            workspace_id: info.workspace.id.clone(),
            workspace_type: info.workspace.workspace_type,
            phase,
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

/// A tracked event as handed to the analytics sink.
///
/// Properties are a flat mapping of string keys to scalar values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsEvent {
    pub event: String,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub emitted_at: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(event: impl Into<String>, properties: &impl Serialize) -> Self {
        let properties = match serde_json::to_value(properties) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        Self {
            event: event.into(),
            properties,
            emitted_at: Utc::now(),
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|value| value.as_str())
    }

    pub fn phase(&self) -> Option<&str> {
        self.property("phase")
    }
}
