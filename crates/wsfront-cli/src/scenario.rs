//! Scripted sessions for `wsfront simulate`.
//!
//! A scenario is a TOML file describing the workspace, how IDE readiness
//! resolves, how the local IDE boots, and a timeline of phase changes and
//! user actions separated by delays.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use wsfront_runtime::StartPlan;
use wsfront_types::{
    DesktopHandoff, IdeStartError, InstancePhase, Readiness, SessionInfo, WorkspaceType,
};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default = "default_workspace_id")]
    pub workspace_id: String,
    #[serde(default)]
    pub workspace_type: WorkspaceType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub readiness: ReadinessScript,
    #[serde(default)]
    pub ide: IdeScript,
    #[serde(default)]
    pub timeline: Vec<Step>,
    /// Quiet period after the last step before the simulation stops.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
}

fn default_workspace_id() -> String {
    "ws-sim".to_string()
}

fn default_settle_ms() -> u64 {
    200
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessKind {
    #[default]
    LocalOnly,
    DesktopHandoff,
    /// Never resolves; only the readiness timeout ends the wait.
    Never,
    /// Transport failure.
    Fail,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessScript {
    #[serde(default)]
    pub kind: ReadinessKind,
    pub action_link: Option<String>,
    pub action_label: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub after_ms: u64,
}

impl ReadinessScript {
    pub fn after(&self) -> Duration {
        Duration::from_millis(self.after_ms)
    }

    /// Resolved readiness, or `None` for the non-resolving kinds.
    pub fn readiness(&self) -> Option<Readiness> {
        match self.kind {
            ReadinessKind::LocalOnly => Some(Readiness::LocalOnly),
            ReadinessKind::DesktopHandoff => {
                let link = self.action_link.clone().unwrap_or_default();
                let mut handoff = DesktopHandoff::new(link);
                if let Some(label) = &self.action_label {
                    handoff = handoff.with_label(label.clone());
                }
                Some(Readiness::from_handoff(Some(handoff)))
            }
            ReadinessKind::Never | ReadinessKind::Fail => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdeOutcome {
    #[default]
    Ready,
    Fail,
    Hang,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdeScript {
    #[serde(default)]
    pub outcome: IdeOutcome,
    #[serde(default)]
    pub boot_ms: u64,
    pub message: Option<String>,
    pub stack: Option<String>,
}

impl IdeScript {
    pub fn boot_time(&self) -> Duration {
        Duration::from_millis(self.boot_ms)
    }

    pub fn plan(&self) -> StartPlan {
        match self.outcome {
            IdeOutcome::Ready => StartPlan::Succeed,
            IdeOutcome::Hang => StartPlan::Hang,
            IdeOutcome::Fail => {
                let message = self
                    .message
                    .clone()
                    .unwrap_or_else(|| "local IDE failed to start".to_string());
                let mut err = IdeStartError::new(message);
                if let Some(stack) = &self.stack {
                    err = err.with_stack(stack.clone());
                }
                StartPlan::Fail(err)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    OpenWebIde,
    Activity,
    Unload,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    #[serde(default)]
    pub after_ms: u64,
    pub phase: Option<InstancePhase>,
    /// Instance the phase applies to; defaults to the current one.
    pub instance: Option<String>,
    pub action: Option<Action>,
}

impl Step {
    pub fn after(&self) -> Duration {
        Duration::from_millis(self.after_ms)
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.workspace_id.trim().is_empty() {
            anyhow::bail!("workspace_id must not be empty");
        }
        if self.readiness.kind == ReadinessKind::DesktopHandoff
            && self
                .readiness
                .action_link
                .as_deref()
                .is_none_or(|link| link.is_empty())
        {
            anyhow::bail!("readiness kind 'desktop_handoff' requires an action_link");
        }
        for (i, step) in self.timeline.iter().enumerate() {
            if step.phase.is_none() && step.action.is_none() {
                anyhow::bail!("timeline step {} has neither a phase nor an action", i);
            }
        }
        Ok(())
    }

    /// Snapshot before the first timeline step: no instance yet.
    pub fn initial_session(&self) -> SessionInfo {
        SessionInfo::new(self.workspace_id.clone(), self.workspace_type)
            .with_description(self.description.clone())
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scenario_defaults() {
        let scenario = Scenario::parse("[[timeline]]\nphase = \"running\"\n").unwrap();

        assert_eq!(scenario.workspace_id, "ws-sim");
        assert_eq!(scenario.workspace_type, WorkspaceType::Regular);
        assert_eq!(scenario.readiness.readiness(), Some(Readiness::LocalOnly));
        assert_eq!(scenario.ide.plan(), StartPlan::Succeed);
        assert_eq!(scenario.timeline[0].phase, Some(InstancePhase::Running));
        assert_eq!(scenario.settle(), Duration::from_millis(200));
    }

    #[test]
    fn test_handoff_requires_link() {
        let err = Scenario::parse("[readiness]\nkind = \"desktop_handoff\"\n").unwrap_err();
        assert!(err.to_string().contains("action_link"));
    }

    #[test]
    fn test_step_needs_phase_or_action() {
        let err = Scenario::parse("[[timeline]]\nafter_ms = 10\n").unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[test]
    fn test_ide_failure_plan_carries_stack() {
        let scenario = Scenario::parse(
            "[ide]\noutcome = \"fail\"\nmessage = \"no wasm\"\nstack = \"at boot\"\n",
        )
        .unwrap();

        assert_eq!(
            scenario.ide.plan(),
            StartPlan::Fail(IdeStartError::new("no wasm").with_stack("at boot"))
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Scenario::parse("colour = \"blue\"\n").is_err());
    }

    #[test]
    fn test_action_steps_parse() {
        let scenario = Scenario::parse(
            "[[timeline]]\nphase = \"running\"\ninstance = \"i-9\"\n\n[[timeline]]\nafter_ms = 50\naction = \"open_web_ide\"\n",
        )
        .unwrap();

        assert_eq!(scenario.timeline[0].instance.as_deref(), Some("i-9"));
        assert_eq!(scenario.timeline[1].action, Some(Action::OpenWebIde));
        assert_eq!(scenario.timeline[1].after(), Duration::from_millis(50));
    }
}
