use crate::console::use_color;
use crate::types::OutputFormat;
use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use wsfront_engine::{Effect, SessionLatches, compute};
use wsfront_types::{
    DesktopHandoff, InstancePhase, LocalIdeState, Readiness, Surface, WorkspaceType,
};

pub struct ComputeArgs {
    pub phases: Vec<InstancePhase>,
    pub handoff: Option<String>,
    pub readiness_pending: bool,
    pub ide: LocalIdeState,
    pub prefer_local: bool,
    pub workspace_type: WorkspaceType,
}

#[derive(Debug, Serialize)]
struct StepView {
    phase: InstancePhase,
    /// `None` when the workspace is not regular.
    surface: Option<Surface>,
    must_reload: bool,
    opens_link: Option<String>,
}

pub fn handle(args: ComputeArgs, format: OutputFormat) -> Result<()> {
    let steps = evaluate(&args);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&steps)?),
        OutputFormat::Plain => {
            let color = use_color();
            for step in &steps {
                println!("{}", plain_step(step, color));
            }
        }
    }
    Ok(())
}

fn evaluate(args: &ComputeArgs) -> Vec<StepView> {
    let readiness = match (&args.handoff, args.readiness_pending) {
        (_, true) => None,
        (Some(link), false) => Some(Readiness::from_handoff(Some(DesktopHandoff::new(
            link.clone(),
        )))),
        (None, false) => Some(Readiness::LocalOnly),
    };

    let mut latches = SessionLatches::new();
    if args.prefer_local {
        latches.choose_local();
    }

    args.phases
        .iter()
        .map(|&phase| {
            let session = wsfront_types::SessionInfo::new("ws-compute", args.workspace_type)
                .with_instance("i-compute", phase);
            match compute(&session, readiness.as_ref(), args.ide, &mut latches) {
                Some(transition) => StepView {
                    phase,
                    surface: Some(transition.presentation.surface),
                    must_reload: transition.presentation.must_reload,
                    opens_link: transition.effects.into_iter().find_map(|effect| match effect {
                        Effect::CreateDesktopPanel(handoff) => Some(handoff.action_link),
                    }),
                },
                None => StepView {
                    phase,
                    surface: None,
                    must_reload: false,
                    opens_link: None,
                },
            }
        })
        .collect()
}

fn plain_step(step: &StepView, color: bool) -> String {
    let surface = step
        .surface
        .map(|s| s.to_string())
        .unwrap_or_else(|| "(inert)".to_string());
    let mut line = if color {
        format!("{:<13} {}", step.phase.as_str(), surface.bold())
    } else {
        format!("{:<13} {}", step.phase.as_str(), surface)
    };
    if step.must_reload {
        if color {
            line.push_str(&format!(" {}", "reload".red().bold()));
        } else {
            line.push_str(" reload");
        }
    }
    if let Some(link) = &step.opens_link {
        if color {
            line.push_str(&format!(" open {}", link.yellow()));
        } else {
            line.push_str(&format!(" open {}", link));
        }
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(phases: &[InstancePhase]) -> ComputeArgs {
        ComputeArgs {
            phases: phases.to_vec(),
            handoff: None,
            readiness_pending: false,
            ide: LocalIdeState::Ready,
            prefer_local: false,
            workspace_type: WorkspaceType::Regular,
        }
    }

    #[test]
    fn test_reload_after_stop_and_restart() {
        let steps = evaluate(&args(&[
            InstancePhase::Running,
            InstancePhase::Stopped,
            InstancePhase::Preparing,
        ]));

        let surfaces: Vec<_> = steps.iter().map(|s| s.surface).collect();
        assert_eq!(
            surfaces,
            vec![
                Some(Surface::LocalIde),
                Some(Surface::Loading),
                Some(Surface::Loading)
            ]
        );
        assert!(!steps[1].must_reload);
        assert!(steps[2].must_reload);
    }

    #[test]
    fn test_handoff_link_opens_once() {
        let mut args = args(&[InstancePhase::Running, InstancePhase::Running]);
        args.handoff = Some("x://open".to_string());

        let steps = evaluate(&args);
        assert_eq!(steps[0].opens_link.as_deref(), Some("x://open"));
        assert_eq!(steps[1].opens_link, None);
        assert_eq!(steps[1].surface, Some(Surface::DesktopHandoff));
    }

    #[test]
    fn test_plain_step_without_color() {
        let step = StepView {
            phase: InstancePhase::Preparing,
            surface: Some(Surface::Loading),
            must_reload: true,
            opens_link: None,
        };
        assert_eq!(plain_step(&step, false), "preparing     loading reload");
    }

    #[test]
    fn test_non_regular_is_inert() {
        let mut args = args(&[InstancePhase::Running]);
        args.workspace_type = WorkspaceType::Prebuild;

        let steps = evaluate(&args);
        assert_eq!(steps[0].surface, None);
    }
}
