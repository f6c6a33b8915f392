use wsfront_types::{
    DesktopHandoff, InstancePhase, LocalIdeState, Presentation, Readiness, SessionInfo, Surface,
};

use crate::latches::SessionLatches;

/// Side effect requested by a recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// First entry into the desktop hand-off: build the panel and open the link.
    CreateDesktopPanel(DesktopHandoff),
}

/// Result of one recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub presentation: Presentation,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn plain(presentation: Presentation) -> Self {
        Self {
            presentation,
            effects: Vec::new(),
        }
    }
}

/// Derive the presentation for the current instant.
///
/// `readiness` is `None` until the "ide ready" signal has resolved. Returns
/// `None` for non-regular workspaces, which never run an IDE.
///
/// The latches are the only state carried between calls; `compute` raises
/// them but never lowers them.
pub fn compute(
    session: &SessionInfo,
    readiness: Option<&Readiness>,
    ide_state: LocalIdeState,
    latches: &mut SessionLatches,
) -> Option<Transition> {
    if !session.is_regular() {
        return None;
    }

    if latches.reload_requested() {
        return Some(Transition::plain(Presentation::reload()));
    }

    let Some(phase) = session.phase() else {
        return Some(Transition::plain(Presentation::LOADING));
    };

    if phase == InstancePhase::Running {
        return Some(running(readiness, ide_state, latches));
    }

    if phase == InstancePhase::Stopped {
        latches.mark_stopped();
    }

    if latches.saw_stopped() && phase.is_starting() {
        // In-memory tokens do not survive a restart; the page has to start over.
        latches.request_reload();
        return Some(Transition::plain(Presentation::reload()));
    }

    Some(Transition::plain(Presentation::LOADING))
}

fn running(
    readiness: Option<&Readiness>,
    ide_state: LocalIdeState,
    latches: &mut SessionLatches,
) -> Transition {
    if !latches.prefer_local() {
        let Some(readiness) = readiness else {
            return Transition::plain(Presentation::LOADING);
        };
        if let Some(handoff) = readiness.desktop_handoff() {
            let mut effects = Vec::new();
            if latches.claim_desktop_panel() {
                effects.push(Effect::CreateDesktopPanel(handoff.clone()));
            }
            return Transition {
                presentation: Presentation::show(Surface::DesktopHandoff),
                effects,
            };
        }
    }

    if ide_state == LocalIdeState::Ready {
        Transition::plain(Presentation::show(Surface::LocalIde))
    } else {
        Transition::plain(Presentation::LOADING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsfront_types::WorkspaceType;

    fn session(phase: InstancePhase) -> SessionInfo {
        SessionInfo::new("ws-1", WorkspaceType::Regular).with_instance("i-1", phase)
    }

    fn handoff() -> Readiness {
        Readiness::DesktopHandoff(DesktopHandoff::new("gateway://connect"))
    }

    #[test]
    fn test_non_regular_workspace_is_inert() {
        let mut latches = SessionLatches::new();
        let info = SessionInfo::new("ws-1", WorkspaceType::Prebuild)
            .with_instance("i-1", InstancePhase::Running);
        assert!(compute(&info, None, LocalIdeState::Ready, &mut latches).is_none());
    }

    #[test]
    fn test_missing_instance_shows_loading() {
        let mut latches = SessionLatches::new();
        let info = SessionInfo::new("ws-1", WorkspaceType::Regular);
        let transition = compute(&info, None, LocalIdeState::Ready, &mut latches).unwrap();
        assert_eq!(transition.presentation, Presentation::LOADING);
    }

    #[test]
    fn test_running_waits_for_readiness() {
        let mut latches = SessionLatches::new();
        let transition = compute(
            &session(InstancePhase::Running),
            None,
            LocalIdeState::Ready,
            &mut latches,
        )
        .unwrap();
        assert_eq!(transition.presentation.surface, Surface::Loading);
    }

    #[test]
    fn test_running_local_ready_shows_ide() {
        let mut latches = SessionLatches::new();
        let transition = compute(
            &session(InstancePhase::Running),
            Some(&Readiness::LocalOnly),
            LocalIdeState::Ready,
            &mut latches,
        )
        .unwrap();
        assert_eq!(transition.presentation.surface, Surface::LocalIde);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn test_running_local_still_starting_shows_loading() {
        let mut latches = SessionLatches::new();
        let transition = compute(
            &session(InstancePhase::Running),
            Some(&Readiness::LocalOnly),
            LocalIdeState::Starting,
            &mut latches,
        )
        .unwrap();
        assert_eq!(transition.presentation.surface, Surface::Loading);
    }

    #[test]
    fn test_handoff_opens_link_once() {
        let mut latches = SessionLatches::new();
        let readiness = handoff();
        let first = compute(
            &session(InstancePhase::Running),
            Some(&readiness),
            LocalIdeState::Uninitialized,
            &mut latches,
        )
        .unwrap();
        assert_eq!(first.presentation.surface, Surface::DesktopHandoff);
        assert_eq!(
            first.effects,
            vec![Effect::CreateDesktopPanel(DesktopHandoff::new(
                "gateway://connect"
            ))]
        );

        let second = compute(
            &session(InstancePhase::Running),
            Some(&readiness),
            LocalIdeState::Uninitialized,
            &mut latches,
        )
        .unwrap();
        assert_eq!(second.presentation.surface, Surface::DesktopHandoff);
        assert!(second.effects.is_empty());
    }

    #[test]
    fn test_prefer_local_overrides_handoff() {
        let mut latches = SessionLatches::new();
        latches.choose_local();
        let transition = compute(
            &session(InstancePhase::Running),
            Some(&handoff()),
            LocalIdeState::Ready,
            &mut latches,
        )
        .unwrap();
        assert_eq!(transition.presentation.surface, Surface::LocalIde);
    }

    #[test]
    fn test_restart_after_stop_requests_reload() {
        let mut latches = SessionLatches::new();
        for phase in [InstancePhase::Running, InstancePhase::Stopped] {
            let transition =
                compute(&session(phase), None, LocalIdeState::Ready, &mut latches).unwrap();
            assert!(!transition.presentation.must_reload);
        }
        let transition = compute(
            &session(InstancePhase::Preparing),
            None,
            LocalIdeState::Ready,
            &mut latches,
        )
        .unwrap();
        assert_eq!(transition.presentation, Presentation::reload());
    }

    #[test]
    fn test_starting_phase_without_stop_does_not_reload() {
        let mut latches = SessionLatches::new();
        for phase in [
            InstancePhase::Stopping,
            InstancePhase::Preparing,
            InstancePhase::Initializing,
        ] {
            let transition =
                compute(&session(phase), None, LocalIdeState::Ready, &mut latches).unwrap();
            assert_eq!(transition.presentation, Presentation::LOADING);
        }
    }
}
