//! Properties of the presentation state machine over arbitrary phase sequences.

use proptest::prelude::*;
use wsfront_engine::{Effect, SessionLatches, compute};
use wsfront_types::{
    DesktopHandoff, InstancePhase, LocalIdeState, Readiness, SessionInfo, Surface, WorkspaceType,
};

const IDE_STATES: [LocalIdeState; 4] = [
    LocalIdeState::Uninitialized,
    LocalIdeState::Starting,
    LocalIdeState::Ready,
    LocalIdeState::Failed,
];

fn phase_strategy() -> impl Strategy<Value = InstancePhase> {
    prop::sample::select(InstancePhase::ALL.to_vec())
}

fn non_running_phase() -> impl Strategy<Value = InstancePhase> {
    phase_strategy().prop_filter("not running", |phase| *phase != InstancePhase::Running)
}

fn ide_strategy() -> impl Strategy<Value = LocalIdeState> {
    prop::sample::select(IDE_STATES.to_vec())
}

fn readiness_strategy() -> impl Strategy<Value = Option<Readiness>> {
    prop_oneof![
        Just(None),
        Just(Some(Readiness::LocalOnly)),
        Just(Some(Readiness::DesktopHandoff(DesktopHandoff::new(
            "gateway://connect"
        )))),
    ]
}

fn session(phase: InstancePhase) -> SessionInfo {
    SessionInfo::new("ws-1", WorkspaceType::Regular).with_instance("i-1", phase)
}

proptest! {
    #[test]
    fn without_running_surface_is_always_loading(
        steps in prop::collection::vec((non_running_phase(), ide_strategy(), readiness_strategy()), 0..40)
    ) {
        let mut latches = SessionLatches::new();
        for (phase, ide, readiness) in steps {
            let transition = compute(&session(phase), readiness.as_ref(), ide, &mut latches).unwrap();
            prop_assert_eq!(transition.presentation.surface, Surface::Loading);
        }
    }

    #[test]
    fn reload_is_monotonic(
        steps in prop::collection::vec((phase_strategy(), ide_strategy(), readiness_strategy()), 0..40)
    ) {
        let mut latches = SessionLatches::new();
        let mut reloading = false;
        let mut saw_stopped = false;
        for (phase, ide, readiness) in steps {
            let transition = compute(&session(phase), readiness.as_ref(), ide, &mut latches).unwrap();
            if phase == InstancePhase::Stopped {
                saw_stopped = true;
            }
            if saw_stopped && phase.is_starting() {
                reloading = true;
            }
            prop_assert_eq!(transition.presentation.must_reload, reloading);
            if reloading {
                prop_assert_eq!(transition.presentation.surface, Surface::Loading);
            }
        }
    }

    #[test]
    fn prefer_local_never_shows_handoff(
        steps in prop::collection::vec((phase_strategy(), ide_strategy()), 0..40)
    ) {
        let mut latches = SessionLatches::new();
        latches.choose_local();
        let readiness = Readiness::DesktopHandoff(DesktopHandoff::new("gateway://connect"));
        for (phase, ide) in steps {
            let transition = compute(&session(phase), Some(&readiness), ide, &mut latches).unwrap();
            prop_assert_ne!(transition.presentation.surface, Surface::DesktopHandoff);
            prop_assert!(transition.effects.is_empty());
        }
    }

    #[test]
    fn handoff_link_opens_at_most_once(
        steps in prop::collection::vec((phase_strategy(), ide_strategy()), 1..60)
    ) {
        let mut latches = SessionLatches::new();
        let readiness = Readiness::DesktopHandoff(DesktopHandoff::new("gateway://connect"));
        let mut opened = 0;
        for (phase, ide) in steps {
            let transition = compute(&session(phase), Some(&readiness), ide, &mut latches).unwrap();
            opened += transition
                .effects
                .iter()
                .filter(|effect| matches!(effect, Effect::CreateDesktopPanel(_)))
                .count();
        }
        prop_assert!(opened <= 1);
    }

    #[test]
    fn non_regular_workspaces_stay_inert(
        phase in phase_strategy(),
        ide in ide_strategy(),
        readiness in readiness_strategy(),
    ) {
        let mut latches = SessionLatches::new();
        let info = SessionInfo::new("ws-1", WorkspaceType::Probe).with_instance("i-1", phase);
        prop_assert!(compute(&info, readiness.as_ref(), ide, &mut latches).is_none());
        prop_assert_eq!(latches, SessionLatches::new());
    }
}

#[test]
fn scenario_phases_to_local_ide() {
    let mut latches = SessionLatches::new();
    let readiness = Readiness::LocalOnly;
    let steps = [
        (InstancePhase::Pending, LocalIdeState::Uninitialized),
        (InstancePhase::Creating, LocalIdeState::Uninitialized),
        (InstancePhase::Running, LocalIdeState::Starting),
        (InstancePhase::Running, LocalIdeState::Ready),
    ];
    let surfaces: Vec<Surface> = steps
        .into_iter()
        .map(|(phase, ide)| {
            compute(&session(phase), Some(&readiness), ide, &mut latches)
                .unwrap()
                .presentation
                .surface
        })
        .collect();
    assert_eq!(
        surfaces,
        vec![
            Surface::Loading,
            Surface::Loading,
            Surface::Loading,
            Surface::LocalIde
        ]
    );
}
