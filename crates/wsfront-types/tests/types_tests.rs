use wsfront_types::{
    AnalyticsEvent, DesktopHandoff, FailureCause, IdeStartError, InstancePhase, LocalIdeState,
    Readiness, SessionInfo, StatusRendered, StatusTag, WorkspaceType,
};

#[test]
fn test_phase_round_trips_through_str() {
    for phase in InstancePhase::ALL {
        let parsed: InstancePhase = phase.as_str().parse().unwrap();
        assert_eq!(parsed, phase);
    }
    assert!("booting".parse::<InstancePhase>().is_err());
}

#[test]
fn test_starting_and_shutdown_phases() {
    let starting: Vec<_> = InstancePhase::ALL
        .into_iter()
        .filter(InstancePhase::is_starting)
        .collect();
    assert_eq!(
        starting,
        vec![
            InstancePhase::Preparing,
            InstancePhase::Pending,
            InstancePhase::Creating,
            InstancePhase::Initializing,
        ]
    );
    assert!(InstancePhase::Stopping.is_shutting_down());
    assert!(InstancePhase::Stopped.is_shutting_down());
    assert!(!InstancePhase::Interrupted.is_shutting_down());
}

#[test]
fn test_empty_action_link_is_local_only() {
    assert_eq!(
        Readiness::from_handoff(Some(DesktopHandoff::new(""))),
        Readiness::LocalOnly
    );
    assert_eq!(Readiness::from_handoff(None), Readiness::LocalOnly);

    let readiness = Readiness::from_handoff(Some(DesktopHandoff::new("jetbrains-gateway://x")));
    assert_eq!(
        readiness.desktop_handoff().map(|h| h.label()),
        Some("Open IDE")
    );
}

#[test]
fn test_readiness_deserializes_from_tagged_toml_shape() {
    let readiness: Readiness = serde_json::from_str(
        r#"{"kind":"desktop_handoff","action_link":"vscode://open","action_label":"Open VS Code"}"#,
    )
    .unwrap();
    assert_eq!(
        readiness,
        Readiness::DesktopHandoff(DesktopHandoff::new("vscode://open").with_label("Open VS Code"))
    );

    let local: Readiness = serde_json::from_str(r#"{"kind":"local_only"}"#).unwrap();
    assert!(local.is_local_only());
}

#[test]
fn test_status_tag_display() {
    assert_eq!(StatusTag::Ide(LocalIdeState::Ready).to_string(), "ide-ready");
    assert_eq!(
        StatusTag::Ide(LocalIdeState::Uninitialized).to_string(),
        "ide-uninitialized"
    );
    assert_eq!(StatusTag::Reload.to_string(), "reload");
    assert_eq!(StatusTag::WindowUnload.to_string(), "window-unload");
}

#[test]
fn test_failure_cause_report_joins_stack() {
    let cause: FailureCause = IdeStartError::new("boom").with_stack("at start").into();
    assert_eq!(cause.report(), "boom\nat start");

    let bare = FailureCause {
        message: "boom".to_string(),
        stack: None,
    };
    assert_eq!(bare.report(), "boom");
}

#[test]
fn test_status_rendered_properties_shape() {
    let info = SessionInfo::new("ws-1", WorkspaceType::Regular)
        .with_instance("i-1", InstancePhase::Running);
    let props = StatusRendered::new("s-1", &info, StatusTag::Ide(LocalIdeState::Failed))
        .with_error(Some("boom\nat start".to_string()));

    insta::assert_json_snapshot!(props, @r#"
    {
      "sessionId": "s-1",
      "instanceId": "i-1",
      "workspaceId": "ws-1",
      "type": "regular",
      "phase": "ide-failed",
      "error": "boom\nat start"
    }
    "#);
}

#[test]
fn test_analytics_event_flattens_properties() {
    let info = SessionInfo::new("ws-1", WorkspaceType::Prebuild);
    let props = StatusRendered::new("s-1", &info, StatusTag::WindowUnload);
    let event = AnalyticsEvent::new("status_rendered", &props);

    assert_eq!(event.event, "status_rendered");
    assert_eq!(event.phase(), Some("window-unload"));
    assert_eq!(event.property("type"), Some("prebuild"));
    assert!(!event.properties.contains_key("instanceId"));
    assert!(!event.properties.contains_key("error"));
}
