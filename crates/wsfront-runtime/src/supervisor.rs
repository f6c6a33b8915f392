use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};
use wsfront_engine::{
    Effect, HeartbeatPlan, SessionLatches, StatusTracker, compute, plan_heartbeat, status_tag,
};
use wsfront_engine::status::status_error;
use wsfront_types::{
    AnalyticsEvent, LocalIdeStatus, Readiness, SessionInfo, StatusRendered, StatusTag, Surface,
};

use crate::collaborators::{AnalyticsSink, LocalIdeService, Navigator, SurfaceRenderer};
use crate::config::FrontendConfig;
use crate::error::Error;
use crate::heartbeat::HeartbeatScheduler;
use crate::lifecycle::IdeStarts;

/// User or page initiated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// "Open web IDE" clicked on the desktop hand-off panel.
    OpenWebIde,
    /// The page is being discarded by the user.
    Unload,
    Shutdown,
}

/// Everything the presentation loop reacts to, merged into one channel.
#[derive(Debug)]
pub enum Input {
    Info(SessionInfo),
    Ide(LocalIdeStatus),
    Readiness(Readiness),
    ReadinessFailed(Error),
    Command(Command),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorExit {
    /// The workspace is not a regular one; nothing was presented.
    Inert,
    /// Navigated to the restart URL after a stop/restart cycle.
    Reloaded,
    Unloaded,
    Shutdown,
    /// Every input stream closed.
    InputsClosed,
}

enum Step {
    Continue,
    Exit(SupervisorExit),
}

/// Page-side effects driven by the presentation loop.
pub struct PageOutputs {
    pub renderer: Box<dyn SurfaceRenderer>,
    pub navigator: Arc<dyn Navigator>,
    pub analytics: Arc<dyn AnalyticsSink>,
}

/// Sole owner of the visible surface.
///
/// Every input triggers one recomputation whose side effects are applied in
/// a fixed order: failure display, surface swap, analytics. The next input is
/// only handled once that is done.
pub struct PresentationSupervisor {
    session_id: String,
    restart_url: String,
    event_name: String,

    info: SessionInfo,
    readiness: Option<Readiness>,
    readiness_failure: Option<String>,
    ide_status: LocalIdeStatus,
    latches: SessionLatches,

    current: Surface,
    failure_shown: Option<String>,
    status: StatusTracker,
    unloaded: bool,

    heartbeat: HeartbeatScheduler,
    ide: Arc<dyn LocalIdeService>,
    starts: IdeStarts,
    outputs: PageOutputs,
}

impl PresentationSupervisor {
    pub fn new(
        session_id: String,
        config: &FrontendConfig,
        info: SessionInfo,
        ide: Arc<dyn LocalIdeService>,
        heartbeat: HeartbeatScheduler,
        outputs: PageOutputs,
    ) -> Self {
        let ide_status = ide.status();
        Self {
            session_id,
            restart_url: config.restart_url.clone(),
            event_name: config.analytics.event_name.clone(),
            info,
            readiness: None,
            readiness_failure: None,
            ide_status,
            latches: SessionLatches::new(),
            current: Surface::Loading,
            failure_shown: None,
            status: StatusTracker::new(),
            unloaded: false,
            heartbeat,
            ide,
            starts: IdeStarts::new(),
            outputs,
        }
    }

    /// Share the start record with the IDE start task, so a web IDE opened
    /// from the hand-off panel is stopped on teardown too.
    pub fn with_starts(mut self, starts: IdeStarts) -> Self {
        self.starts = starts;
        self
    }

    pub fn surface(&self) -> Surface {
        self.current
    }

    pub fn latches(&self) -> &SessionLatches {
        &self.latches
    }

    pub fn heartbeat_instance(&self) -> Option<&str> {
        self.heartbeat.armed_instance()
    }

    pub async fn run(mut self, mut inputs: UnboundedReceiver<Input>) -> SupervisorExit {
        if let Step::Exit(exit) = self.first_frame() {
            return exit;
        }
        while let Some(input) = inputs.recv().await {
            if let Step::Exit(exit) = self.handle(input) {
                return exit;
            }
        }
        debug!("all presentation inputs closed");
        self.heartbeat.cancel();
        SupervisorExit::InputsClosed
    }

    fn first_frame(&mut self) -> Step {
        self.update_heartbeat();
        self.recompute()
    }

    fn handle(&mut self, input: Input) -> Step {
        match input {
            Input::Info(info) => {
                self.info = info;
                self.update_heartbeat();
                self.recompute()
            }
            Input::Ide(status) => {
                self.ide_status = status;
                self.recompute()
            }
            Input::Readiness(readiness) => {
                debug!(local_only = readiness.is_local_only(), "ide readiness resolved");
                self.readiness = Some(readiness);
                self.recompute()
            }
            Input::ReadinessFailed(err) => {
                warn!(error = %err, "ide readiness never resolved");
                if let Error::ReadinessTimeout { .. } = err {
                    self.readiness_failure = Some(err.to_string());
                }
                self.recompute()
            }
            Input::Command(Command::OpenWebIde) => self.open_web_ide(),
            Input::Command(Command::Unload) => {
                self.unload();
                Step::Exit(SupervisorExit::Unloaded)
            }
            Input::Command(Command::Shutdown) => {
                self.heartbeat.cancel();
                Step::Exit(SupervisorExit::Shutdown)
            }
        }
    }

    fn recompute(&mut self) -> Step {
        let failure = self
            .ide_status
            .failure_message()
            .map(str::to_string)
            .or_else(|| self.readiness_failure.clone());
        if failure != self.failure_shown {
            self.outputs.renderer.set_failure(failure.as_deref());
            self.failure_shown = failure;
        }

        let Some(transition) = compute(
            &self.info,
            self.readiness.as_ref(),
            self.ide_status.state,
            &mut self.latches,
        ) else {
            return Step::Continue;
        };

        for effect in transition.effects {
            match effect {
                Effect::CreateDesktopPanel(handoff) => {
                    info!(link = %handoff.action_link, "opening desktop IDE hand-off");
                    self.outputs.renderer.create_desktop_panel(&handoff);
                    self.outputs.navigator.open_external(&handoff.action_link);
                }
            }
        }
        self.show(transition.presentation.surface);

        let tag = status_tag(&transition.presentation, &self.ide_status);
        if self.status.observe(tag) {
            self.track(tag, status_error(&self.ide_status));
        }

        if transition.presentation.must_reload {
            self.reload();
            return Step::Exit(SupervisorExit::Reloaded);
        }
        Step::Continue
    }

    fn show(&mut self, next: Surface) {
        if next == self.current {
            return;
        }
        debug!(from = %self.current, to = %next, "swapping surface");
        self.outputs.renderer.swap(self.current, next);
        if self.current == Surface::LocalIde {
            self.outputs.renderer.detach_extraneous(next);
        }
        self.current = next;
    }

    fn update_heartbeat(&mut self) {
        match plan_heartbeat(self.heartbeat.armed_instance(), &self.info) {
            HeartbeatPlan::Keep => {}
            HeartbeatPlan::Arm(instance_id) | HeartbeatPlan::Rearm(instance_id) => {
                self.heartbeat.schedule(&instance_id);
            }
            HeartbeatPlan::Disarm => self.heartbeat.cancel(),
        }
    }

    fn open_web_ide(&mut self) -> Step {
        if !self.latches.desktop_panel_created() {
            debug!("open web IDE ignored: no desktop hand-off shown");
            return Step::Continue;
        }
        if self.info.is_shutting_down() {
            debug!("open web IDE ignored: workspace is shutting down");
            return Step::Continue;
        }

        info!("user chose the web IDE");
        self.latches.choose_local();
        self.starts.spawn_start(Arc::clone(&self.ide));
        self.recompute()
    }

    fn reload(&mut self) {
        info!(url = %self.restart_url, "workspace restarted, reloading page");
        self.unload();
        self.outputs.navigator.reload(&self.restart_url);
    }

    /// Best-effort final report before the page goes away. Runs once.
    fn unload(&mut self) {
        if self.unloaded {
            return;
        }
        self.unloaded = true;
        self.track(StatusTag::WindowUnload, None);
        self.heartbeat.close();
    }

    fn track(&self, tag: StatusTag, error: Option<String>) {
        debug!(phase = %tag, "tracking status");
        let properties = StatusRendered::new(&self.session_id, &self.info, tag).with_error(error);
        self.outputs
            .analytics
            .track_event(AnalyticsEvent::new(self.event_name.as_str(), &properties));
    }
}
