use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::collaborators::{
    AnalyticsSink, HeartbeatSink, IdeReadinessSource, InstanceInfoSource, LocalIdeService,
    Navigator, Subscription, SurfaceRenderer, WorkspaceConnector,
};
use crate::config::FrontendConfig;
use crate::heartbeat::{ActivityClock, HeartbeatScheduler};
use crate::lifecycle::{IdeLifecycle, IdeStarts, LifecycleOutcome};
use crate::signal::OnceSignal;
use crate::supervisor::{Command, Input, PageOutputs, PresentationSupervisor, SupervisorExit};
use crate::{Error, Result};

/// Everything the frontend talks to.
pub struct Collaborators {
    pub info: Arc<dyn InstanceInfoSource>,
    pub readiness: Arc<dyn IdeReadinessSource>,
    pub ide: Arc<dyn LocalIdeService>,
    pub connector: Arc<dyn WorkspaceConnector>,
    pub renderer: Box<dyn SurfaceRenderer>,
    pub navigator: Arc<dyn Navigator>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub heartbeat: Arc<dyn HeartbeatSink>,
}

/// Entry point: wires collaborators to the two supervisor tasks.
pub struct Frontend {
    config: FrontendConfig,
    session_id: Option<String>,
}

impl Frontend {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            config,
            session_id: None,
        }
    }

    /// Session id handed over by the loading surface. A random one is
    /// generated when absent.
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Conceal the page and spawn the IDE start task and the presentation
    /// task. Must be called from within a tokio runtime.
    pub fn launch(
        self,
        collaborators: Collaborators,
        dom_ready: OnceSignal<()>,
    ) -> FrontendHandle {
        let Collaborators {
            info,
            readiness,
            ide,
            connector,
            mut renderer,
            navigator,
            analytics,
            heartbeat,
        } = collaborators;

        renderer.conceal_page();

        let session_id = self
            .session_id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        info!(session_id = %session_id, "frontend launched");

        let starts = IdeStarts::new();

        let lifecycle = IdeLifecycle::new(
            Arc::clone(&info),
            Arc::clone(&readiness),
            Arc::clone(&ide),
            connector,
            dom_ready.clone(),
        )
        .with_readiness_timeout(self.config.readiness_timeout())
        .with_starts(starts.clone());
        let lifecycle = tokio::spawn(lifecycle.run());

        let (commands, inputs) = mpsc::unbounded_channel();
        let activity = ActivityClock::new();
        let presentation = PresentationTask {
            config: self.config,
            session_id,
            info,
            readiness,
            ide,
            heartbeat,
            starts,
            activity: activity.clone(),
            outputs: PageOutputs {
                renderer,
                navigator,
                analytics,
            },
            dom_ready,
            sender: commands.clone(),
        };
        let presentation = tokio::spawn(presentation.run(inputs));

        FrontendHandle {
            commands,
            activity,
            presentation,
            lifecycle,
        }
    }
}

struct PresentationTask {
    config: FrontendConfig,
    session_id: String,
    info: Arc<dyn InstanceInfoSource>,
    readiness: Arc<dyn IdeReadinessSource>,
    ide: Arc<dyn LocalIdeService>,
    heartbeat: Arc<dyn HeartbeatSink>,
    starts: IdeStarts,
    activity: ActivityClock,
    outputs: PageOutputs,
    dom_ready: OnceSignal<()>,
    sender: UnboundedSender<Input>,
}

impl PresentationTask {
    async fn run(mut self, inputs: UnboundedReceiver<Input>) -> Result<SupervisorExit> {
        let (initial, ()) = tokio::join!(self.info.initial_snapshot(), self.dom_ready.wait());
        let initial = initial?;
        self.outputs
            .renderer
            .set_title(&initial.workspace.description);

        if !initial.is_regular() {
            info!(
                workspace_type = %initial.workspace.workspace_type,
                "not a regular workspace, staying inert"
            );
            return Ok(SupervisorExit::Inert);
        }

        forward(self.info.subscribe(), self.sender.clone(), Input::Info);
        forward(self.ide.subscribe(), self.sender.clone(), Input::Ide);
        self.spawn_readiness_waiter();
        drop(self.sender);

        // Read after subscribing so no change falls between the two.
        let info = self.info.snapshot();
        let heartbeat = HeartbeatScheduler::new(
            self.heartbeat,
            self.activity,
            self.config.heartbeat.clone(),
        );
        let supervisor = PresentationSupervisor::new(
            self.session_id,
            &self.config,
            info,
            self.ide,
            heartbeat,
            self.outputs,
        )
        .with_starts(self.starts);
        Ok(supervisor.run(inputs).await)
    }

    fn spawn_readiness_waiter(&self) {
        let readiness = Arc::clone(&self.readiness);
        let sender = self.sender.clone();
        let timeout = self.config.readiness_timeout();
        tokio::spawn(async move {
            let input = match timeout {
                Some(limit) => match tokio::time::timeout(limit, readiness.ide_ready()).await {
                    Ok(result) => readiness_input(result.map_err(Error::from)),
                    Err(_) => Input::ReadinessFailed(Error::ReadinessTimeout {
                        signal: "ide_ready",
                        waited: limit,
                    }),
                },
                None => readiness_input(readiness.ide_ready().await.map_err(Error::from)),
            };
            // The presentation loop may already be gone.
            let _ = sender.send(input);
        });
    }
}

fn readiness_input(result: Result<wsfront_types::Readiness>) -> Input {
    match result {
        Ok(readiness) => Input::Readiness(readiness),
        Err(err) => Input::ReadinessFailed(err),
    }
}

fn forward<T: Send + 'static>(
    mut from: Subscription<T>,
    to: UnboundedSender<Input>,
    wrap: fn(T) -> Input,
) {
    tokio::spawn(async move {
        while let Some(value) = from.recv().await {
            if to.send(wrap(value)).is_err() {
                break;
            }
        }
    });
}

/// How both supervisor tasks ended.
#[derive(Debug)]
pub struct FrontendExit {
    pub presentation: SupervisorExit,
    /// `None` when the IDE start task was still waiting and got aborted.
    pub lifecycle: Option<Result<LifecycleOutcome>>,
}

/// Control surface for a launched frontend.
pub struct FrontendHandle {
    commands: UnboundedSender<Input>,
    activity: ActivityClock,
    presentation: JoinHandle<Result<SupervisorExit>>,
    lifecycle: JoinHandle<Result<LifecycleOutcome>>,
}

impl FrontendHandle {
    pub fn open_web_ide(&self) {
        self.send(Command::OpenWebIde);
    }

    pub fn record_activity(&self) {
        self.activity.record();
    }

    /// The page is being discarded.
    pub fn unload(&self) {
        self.send(Command::Unload);
    }

    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    pub fn is_finished(&self) -> bool {
        self.presentation.is_finished()
    }

    /// Wait for the presentation task to exit, then collect the IDE start
    /// task if it is done and abort it otherwise.
    pub async fn join(self) -> Result<FrontendExit> {
        let FrontendHandle {
            commands,
            presentation,
            lifecycle,
            ..
        } = self;
        drop(commands);

        let presentation = presentation.await??;
        let lifecycle = if lifecycle.is_finished() {
            Some(lifecycle.await?)
        } else {
            debug!("aborting pending IDE start task");
            lifecycle.abort();
            None
        };
        Ok(FrontendExit {
            presentation,
            lifecycle,
        })
    }

    fn send(&self, command: Command) {
        if self.commands.send(Input::Command(command)).is_err() {
            debug!(?command, "presentation loop already exited");
        }
    }
}
