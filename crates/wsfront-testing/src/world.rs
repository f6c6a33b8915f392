//! SessionWorld pattern for declarative supervisor test setup.
//!
//! Provides a fluent interface for:
//! - Describing the initial session and readiness outcome
//! - Choosing how the local IDE boots
//! - Launching the real runtime against in-memory collaborators
//! - Driving phase changes and user actions afterwards

use std::sync::Arc;
use std::time::Duration;
use wsfront_runtime::{
    Collaborators, Frontend, FrontendConfig, FrontendExit, FrontendHandle, MemoryConnector,
    MemoryInstanceSource, MemoryLocalIde, MemoryReadiness, OnceSignal, StartPlan,
};
use wsfront_types::{InstancePhase, Readiness, SessionInfo, TransportError, WorkspaceType};

use crate::fixtures;
use crate::recorder::Recorder;

/// Declarative session environment builder.
///
/// # Example
/// ```no_run
/// use wsfront_testing::SessionWorld;
/// use wsfront_types::{InstancePhase, Readiness};
///
/// # async fn demo() {
/// let world = SessionWorld::new()
///     .with_instance("i-1", InstancePhase::Running)
///     .with_readiness(Readiness::LocalOnly)
///     .launch();
/// world.settle().await;
/// # }
/// ```
pub struct SessionWorld {
    info: SessionInfo,
    readiness: Option<Readiness>,
    plan: StartPlan,
    boot_time: Duration,
    config: FrontendConfig,
    session_id: String,
    dom_ready: bool,
}

impl Default for SessionWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionWorld {
    /// Regular workspace, no instance, DOM ready, readiness pending.
    pub fn new() -> Self {
        Self {
            info: fixtures::regular_session(),
            readiness: None,
            plan: StartPlan::Succeed,
            boot_time: Duration::ZERO,
            config: FrontendConfig::default(),
            session_id: "session-fixture".to_string(),
            dom_ready: true,
        }
    }

    pub fn with_workspace_type(mut self, workspace_type: WorkspaceType) -> Self {
        self.info.workspace.workspace_type = workspace_type;
        self
    }

    pub fn with_instance(mut self, instance_id: &str, phase: InstancePhase) -> Self {
        self.info = self.info.with_instance(instance_id, phase);
        self
    }

    /// Resolve both readiness signals up front.
    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = Some(readiness);
        self
    }

    pub fn with_start_plan(mut self, plan: StartPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_boot_time(mut self, boot_time: Duration) -> Self {
        self.boot_time = boot_time;
        self
    }

    pub fn with_config(mut self, config: FrontendConfig) -> Self {
        self.config = config;
        self
    }

    /// Leave DOM readiness unresolved until `RunningWorld::resolve_dom`.
    pub fn with_dom_pending(mut self) -> Self {
        self.dom_ready = false;
        self
    }

    /// Launch the frontend. Must be called from within a tokio runtime.
    pub fn launch(self) -> RunningWorld {
        let source = Arc::new(MemoryInstanceSource::new(self.info.clone()));
        let readiness = Arc::new(match self.readiness {
            Some(readiness) => MemoryReadiness::ready(readiness),
            None => MemoryReadiness::new(),
        });
        let ide = Arc::new(MemoryLocalIde::new(self.plan).with_boot_time(self.boot_time));
        let connector = Arc::new(MemoryConnector::new());
        let recorder = Recorder::new();
        let dom_ready = if self.dom_ready {
            OnceSignal::resolved(())
        } else {
            OnceSignal::new()
        };

        let collaborators = Collaborators {
            info: source.clone(),
            readiness: readiness.clone(),
            ide: ide.clone(),
            connector: connector.clone(),
            renderer: Box::new(recorder.clone()),
            navigator: Arc::new(recorder.clone()),
            analytics: Arc::new(recorder.clone()),
            heartbeat: Arc::new(recorder.clone()),
        };
        let handle = Frontend::new(self.config)
            .with_session_id(self.session_id)
            .launch(collaborators, dom_ready.clone());

        RunningWorld {
            handle,
            info: self.info,
            source,
            readiness,
            ide,
            connector,
            recorder,
            dom_ready,
        }
    }
}

/// A launched frontend plus handles on every in-memory collaborator.
pub struct RunningWorld {
    handle: FrontendHandle,
    info: SessionInfo,
    source: Arc<MemoryInstanceSource>,
    readiness: Arc<MemoryReadiness>,
    ide: Arc<MemoryLocalIde>,
    connector: Arc<MemoryConnector>,
    recorder: Recorder,
    dom_ready: OnceSignal<()>,
}

impl RunningWorld {
    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn ide(&self) -> &MemoryLocalIde {
        &self.ide
    }

    pub fn connector(&self) -> &MemoryConnector {
        &self.connector
    }

    pub fn handle(&self) -> &FrontendHandle {
        &self.handle
    }

    /// Publish `phase` for the current instance (or `i-1` if none yet).
    pub fn publish_phase(&mut self, phase: InstancePhase) {
        let instance_id = self.info.instance_id().unwrap_or("i-1").to_string();
        self.publish_instance(&instance_id, phase);
    }

    pub fn publish_instance(&mut self, instance_id: &str, phase: InstancePhase) {
        self.info = self.info.clone().with_instance(instance_id, phase);
        self.source.publish(self.info.clone());
    }

    /// Re-deliver the current snapshot unchanged.
    pub fn republish(&self) {
        self.source.publish(self.info.clone());
    }

    pub fn disconnect_info(&self) {
        self.source.disconnect();
    }

    pub fn resolve_readiness(&self, readiness: Readiness) {
        self.readiness.resolve_content();
        self.readiness.resolve_ide(readiness);
    }

    pub fn fail_readiness(&self, message: &str) {
        self.readiness.fail(TransportError::new(message));
    }

    pub fn resolve_dom(&self) {
        self.dom_ready.resolve(());
    }

    /// Let every spawned task run until it blocks again.
    pub async fn settle(&self) {
        for _ in 0..32 {
            tokio::task::yield_now().await;
        }
    }

    /// Advance (paused) time, then settle.
    pub async fn advance(&self, by: Duration) {
        tokio::time::sleep(by).await;
        self.settle().await;
    }

    /// Shut down unless already exited, and collect both task outcomes.
    pub async fn finish(self) -> anyhow::Result<(FrontendExit, Recorder)> {
        self.handle.shutdown();
        let exit = self.handle.join().await?;
        Ok((exit, self.recorder))
    }
}
