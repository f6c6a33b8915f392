use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use wsfront_types::{InstancePhase, Readiness, SessionInfo};

use crate::collaborators::{
    IdeReadinessSource, InstanceInfoSource, LocalIdeService, Subscription, WorkspaceConnector,
};
use crate::signal::OnceSignal;
use crate::{Error, Result};

/// Shared record of whether the local IDE was asked to start, by the early
/// task or by the user choosing the web IDE. Teardown stops it only then.
#[derive(Debug, Clone, Default)]
pub struct IdeStarts(Arc<AtomicBool>);

impl IdeStarts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Record the start and run it in the background.
    pub fn spawn_start(&self, ide: Arc<dyn LocalIdeService>) {
        self.0.store(true, Ordering::SeqCst);
        tokio::spawn(async move {
            if let Err(err) = ide.start().await {
                warn!(error = %err, "local IDE failed to start");
            }
        });
    }
}

/// How the IDE start task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// Not a regular workspace.
    Inert,
    /// The info stream closed before the instance ever ran.
    InfoClosed,
    /// The instance stopped before the IDE could be started.
    Skipped,
    /// Connection closed after the instance began shutting down.
    TornDown { ide_started: bool },
    /// The info stream closed while connected; the connection stays open.
    Detached { ide_started: bool },
}

/// The early task: wait for the instance to run, connect, and start the
/// local IDE unless a desktop hand-off is on offer.
pub struct IdeLifecycle {
    info: Arc<dyn InstanceInfoSource>,
    readiness: Arc<dyn IdeReadinessSource>,
    ide: Arc<dyn LocalIdeService>,
    connector: Arc<dyn WorkspaceConnector>,
    dom_ready: OnceSignal<()>,
    readiness_timeout: Option<Duration>,
    starts: IdeStarts,
}

impl IdeLifecycle {
    pub fn new(
        info: Arc<dyn InstanceInfoSource>,
        readiness: Arc<dyn IdeReadinessSource>,
        ide: Arc<dyn LocalIdeService>,
        connector: Arc<dyn WorkspaceConnector>,
        dom_ready: OnceSignal<()>,
    ) -> Self {
        Self {
            info,
            readiness,
            ide,
            connector,
            dom_ready,
            readiness_timeout: None,
            starts: IdeStarts::new(),
        }
    }

    pub fn with_readiness_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.readiness_timeout = timeout;
        self
    }

    /// Share the start record with the presentation task.
    pub fn with_starts(mut self, starts: IdeStarts) -> Self {
        self.starts = starts;
        self
    }

    pub async fn run(self) -> Result<LifecycleOutcome> {
        let initial = self.info.initial_snapshot().await?;
        if !initial.is_regular() {
            debug!(workspace_type = %initial.workspace.workspace_type, "IDE start task inert");
            return Ok(LifecycleOutcome::Inert);
        }

        let mut changes = self.info.subscribe();
        let current = self.info.snapshot();
        if current.is_shutting_down() {
            info!(phase = ?current.phase(), "workspace shutting down, IDE start skipped");
            return Ok(LifecycleOutcome::Skipped);
        }
        if !current.is_phase(InstancePhase::Running) {
            loop {
                match changes.recv().await {
                    Some(info) if info.is_phase(InstancePhase::Running) => break,
                    Some(info) if info.is_shutting_down() => {
                        info!(phase = ?info.phase(), "workspace shutting down, IDE start skipped");
                        return Ok(LifecycleOutcome::Skipped);
                    }
                    Some(_) => {}
                    None => return Ok(LifecycleOutcome::InfoClosed),
                }
            }
        }

        debug!("instance running, waiting for readiness");
        let readiness = tokio::select! {
            readiness = self.await_readiness() => readiness?,
            () = shutdown_seen(&mut changes) => {
                info!("workspace shutting down while waiting for readiness, IDE start skipped");
                return Ok(LifecycleOutcome::Skipped);
            }
        };

        // Changes that raced with readiness are still buffered; a stop among
        // them voids the start even if the instance is restarting by now.
        if self.stopped_since(&mut changes) {
            info!("workspace stopped while readiness was pending, IDE start skipped");
            return Ok(LifecycleOutcome::Skipped);
        }

        let connection = self.connector.connect_workspace();
        if readiness.is_local_only() {
            info!("starting local IDE");
            self.starts.spawn_start(Arc::clone(&self.ide));
        } else {
            debug!("desktop hand-off on offer, local IDE not started");
        }

        while let Some(info) = changes.recv().await {
            if info.is_shutting_down() {
                info!(phase = ?info.phase(), "workspace shutting down, closing connection");
                connection.close();
                let ide_started = self.starts.started();
                if ide_started {
                    self.ide.stop();
                }
                return Ok(LifecycleOutcome::TornDown { ide_started });
            }
        }

        debug!("info stream closed, leaving connection open");
        Ok(LifecycleOutcome::Detached {
            ide_started: self.starts.started(),
        })
    }

    /// Drain buffered changes without suspending. True if any of them, or
    /// the current snapshot, is stopping or stopped.
    fn stopped_since(&self, changes: &mut Subscription<SessionInfo>) -> bool {
        let mut stopped = self.info.snapshot().is_shutting_down();
        while let Ok(info) = changes.try_recv() {
            stopped |= info.is_shutting_down();
        }
        stopped
    }

    async fn await_readiness(&self) -> Result<Readiness> {
        let all = async {
            let (ide, content, ()) = tokio::join!(
                self.readiness.ide_ready(),
                self.readiness.content_ready(),
                self.dom_ready.wait(),
            );
            content?;
            Ok::<_, Error>(ide?)
        };

        match self.readiness_timeout {
            Some(limit) => tokio::time::timeout(limit, all)
                .await
                .map_err(|_| Error::ReadinessTimeout {
                    signal: "readiness",
                    waited: limit,
                })?,
            None => all.await,
        }
    }
}

/// Resolves on the first stopping/stopped change. A closed stream never
/// resolves: silence means no further transitions.
async fn shutdown_seen(changes: &mut Subscription<SessionInfo>) {
    while let Some(info) = changes.recv().await {
        if info.is_shutting_down() {
            return;
        }
    }
    std::future::pending::<()>().await
}
