//! In-process implementations of the remote and local IDE seams.
//!
//! Used by the simulator and by tests. Each adapter is driven from the
//! outside (`publish`, `resolve_*`) and behaves like its real counterpart
//! toward the supervisor.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::debug;
use wsfront_types::{
    IdeStartError, LocalIdeState, LocalIdeStatus, Readiness, SessionInfo, TransportError,
};

use crate::collaborators::{
    Connection, IdeReadinessSource, InstanceInfoSource, LocalIdeService, Subscription,
    WorkspaceConnector,
};
use crate::signal::OnceSignal;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Fan-out to live subscribers; dropped receivers are pruned on send.
struct Subscribers<T>(Vec<UnboundedSender<T>>);

impl<T: Clone> Subscribers<T> {
    fn subscribe(&mut self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.0.push(tx);
        rx
    }

    fn send(&mut self, value: &T) {
        self.0.retain(|tx| tx.send(value.clone()).is_ok());
    }
}

struct InfoState {
    current: SessionInfo,
    subscribers: Subscribers<SessionInfo>,
}

pub struct MemoryInstanceSource {
    initial: OnceSignal<Result<(), TransportError>>,
    state: Mutex<InfoState>,
}

impl MemoryInstanceSource {
    /// Source whose first snapshot is already available.
    pub fn new(info: SessionInfo) -> Self {
        let source = Self::pending(info);
        source.connect();
        source
    }

    /// Source whose first snapshot resolves on `connect()`.
    pub fn pending(info: SessionInfo) -> Self {
        Self {
            initial: OnceSignal::new(),
            state: Mutex::new(InfoState {
                current: info,
                subscribers: Subscribers(Vec::new()),
            }),
        }
    }

    pub fn connect(&self) {
        self.initial.resolve(Ok(()));
    }

    pub fn fail_initial(&self, err: TransportError) {
        self.initial.resolve(Err(err));
    }

    /// Replace the current snapshot and notify subscribers, even if unchanged.
    pub fn publish(&self, info: SessionInfo) {
        let mut state = lock(&self.state);
        debug!(phase = ?info.phase(), "publishing session info");
        state.subscribers.send(&info);
        state.current = info;
    }

    /// Close every subscription.
    pub fn disconnect(&self) {
        lock(&self.state).subscribers.0.clear();
    }
}

impl InstanceInfoSource for MemoryInstanceSource {
    fn initial_snapshot(&self) -> BoxFuture<'_, Result<SessionInfo, TransportError>> {
        Box::pin(async move {
            self.initial.wait().await?;
            Ok(self.snapshot())
        })
    }

    fn snapshot(&self) -> SessionInfo {
        lock(&self.state).current.clone()
    }

    fn subscribe(&self) -> Subscription<SessionInfo> {
        lock(&self.state).subscribers.subscribe()
    }
}

#[derive(Default)]
pub struct MemoryReadiness {
    content: OnceSignal<Result<(), TransportError>>,
    ide: OnceSignal<Result<Readiness, TransportError>>,
}

impl MemoryReadiness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both signals already resolved.
    pub fn ready(readiness: Readiness) -> Self {
        let source = Self::new();
        source.resolve_content();
        source.resolve_ide(readiness);
        source
    }

    pub fn resolve_content(&self) {
        self.content.resolve(Ok(()));
    }

    pub fn resolve_ide(&self, readiness: Readiness) {
        self.ide.resolve(Ok(readiness));
    }

    /// Fail whichever signals are still pending.
    pub fn fail(&self, err: TransportError) {
        self.content.resolve(Err(err.clone()));
        self.ide.resolve(Err(err));
    }
}

impl IdeReadinessSource for MemoryReadiness {
    fn content_ready(&self) -> BoxFuture<'_, Result<(), TransportError>> {
        Box::pin(self.content.wait())
    }

    fn ide_ready(&self) -> BoxFuture<'_, Result<Readiness, TransportError>> {
        Box::pin(self.ide.wait())
    }
}

/// What `start()` does once called on an uninitialized IDE.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StartPlan {
    #[default]
    Succeed,
    Fail(IdeStartError),
    /// Stays in `starting` forever.
    Hang,
}

struct IdeState {
    status: LocalIdeStatus,
    subscribers: Subscribers<LocalIdeStatus>,
    start_calls: usize,
    stop_calls: usize,
}

pub struct MemoryLocalIde {
    plan: StartPlan,
    boot_time: Duration,
    state: Mutex<IdeState>,
}

impl Default for MemoryLocalIde {
    fn default() -> Self {
        Self::new(StartPlan::Succeed)
    }
}

impl MemoryLocalIde {
    pub fn new(plan: StartPlan) -> Self {
        Self {
            plan,
            boot_time: Duration::ZERO,
            state: Mutex::new(IdeState {
                status: LocalIdeStatus::default(),
                subscribers: Subscribers(Vec::new()),
                start_calls: 0,
                stop_calls: 0,
            }),
        }
    }

    /// Time spent in `starting` before the plan resolves.
    pub fn with_boot_time(mut self, boot_time: Duration) -> Self {
        self.boot_time = boot_time;
        self
    }

    /// Number of `start()` calls, including idempotent ones.
    pub fn start_calls(&self) -> usize {
        lock(&self.state).start_calls
    }

    pub fn stop_calls(&self) -> usize {
        lock(&self.state).stop_calls
    }

    /// Push a status change, bypassing `start()`.
    pub fn set_status(&self, status: LocalIdeStatus) {
        let mut state = lock(&self.state);
        debug!(state = %status.state, "local IDE status changed");
        state.subscribers.send(&status);
        state.status = status;
    }
}

impl LocalIdeService for MemoryLocalIde {
    fn status(&self) -> LocalIdeStatus {
        lock(&self.state).status.clone()
    }

    fn subscribe(&self) -> Subscription<LocalIdeStatus> {
        lock(&self.state).subscribers.subscribe()
    }

    fn start(&self) -> BoxFuture<'_, Result<(), IdeStartError>> {
        Box::pin(async move {
            {
                let mut state = lock(&self.state);
                state.start_calls += 1;
                if matches!(
                    state.status.state,
                    LocalIdeState::Starting | LocalIdeState::Ready
                ) {
                    return Ok(());
                }
            }
            self.set_status(LocalIdeStatus::new(LocalIdeState::Starting));

            if !self.boot_time.is_zero() {
                tokio::time::sleep(self.boot_time).await;
            }

            match &self.plan {
                StartPlan::Succeed => {
                    self.set_status(LocalIdeStatus::new(LocalIdeState::Ready));
                    Ok(())
                }
                StartPlan::Fail(err) => {
                    self.set_status(LocalIdeStatus::failed(err.clone().into()));
                    Err(err.clone())
                }
                StartPlan::Hang => std::future::pending().await,
            }
        })
    }

    fn stop(&self) {
        lock(&self.state).stop_calls += 1;
    }
}

/// Counts opened and closed connections.
#[derive(Default)]
pub struct MemoryConnector {
    opened: AtomicUsize,
    closed: Arc<AtomicUsize>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

impl WorkspaceConnector for MemoryConnector {
    fn connect_workspace(&self) -> Box<dyn Connection> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Box::new(MemoryConnection {
            closed: Arc::clone(&self.closed),
        })
    }
}

struct MemoryConnection {
    closed: Arc<AtomicUsize>,
}

impl Connection for MemoryConnection {
    fn close(self: Box<Self>) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsfront_types::{DesktopHandoff, InstancePhase, WorkspaceType};

    fn info(phase: InstancePhase) -> SessionInfo {
        SessionInfo::new("ws-1", WorkspaceType::Regular).with_instance("i-1", phase)
    }

    #[tokio::test]
    async fn test_publish_reaches_subscribers_and_snapshot() {
        let source = MemoryInstanceSource::new(info(InstancePhase::Pending));
        let mut rx = source.subscribe();

        source.publish(info(InstancePhase::Running));
        source.publish(info(InstancePhase::Running));

        assert_eq!(rx.recv().await.unwrap().phase(), Some(InstancePhase::Running));
        assert_eq!(rx.recv().await.unwrap().phase(), Some(InstancePhase::Running));
        assert!(source.snapshot().is_phase(InstancePhase::Running));

        source.disconnect();
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_pending_initial_snapshot() {
        let source = Arc::new(MemoryInstanceSource::pending(info(InstancePhase::Pending)));
        let waiter = {
            let source = Arc::clone(&source);
            tokio::spawn(async move { source.initial_snapshot().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        source.connect();
        let snapshot = waiter.await.unwrap().unwrap();
        assert_eq!(snapshot.workspace.id, "ws-1");
    }

    #[tokio::test]
    async fn test_readiness_failure() {
        let readiness = MemoryReadiness::new();
        readiness.resolve_ide(Readiness::from_handoff(Some(DesktopHandoff::new("x://open"))));
        readiness.fail(TransportError::new("gone"));

        assert!(readiness.content_ready().await.is_err());
        assert!(!readiness.ide_ready().await.unwrap().is_local_only());
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let ide = MemoryLocalIde::new(StartPlan::Succeed);
        let mut rx = ide.subscribe();

        ide.start().await.unwrap();
        ide.start().await.unwrap();

        assert_eq!(ide.start_calls(), 2);
        assert_eq!(ide.status().state, LocalIdeState::Ready);
        assert_eq!(rx.recv().await.unwrap().state, LocalIdeState::Starting);
        assert_eq!(rx.recv().await.unwrap().state, LocalIdeState::Ready);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_start_failure_reports_cause() {
        let ide = MemoryLocalIde::new(StartPlan::Fail(
            IdeStartError::new("boom").with_stack("at boot"),
        ));

        let err = ide.start().await.unwrap_err();
        assert_eq!(err.message, "boom");

        let status = ide.status();
        assert_eq!(status.state, LocalIdeState::Failed);
        assert_eq!(status.failure_message(), Some("boom"));
    }

    #[test]
    fn test_connector_counts() {
        let connector = MemoryConnector::new();
        let connection = connector.connect_workspace();
        assert_eq!((connector.opened(), connector.closed()), (1, 0));
        connection.close();
        assert_eq!((connector.opened(), connector.closed()), (1, 1));
    }
}
