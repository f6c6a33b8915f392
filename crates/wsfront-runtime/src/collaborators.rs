//! Seams to the outside world.
//!
//! Everything the supervisor consumes or drives is reached through these
//! traits: the remote service client, the local IDE runtime, the page
//! (surfaces and navigation), analytics and heartbeat delivery. None of them
//! carries decision logic.

use futures::future::BoxFuture;
use tokio::sync::mpsc::UnboundedReceiver;
use wsfront_types::{
    AnalyticsEvent, DesktopHandoff, IdeStartError, LocalIdeStatus, Readiness, SessionInfo,
    Surface, TransportError,
};

/// Change notifications. A closed subscription means the stream went silent.
pub type Subscription<T> = UnboundedReceiver<T>;

/// Remote session info published by the service client.
pub trait InstanceInfoSource: Send + Sync {
    /// Resolves once the first snapshot has been fetched.
    fn initial_snapshot(&self) -> BoxFuture<'_, Result<SessionInfo, TransportError>>;

    fn snapshot(&self) -> SessionInfo;

    /// Delivers every later snapshot. Deliveries may repeat identical data.
    fn subscribe(&self) -> Subscription<SessionInfo>;
}

/// The two one-shot readiness signals of the remote session.
pub trait IdeReadinessSource: Send + Sync {
    fn content_ready(&self) -> BoxFuture<'_, Result<(), TransportError>>;

    fn ide_ready(&self) -> BoxFuture<'_, Result<Readiness, TransportError>>;
}

/// The in-browser IDE runtime.
pub trait LocalIdeService: Send + Sync {
    fn status(&self) -> LocalIdeStatus;

    fn subscribe(&self) -> Subscription<LocalIdeStatus>;

    /// Idempotent: calling while starting or ready does not restart.
    ///
    /// Failures are also reported through `status()` as `failed` with a cause.
    fn start(&self) -> BoxFuture<'_, Result<(), IdeStartError>>;

    fn stop(&self);
}

/// The page the surfaces live in.
pub trait SurfaceRenderer: Send {
    fn conceal_page(&mut self);

    fn set_title(&mut self, title: &str);

    /// Failure message shown on the loading surface; `None` clears it.
    fn set_failure(&mut self, message: Option<&str>);

    fn create_desktop_panel(&mut self, handoff: &DesktopHandoff);

    /// Hide `from`, reveal `to`.
    fn swap(&mut self, from: Surface, to: Surface);

    /// Remove nodes the full-page IDE attached outside of `keep`.
    fn detach_extraneous(&mut self, keep: Surface);
}

pub trait Navigator: Send + Sync {
    fn open_external(&self, link: &str);

    /// Full-page navigation; the current page is discarded.
    fn reload(&self, url: &str);
}

/// Fire-and-forget event delivery.
pub trait AnalyticsSink: Send + Sync {
    fn track_event(&self, event: AnalyticsEvent);
}

pub trait HeartbeatSink: Send + Sync {
    fn send_heartbeat(&self, instance_id: &str, was_closed: bool);
}

/// Live transport from the page to the remote workspace.
pub trait WorkspaceConnector: Send + Sync {
    fn connect_workspace(&self) -> Box<dyn Connection>;
}

pub trait Connection: Send {
    fn close(self: Box<Self>);
}
