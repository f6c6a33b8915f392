use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::collaborators::HeartbeatSink;
use crate::config::HeartbeatConfig;

/// Last time the user interacted with the page.
#[derive(Debug, Clone, Default)]
pub struct ActivityClock {
    last: Arc<Mutex<Option<Instant>>>,
}

impl ActivityClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());
    }

    pub fn active_within(&self, window: Duration) -> bool {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|last| last.elapsed() <= window)
    }
}

struct Armed {
    instance_id: String,
    timer: JoinHandle<()>,
}

/// Periodic liveness pings for one workspace instance.
///
/// At most one timer exists at any time. Arming for a different instance
/// aborts the previous timer before the new one is spawned.
pub struct HeartbeatScheduler {
    sink: Arc<dyn HeartbeatSink>,
    activity: ActivityClock,
    config: HeartbeatConfig,
    armed: Option<Armed>,
}

impl HeartbeatScheduler {
    pub fn new(
        sink: Arc<dyn HeartbeatSink>,
        activity: ActivityClock,
        config: HeartbeatConfig,
    ) -> Self {
        Self {
            sink,
            activity,
            config,
            armed: None,
        }
    }

    pub fn armed_instance(&self) -> Option<&str> {
        self.armed.as_ref().map(|armed| armed.instance_id.as_str())
    }

    pub fn record_activity(&self) {
        self.activity.record();
    }

    /// Arm for `instance_id`. No-op if already armed for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, instance_id: &str) {
        if self.armed_instance() == Some(instance_id) {
            return;
        }
        self.cancel();

        info!(instance_id, "heartbeat armed");
        let timer = tokio::spawn(beat(
            instance_id.to_string(),
            Arc::clone(&self.sink),
            self.activity.clone(),
            self.config.interval(),
            self.config.activity_window(),
        ));
        self.armed = Some(Armed {
            instance_id: instance_id.to_string(),
            timer,
        });
    }

    pub fn cancel(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.timer.abort();
            debug!(instance_id = %armed.instance_id, "heartbeat cancelled");
        }
    }

    /// Final heartbeat before the page goes away, then disarm.
    pub fn close(&mut self) {
        if let Some(armed) = self.armed.take() {
            armed.timer.abort();
            self.sink.send_heartbeat(&armed.instance_id, true);
            debug!(instance_id = %armed.instance_id, "heartbeat closed");
        }
    }
}

impl Drop for HeartbeatScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn beat(
    instance_id: String,
    sink: Arc<dyn HeartbeatSink>,
    activity: ActivityClock,
    interval: Duration,
    activity_window: Duration,
) {
    sink.send_heartbeat(&instance_id, false);

    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        // idle users do not keep the workspace alive
        if activity.active_within(activity_window) {
            sink.send_heartbeat(&instance_id, false);
        }
    }
}
