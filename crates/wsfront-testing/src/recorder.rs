//! Recording collaborator.
//!
//! A single `Recorder` stands in for the page (renderer and navigator), the
//! analytics sink and the heartbeat sink, so that the relative order of all
//! observable effects can be asserted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use wsfront_runtime::{AnalyticsSink, HeartbeatSink, Navigator, SurfaceRenderer};
use wsfront_types::{AnalyticsEvent, DesktopHandoff, Surface};

/// One observable effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    Concealed,
    Title(String),
    Failure(Option<String>),
    DesktopPanel(DesktopHandoff),
    Swap { from: Surface, to: Surface },
    Detached { keep: Surface },
    OpenExternal(String),
    Navigate(String),
    Event(AnalyticsEvent),
    Heartbeat { instance_id: String, was_closed: bool },
}

#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Arc<Mutex<Vec<Observed>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> MutexGuard<'_, Vec<Observed>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, observed: Observed) {
        self.log().push(observed);
    }

    /// Everything recorded so far, in order.
    pub fn entries(&self) -> Vec<Observed> {
        self.log().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<Observed> {
        std::mem::take(&mut *self.log())
    }

    /// Visible surface after each swap, starting with the initial one.
    pub fn surfaces(&self) -> Vec<Surface> {
        let mut surfaces = vec![Surface::Loading];
        surfaces.extend(self.entries().into_iter().filter_map(|o| match o {
            Observed::Swap { to, .. } => Some(to),
            _ => None,
        }));
        surfaces
    }

    pub fn current_surface(&self) -> Surface {
        self.surfaces().last().copied().unwrap_or_default()
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.entries()
            .into_iter()
            .filter_map(|o| match o {
                Observed::Event(event) => Some(event),
                _ => None,
            })
            .collect()
    }

    /// `phase` property of every analytics event.
    pub fn phases(&self) -> Vec<String> {
        self.events()
            .iter()
            .filter_map(|event| event.phase().map(str::to_string))
            .collect()
    }

    pub fn heartbeats(&self) -> Vec<(String, bool)> {
        self.entries()
            .into_iter()
            .filter_map(|o| match o {
                Observed::Heartbeat {
                    instance_id,
                    was_closed,
                } => Some((instance_id, was_closed)),
                _ => None,
            })
            .collect()
    }

    /// Remove heartbeats from the log and return them.
    pub fn take_heartbeats(&self) -> Vec<(String, bool)> {
        let mut log = self.log();
        let mut taken = Vec::new();
        log.retain(|o| match o {
            Observed::Heartbeat {
                instance_id,
                was_closed,
            } => {
                taken.push((instance_id.clone(), *was_closed));
                false
            }
            _ => true,
        });
        taken
    }

    pub fn opened_links(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|o| match o {
                Observed::OpenExternal(link) => Some(link),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter_map(|o| match o {
                Observed::Navigate(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    /// Failure message currently displayed on the loading surface.
    pub fn displayed_failure(&self) -> Option<String> {
        self.entries()
            .into_iter()
            .filter_map(|o| match o {
                Observed::Failure(message) => Some(message),
                _ => None,
            })
            .last()
            .flatten()
    }

    /// Index of the first entry matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&Observed) -> bool) -> Option<usize> {
        self.entries().iter().position(predicate)
    }
}

impl SurfaceRenderer for Recorder {
    fn conceal_page(&mut self) {
        self.push(Observed::Concealed);
    }

    fn set_title(&mut self, title: &str) {
        self.push(Observed::Title(title.to_string()));
    }

    fn set_failure(&mut self, message: Option<&str>) {
        self.push(Observed::Failure(message.map(str::to_string)));
    }

    fn create_desktop_panel(&mut self, handoff: &DesktopHandoff) {
        self.push(Observed::DesktopPanel(handoff.clone()));
    }

    fn swap(&mut self, from: Surface, to: Surface) {
        self.push(Observed::Swap { from, to });
    }

    fn detach_extraneous(&mut self, keep: Surface) {
        self.push(Observed::Detached { keep });
    }
}

impl Navigator for Recorder {
    fn open_external(&self, link: &str) {
        self.push(Observed::OpenExternal(link.to_string()));
    }

    fn reload(&self, url: &str) {
        self.push(Observed::Navigate(url.to_string()));
    }
}

impl AnalyticsSink for Recorder {
    fn track_event(&self, event: AnalyticsEvent) {
        self.push(Observed::Event(event));
    }
}

impl HeartbeatSink for Recorder {
    fn send_heartbeat(&self, instance_id: &str, was_closed: bool) {
        self.push(Observed::Heartbeat {
            instance_id: instance_id.to_string(),
            was_closed,
        });
    }
}
