use wsfront_types::{LocalIdeStatus, Presentation, StatusTag};

/// Analytics tag for the logical state reached by a recomputation.
pub fn status_tag(presentation: &Presentation, ide: &LocalIdeStatus) -> StatusTag {
    if presentation.must_reload {
        StatusTag::Reload
    } else {
        StatusTag::Ide(ide.state)
    }
}

/// Error payload attached to a status event while the local IDE reports a failure.
pub fn status_error(ide: &LocalIdeStatus) -> Option<String> {
    ide.failure_cause.as_ref().map(|cause| cause.report())
}

/// Remembers the last emitted tag so repeated deliveries of the same state
/// produce a single analytics event.
#[derive(Debug, Default)]
pub struct StatusTracker {
    last: Option<StatusTag>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when `tag` differs from the previously observed one.
    pub fn observe(&mut self, tag: StatusTag) -> bool {
        if self.last == Some(tag) {
            return false;
        }
        self.last = Some(tag);
        true
    }

    pub fn last(&self) -> Option<StatusTag> {
        self.last
    }
}
