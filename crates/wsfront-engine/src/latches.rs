/// One-way flags scoped to a single frontend session.
///
/// Created when the session starts and discarded with it (reload or
/// navigation). No setter can clear a flag once it is raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLatches {
    saw_stopped: bool,
    prefer_local: bool,
    desktop_panel_created: bool,
    reload_requested: bool,
}

impl SessionLatches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saw_stopped(&self) -> bool {
        self.saw_stopped
    }

    pub fn prefer_local(&self) -> bool {
        self.prefer_local
    }

    pub fn desktop_panel_created(&self) -> bool {
        self.desktop_panel_created
    }

    pub fn reload_requested(&self) -> bool {
        self.reload_requested
    }

    pub fn mark_stopped(&mut self) {
        self.saw_stopped = true;
    }

    /// The user chose the web IDE over the desktop hand-off.
    pub fn choose_local(&mut self) {
        self.prefer_local = true;
    }

    /// Returns true only for the call that raised the flag.
    pub fn claim_desktop_panel(&mut self) -> bool {
        !std::mem::replace(&mut self.desktop_panel_created, true)
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latches_start_lowered() {
        let latches = SessionLatches::new();
        assert!(!latches.saw_stopped());
        assert!(!latches.prefer_local());
        assert!(!latches.desktop_panel_created());
        assert!(!latches.reload_requested());
    }

    #[test]
    fn test_desktop_panel_claimed_once() {
        let mut latches = SessionLatches::new();
        assert!(latches.claim_desktop_panel());
        assert!(!latches.claim_desktop_panel());
        assert!(!latches.claim_desktop_panel());
        assert!(latches.desktop_panel_created());
    }

    #[test]
    fn test_raising_twice_keeps_flag() {
        let mut latches = SessionLatches::new();
        latches.choose_local();
        latches.choose_local();
        latches.mark_stopped();
        latches.request_reload();
        assert!(latches.prefer_local());
        assert!(latches.saw_stopped());
        assert!(latches.reload_requested());
    }
}
