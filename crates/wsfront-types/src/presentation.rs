use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ide::LocalIdeState;

/// The surface visible to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Loading,
    DesktopHandoff,
    /// The full-page in-browser IDE.
    LocalIde,
}

impl Surface {
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Loading => "loading",
            Surface::DesktopHandoff => "desktop_handoff",
            Surface::LocalIde => "local_ide",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived presentation for one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Presentation {
    pub surface: Surface,
    pub must_reload: bool,
}

impl Presentation {
    pub const LOADING: Presentation = Presentation {
        surface: Surface::Loading,
        must_reload: false,
    };

    pub fn show(surface: Surface) -> Self {
        Self {
            surface,
            must_reload: false,
        }
    }

    pub fn reload() -> Self {
        Self {
            surface: Surface::Loading,
            must_reload: true,
        }
    }
}

/// Phase tag attached to `status_rendered` analytics events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusTag {
    Ide(LocalIdeState),
    Reload,
    WindowUnload,
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusTag::Ide(state) => write!(f, "ide-{}", state),
            StatusTag::Reload => f.write_str("reload"),
            StatusTag::WindowUnload => f.write_str("window-unload"),
        }
    }
}

impl Serialize for StatusTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
