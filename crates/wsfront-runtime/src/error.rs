use std::fmt;
use std::time::Duration;

use wsfront_types::{IdeStartError, TransportError};

/// Result type for wsfront-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
///
/// None of these is fatal to the page; the supervisor reports them and keeps
/// showing the loading surface.
#[derive(Debug)]
pub enum Error {
    /// A one-shot readiness signal did not resolve within the configured bound
    ReadinessTimeout {
        signal: &'static str,
        waited: Duration,
    },

    /// Remote info or readiness stream disconnected
    Transport(TransportError),

    /// Local IDE failed to boot
    IdeStart(IdeStartError),

    /// Configuration error
    Config(String),

    /// IO operation failed
    Io(std::io::Error),

    /// A supervisor task panicked or was cancelled
    Task(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadinessTimeout { signal, waited } => write!(
                f,
                "Readiness timeout: '{}' did not resolve within {}s",
                signal,
                waited.as_secs()
            ),
            Error::Transport(err) => write!(f, "{}", err),
            Error::IdeStart(err) => write!(f, "{}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Task(msg) => write!(f, "Task error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Transport(err) => Some(err),
            Error::IdeStart(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::ReadinessTimeout { .. } | Error::Config(_) | Error::Task(_) => None,
        }
    }
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        Error::Transport(err)
    }
}

impl From<IdeStartError> for Error {
    fn from(err: IdeStartError) -> Self {
        Error::IdeStart(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}
