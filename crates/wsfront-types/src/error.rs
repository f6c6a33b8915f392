use std::fmt;

use crate::ide::FailureCause;

/// The remote info stream or a readiness stream disconnected.
///
/// Consumers treat this as "no further transitions": a readiness signal that
/// fails with a transport error simply never became ready.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// The local IDE failed to boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeStartError {
    pub message: String,
    pub stack: Option<String>,
}

impl IdeStartError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: None,
        }
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

impl fmt::Display for IdeStartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IDE start error: {}", self.message)
    }
}

impl std::error::Error for IdeStartError {}

impl From<IdeStartError> for FailureCause {
    fn from(err: IdeStartError) -> Self {
        FailureCause {
            message: err.message,
            stack: err.stack,
        }
    }
}

impl From<&FailureCause> for IdeStartError {
    fn from(cause: &FailureCause) -> Self {
        IdeStartError {
            message: cause.message.clone(),
            stack: cause.stack.clone(),
        }
    }
}
