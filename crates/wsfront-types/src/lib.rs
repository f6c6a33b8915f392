pub mod analytics;
pub mod error;
pub mod ide;
pub mod presentation;
pub mod session;

pub use analytics::*;
pub use error::{IdeStartError, TransportError};
pub use ide::*;
pub use presentation::*;
pub use session::*;
