// wsfront CLI
//
// `simulate` replays a scripted session through the real runtime with
// in-memory collaborators and prints every page-side effect in order.
// `compute` evaluates the presentation state machine alone, step by step.
// Both exist to inspect supervisor decisions without a browser.

mod args;
mod commands;
mod handlers;
pub mod console;
pub mod logging;
pub mod scenario;
pub mod types;

pub use args::{Cli, Commands, ConfigCommand};
pub use commands::run;
