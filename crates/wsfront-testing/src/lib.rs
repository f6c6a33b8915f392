//! Testing infrastructure for wsfront integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `SessionWorld`: Fluent interface for declarative session setup
//! - `recorder`: A collaborator that records every page-side effect in order
//! - `assertions`: Custom assertions over recorded effects
//! - `fixtures`: Session snapshots and scenario files
//! - `cli`: Isolated environment for running the `wsfront` binary

pub mod assertions;
pub mod cli;
pub mod fixtures;
pub mod recorder;
pub mod world;

pub use recorder::{Observed, Recorder};
pub use world::{RunningWorld, SessionWorld};
