//! Custom assertions over recorded effects.
//!
//! Provides high-level assertions that make tests more readable:
//! - Surface sequence validation
//! - Analytics phase counting
//! - Effect ordering checks

use anyhow::{Context, Result};
use wsfront_types::Surface;

use crate::recorder::{Observed, Recorder};

/// Assert the exact sequence of visible surfaces, initial one included.
pub fn assert_surfaces(recorder: &Recorder, expected: &[Surface]) -> Result<()> {
    let surfaces = recorder.surfaces();
    if surfaces != expected {
        anyhow::bail!("Expected surfaces {:?}, got {:?}", expected, surfaces);
    }
    Ok(())
}

/// Assert that exactly `expected` analytics events carry `phase`.
pub fn assert_phase_count(recorder: &Recorder, phase: &str, expected: usize) -> Result<()> {
    let phases = recorder.phases();
    let count = phases.iter().filter(|p| *p == phase).count();
    if count != expected {
        anyhow::bail!(
            "Expected {} '{}' events, got {} in {:?}",
            expected,
            phase,
            count,
            phases
        );
    }
    Ok(())
}

/// Assert that the first entry matching `first` precedes the first entry
/// matching `then`.
pub fn assert_before(
    recorder: &Recorder,
    first: impl Fn(&Observed) -> bool,
    then: impl Fn(&Observed) -> bool,
) -> Result<()> {
    let a = recorder
        .position(first)
        .context("First effect was never recorded")?;
    let b = recorder
        .position(then)
        .context("Second effect was never recorded")?;
    if a >= b {
        anyhow::bail!("Expected effect #{} to precede effect #{}", a, b);
    }
    Ok(())
}

/// Assert that the last analytics event with `phase` carries `error`.
pub fn assert_event_error(recorder: &Recorder, phase: &str, error: &str) -> Result<()> {
    let events = recorder.events();
    let event = events
        .iter()
        .rev()
        .find(|event| event.phase() == Some(phase))
        .with_context(|| format!("No '{}' event recorded", phase))?;
    let actual = event
        .property("error")
        .with_context(|| format!("'{}' event has no error property", phase))?;
    if actual != error {
        anyhow::bail!("Expected error {:?}, got {:?}", error, actual);
    }
    Ok(())
}
