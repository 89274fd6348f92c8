// Layerkeys Event Loop
// Reads protocol lines, dispatches them, and reports diagnostics

use std::io;

use crate::command::parse_command;
use crate::dispatch::{DispatchEngine, DispatchError};
use crate::output::KeyInjector;

/// Result type for event loop operations
pub type EventLoopResult<T> = Result<T, EventLoopError>;

/// Errors that end the event loop early
#[derive(Debug, thiserror::Error)]
pub enum EventLoopError {
    #[error("IO error reading input: {0}")]
    Io(#[from] io::Error),
}

/// Counters for one run of the loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read from the source
    pub lines: usize,
    /// Lines that parsed into a button event
    pub events: usize,
    /// Non-fatal conditions reported
    pub diagnostics: usize,
}

/// Drive the engine until the source is exhausted.
///
/// Every line is handled to completion before the next is read. Malformed
/// lines and dispatch problems are logged and counted; only a read error on
/// the source stops the loop early. Whatever the injector still holds is
/// released before returning.
pub fn run_event_loop<S, I>(
    source: S,
    engine: &mut DispatchEngine,
    injector: &mut I,
) -> EventLoopResult<RunSummary>
where
    S: IntoIterator<Item = io::Result<String>>,
    I: KeyInjector + ?Sized,
{
    let mut summary = RunSummary::default();
    let result = dispatch_lines(source, engine, injector, &mut summary);

    if let Err(e) = injector.release_all() {
        log::warn!("Failed to release held keys: {}", e);
    }

    log::debug!(
        "Input finished after {} lines ({} events, {} diagnostics)",
        summary.lines,
        summary.events,
        summary.diagnostics
    );

    result?;
    Ok(summary)
}

fn dispatch_lines<S, I>(
    source: S,
    engine: &mut DispatchEngine,
    injector: &mut I,
    summary: &mut RunSummary,
) -> io::Result<()>
where
    S: IntoIterator<Item = io::Result<String>>,
    I: KeyInjector + ?Sized,
{
    for line in source {
        let line = line?;
        summary.lines += 1;

        let Some(event) = parse_command(&line) else {
            log::warn!("{}", DispatchError::MalformedCommand(line));
            summary.diagnostics += 1;
            continue;
        };

        summary.events += 1;
        summary.diagnostics += engine.process_event(&event, injector).len();
    }
    Ok(())
}
