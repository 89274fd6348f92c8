// Layerkeys Event Handling
// Line-oriented event source and the loop that drives the dispatch engine

pub mod r#loop;
pub mod source;

pub use r#loop::{run_event_loop, EventLoopError, EventLoopResult, RunSummary};
pub use source::LineSource;
