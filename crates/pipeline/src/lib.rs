//! Orchestrates a run: dedup against existing notes, bounded-parallel
//! extraction, note persistence.

pub mod dedup;
pub mod run;

pub use dedup::DedupIndex;
pub use run::{qualify, throttle_every, Pipeline, RunOptions, RunSummary, Throttle};
