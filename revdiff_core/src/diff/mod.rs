//! Per-file edit computation and the engine that orchestrates a diff run.

mod calculator;
mod engine;
mod entry;

pub use calculator::EditCalculator;
pub use engine::DiffEngine;
pub use entry::DiffEntry;
