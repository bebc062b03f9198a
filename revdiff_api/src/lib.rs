//! Shared revdiff data models consumed by the core library and algorithm crates.

pub mod change;
pub mod edit;

pub use change::*;
pub use edit::*;
