use revdiff_algorithm_api::{DiffAlgorithm, Edit};
use similar::Algorithm;

use crate::capture::capture_edits;

/// Myers (greedy O(ND)) line diff backed by `similar`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MyersAlgorithm;

impl DiffAlgorithm for MyersAlgorithm {
    fn id(&self) -> &'static str {
        "myers"
    }

    fn label(&self) -> &'static str {
        "Myers (greedy O(ND))"
    }

    fn diff(&self, old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit> {
        capture_edits(Algorithm::Myers, old, new)
    }
}
