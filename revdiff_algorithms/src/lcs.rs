use revdiff_algorithm_api::{DiffAlgorithm, Edit};
use similar::Algorithm;

use crate::capture::capture_edits;

/// Longest common subsequence line diff backed by `similar`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LcsAlgorithm;

impl DiffAlgorithm for LcsAlgorithm {
    fn id(&self) -> &'static str {
        "lcs"
    }

    fn label(&self) -> &'static str {
        "Longest common subsequence"
    }

    fn diff(&self, old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit> {
        capture_edits(Algorithm::Lcs, old, new)
    }
}
