use revdiff_algorithm_api::{DiffAlgorithm, Edit};
use similar::Algorithm;

use crate::capture::capture_edits;

/// Patience line diff backed by `similar`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatienceAlgorithm;

impl DiffAlgorithm for PatienceAlgorithm {
    fn id(&self) -> &'static str {
        "patience"
    }

    fn label(&self) -> &'static str {
        "Patience"
    }

    fn diff(&self, old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit> {
        capture_edits(Algorithm::Patience, old, new)
    }
}
