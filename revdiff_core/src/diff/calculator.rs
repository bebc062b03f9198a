use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use revdiff_algorithm_api::{split_lines, DiffAlgorithm, LineComparator};
use revdiff_api::Edit;

/// Computes the ordered edit list between two contents of one file.
///
/// The line-diff strategy and the line equivalence policy are injected, so
/// the same calculator can run Myers with exact matching or patience while
/// ignoring whitespace.
#[derive(Clone)]
pub struct EditCalculator {
    algorithm: Arc<dyn DiffAlgorithm>,
    comparator: LineComparator,
}

impl EditCalculator {
    /// Construct a calculator from a strategy and a comparator.
    #[must_use]
    pub fn new(algorithm: Arc<dyn DiffAlgorithm>, comparator: LineComparator) -> Self {
        Self {
            algorithm,
            comparator,
        }
    }

    /// The active line-diff strategy.
    #[must_use]
    pub fn algorithm(&self) -> &dyn DiffAlgorithm {
        self.algorithm.as_ref()
    }

    /// The active line equivalence policy.
    #[must_use]
    pub const fn comparator(&self) -> LineComparator {
        self.comparator
    }

    /// Compute the edits turning `old` into `new`.
    ///
    /// Empty old content yields a single insertion spanning every new line
    /// and empty new content a single deletion spanning every old line.
    #[must_use]
    pub fn compute(&self, old: &[u8], new: &[u8]) -> Vec<Edit> {
        if old == new {
            return Vec::new();
        }

        let old_lines = split_lines(old);
        let new_lines = split_lines(new);
        if old_lines.is_empty() || new_lines.is_empty() {
            return vec![Edit::new(
                0,
                line_count(&old_lines),
                0,
                line_count(&new_lines),
            )];
        }

        let old_keys = self.keys(&old_lines);
        let new_keys = self.keys(&new_lines);
        let old_refs: Vec<&[u8]> = old_keys.iter().map(|key| &**key).collect();
        let new_refs: Vec<&[u8]> = new_keys.iter().map(|key| &**key).collect();
        self.algorithm.diff(&old_refs, &new_refs)
    }

    fn keys<'a>(&self, lines: &[&'a [u8]]) -> Vec<Cow<'a, [u8]>> {
        lines
            .iter()
            .map(|&line| self.comparator.normalize(line))
            .collect()
    }
}

fn line_count(lines: &[&[u8]]) -> u32 {
    u32::try_from(lines.len()).unwrap_or(u32::MAX)
}

impl fmt::Debug for EditCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditCalculator")
            .field("algorithm", &self.algorithm.id())
            .field("comparator", &self.comparator)
            .finish()
    }
}
