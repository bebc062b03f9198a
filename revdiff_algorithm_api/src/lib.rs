mod comparator;
mod registry;

pub use comparator::{split_lines, LineComparator};
pub use registry::AlgorithmRegistry;
pub use revdiff_api::{Edit, EditKind};

/// Trait implemented by line-diff strategies (e.g., Myers).
pub trait DiffAlgorithm: Send + Sync {
    /// Stable identifier used for lookup and logging.
    fn id(&self) -> &'static str;

    /// Human-friendly label.
    fn label(&self) -> &'static str;

    /// Compute the edits turning `old` into `new`.
    ///
    /// Lines are already normalized by the active [`LineComparator`], so two
    /// lines are equal exactly when their byte slices are equal.
    /// Implementations must be deterministic and return edits in ascending
    /// order without overlap; a deletion directly followed by an insertion is
    /// reported as a single [`EditKind::Replace`] edit.
    fn diff(&self, old: &[&[u8]], new: &[&[u8]]) -> Vec<Edit>;
}
