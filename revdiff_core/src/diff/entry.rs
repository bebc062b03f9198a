use std::path::{Path, PathBuf};

use revdiff_api::{ChangeRecord, ChangeType, Edit, EditKind};

/// A changed path together with its resolved edit list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffEntry {
    root: PathBuf,
    record: ChangeRecord,
    edits: Vec<Edit>,
}

impl DiffEntry {
    /// Wrap a change record and its edits. `root` anchors relative paths.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, record: ChangeRecord, edits: Vec<Edit>) -> Self {
        Self {
            root: root.into(),
            record,
            edits,
        }
    }

    /// Working tree root the record's paths are relative to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The underlying change record.
    #[must_use]
    pub const fn record(&self) -> &ChangeRecord {
        &self.record
    }

    /// Edits in ascending order.
    #[must_use]
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Whether the change only removes lines.
    ///
    /// Deleted files always qualify. Otherwise every edit must be a deletion;
    /// an entry without edits does not qualify.
    #[must_use]
    pub fn is_delete_only(&self) -> bool {
        if self.record.change_type() == ChangeType::Delete {
            return true;
        }
        !self.edits.is_empty() && self.edits.iter().all(|edit| edit.kind() == EditKind::Delete)
    }

    /// Absolute location of the new file.
    ///
    /// Deleted files have no new location, so their old path is used.
    #[must_use]
    pub fn absolute_new_path(&self) -> PathBuf {
        self.root.join(self.record.path())
    }
}
