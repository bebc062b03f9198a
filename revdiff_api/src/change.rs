use serde::{Deserialize, Serialize};

/// Kind of change a path underwent between two revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Path only exists on the new side.
    Add,
    /// Path exists on both sides with different content or mode.
    Modify,
    /// Path only exists on the old side.
    Delete,
    /// Content moved from `old_path` to `new_path`.
    Rename,
    /// Content of `old_path` was duplicated into `new_path`.
    Copy,
}

/// File mode of one side of a change record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// The side does not exist.
    #[default]
    Missing,
    /// A directory entry.
    Tree,
    /// Regular, non-executable file.
    Regular,
    /// Executable file.
    Executable,
    /// Symbolic link whose blob holds the link target.
    Symlink,
    /// Link to a commit of another repository (submodule).
    Gitlink,
}

impl EntryMode {
    /// Convert a raw git file mode (e.g. `0o100644`).
    ///
    /// Unknown blob-like modes (such as the legacy group-writable `0o100664`)
    /// are treated as regular files.
    #[must_use]
    pub const fn from_raw(mode: u32) -> Self {
        match mode & 0o170_000 {
            0 => Self::Missing,
            0o040_000 => Self::Tree,
            0o120_000 => Self::Symlink,
            0o160_000 => Self::Gitlink,
            _ if mode & 0o111 != 0 => Self::Executable,
            _ => Self::Regular,
        }
    }

    /// Returns the canonical raw git mode.
    #[must_use]
    pub const fn raw(self) -> u32 {
        match self {
            Self::Missing => 0,
            Self::Tree => 0o040_000,
            Self::Regular => 0o100_644,
            Self::Executable => 0o100_755,
            Self::Symlink => 0o120_000,
            Self::Gitlink => 0o160_000,
        }
    }

    /// Whether the mode is backed by a blob object.
    #[must_use]
    pub const fn is_blob(self) -> bool {
        matches!(self, Self::Regular | Self::Executable | Self::Symlink)
    }
}

/// One side (old or new) of a change record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSide {
    /// Path relative to the repository root.
    pub path: String,
    /// Mode of the entry on this side.
    pub mode: EntryMode,
    /// Full hexadecimal object id of the entry.
    pub id: String,
}

impl ChangeSide {
    /// Construct a side from its parts.
    #[must_use]
    pub fn new(path: impl Into<String>, mode: EntryMode, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mode,
            id: id.into(),
        }
    }
}

/// A single changed path between two revisions.
///
/// Records are immutable once constructed; the constructors guarantee that
/// `old_path == new_path` unless the change is a rename or copy, that deletes
/// carry no new side and that additions carry no old side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    change_type: ChangeType,
    #[serde(default)]
    old: Option<ChangeSide>,
    #[serde(default)]
    new: Option<ChangeSide>,
    #[serde(default)]
    similarity: Option<u8>,
}

impl ChangeRecord {
    /// Record for a path that only exists on the new side.
    #[must_use]
    pub const fn add(new: ChangeSide) -> Self {
        Self {
            change_type: ChangeType::Add,
            old: None,
            new: Some(new),
            similarity: None,
        }
    }

    /// Record for a path that only exists on the old side.
    #[must_use]
    pub const fn delete(old: ChangeSide) -> Self {
        Self {
            change_type: ChangeType::Delete,
            old: Some(old),
            new: None,
            similarity: None,
        }
    }

    /// Record for an in-place modification. The new side reuses the old path.
    #[must_use]
    pub fn modify(old: ChangeSide, new_mode: EntryMode, new_id: impl Into<String>) -> Self {
        let new = ChangeSide::new(old.path.clone(), new_mode, new_id);
        Self {
            change_type: ChangeType::Modify,
            old: Some(old),
            new: Some(new),
            similarity: None,
        }
    }

    /// Record for a rename with the given similarity percentage.
    #[must_use]
    pub fn rename(old: ChangeSide, new: ChangeSide, similarity: u8) -> Self {
        Self {
            change_type: ChangeType::Rename,
            old: Some(old),
            new: Some(new),
            similarity: Some(similarity.min(100)),
        }
    }

    /// Record for a copy with the given similarity percentage.
    #[must_use]
    pub fn copy(old: ChangeSide, new: ChangeSide, similarity: u8) -> Self {
        Self {
            change_type: ChangeType::Copy,
            old: Some(old),
            new: Some(new),
            similarity: Some(similarity.min(100)),
        }
    }

    /// Kind of change.
    #[must_use]
    pub const fn change_type(&self) -> ChangeType {
        self.change_type
    }

    /// Old side, absent for additions.
    #[must_use]
    pub const fn old(&self) -> Option<&ChangeSide> {
        self.old.as_ref()
    }

    /// New side, absent for deletions.
    #[must_use]
    pub const fn new_side(&self) -> Option<&ChangeSide> {
        self.new.as_ref()
    }

    /// Old path, absent for additions.
    #[must_use]
    pub fn old_path(&self) -> Option<&str> {
        self.old.as_ref().map(|side| side.path.as_str())
    }

    /// New path, absent for deletions.
    #[must_use]
    pub fn new_path(&self) -> Option<&str> {
        self.new.as_ref().map(|side| side.path.as_str())
    }

    /// Mode of the old side, `Missing` for additions.
    #[must_use]
    pub fn old_mode(&self) -> EntryMode {
        self.old.as_ref().map_or(EntryMode::Missing, |side| side.mode)
    }

    /// Mode of the new side, `Missing` for deletions.
    #[must_use]
    pub fn new_mode(&self) -> EntryMode {
        self.new.as_ref().map_or(EntryMode::Missing, |side| side.mode)
    }

    /// Similarity percentage, only present for renames and copies.
    #[must_use]
    pub const fn similarity(&self) -> Option<u8> {
        self.similarity
    }

    /// The path that best identifies this record: the new path, or the old
    /// path for deletions.
    #[must_use]
    pub fn path(&self) -> &str {
        self.new
            .as_ref()
            .or(self.old.as_ref())
            .map_or("", |side| side.path.as_str())
    }
}
