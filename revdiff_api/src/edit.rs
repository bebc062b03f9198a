use serde::{Deserialize, Serialize};

/// Shape of an [`Edit`], derived from which of its ranges are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Lines only present in the new content.
    Insert,
    /// Lines only present in the old content.
    Delete,
    /// Old lines replaced by new lines.
    Replace,
    /// Both ranges are empty.
    Empty,
}

/// A contiguous line-range transformation between two contents.
///
/// Ranges are zero-based and half-open: `[begin_old, end_old)` in the old
/// content maps to `[begin_new, end_new)` in the new content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    /// First old line covered by the edit.
    pub begin_old: u32,
    /// One past the last old line covered by the edit.
    pub end_old: u32,
    /// First new line covered by the edit.
    pub begin_new: u32,
    /// One past the last new line covered by the edit.
    pub end_new: u32,
}

impl Edit {
    /// Construct an edit from its four bounds.
    #[must_use]
    pub const fn new(begin_old: u32, end_old: u32, begin_new: u32, end_new: u32) -> Self {
        Self {
            begin_old,
            end_old,
            begin_new,
            end_new,
        }
    }

    /// Classify the edit.
    #[must_use]
    pub const fn kind(&self) -> EditKind {
        match (self.begin_old < self.end_old, self.begin_new < self.end_new) {
            (false, true) => EditKind::Insert,
            (true, false) => EditKind::Delete,
            (true, true) => EditKind::Replace,
            (false, false) => EditKind::Empty,
        }
    }

    /// Number of old lines covered.
    #[must_use]
    pub const fn old_len(&self) -> u32 {
        self.end_old.saturating_sub(self.begin_old)
    }

    /// Number of new lines covered.
    #[must_use]
    pub const fn new_len(&self) -> u32 {
        self.end_new.saturating_sub(self.begin_new)
    }

    /// Whether the 1-based new-side `line` falls inside this edit.
    ///
    /// `begin_new` is a zero-based insertion point, so the matching human
    /// line numbers are `begin_new + 1 ..= end_new`. Pure deletions never
    /// anchor a line.
    #[must_use]
    pub const fn anchors_new_line(&self, line: u32) -> bool {
        !matches!(self.kind(), EditKind::Delete) && self.begin_new < line && line <= self.end_new
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_empty_ranges() {
        assert_eq!(Edit::new(3, 3, 3, 4).kind(), EditKind::Insert);
        assert_eq!(Edit::new(1, 2, 1, 1).kind(), EditKind::Delete);
        assert_eq!(Edit::new(1, 2, 1, 2).kind(), EditKind::Replace);
        assert_eq!(Edit::new(5, 5, 7, 7).kind(), EditKind::Empty);
    }

    #[test]
    fn anchors_exclusive_begin_inclusive_end() {
        let edit = Edit::new(1, 2, 1, 3);
        assert!(!edit.anchors_new_line(1));
        assert!(edit.anchors_new_line(2));
        assert!(edit.anchors_new_line(3));
        assert!(!edit.anchors_new_line(4));
    }

    #[test]
    fn deletions_never_anchor() {
        let edit = Edit::new(0, 4, 2, 2);
        assert!((0..6).all(|line| !edit.anchors_new_line(line)));
    }

    #[test]
    fn lengths() {
        let edit = Edit::new(2, 5, 2, 3);
        assert_eq!(edit.old_len(), 3);
        assert_eq!(edit.new_len(), 1);
    }
}
