//! Index answering "is line N of file F part of the change?".

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use revdiff_api::{Edit, EditKind};
use tracing::warn;

use crate::diff::DiffEntry;

/// Anything anchored to a line of a file, such as a lint finding.
pub trait LineLocated {
    /// Absolute path of the file.
    fn file(&self) -> &Path;

    /// 1-based line number.
    fn line(&self) -> u32;
}

/// Immutable index from absolute file path to that file's edits.
///
/// Built once per diff run; safe to query from many threads at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMembershipFilter {
    files: HashMap<PathBuf, Vec<Edit>>,
}

impl LineMembershipFilter {
    /// Index the entries of one diff run by their absolute new path.
    ///
    /// When two entries map to the same path the later one wins.
    pub fn build<'a>(entries: impl IntoIterator<Item = &'a DiffEntry>) -> Self {
        let mut files = HashMap::new();
        for entry in entries {
            let path = entry.absolute_new_path();
            if files.contains_key(&path) {
                warn!(
                    path = %path.display(),
                    "multiple diff entries share a path; keeping the last"
                );
            }
            files.insert(path, entry.edits().to_vec());
        }
        Self { files }
    }

    /// Whether 1-based `line` of `path` was added or modified.
    ///
    /// Unknown files report `false`, as do lines only touched by deletions.
    #[must_use]
    pub fn is_changed_line(&self, path: impl AsRef<Path>, line: u32) -> bool {
        self.files
            .get(path.as_ref())
            .is_some_and(|edits| edits.iter().any(|edit| edit.anchors_new_line(line)))
    }

    /// Whether the index holds an entry for `path`.
    #[must_use]
    pub fn contains_file(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(path.as_ref())
    }

    /// The 1-based, inclusive line ranges of `path` that count as changed.
    #[must_use]
    pub fn changed_ranges(&self, path: impl AsRef<Path>) -> Vec<RangeInclusive<u32>> {
        self.files
            .get(path.as_ref())
            .map(|edits| {
                edits
                    .iter()
                    .filter(|edit| matches!(edit.kind(), EditKind::Insert | EditKind::Replace))
                    .map(|edit| edit.begin_new + 1..=edit.end_new)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of indexed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether `item` sits on a changed line.
    #[must_use]
    pub fn accept<T: LineLocated + ?Sized>(&self, item: &T) -> bool {
        self.is_changed_line(item.file(), item.line())
    }

    /// Keep only the items that sit on changed lines.
    #[must_use]
    pub fn retain_changed<T: LineLocated>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().filter(|item| self.accept(item)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revdiff_api::{ChangeRecord, ChangeSide, EntryMode};

    const ID: &str = "4444444444444444444444444444444444444444";

    fn entry(path: &str, edits: Vec<Edit>) -> DiffEntry {
        let record = ChangeRecord::modify(
            ChangeSide::new(path, EntryMode::Regular, ID),
            EntryMode::Regular,
            ID,
        );
        DiffEntry::new("/repo", record, edits)
    }

    struct Finding {
        file: PathBuf,
        line: u32,
    }

    impl LineLocated for Finding {
        fn file(&self) -> &Path {
            &self.file
        }

        fn line(&self) -> u32 {
            self.line
        }
    }

    #[test]
    fn boundary_is_exclusive_begin_inclusive_end() {
        let filter = LineMembershipFilter::build(&[entry(
            "a.txt",
            vec![Edit::new(1, 2, 1, 2), Edit::new(3, 3, 3, 4)],
        )]);

        assert!(!filter.is_changed_line("/repo/a.txt", 1));
        assert!(filter.is_changed_line("/repo/a.txt", 2));
        assert!(!filter.is_changed_line("/repo/a.txt", 3));
        assert!(filter.is_changed_line("/repo/a.txt", 4));
        assert!(!filter.is_changed_line("/repo/a.txt", 5));
        assert!(!filter.is_changed_line("/repo/a.txt", 0));
    }

    #[test]
    fn unknown_path_is_unchanged() {
        let filter =
            LineMembershipFilter::build(&[entry("a.txt", vec![Edit::new(0, 0, 0, 3)])]);
        assert!(!filter.is_changed_line("/repo/b.txt", 1));
        assert!(!filter.is_changed_line("a.txt", 1));
        assert!(!filter.contains_file("/repo/b.txt"));
    }

    #[test]
    fn deletions_never_mark_lines() {
        let filter =
            LineMembershipFilter::build(&[entry("a.txt", vec![Edit::new(2, 5, 2, 2)])]);
        assert!(filter.contains_file("/repo/a.txt"));
        assert!((0..8).all(|line| !filter.is_changed_line("/repo/a.txt", line)));
        assert!(filter.changed_ranges("/repo/a.txt").is_empty());
    }

    #[test]
    fn later_entry_wins_on_collision() {
        let filter = LineMembershipFilter::build(&[
            entry("a.txt", vec![Edit::new(0, 0, 0, 1)]),
            entry("a.txt", vec![Edit::new(4, 4, 4, 5)]),
        ]);
        assert_eq!(filter.len(), 1);
        assert!(!filter.is_changed_line("/repo/a.txt", 1));
        assert!(filter.is_changed_line("/repo/a.txt", 5));
    }

    #[test]
    fn changed_ranges_are_one_based() {
        let filter = LineMembershipFilter::build(&[entry(
            "a.txt",
            vec![Edit::new(0, 0, 0, 2), Edit::new(5, 6, 7, 7), Edit::new(8, 9, 9, 12)],
        )]);
        assert_eq!(filter.changed_ranges("/repo/a.txt"), vec![1..=2, 10..=12]);
    }

    #[test]
    fn retain_changed_drops_findings_on_old_lines() {
        let filter =
            LineMembershipFilter::build(&[entry("lib.rs", vec![Edit::new(9, 9, 9, 11)])]);
        let findings = vec![
            Finding {
                file: "/repo/lib.rs".into(),
                line: 3,
            },
            Finding {
                file: "/repo/lib.rs".into(),
                line: 10,
            },
            Finding {
                file: "/repo/other.rs".into(),
                line: 10,
            },
        ];

        let kept = filter.retain_changed(findings);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].line, 10);
        assert!(filter.accept(&kept[0]));
    }

    #[test]
    fn empty_filter() {
        let filter = LineMembershipFilter::build(&Vec::<DiffEntry>::new());
        assert!(filter.is_empty());
        assert!(!filter.is_changed_line("/repo/a.txt", 1));
    }

    #[test]
    fn filter_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LineMembershipFilter>();
    }
}
