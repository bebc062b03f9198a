//! Repository access built on top of libgit2: revision resolution, change
//! detection, staged-content status and blob loading.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use git2::{
    Delta, DiffDelta, DiffFile, DiffFindOptions, DiffOptions, ErrorClass, ErrorCode, FileMode,
    Oid, Repository as GitRepository, Status, StatusOptions, Tree,
};
use revdiff_api::{ChangeRecord, ChangeSide, EntryMode};
use tracing::{debug, info};

use crate::{config::DiffConfig, content::Content, Error, Result};

const FULL_HEX_LEN: usize = 40;
const MIN_PREFIX_LEN: usize = 4;

/// Options for tree-level change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDetection {
    /// Similarity percentage required to pair a deletion with an addition.
    pub rename_threshold: u16,
    /// Whether copies are detected in addition to renames.
    pub detect_copies: bool,
    /// Blobs above this size are not loaded to score similarity.
    pub big_file_threshold: u64,
}

impl From<&DiffConfig> for ChangeDetection {
    fn from(config: &DiffConfig) -> Self {
        Self {
            rename_threshold: config.rename_threshold,
            detect_copies: config.detect_copies,
            big_file_threshold: config.big_file_threshold,
        }
    }
}

impl Default for ChangeDetection {
    fn default() -> Self {
        Self::from(&DiffConfig::default())
    }
}

/// Paths whose index content differs from HEAD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedPaths {
    /// Paths present in the index but not in HEAD.
    pub added: BTreeSet<String>,
    /// Paths present in both with different content.
    pub modified: BTreeSet<String>,
}

impl StagedPaths {
    /// Whether `path` is staged as added or modified.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.added.contains(path) || self.modified.contains(path)
    }

    /// All staged paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut paths: Vec<&str> = self
            .added
            .iter()
            .chain(self.modified.iter())
            .map(String::as_str)
            .collect();
        paths.sort_unstable();
        paths.into_iter()
    }

    /// Total number of staged paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len()
    }

    /// Whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty()
    }
}

/// Handle to the repository whose revisions are diffed.
pub struct Repository {
    inner: GitRepository,
    root: PathBuf,
}

impl Repository {
    /// Open a repository from the given filesystem path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be canonicalized, does not resolve
    /// to a git repository, or if the repository is bare.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let original = path.as_ref();
        let canonical = std::fs::canonicalize(original).map_err(|source| Error::Io {
            path: display_path(original),
            source,
        })?;

        let repo = match GitRepository::discover(&canonical) {
            Ok(repo) => repo,
            Err(err)
                if err.class() == ErrorClass::Repository && err.code() == ErrorCode::NotFound =>
            {
                return Err(Error::NotARepository {
                    path: display_path(&canonical),
                })
            }
            Err(err) => return Err(Error::from(err)),
        };

        let root = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::BareRepository {
                path: display_path(&canonical),
            })?;

        Ok(Self { inner: repo, root })
    }

    /// Returns the absolute path to the working tree root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a revision identifier to the tree of the commit it names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvableRevision`] when the identifier does not
    /// name a commit.
    pub fn resolve_tree(&self, revision: &str) -> Result<Tree<'_>> {
        let unresolvable = || Error::UnresolvableRevision {
            revision: revision.to_owned(),
        };

        let object = self
            .inner
            .revparse_single(revision)
            .map_err(|err| revision_error(err, unresolvable))?;
        let commit = object
            .peel_to_commit()
            .map_err(|err| revision_error(err, unresolvable))?;
        Ok(commit.tree()?)
    }

    /// Compute the changed paths between two trees, pairing renames (and
    /// optionally copies) by similarity.
    ///
    /// Records come back in libgit2's path order with fully resolved ids.
    /// Type changes are reported as modifications.
    ///
    /// # Errors
    ///
    /// Propagates libgit2 failures and blob lookup errors while scoring
    /// renamed content.
    pub fn detect_changes(
        &self,
        old: &Tree<'_>,
        new: &Tree<'_>,
        detection: ChangeDetection,
    ) -> Result<Vec<ChangeRecord>> {
        let mut options = DiffOptions::new();
        options
            .include_typechange(true)
            .include_unmodified(detection.detect_copies);

        let mut diff = self
            .inner
            .diff_tree_to_tree(Some(old), Some(new), Some(&mut options))?;

        let mut find = DiffFindOptions::new();
        find.renames(true)
            .rename_threshold(detection.rename_threshold)
            .copies(detection.detect_copies)
            .copies_from_unmodified(detection.detect_copies)
            .copy_threshold(detection.rename_threshold);
        diff.find_similar(Some(&mut find))?;

        let mut records = Vec::with_capacity(diff.deltas().len());
        for delta in diff.deltas() {
            if let Some(record) = self.change_record(&delta, detection)? {
                records.push(record);
            }
        }

        debug!(changes = records.len(), "detected tree changes");
        Ok(records)
    }

    /// Classify index entries against HEAD.
    ///
    /// Only additions and modifications are reported; paths deleted from the
    /// index are ignored.
    ///
    /// # Errors
    ///
    /// Propagates libgit2 status enumeration failures.
    pub fn staged_paths(&self) -> Result<StagedPaths> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .renames_head_to_index(false);

        let statuses = self.inner.statuses(Some(&mut options))?;
        let mut staged = StagedPaths::default();
        for entry in statuses.iter() {
            let Some(path) = entry.path() else {
                continue;
            };
            let status = entry.status();
            if status.contains(Status::INDEX_NEW) {
                staged.added.insert(path.to_owned());
            } else if status.contains(Status::INDEX_MODIFIED) {
                staged.modified.insert(path.to_owned());
            }
        }

        debug!(
            added = staged.added.len(),
            modified = staged.modified.len(),
            "collected staged paths"
        );
        Ok(staged)
    }

    /// Look up `path` in a revision tree.
    ///
    /// # Errors
    ///
    /// Propagates libgit2 failures other than the path being absent.
    pub fn revision_entry(&self, tree: &Tree<'_>, path: &str) -> Result<Option<ChangeSide>> {
        match tree.get_path(Path::new(path)) {
            Ok(entry) => {
                let mode = u32::try_from(entry.filemode()).unwrap_or_default();
                Ok(Some(ChangeSide::new(
                    path,
                    EntryMode::from_raw(mode),
                    entry.id().to_string(),
                )))
            }
            Err(err) if err.code() == ErrorCode::NotFound => Ok(None),
            Err(err) => Err(Error::from(err)),
        }
    }

    /// Look up `path` in the staged index (stage 0).
    ///
    /// # Errors
    ///
    /// Propagates failures while loading the index.
    pub fn staged_entry(&self, path: &str) -> Result<Option<ChangeSide>> {
        let index = self.inner.index()?;
        Ok(index.get_path(Path::new(path), 0).map(|entry| {
            ChangeSide::new(path, EntryMode::from_raw(entry.mode), entry.id.to_string())
        }))
    }

    /// Load the content of one side of a change.
    ///
    /// Submodule links render as a single `Subproject commit <id>` line,
    /// absent and non-blob sides read as [`Content::Missing`] and blobs
    /// larger than `threshold` become [`Content::Oversized`] without being
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ObjectNotFound`] or [`Error::AmbiguousObject`] when the
    /// side's id cannot be resolved to exactly one object.
    pub fn open_content(&self, side: Option<&ChangeSide>, threshold: u64) -> Result<Content> {
        let Some(side) = side else {
            return Ok(Content::Missing);
        };

        if side.mode == EntryMode::Gitlink {
            return Ok(gitlink_content(&side.id));
        }
        if !side.mode.is_blob() {
            return Ok(Content::Missing);
        }

        let oid = self.expand_object_id(&side.id)?;
        let odb = self.inner.odb()?;
        let (size, _) = odb
            .read_header(oid)
            .map_err(|err| object_error(err, &side.id))?;
        if let Some(oversized) = Content::oversized(size as u64, threshold) {
            info!(
                path = %side.path,
                size,
                threshold,
                "content exceeds big file threshold; treating as binary"
            );
            return Ok(oversized);
        }

        let blob = self
            .inner
            .find_blob(oid)
            .map_err(|err| object_error(err, &side.id))?;
        Ok(Content::Text(blob.content().to_vec()))
    }

    /// Expand a full or abbreviated hexadecimal object id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidObjectId`] for malformed input or prefixes
    /// shorter than four digits, [`Error::ObjectNotFound`] when no object matches and
    /// [`Error::AmbiguousObject`] when several do.
    pub fn expand_object_id(&self, hex: &str) -> Result<Oid> {
        let invalid = || Error::InvalidObjectId { id: hex.to_owned() };
        if !(MIN_PREFIX_LEN..=FULL_HEX_LEN).contains(&hex.len())
            || !hex.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(invalid());
        }

        let oid = Oid::from_str(hex).map_err(|_| invalid())?;
        if hex.len() == FULL_HEX_LEN {
            return Ok(oid);
        }

        self.inner
            .odb()?
            .exists_prefix(oid, hex.len())
            .map_err(|err| object_error(err, hex))
    }

    fn change_record(
        &self,
        delta: &DiffDelta<'_>,
        detection: ChangeDetection,
    ) -> Result<Option<ChangeRecord>> {
        let old = change_side(&delta.old_file());
        let new = change_side(&delta.new_file());

        let record = match (delta.status(), old, new) {
            (Delta::Added, _, Some(new)) => ChangeRecord::add(new),
            (Delta::Deleted, Some(old), _) => ChangeRecord::delete(old),
            (Delta::Modified | Delta::Typechange, Some(old), Some(new)) => {
                ChangeRecord::modify(old, new.mode, new.id)
            }
            (Delta::Renamed, Some(old), Some(new)) => {
                let similarity = self.similarity(&old, &new, detection)?;
                ChangeRecord::rename(old, new, similarity)
            }
            (Delta::Copied, Some(old), Some(new)) => {
                let similarity = self.similarity(&old, &new, detection)?;
                ChangeRecord::copy(old, new, similarity)
            }
            _ => return Ok(None),
        };

        Ok(Some(record))
    }

    fn similarity(
        &self,
        old: &ChangeSide,
        new: &ChangeSide,
        detection: ChangeDetection,
    ) -> Result<u8> {
        if old.id == new.id {
            return Ok(100);
        }

        let old_content = self.open_content(Some(old), detection.big_file_threshold)?;
        let new_content = self.open_content(Some(new), detection.big_file_threshold)?;
        if old_content.is_oversized() || new_content.is_oversized() {
            // libgit2 already paired them, so they scored at least the threshold.
            return Ok(u8::try_from(detection.rename_threshold.min(100)).unwrap_or(100));
        }

        Ok(revdiff_algorithms::similarity_percent(
            old_content.as_bytes(),
            new_content.as_bytes(),
        ))
    }
}

fn change_side(file: &DiffFile<'_>) -> Option<ChangeSide> {
    let mode = entry_mode(file.mode());
    if mode == EntryMode::Missing {
        return None;
    }
    let path = file.path()?.to_string_lossy().into_owned();
    Some(ChangeSide::new(path, mode, file.id().to_string()))
}

const fn entry_mode(mode: FileMode) -> EntryMode {
    match mode {
        FileMode::Unreadable => EntryMode::Missing,
        FileMode::Tree => EntryMode::Tree,
        FileMode::BlobExecutable => EntryMode::Executable,
        FileMode::Link => EntryMode::Symlink,
        FileMode::Commit => EntryMode::Gitlink,
        _ => EntryMode::Regular,
    }
}

fn gitlink_content(id: &str) -> Content {
    if id.bytes().all(|b| b == b'0') {
        return Content::Missing;
    }
    Content::Text(format!("Subproject commit {id}\n").into_bytes())
}

fn revision_error(err: git2::Error, unresolvable: impl FnOnce() -> Error) -> Error {
    match err.code() {
        ErrorCode::NotFound
        | ErrorCode::Ambiguous
        | ErrorCode::InvalidSpec
        | ErrorCode::Peel
        | ErrorCode::UnbornBranch => unresolvable(),
        _ => Error::from(err),
    }
}

fn object_error(err: git2::Error, id: &str) -> Error {
    match err.code() {
        ErrorCode::NotFound => Error::ObjectNotFound { id: id.to_owned() },
        ErrorCode::Ambiguous => Error::AmbiguousObject { id: id.to_owned() },
        _ => Error::from(err),
    }
}

fn display_path(path: &Path) -> String {
    path.to_path_buf()
        .into_os_string()
        .to_string_lossy()
        .into_owned()
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}
