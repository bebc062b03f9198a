//! Revision diff engine that restricts downstream analysis to changed lines.
//!
//! The crate is layered around three primary responsibilities:
//! - repository access: revisions, staged content and change detection
//! - per-file edit computation through a pluggable line-diff strategy
//! - indexing the resulting edits for changed-line membership queries

#![warn(
    clippy::all,
    clippy::cargo,
    clippy::nursery,
    clippy::pedantic,
    missing_docs
)]
#![cfg_attr(
    not(test),
    deny(
        clippy::dbg_macro,
        clippy::expect_used,
        clippy::panic,
        clippy::print_stderr,
        clippy::print_stdout,
        clippy::todo,
        clippy::unwrap_used
    )
)]

use std::path::Path;

/// Engine configuration and its TOML loader.
pub mod config;
/// Resolved file content and the large-content policy.
pub mod content;
/// Edit computation, diff entries and the orchestrating engine.
pub mod diff;
/// Changed-line membership index.
pub mod filter;
/// Git repository access built on libgit2.
pub mod repository;

pub use config::DiffConfig;
pub use content::Content;
pub use diff::{DiffEngine, DiffEntry, EditCalculator};
pub use filter::{LineLocated, LineMembershipFilter};
pub use repository::{ChangeDetection, Repository, StagedPaths};
pub use revdiff_algorithm_api::{DiffAlgorithm, LineComparator};
pub use revdiff_api::{ChangeRecord, ChangeSide, ChangeType, Edit, EditKind, EntryMode};

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the core library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying git operation failed.
    #[error("git error: {source}")]
    Git {
        /// Original libgit2 error bubbled up by the core library.
        #[from]
        source: git2::Error,
    },
    /// Provided path does not correspond to a git repository.
    #[error("path does not reference a git repository: {path}")]
    NotARepository {
        /// Path that failed to resolve to a repository.
        path: String,
    },
    /// Bare repositories have no working root to anchor paths to.
    #[error("repository at {path} is bare and unsupported")]
    BareRepository {
        /// Path of the repository lacking a working tree.
        path: String,
    },
    /// Filesystem interaction failed.
    #[error("failed to access {path}: {source}")]
    Io {
        /// Filesystem path involved in the failed operation.
        path: String,
        /// Source I/O error returned by the standard library.
        #[source]
        source: std::io::Error,
    },
    /// Revision identifier does not name a commit.
    #[error("revision does not resolve to a commit: {revision}")]
    UnresolvableRevision {
        /// Revision identifier as given by the caller.
        revision: String,
    },
    /// Referenced object is absent from the object database.
    #[error("object not found: {id}")]
    ObjectNotFound {
        /// Full or abbreviated object id.
        id: String,
    },
    /// Abbreviated object id matches more than one object.
    #[error("object id is ambiguous: {id}")]
    AmbiguousObject {
        /// Abbreviated object id.
        id: String,
    },
    /// Object id is not valid hexadecimal.
    #[error("invalid object id: {id}")]
    InvalidObjectId {
        /// Offending object id text.
        id: String,
    },
    /// Configured diff algorithm is not registered.
    #[error("unknown diff algorithm: {id}")]
    UnknownAlgorithm {
        /// Identifier that failed to resolve.
        id: String,
    },
    /// Configuration could not be parsed.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Parser diagnostic.
        message: String,
    },
    /// Worker pool for edit computation could not be created.
    #[error("failed to build diff worker pool: {source}")]
    WorkerPool {
        /// Error reported by rayon.
        #[from]
        source: rayon::ThreadPoolBuildError,
    },
}

/// Diff two revisions of the repository at `root` and index the changed lines.
///
/// Uses [`DiffConfig::default`]; see [`build_diff_with_config`].
///
/// # Errors
///
/// Returns an error if the repository cannot be opened, a revision does not
/// resolve, or any file's content cannot be read.
pub fn build_diff(
    root: impl AsRef<Path>,
    old_revision: &str,
    new_revision: &str,
    include_staged: bool,
) -> Result<LineMembershipFilter> {
    build_diff_with_config(
        root,
        old_revision,
        new_revision,
        include_staged,
        &DiffConfig::default(),
    )
}

/// Diff two revisions with an explicit configuration and index the result.
///
/// # Errors
///
/// Returns an error if the configuration names an unknown algorithm, the
/// repository cannot be opened, or the diff run fails.
pub fn build_diff_with_config(
    root: impl AsRef<Path>,
    old_revision: &str,
    new_revision: &str,
    include_staged: bool,
    config: &DiffConfig,
) -> Result<LineMembershipFilter> {
    let repository = Repository::open(root)?;
    let engine = DiffEngine::new(config.clone())?;
    let entries = engine.run(&repository, old_revision, new_revision, include_staged)?;
    Ok(LineMembershipFilter::build(&entries))
}
