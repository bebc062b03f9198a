use std::path::Path;
use std::sync::Arc;

use git2::Tree;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use revdiff_algorithm_api::DiffAlgorithm;
use revdiff_api::ChangeRecord;
use tracing::{debug, info_span};

use super::{DiffEntry, EditCalculator};
use crate::{
    config::DiffConfig,
    content::Content,
    repository::{ChangeDetection, Repository, StagedPaths},
    Error, Result,
};

/// Entry point for diffing two revisions.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    config: DiffConfig,
    calculator: EditCalculator,
}

/// A change whose contents have been resolved but not yet diffed.
struct PendingFile {
    record: ChangeRecord,
    old: Content,
    new: Content,
}

impl DiffEngine {
    /// Construct an engine using the algorithm named by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAlgorithm`] when the configured algorithm is
    /// not one of the built-in strategies.
    pub fn new(config: DiffConfig) -> Result<Self> {
        let algorithm = revdiff_algorithms::default_registry()
            .get(&config.algorithm)
            .ok_or_else(|| Error::UnknownAlgorithm {
                id: config.algorithm.clone(),
            })?;
        Ok(Self::with_algorithm(config, algorithm))
    }

    /// Construct an engine with an explicit line-diff strategy. The
    /// configured algorithm name is ignored.
    #[must_use]
    pub fn with_algorithm(config: DiffConfig, algorithm: Arc<dyn DiffAlgorithm>) -> Self {
        let calculator = EditCalculator::new(algorithm, config.comparator);
        Self { config, calculator }
    }

    /// The configuration this engine runs with.
    #[must_use]
    pub const fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// The per-file edit calculator.
    #[must_use]
    pub const fn calculator(&self) -> &EditCalculator {
        &self.calculator
    }

    /// Diff `old_revision` against `new_revision`.
    ///
    /// With `include_staged`, every path staged as added or modified is
    /// diffed from its `old_revision` content to its index content instead,
    /// and replaces any tree-level change keyed by the same path, including
    /// a deletion of that path. Staged entries
    /// come first in path order, followed by the remaining tree changes in
    /// detector order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnresolvableRevision`] for unknown revisions and
    /// [`Error::ObjectNotFound`] / [`Error::AmbiguousObject`] when a file's
    /// content cannot be resolved. Any failure aborts the whole run.
    pub fn run(
        &self,
        repository: &Repository,
        old_revision: &str,
        new_revision: &str,
        include_staged: bool,
    ) -> Result<Vec<DiffEntry>> {
        let _span = info_span!("diff_run", old_revision, new_revision, include_staged).entered();

        let old_tree = repository.resolve_tree(old_revision)?;
        let new_tree = repository.resolve_tree(new_revision)?;
        let records =
            repository.detect_changes(&old_tree, &new_tree, ChangeDetection::from(&self.config))?;

        let staged = if include_staged {
            repository.staged_paths()?
        } else {
            StagedPaths::default()
        };

        let mut pending = Vec::with_capacity(records.len() + staged.len());
        for path in staged.iter() {
            if let Some(file) = self.staged_file(repository, &old_tree, path)? {
                pending.push(file);
            }
        }

        let threshold = self.config.big_file_threshold;
        for record in records {
            // Deletes are keyed by their old path, so they collide with a
            // staged file recreated at the same location.
            let path = record.path();
            if staged.contains(path) {
                debug!(path, "staged content supersedes tree change");
                continue;
            }
            let old = repository.open_content(record.old(), threshold)?;
            let new = repository.open_content(record.new_side(), threshold)?;
            pending.push(PendingFile { record, old, new });
        }

        let entries = self.compute_entries(repository.root(), pending)?;
        debug!(files = entries.len(), "diff run complete");
        Ok(entries)
    }

    fn staged_file(
        &self,
        repository: &Repository,
        old_tree: &Tree<'_>,
        path: &str,
    ) -> Result<Option<PendingFile>> {
        let Some(staged) = repository.staged_entry(path)? else {
            return Ok(None);
        };
        let baseline = repository.revision_entry(old_tree, path)?;

        let threshold = self.config.big_file_threshold;
        let old = repository.open_content(baseline.as_ref(), threshold)?;
        let new = repository.open_content(Some(&staged), threshold)?;
        let record = match baseline {
            Some(baseline) => ChangeRecord::modify(baseline, staged.mode, staged.id),
            None => ChangeRecord::add(staged),
        };

        Ok(Some(PendingFile { record, old, new }))
    }

    fn compute_entries(&self, root: &Path, pending: Vec<PendingFile>) -> Result<Vec<DiffEntry>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.config.max_workers)
            .thread_name(|index| format!("revdiff-edit-{index}"))
            .build()?;

        let calculator = &self.calculator;
        Ok(pool.install(|| {
            pending
                .into_par_iter()
                .map(|file| {
                    let edits = calculator.compute(file.old.as_bytes(), file.new.as_bytes());
                    DiffEntry::new(root, file.record, edits)
                })
                .collect()
        }))
    }
}
