use std::path::Path;

use revdiff_algorithm_api::LineComparator;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Blobs above this size (10 MiB) are treated as binary by default.
pub const DEFAULT_BIG_FILE_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Minimum similarity score (percent) for rename pairing by default.
pub const DEFAULT_RENAME_THRESHOLD: u16 = 60;

/// Tunables for a diff run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Identifier of the registered line-diff algorithm.
    pub algorithm: String,
    /// Line equivalence policy.
    pub comparator: LineComparator,
    /// Byte size above which content is replaced by the binary sentinel.
    pub big_file_threshold: u64,
    /// Similarity percentage required to pair a deletion with an addition.
    pub rename_threshold: u16,
    /// Whether copies from other paths are detected as well.
    pub detect_copies: bool,
    /// Upper bound on edit computation threads; `0` uses the rayon default.
    pub max_workers: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            algorithm: revdiff_algorithms::DEFAULT_ALGORITHM.to_owned(),
            comparator: LineComparator::Default,
            big_file_threshold: DEFAULT_BIG_FILE_THRESHOLD,
            rename_threshold: DEFAULT_RENAME_THRESHOLD,
            detect_copies: false,
            max_workers: 0,
        }
    }
}

impl DiffConfig {
    /// Parse a configuration from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] when the text is not valid TOML or a
    /// value has the wrong type.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|err| Error::InvalidConfig {
            message: err.to_string(),
        })
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read and
    /// [`Error::InvalidConfig`] when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
