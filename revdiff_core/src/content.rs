//! File content as seen by the edit calculator.

use std::fmt;

/// Content of one side of a change.
///
/// `Missing` and `Oversized` both read as empty, which lets a full
/// addition, deletion or too-large blob flow through the same line diff.
#[derive(Clone, PartialEq, Eq)]
pub enum Content {
    /// Bytes to diff line by line.
    Text(Vec<u8>),
    /// Side does not exist or is not a blob.
    Missing,
    /// Blob exceeded the configured threshold and was not loaded.
    Oversized {
        /// Size of the blob in bytes.
        size: u64,
    },
}

impl Content {
    /// The binary sentinel for a blob of `size` bytes, or `None` when the
    /// blob fits within `threshold` and should be loaded.
    #[must_use]
    pub const fn oversized(size: u64, threshold: u64) -> Option<Self> {
        if size > threshold {
            Some(Self::Oversized { size })
        } else {
            None
        }
    }

    /// Bytes to diff; empty for the sentinels.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(bytes) => bytes,
            Self::Missing | Self::Oversized { .. } => &[],
        }
    }

    /// Whether the content was replaced by the binary sentinel.
    #[must_use]
    pub const fn is_oversized(&self) -> bool {
        matches!(self, Self::Oversized { .. })
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(bytes) => f.debug_tuple("Text").field(&bytes.len()).finish(),
            Self::Missing => f.write_str("Missing"),
            Self::Oversized { size } => f.debug_struct("Oversized").field("size", size).finish(),
        }
    }
}
