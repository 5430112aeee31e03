//! Error taxonomy for save and load
//!
//! Corruption of a single candidate file (`ChecksumMismatch`,
//! `CorruptEnvelope`) is normally absorbed by the recovery reader. Callers
//! only see it wrapped in `Unrecoverable` once both the destination and its
//! write-in-progress sibling have been rejected.

use crate::checksum::Checksum;
use crate::metadata::MetadataField;
use crate::path::WIP_SUFFIX;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout persistkit.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors surfaced by save and load.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The caller named a path ending in the reserved write-in-progress suffix.
    #[error("{} ends with the reserved suffix {WIP_SUFFIX:?}", .path.display())]
    BadFilenameSuffix {
        /// Offending path
        path: PathBuf,
    },

    /// The path cannot name a persisted file (no file name component).
    #[error("invalid persistence path {}: {reason}", .path.display())]
    InvalidPath {
        /// Offending path
        path: PathBuf,
        /// Why it was refused
        reason: String,
    },

    /// Stored checksum disagrees with the recomputed one.
    #[error("checksum mismatch in {}: stored {stored}, computed {computed}", .path.display())]
    ChecksumMismatch {
        /// File whose envelope failed verification
        path: PathBuf,
        /// Checksum recorded in the envelope
        stored: Checksum,
        /// Checksum of the payload bytes as read
        computed: Checksum,
    },

    /// Bytes do not parse as an envelope.
    #[error("corrupt envelope in {}: {reason}", .path.display())]
    CorruptEnvelope {
        /// File that failed to parse
        path: PathBuf,
        /// Parser diagnostic
        reason: String,
    },

    /// A trustworthy envelope was written by a different producer or revision.
    #[error("metadata mismatch on {field}: expected {expected:?}, found {found:?}")]
    MetadataMismatch {
        /// Field that disagreed
        field: MetadataField,
        /// Value the caller expected
        expected: String,
        /// Value stored in the envelope
        found: String,
    },

    /// Another save to the same canonical path is in flight.
    #[error("write conflict: another save to {} is in progress", .path.display())]
    WriteConflict {
        /// Canonical destination path
        path: PathBuf,
    },

    /// Neither the destination nor its write-in-progress sibling exists.
    #[error("no persisted object at {}", .path.display())]
    NotFound {
        /// Destination path
        path: PathBuf,
    },

    /// Both candidates were rejected; nothing trustworthy remains.
    #[error(
        "{} is unrecoverable: destination rejected ({main}); write-in-progress file rejected ({temp})",
        .path.display()
    )]
    Unrecoverable {
        /// Destination path
        path: PathBuf,
        /// Why the destination was rejected
        main: Box<PersistError>,
        /// Why the write-in-progress sibling was rejected
        temp: Box<PersistError>,
    },

    /// The caller's object could not be encoded.
    #[error("failed to encode payload: {0}")]
    Encode(#[source] serde_json::Error),

    /// A verified payload could not be decoded into the caller's type.
    #[error("failed to decode payload from {}: {source}", .path.display())]
    Decode {
        /// File the payload came from
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: serde_json::Error,
    },

    /// Underlying storage failure.
    #[error("I/O error during {op} on {}: {source}", .path.display())]
    Io {
        /// Step that failed (open, write, sync, rename, ...)
        op: &'static str,
        /// Path the step was operating on
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

impl PersistError {
    /// Build an `Io` error for `op` on `path`.
    pub fn io(op: &'static str, path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for errors that mean stored bytes cannot be trusted.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            PersistError::ChecksumMismatch { .. }
                | PersistError::CorruptEnvelope { .. }
                | PersistError::Unrecoverable { .. }
        )
    }

    /// True when a save lost the race for its destination.
    pub fn is_conflict(&self) -> bool {
        matches!(self, PersistError::WriteConflict { .. })
    }

    /// True when nothing was ever persisted at the destination.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::NotFound { .. })
    }
}
