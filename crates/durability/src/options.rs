//! Save-side options.
//!
//! Built with the builder pattern:
//!
//! ```
//! use persistkit_durability::{ChecksumPolicy, DurabilityMode, PersistOptions};
//!
//! let opts = PersistOptions::new()
//!     .durability(DurabilityMode::FileOnly)
//!     .checksum(ChecksumPolicy::Omit)
//!     .pretty(false);
//! assert_eq!(opts.durability, DurabilityMode::FileOnly);
//! ```

use serde::{Deserialize, Serialize};

/// How far a save goes to make its commit survive a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurabilityMode {
    /// fsync the write-in-progress file, rename, then fsync the parent
    /// directory so the rename itself is durable (default).
    #[default]
    Strict,
    /// fsync the write-in-progress file and rename. The new name may be lost
    /// on power failure, in which case the previous destination and the
    /// durable sibling remain for recovery.
    FileOnly,
}

/// Whether saves record a payload checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecksumPolicy {
    /// Write `Checked` envelopes (default).
    #[default]
    Compute,
    /// Write `Unchecked` envelopes, for files meant to be edited by hand.
    Omit,
}

/// Options for an [`AtomicWriter`](crate::AtomicWriter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOptions {
    /// Sync behaviour of the commit.
    pub durability: DurabilityMode,
    /// Checksum behaviour of new envelopes.
    pub checksum: ChecksumPolicy,
    /// Pretty-print the envelope. The payload is always compact.
    pub pretty: bool,
}

impl PersistOptions {
    /// Default options: strict durability, checksums on, pretty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the durability mode.
    pub fn durability(mut self, mode: DurabilityMode) -> Self {
        self.durability = mode;
        self
    }

    /// Set the checksum policy.
    pub fn checksum(mut self, policy: ChecksumPolicy) -> Self {
        self.checksum = policy;
        self
    }

    /// Enable or disable pretty-printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            durability: DurabilityMode::Strict,
            checksum: ChecksumPolicy::Compute,
            pretty: true,
        }
    }
}
