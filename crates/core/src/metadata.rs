//! Metadata descriptor
//!
//! Every envelope records the identifier and version of the producer that
//! wrote it. A load names the descriptor it expects; both fields must match
//! exactly or the load is refused.

use crate::error::{PersistError, PersistResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical type and format version of a stored object.
///
/// # Example
///
/// ```
/// use persistkit_core::Metadata;
///
/// let meta = Metadata::new("Test Struct", "v1.2.1");
/// assert_eq!(meta.identifier, "Test Struct");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Metadata {
    /// Name of the stored object type
    pub identifier: String,
    /// Format revision of the stored object
    pub version: String,
}

impl Metadata {
    /// Create a descriptor.
    pub fn new(identifier: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: version.into(),
        }
    }

    /// Check that `found` is exactly the descriptor `self` expects.
    ///
    /// The identifier is compared first, so a file from a different producer
    /// reports an identifier mismatch even when its version differs too.
    pub fn verify(&self, found: &Metadata) -> PersistResult<()> {
        if self.identifier != found.identifier {
            return Err(PersistError::MetadataMismatch {
                field: MetadataField::Identifier,
                expected: self.identifier.clone(),
                found: found.identifier.clone(),
            });
        }
        if self.version != found.version {
            return Err(PersistError::MetadataMismatch {
                field: MetadataField::Version,
                expected: self.version.clone(),
                found: found.version.clone(),
            });
        }
        Ok(())
    }
}

/// Which descriptor field disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    /// `identifier` differs
    Identifier,
    /// `version` differs
    Version,
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataField::Identifier => f.write_str("identifier"),
            MetadataField::Version => f.write_str("version"),
        }
    }
}
