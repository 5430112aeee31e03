//! Public types for the persistkit API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Public API types - these are what users should use
// ============================================================================

// Descriptor checked on every load
pub use persistkit_core::Metadata;
pub use persistkit_core::MetadataField;

// Errors
pub use persistkit_core::PersistError;
pub use persistkit_core::PersistResult;

// Paths and on-disk format
pub use persistkit_core::{Checksum, DestinationPath, Envelope, MANUAL_CHECKSUM, WIP_SUFFIX};

// Concurrency guard, shareable between stores
pub use persistkit_concurrency::{Lease, LeaseId, WriterRegistry};

// Save options and load results
pub use persistkit_durability::{
    ChecksumPolicy, DurabilityMode, PersistOptions, Recovered, RecoverySource,
};
