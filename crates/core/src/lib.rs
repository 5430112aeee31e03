//! Core types for persistkit
//!
//! This crate defines the vocabulary shared by the writer, the reader and the
//! concurrency guard:
//! - Metadata: identifier + version descriptor checked on every load
//! - Checksum: SHA-256 digest over the encoded payload bytes
//! - Envelope: the on-disk record (`Checked` or `Unchecked`)
//! - DestinationPath / WipPath: typed paths for the committed file and its
//!   write-in-progress sibling
//! - PersistError: the closed error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checksum;
pub mod envelope;
pub mod error;
pub mod metadata;
pub mod path;

pub use checksum::Checksum;
pub use envelope::{Envelope, MANUAL_CHECKSUM};
pub use error::{PersistError, PersistResult};
pub use metadata::{Metadata, MetadataField};
pub use path::{DestinationPath, WipPath, WIP_SUFFIX};
