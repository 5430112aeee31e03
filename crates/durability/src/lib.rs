//! Durability layer for persistkit
//!
//! - `options`: save-side configuration (PersistOptions, DurabilityMode, ChecksumPolicy)
//! - `writer`: write-in-progress file + fsync + atomic rename (AtomicWriter)
//! - `reader`: destination-then-sibling recovery (RecoveryReader)
//!
//! The writer and the reader never call each other. They agree only on the
//! file pair convention: `<destination>` and `<destination>_temp`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod options;
pub mod reader;
pub mod writer;

pub use options::{ChecksumPolicy, DurabilityMode, PersistOptions};
pub use reader::{Recovered, RecoveryReader, RecoverySource};
pub use writer::AtomicWriter;
