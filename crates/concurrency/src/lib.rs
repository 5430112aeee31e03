//! Concurrency layer for persistkit
//!
//! This crate provides the in-process writer registry that admits at most one
//! in-flight save per canonical destination path.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod registry;

pub use registry::{Lease, LeaseId, WriterRegistry};
