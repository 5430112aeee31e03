//! Writer registry
//!
//! Grants exclusive, per-path leases to savers inside one process.
//!
//! # Design
//!
//! - DashMap keyed by canonical path: acquisition only locks one shard
//! - FxHash: paths are hashed on every save, no need for SipHash
//! - Denial, not queueing: a second saver gets `WriteConflict` immediately
//!
//! The registry is an explicit value. Share it through an `Arc` between every
//! store that may write the same files; two registries do not see each
//! other's leases. Nothing here crosses a process boundary.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use persistkit_core::{PersistError, PersistResult};
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};
use std::time::Instant;
use uuid::Uuid;

/// Identifier of one granted lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeaseId(Uuid);

impl fmt::Display for LeaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker stored for each active writer.
#[derive(Debug, Clone, Copy)]
struct ActiveWriter {
    id: LeaseId,
    acquired_at: Instant,
}

/// Registry of active writers, keyed by canonical destination path.
pub struct WriterRegistry {
    active: DashMap<PathBuf, ActiveWriter, BuildHasherDefault<FxHasher>>,
}

impl WriterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            active: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }

    /// Try to take the lease for `canonical_path`.
    ///
    /// Check-and-insert happens under the shard lock, so of any number of
    /// racing callers exactly one is admitted.
    ///
    /// # Errors
    ///
    /// `WriteConflict` if another lease for the path is outstanding.
    pub fn try_acquire(&self, canonical_path: PathBuf) -> PersistResult<Lease<'_>> {
        match self.active.entry(canonical_path) {
            Entry::Occupied(held) => {
                let holder = held.get();
                tracing::debug!(
                    target: "persistkit::concurrency",
                    path = %held.key().display(),
                    holder = %holder.id,
                    held_for_us = holder.acquired_at.elapsed().as_micros() as u64,
                    "lease denied"
                );
                Err(PersistError::WriteConflict {
                    path: held.key().clone(),
                })
            }
            Entry::Vacant(slot) => {
                let id = LeaseId(Uuid::new_v4());
                let path = slot.key().clone();
                slot.insert(ActiveWriter {
                    id,
                    acquired_at: Instant::now(),
                });
                tracing::debug!(
                    target: "persistkit::concurrency",
                    path = %path.display(),
                    lease = %id,
                    "lease granted"
                );
                Ok(Lease {
                    registry: self,
                    path,
                    id,
                })
            }
        }
    }

    /// Give a lease back. Equivalent to dropping it.
    pub fn release(&self, lease: Lease<'_>) {
        drop(lease);
    }

    /// Number of outstanding leases.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether a lease for `canonical_path` is outstanding.
    pub fn is_active(&self, canonical_path: &Path) -> bool {
        self.active.contains_key(canonical_path)
    }

    fn remove(&self, path: &Path, id: LeaseId) {
        // Only remove our own marker.
        let removed = self.active.remove_if(path, |_, writer| writer.id == id);
        if removed.is_some() {
            tracing::debug!(
                target: "persistkit::concurrency",
                path = %path.display(),
                lease = %id,
                "lease released"
            );
        }
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WriterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterRegistry")
            .field("active", &self.active.len())
            .finish()
    }
}

/// Exclusive right to save to one canonical path.
///
/// Released when dropped, including during unwinding, so a failed save never
/// leaves its path locked.
#[must_use = "the lease is released as soon as it is dropped"]
pub struct Lease<'a> {
    registry: &'a WriterRegistry,
    path: PathBuf,
    id: LeaseId,
}

impl Lease<'_> {
    /// Canonical path this lease covers.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier of this lease.
    pub fn id(&self) -> LeaseId {
        self.id
    }

    /// Give the lease back.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.registry.remove(&self.path, self.id);
    }
}

impl fmt::Debug for Lease<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field("path", &self.path)
            .field("id", &self.id)
            .finish()
    }
}
