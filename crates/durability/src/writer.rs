//! Atomic writer
//!
//! A save runs these steps in order:
//!
//! 1. Take the lease for the canonical destination (or fail with `WriteConflict`)
//! 2. Encode the object and build the envelope
//! 3. Write the envelope to `<destination>_temp`, truncating any leftover
//! 4. fsync the write-in-progress file
//! 5. Rename it over the destination (the commit point)
//! 6. In `Strict` mode, fsync the parent directory
//! 7. Release the lease
//!
//! Until step 5 the destination is untouched. A crash before it leaves the
//! previous destination plus, possibly, a torn sibling that the recovery
//! reader will reject by checksum.

use crate::options::{ChecksumPolicy, DurabilityMode, PersistOptions};
use persistkit_concurrency::WriterRegistry;
use persistkit_core::{DestinationPath, Envelope, Metadata, PersistError, PersistResult, WipPath};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Writes envelopes with a write-ahead sibling and an atomic rename.
#[derive(Debug, Clone)]
pub struct AtomicWriter {
    registry: Arc<WriterRegistry>,
    options: PersistOptions,
}

impl AtomicWriter {
    /// Create a writer that coordinates through `registry`.
    pub fn new(registry: Arc<WriterRegistry>, options: PersistOptions) -> Self {
        Self { registry, options }
    }

    /// Registry this writer takes leases from.
    pub fn registry(&self) -> &Arc<WriterRegistry> {
        &self.registry
    }

    /// Options in effect.
    pub fn options(&self) -> &PersistOptions {
        &self.options
    }

    /// Save `object` under `metadata` to `destination`.
    ///
    /// # Errors
    ///
    /// - `WriteConflict` if another save to the same canonical path is in flight
    /// - `Encode` if `object` cannot be serialized
    /// - `Io` for any storage failure; the destination is then either
    ///   unchanged or fully replaced
    pub fn save<T>(
        &self,
        metadata: &Metadata,
        object: &T,
        destination: &DestinationPath,
    ) -> PersistResult<()>
    where
        T: Serialize + ?Sized,
    {
        let canonical = destination.canonical()?;
        let lease = self.registry.try_acquire(canonical)?;
        let result = self.commit(metadata, object, destination);
        lease.release();
        result
    }

    fn commit<T>(
        &self,
        metadata: &Metadata,
        object: &T,
        destination: &DestinationPath,
    ) -> PersistResult<()>
    where
        T: Serialize + ?Sized,
    {
        let payload = serde_json::value::to_raw_value(object).map_err(PersistError::Encode)?;
        let envelope = match self.options.checksum {
            ChecksumPolicy::Compute => Envelope::seal(metadata.clone(), payload),
            ChecksumPolicy::Omit => Envelope::unchecked(metadata.clone(), payload),
        };
        let bytes = envelope.to_bytes(self.options.pretty)?;

        let wip = destination.write_in_progress();
        write_durably(&wip, &bytes)?;

        fs::rename(wip.as_path(), destination.as_path())
            .map_err(|e| PersistError::io("rename", destination.as_path(), e))?;

        if self.options.durability == DurabilityMode::Strict {
            sync_dir(destination.parent_dir())?;
        }

        tracing::debug!(
            target: "persistkit::durability",
            path = %destination.as_path().display(),
            bytes = bytes.len(),
            checked = envelope.is_checked(),
            "envelope committed"
        );
        Ok(())
    }
}

/// Create or truncate `wip`, write `bytes`, fsync.
fn write_durably(wip: &WipPath, bytes: &[u8]) -> PersistResult<()> {
    let path = wip.as_path();
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| PersistError::io("open", path, e))?;
    file.write_all(bytes)
        .map_err(|e| PersistError::io("write", path, e))?;
    file.sync_all()
        .map_err(|e| PersistError::io("sync", path, e))?;
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> PersistResult<()> {
    let handle = fs::File::open(dir).map_err(|e| PersistError::io("open dir", dir, e))?;
    handle
        .sync_all()
        .map_err(|e| PersistError::io("sync dir", dir, e))
}

// Directories cannot be opened for sync on this platform.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> PersistResult<()> {
    Ok(())
}
