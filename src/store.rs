//! JSON store facade
//!
//! Stateless apart from the shared writer registry: every method takes the
//! path it operates on. Clone is cheap (Arc clone).
//!
//! Stores built without an explicit registry share [`process_registry`], so
//! any two of them refuse overlapping saves to the same file.

use crate::config::PersistConfig;
use once_cell::sync::Lazy;
use persistkit_concurrency::WriterRegistry;
use persistkit_core::{DestinationPath, Metadata, PersistResult};
use persistkit_durability::{AtomicWriter, PersistOptions, Recovered, RecoveryReader};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

static PROCESS_REGISTRY: Lazy<Arc<WriterRegistry>> =
    Lazy::new(|| Arc::new(WriterRegistry::new()));

/// The registry shared by every store built with [`JsonStore::new`],
/// [`JsonStore::with_options`] or [`JsonStore::from_config`].
pub fn process_registry() -> Arc<WriterRegistry> {
    Arc::clone(&PROCESS_REGISTRY)
}

/// Saves and loads single JSON objects atomically.
///
/// # Thread Safety
///
/// `JsonStore` is Clone and Send + Sync. Stores built from the same
/// [`WriterRegistry`] refuse overlapping saves to the same file. Stores given
/// separate registries through [`JsonStore::with_registry`] do not
/// coordinate.
#[derive(Debug, Clone)]
pub struct JsonStore {
    writer: AtomicWriter,
    reader: RecoveryReader,
}

impl JsonStore {
    /// Store with default options and the process registry.
    pub fn new() -> Self {
        Self::with_options(PersistOptions::default())
    }

    /// Store with `options` and the process registry.
    pub fn with_options(options: PersistOptions) -> Self {
        Self::with_registry(process_registry(), options)
    }

    /// Store sharing `registry` with other stores.
    pub fn with_registry(registry: Arc<WriterRegistry>, options: PersistOptions) -> Self {
        Self {
            writer: AtomicWriter::new(registry, options),
            reader: RecoveryReader::new(),
        }
    }

    /// Store configured from a [`PersistConfig`].
    pub fn from_config(config: &PersistConfig) -> Self {
        Self::with_options(config.to_options())
    }

    /// The registry guarding this store's saves.
    pub fn registry(&self) -> &Arc<WriterRegistry> {
        self.writer.registry()
    }

    /// Options applied to saves.
    pub fn options(&self) -> &PersistOptions {
        self.writer.options()
    }

    /// Atomically replace the file at `path` with `object`.
    ///
    /// The parent directory must already exist.
    ///
    /// # Errors
    ///
    /// - `BadFilenameSuffix` if `path` ends with the write-in-progress suffix
    /// - `WriteConflict` if a save to the same file is already running
    /// - `Encode` / `Io` on encoding or storage failure
    pub fn save_json<T>(
        &self,
        metadata: &Metadata,
        object: &T,
        path: impl Into<PathBuf>,
    ) -> PersistResult<()>
    where
        T: Serialize + ?Sized,
    {
        let destination = DestinationPath::new(path)?;
        self.writer.save(metadata, object, &destination)
    }

    /// Load the object stored at `path`.
    ///
    /// # Errors
    ///
    /// - `BadFilenameSuffix` if `path` ends with the write-in-progress suffix
    /// - `NotFound` if nothing was ever saved there
    /// - `Unrecoverable` if neither the file nor its sibling is valid
    /// - `MetadataMismatch` if the file belongs to another producer or version
    /// - `Decode` if the stored payload does not fit `T`
    pub fn load_json<T>(&self, metadata: &Metadata, path: impl Into<PathBuf>) -> PersistResult<T>
    where
        T: DeserializeOwned,
    {
        Ok(self.load_json_with_source(metadata, path)?.value)
    }

    /// Load into an existing value. `target` is untouched on error.
    pub fn load_json_into<T>(
        &self,
        metadata: &Metadata,
        target: &mut T,
        path: impl Into<PathBuf>,
    ) -> PersistResult<()>
    where
        T: DeserializeOwned,
    {
        *target = self.load_json(metadata, path)?;
        Ok(())
    }

    /// Load and report which file satisfied the load.
    pub fn load_json_with_source<T>(
        &self,
        metadata: &Metadata,
        path: impl Into<PathBuf>,
    ) -> PersistResult<Recovered<T>>
    where
        T: DeserializeOwned,
    {
        let destination = DestinationPath::new(path)?;
        self.reader.load(metadata, &destination)
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new()
    }
}
