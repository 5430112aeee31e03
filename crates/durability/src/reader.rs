//! Recovery reader
//!
//! Loads are evaluated in three states, first success wins:
//!
//! - **TryMain**: read the destination. Accept it if it parses and its
//!   checksum (if any) verifies. An envelope without a checksum is accepted
//!   without looking at the sibling.
//! - **TryTemp**: read `<destination>_temp` and apply the same checks.
//! - **Fail**: report why each candidate was rejected.
//!
//! The destination always holds the last committed state, so it wins whenever
//! it is trustworthy. The sibling is only consulted to recover from a crash
//! between fsync and rename.
//!
//! Once an envelope is accepted, the metadata check and payload decode are
//! final: their failures are returned as-is and never trigger a fallback.

use persistkit_core::{DestinationPath, Envelope, Metadata, PersistError, PersistResult};
use serde::de::DeserializeOwned;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Which file satisfied a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySource {
    /// The committed destination file
    Destination,
    /// The write-in-progress sibling left by an interrupted save
    WriteInProgress,
}

/// A loaded value and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered<T> {
    /// Decoded payload
    pub value: T,
    /// File the payload was read from
    pub source: RecoverySource,
}

/// Reads envelopes, falling back to the write-in-progress sibling.
///
/// Holds no state and takes no locks; loads may run concurrently with saves.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecoveryReader;

impl RecoveryReader {
    /// Create a reader.
    pub fn new() -> Self {
        RecoveryReader
    }

    /// Load the object stored at `destination`, expecting `metadata`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if neither the destination nor its sibling exists
    /// - `Unrecoverable` if no candidate holds a valid envelope
    /// - `Io` if the destination could not be read and the sibling did not help
    /// - `MetadataMismatch` if the accepted envelope has another descriptor
    /// - `Decode` if the accepted payload does not fit `T`
    pub fn load<T>(
        &self,
        metadata: &Metadata,
        destination: &DestinationPath,
    ) -> PersistResult<Recovered<T>>
    where
        T: DeserializeOwned,
    {
        let (envelope, source, path) = self.accept(destination)?;
        metadata.verify(envelope.metadata())?;
        let value = serde_json::from_str(envelope.payload().get())
            .map_err(|source| PersistError::Decode { path, source })?;
        Ok(Recovered { value, source })
    }

    /// Find the first trustworthy envelope for `destination`.
    pub fn accept(
        &self,
        destination: &DestinationPath,
    ) -> PersistResult<(Envelope, RecoverySource, PathBuf)> {
        let main = destination.as_path();
        let main_err = match read_candidate(main) {
            Ok(envelope) => {
                return Ok((envelope, RecoverySource::Destination, main.to_path_buf()));
            }
            Err(e) => e,
        };
        if !main_err.is_not_found() {
            tracing::warn!(
                target: "persistkit::durability",
                path = %main.display(),
                error = %main_err,
                "destination rejected, trying write-in-progress file"
            );
        }

        let wip = destination.write_in_progress();
        match read_candidate(wip.as_path()) {
            Ok(envelope) => {
                tracing::warn!(
                    target: "persistkit::durability",
                    path = %main.display(),
                    "recovered from write-in-progress file"
                );
                Ok((
                    envelope,
                    RecoverySource::WriteInProgress,
                    wip.as_path().to_path_buf(),
                ))
            }
            Err(temp_err) => Err(fail(main, main_err, temp_err)),
        }
    }
}

/// Read, parse and verify one candidate file.
fn read_candidate(path: &Path) -> PersistResult<Envelope> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PersistError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(PersistError::io("read", path, e)),
    };
    let envelope = Envelope::from_bytes(&bytes, path)?;
    envelope.verify(path)?;
    Ok(envelope)
}

/// Pick the error for the Fail state.
fn fail(destination: &Path, main: PersistError, temp: PersistError) -> PersistError {
    match (main, temp) {
        (PersistError::NotFound { .. }, PersistError::NotFound { .. }) => PersistError::NotFound {
            path: destination.to_path_buf(),
        },
        // Storage faults on the destination surface unchanged.
        (main @ PersistError::Io { .. }, _) => main,
        (main, temp) => PersistError::Unrecoverable {
            path: destination.to_path_buf(),
            main: Box::new(main),
            temp: Box::new(temp),
        },
    }
}
