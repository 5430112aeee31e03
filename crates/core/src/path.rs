//! Typed persistence paths
//!
//! A [`DestinationPath`] names the committed file a caller saves to and loads
//! from. Its write-in-progress sibling is a [`WipPath`], which can only be
//! obtained from a destination. Neither save nor load accepts a `WipPath`,
//! and a destination can never itself end in [`WIP_SUFFIX`].

use crate::error::{PersistError, PersistResult};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to a destination to form its write-in-progress sibling.
pub const WIP_SUFFIX: &str = "_temp";

/// Path of a committed persistence file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DestinationPath(PathBuf);

impl DestinationPath {
    /// Validate `path` as a destination.
    ///
    /// # Errors
    ///
    /// - `BadFilenameSuffix` if the file name ends with [`WIP_SUFFIX`]
    /// - `InvalidPath` if the path has no file name component
    pub fn new(path: impl Into<PathBuf>) -> PersistResult<Self> {
        let path = path.into();
        // file_name() ignores a trailing separator.
        let name = match path.file_name() {
            Some(name) => name,
            None => {
                return Err(PersistError::InvalidPath {
                    path,
                    reason: "no file name component".into(),
                })
            }
        };
        if name.to_string_lossy().ends_with(WIP_SUFFIX) {
            return Err(PersistError::BadFilenameSuffix { path });
        }
        // Drop any trailing separator so the sibling lands next to the file.
        let normalized = match path.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        };
        Ok(DestinationPath(normalized))
    }

    /// The destination, without any trailing separator.
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// The write-in-progress sibling of this destination.
    pub fn write_in_progress(&self) -> WipPath {
        let mut raw: OsString = self.0.clone().into_os_string();
        raw.push(WIP_SUFFIX);
        WipPath(PathBuf::from(raw))
    }

    /// Directory holding the destination, `.` for a bare file name.
    pub fn parent_dir(&self) -> &Path {
        match self.0.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Fully resolved path used to key the writer registry.
    ///
    /// Only the parent directory is resolved; the final component is kept
    /// as-is because the commit replaces that directory entry (even if it is
    /// a symlink). The result is the same before and after the file exists.
    /// The parent directory must exist.
    pub fn canonical(&self) -> PersistResult<PathBuf> {
        let parent = self.parent_dir();
        let dir = fs::canonicalize(parent).map_err(|e| PersistError::io("canonicalize", parent, e))?;
        // file_name() is checked in new()
        match self.0.file_name() {
            Some(name) => Ok(dir.join(name)),
            None => Err(PersistError::InvalidPath {
                path: self.0.clone(),
                reason: "no file name component".into(),
            }),
        }
    }
}

impl AsRef<Path> for DestinationPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Path of the write-in-progress sibling of a destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WipPath(PathBuf);

impl WipPath {
    /// The sibling path on disk.
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for WipPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}
