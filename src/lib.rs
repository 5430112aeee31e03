//! persistkit: atomic, checksum-verified persistence of single JSON objects.
//!
//! A [`JsonStore`] saves one object per file. Every save goes through a
//! write-in-progress sibling, an fsync and an atomic rename, so the file on
//! disk is always a complete envelope. Loads verify the checksum and, if the
//! committed file is damaged, recover from the sibling left by an
//! interrupted save.
//!
//! ```no_run
//! use persistkit::{JsonStore, Metadata};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Settings {
//!     theme: String,
//! }
//!
//! let store = JsonStore::new();
//! let meta = Metadata::new("Settings", "v1");
//! store.save_json(&meta, &Settings { theme: "dark".into() }, "settings.json")?;
//! let loaded: Settings = store.load_json(&meta, "settings.json")?;
//! # Ok::<(), persistkit::PersistError>(())
//! ```

#![warn(missing_docs)]

pub mod config;
mod store;
mod types;

pub use config::{ConfigError, PersistConfig};
pub use store::{process_registry, JsonStore};
pub use types::*;
