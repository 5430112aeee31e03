//! Persistence envelope
//!
//! On disk an envelope is a single JSON object:
//!
//! ```text
//! {
//!   "identifier": "Test Struct",
//!   "version": "v1.2.1",
//!   "checksum": "<64 hex chars>",
//!   "payload": {"One":"dog","Two":25,"Three":[109,111,114,101,32,100,111,103]}
//! }
//! ```
//!
//! `checksum` covers the payload bytes exactly as they appear in the file.
//! The payload is carried as a raw JSON fragment so those bytes survive a
//! parse unchanged. When `checksum` is absent, or holds the sentinel
//! [`MANUAL_CHECKSUM`], the envelope is `Unchecked` and trusted as-is.

use crate::checksum::Checksum;
use crate::error::{PersistError, PersistResult};
use crate::metadata::Metadata;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::value::RawValue;
use std::path::Path;

/// Stored checksum value marking a hand-edited file.
pub const MANUAL_CHECKSUM: &str = "manual";

/// Decoded envelope.
#[derive(Debug, Clone)]
pub enum Envelope {
    /// Payload protected by a checksum
    Checked {
        /// Producer descriptor
        metadata: Metadata,
        /// Checksum recorded at save time
        checksum: Checksum,
        /// Encoded payload
        payload: Box<RawValue>,
    },
    /// Payload accepted without verification (trust mode)
    Unchecked {
        /// Producer descriptor
        metadata: Metadata,
        /// Encoded payload
        payload: Box<RawValue>,
    },
}

/// Wire shape used for decoding.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredEnvelope {
    identifier: String,
    version: String,
    /// `None` when the field is absent, `Some(None)` when it is `null`.
    #[serde(default, deserialize_with = "present")]
    checksum: Option<Option<String>>,
    payload: Box<RawValue>,
}

/// Mark a field as present, keeping an explicit `null` distinct from absence.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Wire shape used for encoding.
#[derive(Serialize)]
struct StoredEnvelopeRef<'a> {
    identifier: &'a str,
    version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    payload: &'a RawValue,
}

impl Envelope {
    /// Wrap `payload` with a freshly computed checksum.
    pub fn seal(metadata: Metadata, payload: Box<RawValue>) -> Self {
        let checksum = Checksum::of(payload.get().as_bytes());
        Envelope::Checked {
            metadata,
            checksum,
            payload,
        }
    }

    /// Wrap `payload` without a checksum.
    pub fn unchecked(metadata: Metadata, payload: Box<RawValue>) -> Self {
        Envelope::Unchecked { metadata, payload }
    }

    /// Producer descriptor.
    pub fn metadata(&self) -> &Metadata {
        match self {
            Envelope::Checked { metadata, .. } | Envelope::Unchecked { metadata, .. } => metadata,
        }
    }

    /// Encoded payload.
    pub fn payload(&self) -> &RawValue {
        match self {
            Envelope::Checked { payload, .. } | Envelope::Unchecked { payload, .. } => payload,
        }
    }

    /// True when the envelope carries a checksum.
    pub fn is_checked(&self) -> bool {
        matches!(self, Envelope::Checked { .. })
    }

    /// Verify the payload against the stored checksum.
    ///
    /// `Unchecked` envelopes always pass. `source` only labels the error.
    pub fn verify(&self, source: &Path) -> PersistResult<()> {
        match self {
            Envelope::Checked {
                checksum, payload, ..
            } => {
                let computed = Checksum::of(payload.get().as_bytes());
                if computed != *checksum {
                    return Err(PersistError::ChecksumMismatch {
                        path: source.to_path_buf(),
                        stored: *checksum,
                        computed,
                    });
                }
                Ok(())
            }
            Envelope::Unchecked { .. } => Ok(()),
        }
    }

    /// Serialize to the on-disk form, newline terminated.
    pub fn to_bytes(&self, pretty: bool) -> PersistResult<Vec<u8>> {
        let (metadata, checksum) = match self {
            Envelope::Checked {
                metadata, checksum, ..
            } => (metadata, Some(checksum.to_hex())),
            Envelope::Unchecked { metadata, .. } => (metadata, None),
        };
        let stored = StoredEnvelopeRef {
            identifier: &metadata.identifier,
            version: &metadata.version,
            checksum,
            payload: self.payload(),
        };
        let mut bytes = if pretty {
            serde_json::to_vec_pretty(&stored)
        } else {
            serde_json::to_vec(&stored)
        }
        .map_err(PersistError::Encode)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Parse the on-disk form. `source` only labels the error.
    ///
    /// This does not verify the checksum; see [`Envelope::verify`].
    pub fn from_bytes(bytes: &[u8], source: &Path) -> PersistResult<Self> {
        let corrupt = |reason: String| PersistError::CorruptEnvelope {
            path: source.to_path_buf(),
            reason,
        };

        let stored: StoredEnvelope =
            serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
        let metadata = Metadata {
            identifier: stored.identifier,
            version: stored.version,
        };

        match stored.checksum {
            Some(None) => Err(corrupt("checksum is null".into())),
            None => Ok(Envelope::Unchecked {
                metadata,
                payload: stored.payload,
            }),
            Some(Some(hex)) if hex == MANUAL_CHECKSUM => Ok(Envelope::Unchecked {
                metadata,
                payload: stored.payload,
            }),
            Some(Some(hex)) => {
                let checksum = hex
                    .parse::<Checksum>()
                    .map_err(|e| corrupt(e.to_string()))?;
                Ok(Envelope::Checked {
                    metadata,
                    checksum,
                    payload: stored.payload,
                })
            }
        }
    }
}
