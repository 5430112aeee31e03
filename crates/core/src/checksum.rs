//! Payload checksum
//!
//! A [`Checksum`] is the SHA-256 digest of the exact encoded payload bytes
//! stored in an envelope. On disk it is written as lowercase hex.

use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length of the digest in bytes.
pub const CHECKSUM_LEN: usize = 32;

/// SHA-256 digest of an encoded payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checksum([u8; CHECKSUM_LEN]);

impl Checksum {
    /// Compute the checksum of `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut out = [0u8; CHECKSUM_LEN];
        out.copy_from_slice(&digest);
        Checksum(out)
    }

    /// Wrap raw digest bytes.
    pub fn from_bytes(bytes: [u8; CHECKSUM_LEN]) -> Self {
        Checksum(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; CHECKSUM_LEN] {
        &self.0
    }

    /// Lowercase hex encoding, as written to disk.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Error returned when a stored checksum string is not a valid digest.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChecksumParseError {
    /// The string is not valid hex.
    #[error("checksum is not valid hex: {0}")]
    InvalidHex(String),
    /// The hex decodes to the wrong number of bytes.
    #[error("checksum has {0} bytes, expected {CHECKSUM_LEN}")]
    WrongLength(usize),
}

impl FromStr for Checksum {
    type Err = ChecksumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| ChecksumParseError::InvalidHex(e.to_string()))?;
        let len = bytes.len();
        let array: [u8; CHECKSUM_LEN] = bytes
            .try_into()
            .map_err(|_| ChecksumParseError::WrongLength(len))?;
        Ok(Checksum(array))
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.to_hex())
    }
}
