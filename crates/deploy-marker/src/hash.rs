// Copyright 2026 Oxide Computer Company

//! Commit hashes reported as deployment revisions.

use crate::CommitHashParseError;
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// The commit a deployment marker refers to.
///
/// Holds either 20 bytes (SHA-1, 40 hex characters) or 32 bytes (SHA-256,
/// 64 hex characters). Always displayed and serialized as lowercase hex,
/// which is what `git rev-parse HEAD` prints.
///
/// ```
/// use deploy_marker::CommitHash;
///
/// let hash: CommitHash =
///     "0123456789abcdef0123456789abcdef01234567".parse().unwrap();
/// assert_eq!(hash.to_string(), "0123456789abcdef0123456789abcdef01234567");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommitHash {
    /// A SHA-1 object id.
    Sha1([u8; 20]),
    /// A SHA-256 object id, used by repositories created with
    /// `--object-format=sha256`.
    Sha256([u8; 32]),
}

impl CommitHash {
    /// Returns the raw object id.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            CommitHash::Sha1(bytes) => bytes,
            CommitHash::Sha256(bytes) => bytes,
        }
    }
}

/// Decodes exactly `N` bytes of hex.
fn decode<const N: usize>(s: &str) -> Result<[u8; N], CommitHashParseError> {
    let mut bytes = [0; N];
    hex::decode_to_slice(s, &mut bytes).map_err(CommitHashParseError::InvalidHex)?;
    Ok(bytes)
}

impl FromStr for CommitHash {
    type Err = CommitHashParseError;

    /// Parses the full hash `git rev-parse` prints: 40 hex digits in a
    /// SHA-1 repository, 64 in a SHA-256 one. Abbreviated hashes are
    /// rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.len() {
            40 => decode(s).map(CommitHash::Sha1),
            64 => decode(s).map(CommitHash::Sha256),
            len => Err(CommitHashParseError::InvalidLength(len)),
        }
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_bytes()))
    }
}

impl Serialize for CommitHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
