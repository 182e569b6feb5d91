//! Content identifiers: the dedup key for a source URL.
//!
//! The identifier is the SHA-256 of the URL's UTF-8 bytes, rendered as lowercase
//! hex. It names the address, not the bytes behind it, so a URL whose image
//! changes is still considered downloaded.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

const HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 digest of a source URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Computes the identifier for `url`. Stable across runs and platforms.
    pub fn for_url(url: &str) -> Self {
        let digest = Sha256::digest(url.as_bytes());
        ContentId(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Rejected identifier text (wrong length or not lowercase hex).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid content identifier {0:?}: expected 64 lowercase hex characters")]
pub struct InvalidContentId(pub String);

impl TryFrom<String> for ContentId {
    type Error = InvalidContentId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let valid = s.len() == HEX_LEN
            && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if valid {
            Ok(ContentId(s))
        } else {
            Err(InvalidContentId(s))
        }
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
