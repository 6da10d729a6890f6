//! Share-token wire format.
//!
//! ```text
//! base64url_nopad( IV[16] || AuthTag[16] || Ciphertext[N >= 1] )
//! ```
//!
//! The IV and tag are located by fixed offsets. There is no length prefix,
//! delimiter or version byte.

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::{AuthTag, ShareIv, IV_LEN, TAG_LEN};
use crate::error::InvalidToken;

/// Smallest decoded length a token can have.
pub const MIN_TOKEN_LEN: usize = IV_LEN + TAG_LEN + 1;

/// An opaque, URL-safe share token.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareToken(String);

impl ShareToken {
    /// Assemble a token from its sealed parts.
    pub fn assemble(iv: &ShareIv, tag: &AuthTag, ciphertext: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(IV_LEN + TAG_LEN + ciphertext.len());
        raw.extend_from_slice(iv.as_bytes());
        raw.extend_from_slice(tag.as_bytes());
        raw.extend_from_slice(ciphertext);
        Self(URL_SAFE_NO_PAD.encode(raw))
    }

    /// The token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the token text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Tokens are bearer credentials.
        write!(f, "ShareToken({} chars)", self.0.len())
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShareToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ShareToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A decoded token split at its fixed offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenParts {
    pub iv: ShareIv,
    pub tag: AuthTag,
    pub ciphertext: Vec<u8>,
}

impl TokenParts {
    /// Decode token text and split it.
    ///
    /// Rejects anything outside the unpadded base64url alphabet and anything
    /// shorter than [`MIN_TOKEN_LEN`] bytes, before any cryptographic work.
    pub fn parse(token: &str) -> Result<Self, InvalidToken> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| InvalidToken::Encoding)?;

        if raw.len() < MIN_TOKEN_LEN {
            return Err(InvalidToken::TooShort {
                len: raw.len(),
                min: MIN_TOKEN_LEN,
            });
        }

        let mut iv = [0u8; IV_LEN];
        iv.copy_from_slice(&raw[..IV_LEN]);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&raw[IV_LEN..IV_LEN + TAG_LEN]);

        Ok(Self {
            iv: ShareIv::from_bytes(iv),
            tag: AuthTag::from_bytes(tag),
            ciphertext: raw[IV_LEN + TAG_LEN..].to_vec(),
        })
    }
}
