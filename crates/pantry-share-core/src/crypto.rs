//! Key material and authenticated encryption for share tokens.
//!
//! Tokens are sealed with AES-256-GCM using a 16-byte nonce and a detached
//! 16-byte tag, with no associated data.

use std::fmt;

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::AesGcm;
use rand::RngCore;
use zeroize::Zeroize;

use crate::error::{ConfigurationError, InvalidToken, Result};

/// Length of the symmetric key in bytes.
pub const KEY_LEN: usize = 32;

/// Length of the per-token initialization vector in bytes.
pub const IV_LEN: usize = 16;

/// Length of the GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// AES-256-GCM with a 128-bit nonce.
type ShareCipher = AesGcm<Aes256, U16>;

/// A 256-bit symmetric key for sealing share tokens.
///
/// The bytes are wiped when the key is dropped.
#[derive(Clone)]
pub struct ShareKey([u8; KEY_LEN]);

impl ShareKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a 64-character hex secret.
    ///
    /// `name` is only used to label the error.
    pub fn from_hex(name: &str, secret: &str) -> Result<Self> {
        let mut bytes = hex::decode(secret.trim()).map_err(|e| {
            ConfigurationError::InvalidSecretEncoding {
                name: name.to_owned(),
                reason: e.to_string(),
            }
        })?;

        if bytes.len() != KEY_LEN {
            let actual = bytes.len();
            bytes.zeroize();
            return Err(ConfigurationError::InvalidKeyLength {
                name: name.to_owned(),
                expected: KEY_LEN,
                actual,
            });
        }

        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&bytes);
        bytes.zeroize();
        Ok(Self(key))
    }

    /// Hex form of the key, suitable for the secret provider.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    fn cipher(&self) -> ShareCipher {
        ShareCipher::new(GenericArray::from_slice(&self.0))
    }

    /// Encrypt `plaintext` under this key and `iv`.
    ///
    /// Returns the detached tag and the ciphertext, which has the same
    /// length as the plaintext.
    pub fn seal(&self, iv: &ShareIv, plaintext: &[u8]) -> (AuthTag, Vec<u8>) {
        let mut buffer = plaintext.to_vec();
        // Only fails past the GCM length limit (~64 GiB).
        let tag = self
            .cipher()
            .encrypt_in_place_detached(GenericArray::from_slice(&iv.0), b"", &mut buffer)
            .expect("share payload within AES-GCM message limit");

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);
        (AuthTag(tag_bytes), buffer)
    }

    /// Decrypt and authenticate `ciphertext`.
    ///
    /// Fails closed: any tag mismatch yields [`InvalidToken::Authentication`]
    /// and no plaintext is released.
    pub fn open(
        &self,
        iv: &ShareIv,
        tag: &AuthTag,
        ciphertext: &[u8],
    ) -> std::result::Result<Vec<u8>, InvalidToken> {
        let mut buffer = ciphertext.to_vec();
        self.cipher()
            .decrypt_in_place_detached(
                GenericArray::from_slice(&iv.0),
                b"",
                &mut buffer,
                GenericArray::from_slice(&tag.0),
            )
            .map_err(|_| InvalidToken::Authentication)?;
        Ok(buffer)
    }
}

impl Drop for ShareKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for ShareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShareKey(<redacted>)")
    }
}

/// A 128-bit initialization vector, fresh for every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShareIv(pub [u8; IV_LEN]);

impl ShareIv {
    /// Generate a new random IV.
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; IV_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; IV_LEN] {
        &self.0
    }
}

/// A 128-bit GCM authentication tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthTag(pub [u8; TAG_LEN]);

impl AuthTag {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; TAG_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; TAG_LEN] {
        &self.0
    }
}
