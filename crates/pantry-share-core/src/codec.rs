//! The share-token codec.
//!
//! Turns a `(user, list)` pair into an opaque bearer token and back. The
//! codec holds no mutable state; one instance can be shared by any number
//! of request handlers.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::canonical::{payload_bytes, payload_from_bytes};
use crate::crypto::{ShareIv, ShareKey};
use crate::error::{ConfigurationError, Result, TokenError};
use crate::secret::SecretProvider;
use crate::token::{ShareToken, TokenParts};
use crate::types::{ListId, SharePayload, UserId};

/// Where the codec gets its key.
#[derive(Clone)]
enum KeySource {
    Fixed(ShareKey),
    Provider {
        provider: Arc<dyn SecretProvider>,
        name: String,
    },
}

/// Encodes and decodes share tokens under a single symmetric key.
#[derive(Clone)]
pub struct ShareTokenCodec {
    source: KeySource,
}

impl ShareTokenCodec {
    /// Create a codec with a fixed key.
    pub fn new(key: ShareKey) -> Self {
        Self {
            source: KeySource::Fixed(key),
        }
    }

    /// Create a codec that reads the secret `name` from `provider` on every
    /// operation.
    ///
    /// Construction never fails; a missing or malformed secret is reported
    /// by the first `encode` or `decode`.
    pub fn from_provider(provider: Arc<dyn SecretProvider>, name: impl Into<String>) -> Self {
        Self {
            source: KeySource::Provider {
                provider,
                name: name.into(),
            },
        }
    }

    fn key(&self) -> Result<ShareKey> {
        match &self.source {
            KeySource::Fixed(key) => Ok(key.clone()),
            KeySource::Provider { provider, name } => provider.share_key(name),
        }
    }

    /// Check that the key can be provisioned.
    pub fn check_key(&self) -> Result<()> {
        self.key().map(drop)
    }

    /// Issue a token for `list_id` owned by `user_id`, stamped with the
    /// current time.
    ///
    /// Two calls with the same arguments never return the same token.
    pub fn encode(&self, user_id: &UserId, list_id: &ListId) -> Result<ShareToken> {
        debug_assert!(!user_id.as_str().is_empty(), "empty user id");
        debug_assert!(!list_id.as_str().is_empty(), "empty list id");

        let payload = SharePayload::new(user_id.clone(), list_id.clone(), now_millis());
        self.encode_payload(&payload)
    }

    /// Seal an already-built payload under a fresh IV.
    pub fn encode_payload(&self, payload: &SharePayload) -> Result<ShareToken> {
        let key = self.key()?;
        let iv = ShareIv::generate();
        let (tag, ciphertext) = key.seal(&iv, &payload_bytes(payload));
        Ok(ShareToken::assemble(&iv, &tag, &ciphertext))
    }

    /// Decode and authenticate `token`.
    ///
    /// Returns `Ok(None)` for every malformed, truncated, tampered or
    /// foreign-key token. Only a provisioning failure is an error.
    pub fn decode(
        &self,
        token: &str,
    ) -> std::result::Result<Option<SharePayload>, ConfigurationError> {
        match self.inspect(token) {
            Ok(payload) => Ok(Some(payload)),
            Err(TokenError::Invalid(reason)) => {
                debug!(%reason, len = token.len(), "rejected share token");
                Ok(None)
            }
            Err(TokenError::Configuration(e)) => Err(e),
        }
    }

    /// Like [`decode`](Self::decode) but keeps the rejection reason.
    ///
    /// Intended for diagnostics; never return the reason to a token bearer.
    pub fn inspect(&self, token: &str) -> std::result::Result<SharePayload, TokenError> {
        let key = self.key()?;
        let parts = TokenParts::parse(token)?;
        let plaintext = key.open(&parts.iv, &parts.tag, &parts.ciphertext)?;
        Ok(payload_from_bytes(&plaintext)?)
    }
}

impl fmt::Debug for ShareTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            KeySource::Fixed(_) => f.write_str("ShareTokenCodec(fixed key)"),
            KeySource::Provider { name, .. } => write!(f, "ShareTokenCodec(secret {})", name),
        }
    }
}

/// Get current time in milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidToken;
    use crate::secret::{StaticSecretProvider, DEFAULT_SECRET_NAME};
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use proptest::prelude::*;

    fn codec() -> ShareTokenCodec {
        ShareTokenCodec::new(ShareKey::from_bytes([0x5a; 32]))
    }

    fn flip_byte(token: &ShareToken, index: usize) -> String {
        let mut raw = URL_SAFE_NO_PAD.decode(token.as_str()).unwrap();
        raw[index] ^= 0x01;
        URL_SAFE_NO_PAD.encode(raw)
    }

    #[test]
    fn test_end_to_end() {
        let codec = codec();
        let before = now_millis();
        let token = codec.encode(&"user-123".into(), &"list-abc".into()).unwrap();
        let after = now_millis();

        let payload = codec.decode(token.as_str()).unwrap().unwrap();
        assert_eq!(payload.user_id().as_str(), "user-123");
        assert_eq!(payload.list_id().as_str(), "list-abc");
        assert!(payload.created_at() >= before && payload.created_at() <= after);
    }

    #[test]
    fn test_repeated_issuance_unlinkable() {
        let codec = codec();
        let user = UserId::new("u");
        let list = ListId::new("l");

        let t1 = codec.encode(&user, &list).unwrap();
        let t2 = codec.encode(&user, &list).unwrap();
        assert_ne!(t1, t2);

        // Same payload, same key: still distinct because of the IV.
        let payload = SharePayload::new(user, list, 1);
        let t3 = codec.encode_payload(&payload).unwrap();
        let t4 = codec.encode_payload(&payload).unwrap();
        assert_ne!(t3, t4);
    }

    #[test]
    fn test_every_byte_is_authenticated() {
        let codec = codec();
        let token = codec.encode(&"user-123".into(), &"list-abc".into()).unwrap();
        let len = URL_SAFE_NO_PAD.decode(token.as_str()).unwrap().len();

        for index in 0..len {
            let tampered = flip_byte(&token, index);
            assert_eq!(codec.decode(&tampered).unwrap(), None, "byte {}", index);
        }
    }

    #[test]
    fn test_tamper_reason_is_authentication() {
        let codec = codec();
        let token = codec.encode(&"u".into(), &"l".into()).unwrap();
        let tampered = flip_byte(&token, 40);
        assert_eq!(
            codec.inspect(&tampered),
            Err(TokenError::Invalid(InvalidToken::Authentication))
        );
    }

    #[test]
    fn test_truncated_and_garbage_rejected() {
        let codec = codec();
        assert_eq!(codec.decode("").unwrap(), None);
        assert_eq!(codec.decode("a").unwrap(), None);
        assert_eq!(codec.decode("not-base64url-!!!").unwrap(), None);

        let short = URL_SAFE_NO_PAD.encode([0u8; 32]);
        assert_eq!(codec.decode(&short).unwrap(), None);

        let token = codec.encode(&"u".into(), &"l".into()).unwrap();
        let mut raw = URL_SAFE_NO_PAD.decode(token.as_str()).unwrap();
        raw.pop();
        assert_eq!(codec.decode(&URL_SAFE_NO_PAD.encode(raw)).unwrap(), None);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = codec().encode(&"u".into(), &"l".into()).unwrap();
        let other = ShareTokenCodec::new(ShareKey::from_bytes([0xa5; 32]));
        assert_eq!(other.decode(token.as_str()).unwrap(), None);
    }

    #[test]
    fn test_non_json_plaintext_rejected() {
        let key = ShareKey::from_bytes([0x5a; 32]);
        let iv = ShareIv::generate();
        let (tag, ciphertext) = key.seal(&iv, b"{\"userId\":\"u\"}");
        let token = ShareToken::assemble(&iv, &tag, &ciphertext);

        let codec = ShareTokenCodec::new(key);
        assert!(matches!(
            codec.inspect(token.as_str()),
            Err(TokenError::Invalid(InvalidToken::MalformedPayload(_)))
        ));
        assert_eq!(codec.decode(token.as_str()).unwrap(), None);
    }

    #[test]
    fn test_unset_secret_is_configuration_error() {
        let codec =
            ShareTokenCodec::from_provider(Arc::new(StaticSecretProvider::new()), DEFAULT_SECRET_NAME);

        assert!(matches!(
            codec.encode(&"u".into(), &"l".into()),
            Err(ConfigurationError::MissingSecret { .. })
        ));
        let valid = self::codec().encode(&"u".into(), &"l".into()).unwrap();
        assert!(matches!(
            codec.decode(valid.as_str()),
            Err(ConfigurationError::MissingSecret { .. })
        ));
    }

    #[test]
    fn test_short_secret_is_configuration_error() {
        let provider = StaticSecretProvider::new().with_secret(DEFAULT_SECRET_NAME, "0123456789");
        let codec = ShareTokenCodec::from_provider(Arc::new(provider), DEFAULT_SECRET_NAME);

        assert!(matches!(
            codec.encode(&"u".into(), &"l".into()),
            Err(ConfigurationError::InvalidKeyLength { .. })
        ));
        assert!(matches!(
            codec.decode("anything"),
            Err(ConfigurationError::InvalidKeyLength { .. })
        ));
        assert!(codec.check_key().is_err());
    }

    #[test]
    fn test_provider_codec_matches_fixed_codec() {
        let key = ShareKey::generate();
        let provider = Arc::new(StaticSecretProvider::with_key(&key));
        let from_provider = ShareTokenCodec::from_provider(provider, DEFAULT_SECRET_NAME);
        let fixed = ShareTokenCodec::new(key);

        let token = from_provider.encode(&"u".into(), &"l".into()).unwrap();
        assert!(fixed.decode(token.as_str()).unwrap().is_some());
    }

    proptest! {
        #[test]
        fn roundtrip_preserves_ids(user in "\\PC{1,64}", list in "\\PC{1,64}", created_at in any::<i64>()) {
            let codec = codec();
            let payload = SharePayload::new(user.into(), list.into(), created_at);
            let token = codec.encode_payload(&payload).unwrap();
            prop_assert_eq!(codec.decode(token.as_str()).unwrap(), Some(payload));
        }

        #[test]
        fn arbitrary_input_never_panics(input in "\\PC{0,120}") {
            let _ = codec().decode(&input).unwrap();
        }
    }
}
