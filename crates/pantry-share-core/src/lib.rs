//! # Pantry Share Core
//!
//! Pure primitives for sharing a shopping list by link: identifiers, the
//! share payload, key material, and the share-token codec.
//!
//! This crate does no storage and no networking. The only outside input is
//! the secret provider that supplies the key.
//!
//! ## Key Types
//!
//! - [`ShareTokenCodec`] - Issues and validates share tokens
//! - [`SharePayload`] - The `(user, list, created_at)` triple inside a token
//! - [`ShareKey`] - The 256-bit server key
//! - [`SecretProvider`] - Where the key comes from
//!
//! ## Token Format
//!
//! ```text
//! base64url_nopad( IV[16] || AuthTag[16] || AES-256-GCM(json payload) )
//! ```
//!
//! See [`token`] for the layout and [`canonical`] for the plaintext.
//!
//! ## Usage
//!
//! ```rust
//! use pantry_share_core::{ShareKey, ShareTokenCodec, UserId, ListId};
//!
//! let codec = ShareTokenCodec::new(ShareKey::generate());
//! let token = codec
//!     .encode(&UserId::new("user-123"), &ListId::new("list-abc"))
//!     .unwrap();
//!
//! let payload = codec.decode(token.as_str()).unwrap().unwrap();
//! assert_eq!(payload.list_id().as_str(), "list-abc");
//!
//! // Garbage never raises, it just fails to decode.
//! assert!(codec.decode("not-base64url-!!!").unwrap().is_none());
//! ```

pub mod canonical;
pub mod codec;
pub mod crypto;
pub mod error;
pub mod secret;
pub mod token;
pub mod types;

pub use codec::{now_millis, ShareTokenCodec};
pub use crypto::{AuthTag, ShareIv, ShareKey, IV_LEN, KEY_LEN, TAG_LEN};
pub use error::{ConfigurationError, InvalidToken, TokenError};
pub use secret::{EnvSecretProvider, SecretProvider, StaticSecretProvider, DEFAULT_SECRET_NAME};
pub use token::{ShareToken, TokenParts, MIN_TOKEN_LEN};
pub use types::{CategoryId, ItemId, ListId, SharePayload, UserId};
