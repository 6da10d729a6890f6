//! Proptest generators for property-based testing.

use proptest::prelude::*;

use pantry_share_core::{ListId, SharePayload, ShareKey, ShareToken, ShareTokenCodec, UserId};

/// Generate a random share key.
pub fn share_key() -> impl Strategy<Value = ShareKey> {
    any::<[u8; 32]>().prop_map(ShareKey::from_bytes)
}

/// Generate an opaque identifier: non-empty, any printable text.
pub fn opaque_id() -> impl Strategy<Value = String> {
    "\\PC{1,48}".prop_map(String::from)
}

/// Generate a document-database style identifier.
pub fn document_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{20}".prop_map(String::from)
}

/// Generate a UserId.
pub fn user_id() -> impl Strategy<Value = UserId> {
    prop_oneof![opaque_id(), document_id()].prop_map(UserId::new)
}

/// Generate a ListId.
pub fn list_id() -> impl Strategy<Value = ListId> {
    prop_oneof![opaque_id(), document_id()].prop_map(ListId::new)
}

/// Generate an issuance timestamp, including pre-epoch and far-future values.
pub fn created_at() -> impl Strategy<Value = i64> {
    prop_oneof![
        0i64..=4_102_444_800_000i64,
        any::<i64>(),
    ]
}

/// Parameters for issuing a token.
#[derive(Debug, Clone)]
pub struct TokenParams {
    pub key: ShareKey,
    pub payload: SharePayload,
}

impl Arbitrary for TokenParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (share_key(), user_id(), list_id(), created_at())
            .prop_map(|(key, user, list, ts)| TokenParams {
                key,
                payload: SharePayload::new(user, list, ts),
            })
            .boxed()
    }
}

/// Seal the parameters' payload under their key.
pub fn token_from_params(params: &TokenParams) -> ShareToken {
    ShareTokenCodec::new(params.key.clone())
        .encode_payload(&params.payload)
        .expect("fixed key cannot fail provisioning")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{decoded_len, flip_token_byte};

    proptest! {
        #[test]
        fn test_roundtrip(params: TokenParams) {
            let token = token_from_params(&params);
            let codec = ShareTokenCodec::new(params.key.clone());

            prop_assert_eq!(codec.decode(token.as_str()).unwrap(), Some(params.payload));
        }

        #[test]
        fn test_any_flipped_byte_rejected(params in any::<TokenParams>(), index in any::<prop::sample::Index>()) {
            let token = token_from_params(&params);
            let position = index.index(decoded_len(&token));
            let tampered = flip_token_byte(&token, position);
            let codec = ShareTokenCodec::new(params.key.clone());

            prop_assert_eq!(codec.decode(&tampered).unwrap(), None);
        }

        #[test]
        fn test_foreign_key_rejected(params in any::<TokenParams>(), other in share_key()) {
            prop_assume!(other.as_bytes() != params.key.as_bytes());
            let token = token_from_params(&params);

            prop_assert_eq!(ShareTokenCodec::new(other).decode(token.as_str()).unwrap(), None);
        }

        #[test]
        fn test_fresh_token_each_time(params: TokenParams) {
            prop_assert_ne!(token_from_params(&params), token_from_params(&params));
        }
    }
}
