//! Plaintext encoding of share payloads.
//!
//! The payload is sealed as compact JSON:
//!
//! ```text
//! {"userId":"<string>","listId":"<string>","createdAt":<integer ms>}
//! ```
//!
//! Field order is fixed by the struct definition. Extra fields in a decoded
//! document are ignored; missing fields or wrong types are rejected.

use crate::error::InvalidToken;
use crate::types::SharePayload;

/// Encode a payload to its plaintext bytes.
pub fn payload_bytes(payload: &SharePayload) -> Vec<u8> {
    // Strings and an i64 always serialize.
    serde_json::to_vec(payload).expect("share payload serialization failed")
}

/// Decode plaintext bytes back into a payload.
pub fn payload_from_bytes(bytes: &[u8]) -> Result<SharePayload, InvalidToken> {
    serde_json::from_slice(bytes).map_err(|e| InvalidToken::MalformedPayload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_roundtrip() {
        let payload = SharePayload::new("user-123".into(), "list-abc".into(), 1_700_000_000_000);
        let bytes = payload_bytes(&payload);
        assert_eq!(
            bytes,
            br#"{"userId":"user-123","listId":"list-abc","createdAt":1700000000000}"#
        );
        assert_eq!(payload_from_bytes(&bytes).unwrap(), payload);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let bytes = br#"{"userId":"u","listId":"l","createdAt":7,"v":2}"#;
        let payload = payload_from_bytes(bytes).unwrap();
        assert_eq!(payload.created_at(), 7);
    }

    #[test]
    fn test_missing_field_rejected() {
        let bytes = br#"{"userId":"u","createdAt":7}"#;
        assert!(matches!(
            payload_from_bytes(bytes),
            Err(InvalidToken::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_wrong_types_rejected() {
        for bytes in [
            &br#"{"userId":1,"listId":"l","createdAt":7}"#[..],
            &br#"{"userId":"u","listId":"l","createdAt":"7"}"#[..],
            &br#"{"userId":"u","listId":"l","createdAt":7.5}"#[..],
            &b"not json"[..],
            &b"{}"[..],
        ] {
            assert!(payload_from_bytes(bytes).is_err(), "{:?}", bytes);
        }
    }
}
