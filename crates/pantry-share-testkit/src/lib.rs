//! # Pantry Share Testkit
//!
//! Testing utilities for shared shopping lists.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for keys, ids and token payloads
//! - **Fixtures**: A seeded owner/list/key setup and token tampering helpers
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pantry_share_testkit::generators::{token_from_params, TokenParams};
//!
//! proptest! {
//!     #[test]
//!     fn tokens_never_repeat(params: TokenParams) {
//!         prop_assert_ne!(token_from_params(&params), token_from_params(&params));
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use pantry_share_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([1; 32]);
//! let token = fixture.codec().encode(&fixture.owner, &fixture.list_id).unwrap();
//! assert!(fixture.codec().decode(token.as_str()).unwrap().is_some());
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{
    decoded_len, flip_token_byte, init_tracing, multi_owner_fixtures, truncate_token,
    TestFixture, SEEDED_CATEGORIES, SEEDED_ITEMS,
};
pub use generators::{token_from_params, TokenParams};
