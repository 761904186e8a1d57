//! # Cryptographic Primitives
//!
//! Ed25519 keys for authorizing transactions, the key policies payloads carry
//! (single keys, key lists, threshold lists), and the SHA-384 transaction
//! hash.
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations (`ed25519-dalek`, `sha2`). We don't roll our own.

pub mod hash;
pub mod key;
pub mod keys;

pub use hash::sha384;
pub use key::Key;
pub use keys::{KeyError, PrivateKey, PublicKey};
