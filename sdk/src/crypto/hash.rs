//! # Hash Functions
//!
//! The network identifies a submitted transaction by the SHA-384 digest of
//! its signed-transaction bytes. That is the only hash this crate needs, and
//! it has to match what every other client and the network compute, so it
//! lives here rather than being re-derived ad hoc.

use sha2::{Digest, Sha384};

/// Length of a transaction hash in bytes.
pub const TRANSACTION_HASH_LENGTH: usize = 48;

/// SHA-384 of `data`.
///
/// # Example
///
/// ```
/// use tessera_sdk::crypto::sha384;
///
/// let digest = sha384(b"signed transaction bytes");
/// assert_eq!(digest.len(), 48);
/// ```
pub fn sha384(data: &[u8]) -> [u8; TRANSACTION_HASH_LENGTH] {
    let mut hasher = Sha384::new();
    hasher.update(data);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha384_known_vector() {
        // NIST FIPS 180-2 test vector for "abc".
        assert_eq!(
            hex::encode(sha384(b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn sha384_is_deterministic() {
        assert_eq!(sha384(b"body"), sha384(b"body"));
        assert_ne!(sha384(b"body"), sha384(b"Body"));
    }
}
