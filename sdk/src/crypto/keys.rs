//! # Key Management
//!
//! Ed25519 private and public keys for authorizing transactions.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses the OS RNG (`OsRng`).
//! - Private key bytes never appear in `Debug` output or logs.

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur during key operations.
///
/// Deliberately vague about *why* a key was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("invalid private key bytes: expected 32 bytes")]
    InvalidPrivateKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,
}

// ---------------------------------------------------------------------------
// PrivateKey
// ---------------------------------------------------------------------------

/// An Ed25519 signing key.
///
/// `PrivateKey` intentionally does NOT implement `Serialize`. Exporting a
/// secret should be a deliberate call to [`to_bytes`](Self::to_bytes), not a
/// side effect of dumping some struct to JSON.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Generate a fresh key from the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Deterministic key from a 32-byte seed. In Ed25519 the seed *is* the
    /// secret key.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let seed: [u8; 32] = bytes.try_into().map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Parses a hex-encoded 32-byte secret.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidPrivateKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Signs `message`, returning the 64 raw signature bytes.
    ///
    /// Ed25519 is deterministic: the same key and message always produce the
    /// same signature.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing_key.sign(message).to_bytes().to_vec()
    }

    /// Raw secret bytes. **Handle with care.**
    pub fn to_bytes(&self) -> [u8; 32] {
        self.signing_key.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl Clone for PrivateKey {
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material, not even partially.
        write!(f, "PrivateKey(pub={})", self.public_key())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// An Ed25519 verifying key. Identifies a signer in a signature map and is
/// the leaf of every [`Key`](super::Key) policy.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Parses 32 raw bytes, rejecting values that are not curve points.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let raw: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        let verifying_key =
            VerifyingKey::from_bytes(&raw).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { verifying_key })
    }

    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim()).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Returns `true` if `signature` is a valid Ed25519 signature of
    /// `message` under this key. Malformed signatures simply fail.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(raw) = <[u8; SIGNATURE_LENGTH]>::try_from(signature) else {
            return false;
        };
        self.verifying_key
            .verify(message, &DalekSignature::from_bytes(&raw))
            .is_ok()
    }
}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_roundtrip() {
        let key = PrivateKey::generate();
        let sig = key.sign(b"update node 1");
        assert_eq!(sig.len(), SIGNATURE_LENGTH);
        assert!(key.public_key().verify(b"update node 1", &sig));
    }

    #[test]
    fn wrong_message_or_key_fails() {
        let a = PrivateKey::generate();
        let b = PrivateKey::generate();
        let sig = a.sign(b"message");
        assert!(!a.public_key().verify(b"other", &sig));
        assert!(!b.public_key().verify(b"message", &sig));
    }

    #[test]
    fn truncated_signature_fails_without_panic() {
        let key = PrivateKey::generate();
        let sig = key.sign(b"message");
        assert!(!key.public_key().verify(b"message", &sig[..63]));
    }

    #[test]
    fn signing_is_deterministic() {
        let key = PrivateKey::from_seed(&[7u8; 32]);
        assert_eq!(key.sign(b"same"), key.sign(b"same"));
    }

    #[test]
    fn hex_roundtrips() {
        let key = PrivateKey::generate();
        let restored = PrivateKey::from_hex(&key.to_hex()).unwrap();
        assert_eq!(restored.public_key(), key.public_key());

        let public = key.public_key();
        assert_eq!(PublicKey::from_hex(&public.to_hex()).unwrap(), public);
    }

    #[test]
    fn rejects_wrong_lengths() {
        assert_eq!(PrivateKey::from_bytes(&[1u8; 31]).unwrap_err(), KeyError::InvalidPrivateKey);
        assert_eq!(PublicKey::from_bytes(&[1u8; 33]).unwrap_err(), KeyError::InvalidPublicKey);
        assert!(PrivateKey::from_hex("zz").is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let key = PrivateKey::from_seed(&[9u8; 32]);
        let debug = format!("{key:?}");
        assert!(!debug.contains(&key.to_hex()));
        assert!(debug.contains(&key.public_key().to_hex()));
    }

    #[test]
    fn public_key_serde_is_hex() {
        let public = PrivateKey::generate().public_key();
        let json = serde_json::to_string(&public).unwrap();
        assert_eq!(json, format!("\"{}\"", public.to_hex()));
        let back: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, public);
    }
}
