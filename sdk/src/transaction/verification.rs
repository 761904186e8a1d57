//! Cryptographic verification of attached signatures.
//!
//! The engine never needs this to build or encode a transaction; it exists
//! for tooling that receives signed bytes from elsewhere (an inspector, a
//! co-signer) and wants to know whether they are intact before passing them
//! on. Checks run from cheapest to most expensive.

use thiserror::Error;

use super::envelope::Transaction;
use super::payload::Payload;
use crate::config::SIGNATURE_LENGTH;
use crate::id::AccountId;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a transaction's signatures failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    /// Only frozen transactions have body bytes to verify against.
    #[error("transaction is not frozen")]
    NotFrozen,

    /// A signer has a different number of signatures than there are nodes.
    #[error("signer {signer} has {found} signatures for {expected} node bodies")]
    SignatureCount {
        signer: String,
        expected: usize,
        found: usize,
    },

    /// A signature is not 64 bytes.
    #[error("malformed signature from {signer}: {len} bytes")]
    MalformedSignature { signer: String, len: usize },

    /// The Ed25519 signature does not verify against the body.
    #[error("invalid signature from {signer} for node {node}")]
    InvalidSignature { signer: String, node: AccountId },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

impl<P: Payload> Transaction<P> {
    /// Verifies every attached signature against the body it covers.
    ///
    /// The checks, in order:
    ///
    /// 1. **Frozen**: there are body bytes to check.
    /// 2. **Count**: one signature per node body for each signer.
    /// 3. **Length**: each signature is 64 bytes.
    /// 4. **Ed25519**: each signature verifies against its body.
    ///
    /// Says nothing about whether the signers are the right ones; compare
    /// with [`signers_missing`](Self::signers_missing) for that.
    pub fn verify_signatures(&self) -> Result<(), VerificationError> {
        if !self.is_frozen() {
            return Err(VerificationError::NotFrozen);
        }

        let bodies = &self.frozen_bodies;
        for entry in &self.signatures {
            if entry.signatures.len() != bodies.len() {
                return Err(VerificationError::SignatureCount {
                    signer: entry.public_key.to_hex(),
                    expected: bodies.len(),
                    found: entry.signatures.len(),
                });
            }
            if let Some(bad) = entry.signatures.iter().find(|s| s.len() != SIGNATURE_LENGTH) {
                return Err(VerificationError::MalformedSignature {
                    signer: entry.public_key.to_hex(),
                    len: bad.len(),
                });
            }
        }

        for entry in &self.signatures {
            for ((body, signature), node) in bodies
                .iter()
                .zip(&entry.signatures)
                .zip(&self.node_account_ids)
            {
                if !entry.public_key.verify(body, signature) {
                    return Err(VerificationError::InvalidSignature {
                        signer: entry.public_key.to_hex(),
                        node: node.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::id::{Timestamp, TransactionId};
    use crate::operations::NodeUpdate;

    fn frozen(nodes: &[u64]) -> Transaction<NodeUpdate> {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(TransactionId::new(AccountId::from_num(7), Timestamp { seconds: 3, nanos: 0 }))
            .unwrap()
            .set_node_account_ids(nodes.iter().map(|n| AccountId::from_num(*n)))
            .unwrap()
            .set_node_id(1)
            .unwrap()
            .freeze()
            .unwrap();
        tx
    }

    #[test]
    fn valid_signatures_pass() {
        let mut tx = frozen(&[3, 4]);
        tx.sign(&PrivateKey::generate()).unwrap();
        tx.sign(&PrivateKey::generate()).unwrap();
        assert_eq!(tx.verify_signatures(), Ok(()));
    }

    #[test]
    fn unsigned_frozen_transaction_passes() {
        assert!(frozen(&[3]).verify_signatures().is_ok());
    }

    #[test]
    fn rejects_mutable_transaction() {
        let tx = Transaction::<NodeUpdate>::new();
        assert_eq!(tx.verify_signatures(), Err(VerificationError::NotFrozen));
    }

    #[test]
    fn rejects_signature_over_other_bytes() {
        let mut tx = frozen(&[3]);
        let key = PrivateKey::generate();
        tx.add_signature(key.public_key(), key.sign(b"something else"))
            .unwrap();
        assert!(matches!(
            tx.verify_signatures(),
            Err(VerificationError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn rejects_wrong_key_signature() {
        let mut tx = frozen(&[3]);
        let signer = PrivateKey::generate();
        let claimed = PrivateKey::generate().public_key();
        let body = tx.signable_bytes().unwrap().to_vec();
        tx.add_signature(claimed, signer.sign(&body)).unwrap();
        assert!(tx.verify_signatures().is_err());
    }

    #[test]
    fn rejects_malformed_signature() {
        let mut tx = frozen(&[3]);
        let pk = PrivateKey::generate().public_key();
        tx.add_signature(pk, vec![0; 10]).unwrap();
        assert_eq!(
            tx.verify_signatures(),
            Err(VerificationError::MalformedSignature {
                signer: pk.to_hex(),
                len: 10
            })
        );
    }

    #[test]
    fn decoded_signatures_still_verify() {
        let mut tx = frozen(&[3, 4, 5]);
        tx.sign(&PrivateKey::generate()).unwrap();
        let decoded = Transaction::<NodeUpdate>::from_bytes(&tx.to_bytes()).unwrap();
        assert!(decoded.verify_signatures().is_ok());
    }
}
