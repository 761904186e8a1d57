//! Signature collection for frozen transactions.
//!
//! Signing is separate from building because the keys are often not where
//! the transaction is built (another party, a hardware wallet, a remote
//! signer). Signatures are keyed by public key: signing twice with the same
//! key replaces the earlier signature instead of adding a second one.
//!
//! A frozen envelope has one body per node and every signer signs each of
//! them, so an entry holds one signature per node, in node order.

use std::collections::HashSet;
use tracing::debug;

use super::envelope::Transaction;
use super::error::TransactionError;
use super::payload::Payload;
use crate::crypto::{Key, PrivateKey, PublicKey};
use crate::proto;

// ---------------------------------------------------------------------------
// SignatureSet
// ---------------------------------------------------------------------------

/// One signer's signatures, one per node body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    pub public_key: PublicKey,
    pub signatures: Vec<Vec<u8>>,
}

/// Signatures in the order their keys were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet {
    entries: Vec<SignatureEntry>,
}

impl SignatureSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignatureEntry> {
        self.entries.iter()
    }

    pub fn public_keys(&self) -> impl Iterator<Item = &PublicKey> {
        self.entries.iter().map(|e| &e.public_key)
    }

    pub fn get(&self, public_key: &PublicKey) -> Option<&SignatureEntry> {
        self.entries.iter().find(|e| &e.public_key == public_key)
    }

    pub fn contains(&self, public_key: &PublicKey) -> bool {
        self.get(public_key).is_some()
    }

    /// Replaces the entry for `public_key` in place, or appends one.
    pub(crate) fn upsert(&mut self, public_key: PublicKey, signatures: Vec<Vec<u8>>) {
        match self.entries.iter_mut().find(|e| e.public_key == public_key) {
            Some(entry) => entry.signatures = signatures,
            None => self.entries.push(SignatureEntry {
                public_key,
                signatures,
            }),
        }
    }

    /// The wire signature map for the body at `node_index`.
    pub(crate) fn to_proto(&self, node_index: usize) -> proto::SignatureMap {
        let sig_pair = self
            .entries
            .iter()
            .filter_map(|entry| {
                entry.signatures.get(node_index).map(|sig| proto::SignaturePair {
                    pub_key_prefix: entry.public_key.to_bytes().to_vec(),
                    signature: Some(proto::signature_pair::Signature::Ed25519(sig.clone())),
                })
            })
            .collect();
        proto::SignatureMap { sig_pair }
    }

    /// Same keys, ignoring order and signature bytes.
    pub(crate) fn same_signers(&self, other: &SignatureSet) -> bool {
        self.len() == other.len() && self.public_keys().all(|pk| other.contains(pk))
    }
}

impl<'a> IntoIterator for &'a SignatureSet {
    type Item = &'a SignatureEntry;
    type IntoIter = std::slice::Iter<'a, SignatureEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ---------------------------------------------------------------------------
// Envelope signing
// ---------------------------------------------------------------------------

impl<P: Payload> Transaction<P> {
    /// Attaches a signature produced elsewhere.
    ///
    /// The envelope must be frozen for exactly one node; the signature is
    /// taken to cover that node's body. Adding a second signature for the
    /// same key replaces the first.
    pub fn add_signature(&mut self, public_key: PublicKey, signature: Vec<u8>) -> Result<&mut Self, TransactionError> {
        self.require_frozen()?;
        let count = self.node_account_ids.len();
        if count != 1 {
            return Err(TransactionError::MultipleNodes { count });
        }
        debug!(kind = %P::KIND, signer = %public_key, "added signature");
        self.signatures.upsert(public_key, vec![signature]);
        Ok(self)
    }

    /// Signs every node body with `key`, freezing first if needed.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<&mut Self, TransactionError> {
        self.sign_with(key.public_key(), |message| key.sign(message))
    }

    /// Signs with each key in turn.
    pub fn sign_with_keys(&mut self, keys: &[PrivateKey]) -> Result<&mut Self, TransactionError> {
        for key in keys {
            self.sign(key)?;
        }
        Ok(self)
    }

    /// Signs every node body with an external signer for `public_key`,
    /// freezing first if needed.
    ///
    /// `signer` receives each body's bytes and returns the signature. It is
    /// not checked; use [`verify_signatures`](Self::verify_signatures) for
    /// that.
    pub fn sign_with(
        &mut self,
        public_key: PublicKey,
        mut signer: impl FnMut(&[u8]) -> Vec<u8>,
    ) -> Result<&mut Self, TransactionError> {
        if !self.is_frozen() {
            self.freeze()?;
        }
        let signatures: Vec<Vec<u8>> = self.frozen_bodies.iter().map(|body| signer(body.as_slice())).collect();
        debug!(
            kind = %P::KIND,
            signer = %public_key,
            bodies = signatures.len(),
            "signed transaction"
        );
        self.signatures.upsert(public_key, signatures);
        Ok(self)
    }

    pub fn signatures(&self) -> &SignatureSet {
        &self.signatures
    }

    /// The bytes a signer signs: the first node's frozen body.
    pub fn signable_bytes(&self) -> Result<&[u8], TransactionError> {
        self.require_frozen()?;
        self.frozen_bodies
            .first()
            .map(Vec::as_slice)
            .ok_or(TransactionError::MissingNodeAccountIds)
    }

    /// Every node's frozen body, in node order. Empty while mutable.
    pub fn signable_bytes_per_node(&self) -> &[Vec<u8>] {
        &self.frozen_bodies
    }

    /// Public keys reachable from `key` that have not signed yet.
    ///
    /// Informational: the engine never refuses an under-signed transaction.
    pub fn signers_missing(&self, key: &Key) -> Vec<PublicKey> {
        key.public_keys()
            .into_iter()
            .filter(|pk| !self.signatures.contains(pk))
            .collect()
    }

    /// Whether the attached signers would satisfy `key`.
    pub fn is_signed_by(&self, key: &Key) -> bool {
        let signers: HashSet<PublicKey> = self.signatures.public_keys().copied().collect();
        key.is_satisfied_by(&signers)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{AccountId, Timestamp, TransactionId};
    use crate::operations::NodeUpdate;
    use crate::transaction::FreezeStateError;

    fn frozen(nodes: &[u64]) -> Transaction<NodeUpdate> {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(TransactionId::new(
            AccountId::from_num(5),
            Timestamp { seconds: 1_700_000_000, nanos: 0 },
        ))
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
    fn add_signature_requires_frozen() {
        let mut tx = Transaction::<NodeUpdate>::new();
        let pk = PrivateKey::generate().public_key();
        let err = tx.add_signature(pk, vec![1; 64]).unwrap_err();
        assert_eq!(err, TransactionError::FreezeState(FreezeStateError::NotFrozen));
    }

    #[test]
    fn add_signature_requires_single_node() {
        let mut tx = frozen(&[3, 4]);
        let pk = PrivateKey::generate().public_key();
        let err = tx.add_signature(pk, vec![1; 64]).unwrap_err();
        assert_eq!(err, TransactionError::MultipleNodes { count: 2 });
    }

    #[test]
    fn add_signature_twice_keeps_one_entry_with_second_value() {
        let mut tx = frozen(&[3]);
        let pk = PrivateKey::generate().public_key();
        tx.add_signature(pk, vec![1; 64]).unwrap();
        tx.add_signature(pk, vec![2; 64]).unwrap();
        assert_eq!(tx.signatures().len(), 1);
        assert_eq!(tx.signatures().get(&pk).unwrap().signatures, vec![vec![2; 64]]);
    }

    #[test]
    fn signatures_keep_insertion_order() {
        let mut tx = frozen(&[3]);
        let keys: Vec<PublicKey> = (0..4).map(|_| PrivateKey::generate().public_key()).collect();
        for pk in &keys {
            tx.add_signature(*pk, vec![0; 64]).unwrap();
        }
        // Re-signing the first key must not move it.
        tx.add_signature(keys[0], vec![9; 64]).unwrap();
        let order: Vec<PublicKey> = tx.signatures().public_keys().copied().collect();
        assert_eq!(order, keys);
    }

    #[test]
    fn sign_produces_one_valid_signature_per_node() {
        let mut tx = frozen(&[3, 4, 5]);
        let key = PrivateKey::generate();
        tx.sign(&key).unwrap();

        let entry = tx.signatures().get(&key.public_key()).unwrap();
        assert_eq!(entry.signatures.len(), 3);
        for (body, sig) in tx.signable_bytes_per_node().iter().zip(&entry.signatures) {
            assert!(key.public_key().verify(body, sig));
        }
    }

    #[test]
    fn sign_freezes_a_ready_envelope() {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(TransactionId::new(AccountId::from_num(5), Timestamp::now()))
            .unwrap()
            .set_node_account_ids([AccountId::from_num(3)])
            .unwrap();
        tx.sign(&PrivateKey::generate()).unwrap();
        assert!(tx.is_frozen());
    }

    #[test]
    fn signing_does_not_change_body_bytes() {
        let mut tx = frozen(&[3]);
        let before = tx.signable_bytes().unwrap().to_vec();
        tx.sign(&PrivateKey::generate()).unwrap();
        assert_eq!(tx.signable_bytes().unwrap(), before.as_slice());
    }

    #[test]
    fn signers_missing_reports_unsigned_threshold_members() {
        let mut tx = frozen(&[3]);
        let a = PrivateKey::generate();
        let b = PrivateKey::generate();
        let c = PrivateKey::generate();
        let policy = Key::threshold(
            2,
            [Key::from(a.public_key()), Key::from(b.public_key()), Key::from(c.public_key())],
        );

        tx.sign(&a).unwrap();
        assert_eq!(tx.signers_missing(&policy).len(), 2);
        assert!(!tx.is_signed_by(&policy));

        tx.sign(&c).unwrap();
        assert_eq!(tx.signers_missing(&policy), vec![b.public_key()]);
        assert!(tx.is_signed_by(&policy));
    }

    #[test]
    fn sign_with_keys_signs_with_each() {
        let mut tx = frozen(&[3]);
        let keys = vec![PrivateKey::generate(), PrivateKey::generate()];
        tx.sign_with_keys(&keys).unwrap();
        assert_eq!(tx.signatures().len(), 2);
    }
}
