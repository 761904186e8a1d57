//! Wire encoding and decoding of envelopes.
//!
//! A serialized transaction is a protobuf `TransactionList` with one
//! `Transaction` per node. Each entry wraps a `SignedTransaction`: the node's
//! body bytes and the signature map over them.
//!
//! Frozen envelopes encode their snapshotted body bytes, so re-encoding a
//! decoded transaction reproduces the bytes that were signed. Mutable
//! envelopes are encoded from their current fields and carry no signatures.

use prost::Message;
use std::time::Duration;
use tracing::debug;

use super::envelope::{check_memo, Transaction};
use super::error::{DecodeError, TransactionError};
use super::payload::{kind_of, Payload};
use super::signing::SignatureSet;
use super::types::{Hbar, LifecycleState};
use crate::config::{RetryPolicy, DEFAULT_VALID_DURATION, MAX_VALID_DURATION};
use crate::crypto::{sha384, PublicKey};
use crate::id::{AccountId, TransactionId};
use crate::proto;

/// Encodes `tx` into its wire form.
pub fn to_bytes<P: Payload>(tx: &Transaction<P>) -> Vec<u8> {
    tx.to_bytes()
}

impl<P: Payload> Transaction<P> {
    /// The `TransactionList` bytes for this envelope.
    pub fn to_bytes(&self) -> Vec<u8> {
        let transaction_list = self
            .signed_transactions()
            .into_iter()
            .map(|signed| proto::Transaction {
                signed_transaction_bytes: signed.encode_to_vec(),
                ..Default::default()
            })
            .collect();
        proto::TransactionList { transaction_list }.encode_to_vec()
    }

    /// Decodes bytes that must hold a transaction of kind `P`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_entries(decode_entries(bytes)?)
    }

    /// SHA-384 of the first node's signed transaction: the hash the
    /// network reports this transaction under.
    pub fn transaction_hash(&self) -> Result<[u8; 48], TransactionError> {
        self.require_frozen()?;
        self.transaction_hash_per_node()
            .into_iter()
            .next()
            .map(|(_, hash)| hash)
            .ok_or(TransactionError::MissingNodeAccountIds)
    }

    /// The transaction hash as submitted to each node.
    pub fn transaction_hash_per_node(&self) -> Vec<(AccountId, [u8; 48])> {
        if !self.is_frozen() {
            return Vec::new();
        }
        self.node_account_ids
            .iter()
            .cloned()
            .zip(self.signed_transactions())
            .map(|(node, signed)| (node, sha384(&signed.encode_to_vec())))
            .collect()
    }

    /// One signed transaction per node; a single unsigned one when mutable
    /// and no node is set.
    pub(crate) fn signed_transactions(&self) -> Vec<proto::SignedTransaction> {
        if self.is_frozen() {
            return self
                .frozen_bodies
                .iter()
                .enumerate()
                .map(|(index, body)| proto::SignedTransaction {
                    body_bytes: body.clone(),
                    sig_map: Some(self.signatures.to_proto(index)),
                })
                .collect();
        }

        let fee = self.max_transaction_fee.unwrap_or(Hbar::ZERO);
        let id = self.transaction_id.as_ref();
        let bodies: Vec<proto::TransactionBody> = if self.node_account_ids.is_empty() {
            vec![self.build_body(id, None, fee)]
        } else {
            self.node_account_ids
                .iter()
                .map(|node| self.build_body(id, Some(node), fee))
                .collect()
        };
        bodies
            .into_iter()
            .map(|body| proto::SignedTransaction {
                body_bytes: body.encode_to_vec(),
                sig_map: None,
            })
            .collect()
    }

    /// The protobuf body for one node.
    pub(crate) fn build_body(
        &self,
        transaction_id: Option<&TransactionId>,
        node: Option<&AccountId>,
        fee: Hbar,
    ) -> proto::TransactionBody {
        proto::TransactionBody {
            transaction_id: transaction_id.map(TransactionId::to_proto),
            node_account_id: node.map(AccountId::to_proto),
            transaction_fee: fee.to_tinybars().max(0) as u64,
            transaction_valid_duration: Some(proto::Duration {
                seconds: self.valid_duration.as_secs() as i64,
            }),
            memo: self.memo.clone(),
            data: Some(P::wrap(self.payload.to_body())),
        }
    }

    /// Rebuilds an envelope from decoded list entries.
    pub(crate) fn from_entries(entries: Vec<RawEntry>) -> Result<Self, DecodeError> {
        let first = entries.first().ok_or(DecodeError::Empty)?;

        let data = first.body.data.clone().ok_or(DecodeError::UnknownKind)?;
        let found = kind_of(&data);
        let payload_body = P::unwrap(data).ok_or_else(|| DecodeError::KindMismatch {
            expected: P::KIND,
            found: found.to_string(),
        })?;

        check_consistent(&entries)?;

        let transaction_id = first
            .body
            .transaction_id
            .as_ref()
            .map(|pb| {
                TransactionId::from_proto(pb).ok_or(DecodeError::InvalidField {
                    field: "transaction_id",
                    reason: "account must be addressed by number and valid start nanos within 0..1e9".into(),
                })
            })
            .transpose()?;

        let node_account_ids = entries
            .iter()
            .filter_map(|entry| entry.body.node_account_id.as_ref())
            .map(|pb| {
                AccountId::from_proto(pb).ok_or(DecodeError::InvalidField {
                    field: "node_account_id",
                    reason: "node must be addressed by number".into(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let frozen = transaction_id.is_some() && !node_account_ids.is_empty();
        let signatures = collect_signatures(&entries)?;
        if !frozen && !signatures.is_empty() {
            return Err(DecodeError::SignedWithoutTransactionId);
        }

        let memo = first.body.memo.clone();
        check_memo(&memo).map_err(|err| DecodeError::InvalidField {
            field: "memo",
            reason: err.to_string(),
        })?;
        let valid_duration = match first.body.transaction_valid_duration.as_ref() {
            Some(d) => u64::try_from(d.seconds)
                .ok()
                .map(Duration::from_secs)
                .filter(|duration| (1..=MAX_VALID_DURATION.as_secs()).contains(&duration.as_secs()))
                .ok_or_else(|| DecodeError::InvalidField {
                    field: "transaction_valid_duration",
                    reason: format!("{}s outside 1s..={}s", d.seconds, MAX_VALID_DURATION.as_secs()),
                })?,
            None => DEFAULT_VALID_DURATION,
        };
        let fee = i64::try_from(first.body.transaction_fee).map_err(|_| DecodeError::InvalidField {
            field: "transaction_fee",
            reason: format!("{} exceeds the tinybar range", first.body.transaction_fee),
        })?;
        let max_transaction_fee = match (frozen, fee) {
            (false, 0) => None,
            (_, fee) => Some(Hbar::from_tinybars(fee)),
        };

        let payload = P::from_body(payload_body)?;
        let construction_error = if frozen { payload.construction_error() } else { None };
        let frozen_bodies = if frozen {
            entries.iter().map(|e| e.body_bytes.clone()).collect()
        } else {
            Vec::new()
        };

        debug!(
            kind = %P::KIND,
            entries = entries.len(),
            signers = signatures.len(),
            frozen,
            "decoded transaction"
        );

        Ok(Self {
            transaction_id,
            node_account_ids,
            max_transaction_fee,
            memo,
            valid_duration,
            retry: RetryPolicy::default(),
            regenerate_transaction_id: None,
            checksum_ledger: None,
            state: if frozen {
                LifecycleState::Frozen
            } else {
                LifecycleState::Mutable
            },
            construction_error,
            frozen_bodies,
            signatures,
            payload,
        })
    }
}

// ---------------------------------------------------------------------------
// Entry decoding
// ---------------------------------------------------------------------------

/// One list entry, unwrapped to its body.
#[derive(Debug, Clone)]
pub(crate) struct RawEntry {
    pub(crate) body_bytes: Vec<u8>,
    pub(crate) body: proto::TransactionBody,
    pub(crate) sig_map: Option<proto::SignatureMap>,
}

/// Splits wire bytes into per-node entries.
///
/// Accepts a `TransactionList` or a bare `Transaction`, and both the
/// `signed_transaction_bytes` form and the legacy `body_bytes`/`sig_map`
/// form of each entry.
pub(crate) fn decode_entries(bytes: &[u8]) -> Result<Vec<RawEntry>, DecodeError> {
    let list = proto::TransactionList::decode(bytes)?;
    let transactions = if list.transaction_list.is_empty() {
        let single = proto::Transaction::decode(bytes)?;
        if single.signed_transaction_bytes.is_empty() && single.body_bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        vec![single]
    } else {
        list.transaction_list
    };

    transactions
        .into_iter()
        .enumerate()
        .map(|(index, tx)| {
            let (body_bytes, sig_map) = if !tx.signed_transaction_bytes.is_empty() {
                let signed = proto::SignedTransaction::decode(tx.signed_transaction_bytes.as_slice())?;
                (signed.body_bytes, signed.sig_map)
            } else {
                (tx.body_bytes, tx.sig_map)
            };
            if body_bytes.is_empty() {
                return Err(DecodeError::MissingBody { index });
            }
            let body = proto::TransactionBody::decode(body_bytes.as_slice())?;
            Ok(RawEntry {
                body_bytes,
                body,
                sig_map,
            })
        })
        .collect()
}

/// Every body must describe the same transaction; only the node differs.
fn check_consistent(entries: &[RawEntry]) -> Result<(), DecodeError> {
    let Some((first, rest)) = entries.split_first() else {
        return Err(DecodeError::Empty);
    };
    for entry in rest {
        let (a, b) = (&first.body, &entry.body);
        if a.transaction_id != b.transaction_id {
            return Err(DecodeError::InconsistentBodies { field: "transaction_id" });
        }
        if a.data != b.data {
            return Err(DecodeError::InconsistentBodies { field: "payload" });
        }
        if a.transaction_fee != b.transaction_fee {
            return Err(DecodeError::InconsistentBodies { field: "transaction_fee" });
        }
        if a.memo != b.memo {
            return Err(DecodeError::InconsistentBodies { field: "memo" });
        }
        if a.transaction_valid_duration != b.transaction_valid_duration {
            return Err(DecodeError::InconsistentBodies {
                field: "transaction_valid_duration",
            });
        }
        if b.node_account_id.is_none() {
            return Err(DecodeError::InconsistentBodies { field: "node_account_id" });
        }
    }
    if entries.len() > 1 && first.body.node_account_id.is_none() {
        return Err(DecodeError::InconsistentBodies { field: "node_account_id" });
    }
    Ok(())
}

/// Gathers the per-entry signature maps into one set. Every entry must be
/// signed by the same keys.
fn collect_signatures(entries: &[RawEntry]) -> Result<SignatureSet, DecodeError> {
    let mut per_entry = Vec::with_capacity(entries.len());
    for entry in entries {
        let mut set = SignatureSet::default();
        let pairs = entry.sig_map.as_ref().map(|m| m.sig_pair.as_slice()).unwrap_or_default();
        for pair in pairs {
            let signature = match &pair.signature {
                Some(proto::signature_pair::Signature::Ed25519(sig)) => sig.clone(),
                _ => {
                    return Err(DecodeError::UnsupportedSignature {
                        prefix: hex::encode(&pair.pub_key_prefix),
                    })
                }
            };
            let public_key = PublicKey::from_bytes(&pair.pub_key_prefix)?;
            set.upsert(public_key, vec![signature]);
        }
        per_entry.push(set);
    }

    let Some((first, rest)) = per_entry.split_first() else {
        return Ok(SignatureSet::default());
    };
    if rest.iter().any(|set| !set.same_signers(first)) {
        return Err(DecodeError::InconsistentSignatures);
    }

    let mut merged = SignatureSet::default();
    for entry in first {
        let signatures = per_entry
            .iter()
            .filter_map(|set| set.get(&entry.public_key))
            .flat_map(|e| e.signatures.iter().cloned())
            .collect();
        merged.upsert(entry.public_key, signatures);
    }
    Ok(merged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::id::Timestamp;
    use crate::operations::{AccountCreate, NodeUpdate};

    fn tx_id() -> TransactionId {
        TransactionId::new(AccountId::from_num(5), Timestamp { seconds: 1_700_000_000, nanos: 1 })
    }

    fn frozen(nodes: &[u64]) -> Transaction<NodeUpdate> {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(tx_id())
            .unwrap()
            .set_node_account_ids(nodes.iter().map(|n| AccountId::from_num(*n)))
            .unwrap()
            .set_memo("codec")
            .unwrap()
            .set_node_id(4)
            .unwrap()
            .set_description("relocated")
            .unwrap()
            .freeze()
            .unwrap();
        tx
    }

    #[test]
    fn frozen_roundtrip_preserves_fields_and_signatures() {
        let mut tx = frozen(&[3, 4]);
        tx.sign(&PrivateKey::generate()).unwrap();
        tx.sign(&PrivateKey::generate()).unwrap();

        let decoded = Transaction::<NodeUpdate>::from_bytes(&tx.to_bytes()).unwrap();
        assert!(decoded.is_frozen());
        assert_eq!(decoded.transaction_id(), tx.transaction_id());
        assert_eq!(decoded.node_account_ids(), tx.node_account_ids());
        assert_eq!(decoded.max_transaction_fee(), tx.max_transaction_fee());
        assert_eq!(decoded.memo(), "codec");
        assert_eq!(decoded.valid_duration(), tx.valid_duration());
        assert_eq!(decoded.payload(), tx.payload());
        assert_eq!(decoded.signatures(), tx.signatures());
        assert_eq!(decoded.to_bytes(), tx.to_bytes());
    }

    #[test]
    fn mutable_envelope_encodes_without_signatures_and_decodes_mutable() {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_node_id(2).unwrap().set_memo("draft").unwrap();
        let decoded = Transaction::<NodeUpdate>::from_bytes(&tx.to_bytes()).unwrap();
        assert!(!decoded.is_frozen());
        assert_eq!(decoded.memo(), "draft");
        assert_eq!(decoded.payload().node_id(), Some(2));
        assert!(decoded.max_transaction_fee().is_none());
    }

    #[test]
    fn decode_encode_decode_is_stable() {
        let mut tx = frozen(&[3]);
        tx.sign(&PrivateKey::generate()).unwrap();
        let once = Transaction::<NodeUpdate>::from_bytes(&tx.to_bytes()).unwrap();
        let twice = Transaction::<NodeUpdate>::from_bytes(&once.to_bytes()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn decoding_as_wrong_kind_fails() {
        let tx = frozen(&[3]);
        let err = Transaction::<AccountCreate>::from_bytes(&tx.to_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::KindMismatch { .. }));
    }

    #[test]
    fn empty_bytes_fail() {
        assert_eq!(
            Transaction::<NodeUpdate>::from_bytes(&[]).unwrap_err(),
            DecodeError::Empty
        );
    }

    #[test]
    fn garbage_bytes_fail() {
        assert!(Transaction::<NodeUpdate>::from_bytes(&[0xff, 0xff, 0xff]).is_err());
    }

    #[test]
    fn legacy_single_transaction_form_decodes() {
        let tx = frozen(&[3]);
        let key = PrivateKey::generate();
        let body = tx.signable_bytes().unwrap().to_vec();
        let legacy = proto::Transaction {
            body_bytes: body.clone(),
            sig_map: Some(proto::SignatureMap {
                sig_pair: vec![proto::SignaturePair {
                    pub_key_prefix: key.public_key().to_bytes().to_vec(),
                    signature: Some(proto::signature_pair::Signature::Ed25519(key.sign(&body))),
                }],
            }),
            ..Default::default()
        };
        let decoded = Transaction::<NodeUpdate>::from_bytes(&legacy.encode_to_vec()).unwrap();
        assert!(decoded.is_frozen());
        assert!(decoded.signatures().contains(&key.public_key()));
        assert_eq!(decoded.payload().node_id(), Some(4));
    }

    #[test]
    fn inconsistent_bodies_rejected() {
        let a = frozen(&[3]);
        let mut b = Transaction::<NodeUpdate>::new();
        b.set_transaction_id(tx_id())
            .unwrap()
            .set_node_account_ids([AccountId::from_num(4)])
            .unwrap()
            .set_memo("codec")
            .unwrap()
            .set_node_id(99)
            .unwrap()
            .freeze()
            .unwrap();

        let mut list = proto::TransactionList::decode(a.to_bytes().as_slice()).unwrap();
        let other = proto::TransactionList::decode(b.to_bytes().as_slice()).unwrap();
        list.transaction_list.extend(other.transaction_list);

        let err = Transaction::<NodeUpdate>::from_bytes(&list.encode_to_vec()).unwrap_err();
        assert_eq!(err, DecodeError::InconsistentBodies { field: "payload" });
    }

    #[test]
    fn signatures_missing_from_one_node_rejected() {
        let mut tx = frozen(&[3, 4]);
        tx.sign(&PrivateKey::generate()).unwrap();
        let mut list = proto::TransactionList::decode(tx.to_bytes().as_slice()).unwrap();

        let mut signed =
            proto::SignedTransaction::decode(list.transaction_list[1].signed_transaction_bytes.as_slice()).unwrap();
        signed.sig_map = Some(proto::SignatureMap::default());
        list.transaction_list[1].signed_transaction_bytes = signed.encode_to_vec();

        let err = Transaction::<NodeUpdate>::from_bytes(&list.encode_to_vec()).unwrap_err();
        assert_eq!(err, DecodeError::InconsistentSignatures);
    }

    #[test]
    fn unsupported_signature_type_rejected() {
        let tx = frozen(&[3]);
        let mut list = proto::TransactionList::decode(tx.to_bytes().as_slice()).unwrap();
        let signed = proto::SignedTransaction {
            body_bytes: tx.signable_bytes().unwrap().to_vec(),
            sig_map: Some(proto::SignatureMap {
                sig_pair: vec![proto::SignaturePair {
                    pub_key_prefix: vec![2; 33],
                    signature: Some(proto::signature_pair::Signature::EcdsaSecp256k1(vec![0; 64])),
                }],
            }),
        };
        list.transaction_list[0].signed_transaction_bytes = signed.encode_to_vec();
        let err = Transaction::<NodeUpdate>::from_bytes(&list.encode_to_vec()).unwrap_err();
        assert!(matches!(err, DecodeError::UnsupportedSignature { .. }));
    }

    /// Re-encodes `tx` with its body rewritten by `edit`, unsigned.
    fn with_edited_body(tx: &Transaction<NodeUpdate>, edit: impl Fn(&mut proto::TransactionBody)) -> Vec<u8> {
        let mut body = proto::TransactionBody::decode(tx.signable_bytes().unwrap()).unwrap();
        edit(&mut body);
        let signed = proto::SignedTransaction {
            body_bytes: body.encode_to_vec(),
            sig_map: Some(proto::SignatureMap::default()),
        };
        proto::TransactionList {
            transaction_list: vec![proto::Transaction {
                signed_transaction_bytes: signed.encode_to_vec(),
                ..Default::default()
            }],
        }
        .encode_to_vec()
    }

    #[test]
    fn out_of_range_valid_duration_rejected() {
        let tx = frozen(&[3]);
        for seconds in [0, -5, 181] {
            let bytes = with_edited_body(&tx, |body| {
                body.transaction_valid_duration = Some(proto::Duration { seconds });
            });
            let err = Transaction::<NodeUpdate>::from_bytes(&bytes).unwrap_err();
            assert!(
                matches!(err, DecodeError::InvalidField { field: "transaction_valid_duration", .. }),
                "{seconds}: {err}"
            );
        }

        let bytes = with_edited_body(&tx, |body| {
            body.transaction_valid_duration = Some(proto::Duration { seconds: 180 });
        });
        let decoded = Transaction::<NodeUpdate>::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.valid_duration(), MAX_VALID_DURATION);
    }

    #[test]
    fn negative_valid_start_nanos_rejected() {
        let tx = frozen(&[3]);
        let bytes = with_edited_body(&tx, |body| {
            if let Some(start) = body
                .transaction_id
                .as_mut()
                .and_then(|id| id.transaction_valid_start.as_mut())
            {
                start.nanos = -1;
            }
        });
        let err = Transaction::<NodeUpdate>::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidField { field: "transaction_id", .. }));
    }

    #[test]
    fn transaction_hash_requires_frozen_and_changes_with_signatures() {
        let mut tx = Transaction::<NodeUpdate>::new();
        assert!(tx.transaction_hash().is_err());

        tx = frozen(&[3, 4]);
        let unsigned = tx.transaction_hash().unwrap();
        assert_eq!(tx.transaction_hash_per_node().len(), 2);
        tx.sign(&PrivateKey::generate()).unwrap();
        assert_ne!(tx.transaction_hash().unwrap(), unsigned);
    }

    #[test]
    fn free_functions_match_methods() {
        let tx = frozen(&[3]);
        assert_eq!(to_bytes(&tx), tx.to_bytes());
    }
}
