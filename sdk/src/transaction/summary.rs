//! A serializable, human-oriented view of an envelope, used by the CLI's
//! `inspect` output and handy in logs.

use serde::Serialize;

use super::envelope::Transaction;
use super::payload::Payload;
use super::types::{Hbar, LifecycleState, TransactionKind};
use crate::id::{AccountId, TransactionId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionSummary {
    pub kind: TransactionKind,
    pub state: LifecycleState,
    pub transaction_id: Option<TransactionId>,
    pub node_account_ids: Vec<AccountId>,
    pub max_transaction_fee: Option<Hbar>,
    pub memo: String,
    pub valid_duration_secs: u64,
    /// The deferred construction error, rendered.
    pub construction_error: Option<String>,
    /// Hex public keys of the signers, in signing order.
    pub signers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    pub payload: serde_json::Value,
}

impl<P: Payload> Transaction<P> {
    pub fn summary(&self) -> TransactionSummary {
        TransactionSummary {
            kind: P::KIND,
            state: self.state,
            transaction_id: self.transaction_id.clone(),
            node_account_ids: self.node_account_ids.clone(),
            max_transaction_fee: self.max_transaction_fee,
            memo: self.memo.clone(),
            valid_duration_secs: self.valid_duration.as_secs(),
            construction_error: self.construction_error.as_ref().map(ToString::to_string),
            signers: self.signatures.public_keys().map(|pk| pk.to_hex()).collect(),
            transaction_hash: self.transaction_hash().ok().map(hex::encode),
            payload: serde_json::to_value(&self.payload).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::id::Timestamp;
    use crate::operations::NodeUpdate;

    #[test]
    fn summary_reflects_envelope() {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(TransactionId::new(AccountId::from_num(2), Timestamp { seconds: 5, nanos: 0 }))
            .unwrap()
            .set_node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .set_description("edge node")
            .unwrap();
        let key = PrivateKey::generate();
        tx.sign(&key).unwrap();

        let summary = tx.summary();
        assert_eq!(summary.kind, TransactionKind::NodeUpdate);
        assert_eq!(summary.state, LifecycleState::Frozen);
        assert_eq!(summary.signers, vec![key.public_key().to_hex()]);
        assert!(summary.construction_error.unwrap().contains("node_id"));
        assert_eq!(summary.payload["description"], "edge node");
        assert_eq!(summary.transaction_hash.unwrap().len(), 96);
    }

    #[test]
    fn summary_serializes_to_json() {
        let tx = Transaction::<NodeUpdate>::new();
        let json = serde_json::to_value(tx.summary()).unwrap();
        assert_eq!(json["kind"], "NodeUpdate");
        assert_eq!(json["state"], "Mutable");
        assert!(json.get("transaction_hash").is_none());
    }
}
