//! Conversion to the body a schedule-create transaction embeds.
//!
//! A scheduled transaction is executed later by the network once enough
//! signatures have been collected through schedule-sign transactions. The
//! embedded body therefore carries no transaction id, node or valid
//! duration; those belong to whichever transaction eventually triggers it.

use prost::Message;
use tracing::debug;

use super::envelope::Transaction;
use super::error::TransactionError;
use super::payload::Payload;
use super::types::{Hbar, TransactionKind};
use crate::proto;

/// A transaction reduced to fee, memo and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulableBody {
    kind: TransactionKind,
    inner: proto::SchedulableTransactionBody,
}

impl SchedulableBody {
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn max_transaction_fee(&self) -> Hbar {
        Hbar::from_tinybars(self.inner.transaction_fee as i64)
    }

    pub fn memo(&self) -> &str {
        &self.inner.memo
    }

    pub fn as_proto(&self) -> &proto::SchedulableTransactionBody {
        &self.inner
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.inner.encode_to_vec()
    }
}

impl<P: Payload> Transaction<P> {
    /// Produces the schedulable form of this transaction.
    ///
    /// Works on mutable and frozen envelopes alike. Fails if the payload is
    /// incomplete (the error recorded at freeze, or recomputed when still
    /// mutable) or if signatures are already attached, since those would be
    /// silently dropped.
    pub fn schedule(&self) -> Result<SchedulableBody, TransactionError> {
        if !self.signatures.is_empty() {
            return Err(TransactionError::ScheduleOfSignedTransaction);
        }
        let construction_error = if self.is_frozen() {
            self.construction_error.clone()
        } else {
            self.payload.construction_error()
        };
        if let Some(err) = construction_error {
            return Err(err.into());
        }

        let inner = proto::SchedulableTransactionBody {
            transaction_fee: self
                .max_transaction_fee
                .unwrap_or(Hbar::ZERO)
                .to_tinybars()
                .max(0) as u64,
            memo: self.memo.clone(),
            data: Some(P::wrap_schedulable(self.payload.to_body())),
        };
        debug!(kind = %P::KIND, "built schedulable body");
        Ok(SchedulableBody { kind: P::KIND, inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::id::{AccountId, Timestamp, TransactionId};
    use crate::operations::NodeUpdate;
    use crate::transaction::ConstructionError;

    fn base() -> Transaction<NodeUpdate> {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(TransactionId::new(AccountId::from_num(5), Timestamp { seconds: 9, nanos: 0 }))
            .unwrap()
            .set_node_account_ids([AccountId::from_num(3)])
            .unwrap()
            .set_memo("later")
            .unwrap();
        tx
    }

    #[test]
    fn schedulable_body_carries_fee_memo_and_payload_only() {
        let mut tx = base();
        tx.set_node_id(1).unwrap().freeze().unwrap();
        let body = tx.schedule().unwrap();

        assert_eq!(body.kind(), TransactionKind::NodeUpdate);
        assert_eq!(body.memo(), "later");
        assert_eq!(body.max_transaction_fee(), Hbar::new(2));
        match &body.as_proto().data {
            Some(proto::schedulable_transaction_body::Data::NodeUpdate(update)) => {
                assert_eq!(update.node_id, 1)
            }
            other => panic!("unexpected data: {other:?}"),
        }

        let decoded = proto::SchedulableTransactionBody::decode(body.to_bytes().as_slice()).unwrap();
        assert_eq!(&decoded, body.as_proto());
    }

    #[test]
    fn frozen_without_required_field_fails_to_schedule() {
        let mut tx = base();
        tx.freeze().unwrap();
        let err = tx.schedule().unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Construction(ConstructionError::MissingRequiredFields { .. })
        ));
    }

    #[test]
    fn mutable_envelope_recomputes_construction_error() {
        let mut tx = base();
        assert!(tx.schedule().is_err());
        tx.set_node_id(8).unwrap();
        assert!(tx.schedule().is_ok());
    }

    #[test]
    fn signed_transaction_cannot_be_scheduled() {
        let mut tx = base();
        tx.set_node_id(1).unwrap();
        tx.sign(&PrivateKey::generate()).unwrap();
        assert_eq!(
            tx.schedule().unwrap_err(),
            TransactionError::ScheduleOfSignedTransaction
        );
    }
}
