//! Handing a finished transaction to the network layer.
//!
//! The engine does no I/O. Node selection, channels, retries and backoff
//! live behind [`Submitter`]; receipt lookup lives behind [`ReceiptSource`].
//! Both are injected by the caller.

use serde::Serialize;
use tracing::info;

use super::envelope::Transaction;
use super::error::{SubmitError, TransactionError};
use super::payload::Payload;
use super::types::ServiceDescriptor;
use crate::config::RetryPolicy;
use crate::id::{AccountId, TransactionId};

/// Everything the network layer needs to submit one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub transaction_id: TransactionId,
    /// Candidate nodes, in preference order.
    pub node_account_ids: Vec<AccountId>,
    pub service: ServiceDescriptor,
    /// The encoded `TransactionList`.
    pub bytes: Vec<u8>,
    pub retry: RetryPolicy,
}

/// What the network layer reports after a node accepted the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    /// The node that accepted it.
    pub node_id: AccountId,
    #[serde(with = "hex::serde")]
    pub transaction_hash: Vec<u8>,
}

/// Outcome of a transaction after consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    /// Response code name, e.g. `SUCCESS`.
    pub status: String,
    /// Account created by an account-create transaction.
    pub account_id: Option<AccountId>,
    /// Node touched by an address-book transaction.
    pub node_id: Option<u64>,
}

impl TransactionReceipt {
    pub fn is_success(&self) -> bool {
        self.status == "SUCCESS"
    }
}

/// Sends encoded transactions to the network.
pub trait Submitter {
    fn submit(&self, request: &SubmissionRequest) -> Result<TransactionResponse, SubmitError>;
}

/// Looks up receipts for submitted transactions.
pub trait ReceiptSource {
    fn receipt(&self, transaction_id: &TransactionId, node_id: &AccountId) -> Result<TransactionReceipt, SubmitError>;
}

impl TransactionResponse {
    pub fn get_receipt(&self, source: &dyn ReceiptSource) -> Result<TransactionReceipt, TransactionError> {
        Ok(source.receipt(&self.transaction_id, &self.node_id)?)
    }
}

impl<P: Payload> Transaction<P> {
    /// Hands the frozen transaction to `submitter`.
    ///
    /// This is where an incomplete payload recorded at freeze finally
    /// becomes an error.
    pub fn execute(&self, submitter: &dyn Submitter) -> Result<TransactionResponse, TransactionError> {
        let request = self.submission_request()?;
        info!(
            kind = %P::KIND,
            transaction_id = %request.transaction_id,
            service = %request.service,
            nodes = request.node_account_ids.len(),
            signers = self.signatures.len(),
            "submitting transaction"
        );
        Ok(submitter.submit(&request)?)
    }

    /// The request [`execute`](Self::execute) would hand over.
    pub fn submission_request(&self) -> Result<SubmissionRequest, TransactionError> {
        self.require_frozen()?;
        if let Some(err) = &self.construction_error {
            return Err(err.clone().into());
        }
        let transaction_id = self
            .transaction_id
            .clone()
            .ok_or(TransactionError::MissingTransactionId)?;
        Ok(SubmissionRequest {
            transaction_id,
            node_account_ids: self.node_account_ids.clone(),
            service: P::service(),
            bytes: self.to_bytes(),
            retry: self.retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;
    use crate::id::Timestamp;
    use crate::operations::NodeUpdate;
    use crate::transaction::{ConstructionError, FreezeStateError};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<SubmissionRequest>>,
    }

    impl Submitter for Recorder {
        fn submit(&self, request: &SubmissionRequest) -> Result<TransactionResponse, SubmitError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(TransactionResponse {
                transaction_id: request.transaction_id.clone(),
                node_id: request.node_account_ids[0].clone(),
                transaction_hash: vec![0xab; 48],
            })
        }
    }

    struct Rejecting;

    impl Submitter for Rejecting {
        fn submit(&self, _: &SubmissionRequest) -> Result<TransactionResponse, SubmitError> {
            Err(SubmitError::Precheck("INSUFFICIENT_PAYER_BALANCE".into()))
        }
    }

    struct Receipts;

    impl ReceiptSource for Receipts {
        fn receipt(&self, _: &TransactionId, _: &AccountId) -> Result<TransactionReceipt, SubmitError> {
            Ok(TransactionReceipt {
                status: "SUCCESS".into(),
                account_id: None,
                node_id: Some(1),
            })
        }
    }

    fn envelope(node_id: Option<u64>) -> Transaction<NodeUpdate> {
        let mut tx = Transaction::<NodeUpdate>::new();
        tx.set_transaction_id(TransactionId::new(AccountId::from_num(2), Timestamp { seconds: 10, nanos: 0 }))
            .unwrap()
            .set_node_account_ids([AccountId::from_num(3)])
            .unwrap();
        if let Some(id) = node_id {
            tx.set_node_id(id).unwrap();
        }
        tx
    }

    #[test]
    fn execute_requires_frozen() {
        let tx = envelope(Some(1));
        let err = tx.execute(&Recorder::default()).unwrap_err();
        assert_eq!(err, TransactionError::FreezeState(FreezeStateError::NotFrozen));
    }

    #[test]
    fn execute_surfaces_construction_error() {
        let mut tx = envelope(None);
        tx.freeze().unwrap();
        let submitter = Recorder::default();
        let err = tx.execute(&submitter).unwrap_err();
        assert!(matches!(
            err,
            TransactionError::Construction(ConstructionError::MissingRequiredFields { .. })
        ));
        assert!(submitter.seen.borrow().is_empty());
    }

    #[test]
    fn execute_hands_over_encoded_bytes_and_service() {
        let mut tx = envelope(Some(1));
        tx.sign(&PrivateKey::generate()).unwrap();
        let submitter = Recorder::default();
        let response = tx.execute(&submitter).unwrap();

        let seen = submitter.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].bytes, tx.to_bytes());
        assert_eq!(seen[0].service.method, "updateNode");
        assert_eq!(&response.transaction_id, tx.transaction_id().unwrap());

        let receipt = response.get_receipt(&Receipts).unwrap();
        assert!(receipt.is_success());
        assert_eq!(receipt.node_id, Some(1));
    }

    #[test]
    fn submitter_errors_propagate() {
        let mut tx = envelope(Some(1));
        tx.freeze().unwrap();
        let err = tx.execute(&Rejecting).unwrap_err();
        assert!(matches!(err, TransactionError::Submission(SubmitError::Precheck(_))));
    }
}
