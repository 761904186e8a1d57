//! Error types for the transaction lifecycle.
//!
//! Each failure class gets its own enum so callers can match on exactly the
//! kind they care about; [`TransactionError`] is the umbrella every public
//! envelope operation returns.

use std::time::Duration;
use thiserror::Error;

use super::types::{Hbar, TransactionKind};
use crate::crypto::KeyError;
use crate::id::{AccountId, ChecksumError};

// ---------------------------------------------------------------------------
// Lifecycle state violations
// ---------------------------------------------------------------------------

/// An operation was attempted in the wrong lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FreezeStateError {
    /// A setter ran on a frozen envelope.
    #[error("transaction is immutable; it has at least one signature or has been explicitly frozen")]
    AlreadyFrozen,

    /// An operation needing frozen body bytes ran on a mutable envelope.
    #[error("transaction is not frozen")]
    NotFrozen,
}

// ---------------------------------------------------------------------------
// Deferred construction errors
// ---------------------------------------------------------------------------

/// A payload is not complete enough to be submitted.
///
/// Recorded at freeze and surfaced only by `execute` and `schedule`, so an
/// incomplete transaction can still be frozen, serialized and inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("{kind}: required fields not set: {}", fields.join(", "))]
    MissingRequiredFields {
        kind: TransactionKind,
        fields: Vec<&'static str>,
    },

    /// `net_tinybars` is the exact sum, which may lie outside the `i64`
    /// range a single amount can hold.
    #[error("{kind}: transfers do not balance (net {net_tinybars} tinybars)")]
    UnbalancedTransfers { kind: TransactionKind, net_tinybars: i128 },
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Bytes could not be turned back into a transaction. Always fatal to the
/// decode call that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("malformed protobuf: {0}")]
    Protobuf(#[from] prost::DecodeError),

    #[error("transaction list is empty")]
    Empty,

    #[error("transaction entry {index} carries no body bytes")]
    MissingBody { index: usize },

    #[error("transaction body has no recognised data field")]
    UnknownKind,

    #[error("expected a {expected} body, found {found}")]
    KindMismatch {
        expected: TransactionKind,
        found: String,
    },

    #[error("transaction bodies disagree on {field}")]
    InconsistentBodies { field: &'static str },

    #[error("signature set differs between node bodies")]
    InconsistentSignatures,

    #[error("unsupported signature type for key prefix {prefix}")]
    UnsupportedSignature { prefix: String },

    #[error("unsupported key type: {0}")]
    UnsupportedKey(&'static str),

    #[error("invalid endpoint: {reason}")]
    InvalidEndpoint { reason: String },

    #[error("invalid payload field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("signatures present on a transaction without transaction id or node")]
    SignedWithoutTransactionId,
}

impl From<KeyError> for DecodeError {
    fn from(_: KeyError) -> Self {
        Self::InvalidPublicKey
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Failure reported by an injected [`Submitter`](super::Submitter) or
/// [`ReceiptSource`](super::ReceiptSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The node rejected the transaction before consensus.
    #[error("precheck failed: {0}")]
    Precheck(String),

    /// The request never reached a node, or the reply was lost.
    #[error("transport error: {0}")]
    Transport(String),
}

// ---------------------------------------------------------------------------
// TransactionError
// ---------------------------------------------------------------------------

/// Every way an envelope operation can fail.
///
/// No variant is retried internally and no failing operation leaves the
/// envelope partially changed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Validation(#[from] ChecksumError),

    #[error(transparent)]
    FreezeState(#[from] FreezeStateError),

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Submission(#[from] SubmitError),

    #[error("memo is {len} bytes, limit is {max}")]
    MemoTooLong { len: usize, max: usize },

    #[error("valid duration {duration:?} outside 1s..={max:?}")]
    ValidDurationOutOfRange { duration: Duration, max: Duration },

    #[error("min backoff {min:?} exceeds max backoff {max:?}")]
    BackoffOrder { min: Duration, max: Duration },

    #[error("{field} must not be negative, got {amount}")]
    NegativeAmount { field: &'static str, amount: Hbar },

    #[error("amount for {account_id} overflows the tinybar range")]
    AmountOverflow { account_id: AccountId },

    #[error("transaction id is not set and no operator is configured")]
    MissingTransactionId,

    #[error("no node account ids set and none configured")]
    MissingNodeAccountIds,

    #[error("add_signature requires exactly one node account id, found {count}")]
    MultipleNodes { count: usize },

    #[error("cannot schedule a transaction that already has signatures")]
    ScheduleOfSignedTransaction,
}

impl TransactionError {
    /// Whether this error is a lifecycle-state violation.
    pub fn is_freeze_state(&self) -> bool {
        matches!(self, Self::FreezeState(_))
    }
}
