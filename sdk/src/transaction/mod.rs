//! # Transaction Module
//!
//! The lifecycle engine shared by every transaction kind. A
//! [`Transaction<P>`] carries the common envelope fields and one [`Payload`];
//! the kinds themselves live in [`crate::operations`].
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - Core enums and value types (TransactionKind, Hbar, LifecycleState)
//! error.rs        - Error enums for every failure class
//! payload.rs      - The contract concrete kinds implement
//! envelope.rs     - Transaction<P>: common fields, getters, mutable-phase setters
//! freeze.rs       - Mutable -> Frozen, snapshotting per-node body bytes
//! signing.rs      - Signature set, signing and external signatures
//! verification.rs - Ed25519 verification of attached signatures
//! codec.rs        - TransactionList encoding/decoding, transaction hash
//! schedule.rs     - Reduction to a schedulable body
//! execute.rs      - Handoff to injected Submitter / ReceiptSource
//! summary.rs      - Serializable view for tooling
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: create a `Transaction<P>` and set envelope and payload fields.
//! 2. **Freeze**: [`Transaction::freeze`] fixes the body bytes. Missing
//!    required payload fields are recorded, not raised.
//! 3. **Sign**: [`Transaction::sign`] or [`Transaction::add_signature`].
//! 4. **Encode**: [`Transaction::to_bytes`] for storage or transport,
//!    [`Transaction::schedule`] for delegated execution.
//! 5. **Execute**: [`Transaction::execute`] hands the bytes to a
//!    [`Submitter`].
//!
//! ## Design Decisions
//!
//! - Freezing never fails because of an incomplete payload. The problem is
//!   kept as a [`ConstructionError`] and returned by `schedule` and
//!   `execute`, so partial transactions can still be frozen, serialized and
//!   inspected.
//! - Frozen envelopes keep the exact body bytes that were signed, including
//!   after decoding, so re-encoding never invalidates a signature.
//! - Signatures are keyed by public key. Re-signing replaces, it never
//!   duplicates.

pub mod codec;
pub mod envelope;
pub mod error;
pub mod execute;
mod freeze;
pub mod payload;
pub mod schedule;
pub mod signing;
pub mod summary;
pub mod types;
pub mod verification;

pub use codec::to_bytes;
pub use envelope::Transaction;
pub use error::{ConstructionError, DecodeError, FreezeStateError, SubmitError, TransactionError};
pub use execute::{ReceiptSource, SubmissionRequest, Submitter, TransactionReceipt, TransactionResponse};
pub use payload::Payload;
pub use schedule::SchedulableBody;
pub use signing::{SignatureEntry, SignatureSet};
pub use summary::TransactionSummary;
pub use types::{Hbar, LifecycleState, ServiceDescriptor, TransactionKind};
pub use verification::VerificationError;
