// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Tessera SDK: Transaction Lifecycle Engine
//!
//! Builds, freezes, signs, encodes and decodes ledger transactions in the
//! Hedera/Hiero wire format, and hands them to a network layer you supply.
//!
//! Every transaction, whatever it does, goes through the same lifecycle: a
//! mutable draft, a frozen set of per-node body bytes, signatures over those
//! bytes, and finally either submission or reduction to a schedulable body.
//! The engine owns that lifecycle once; concrete kinds only describe their
//! payload.
//!
//! ## Architecture
//!
//! - **transaction** - The generic envelope, its state machine and codec.
//! - **operations** - Concrete kinds: node update, account create, transfer.
//! - **id** - Entity ids, ledger checksums, transaction ids.
//! - **crypto** - Ed25519 keys, key policies, the SHA-384 transaction hash.
//! - **endpoint** - Network endpoints carried by address-book payloads.
//! - **proto** - Protobuf messages of the wire schema.
//! - **config** - Defaults, limits and client configuration.
//!
//! ## Example
//!
//! ```
//! use tessera_sdk::{AccountId, NodeUpdate, PrivateKey, Timestamp, Transaction, TransactionId};
//!
//! let operator = PrivateKey::generate();
//! let mut tx = Transaction::<NodeUpdate>::new();
//! tx.set_transaction_id(TransactionId::new(AccountId::from_num(2), Timestamp::now()))?
//!     .set_node_account_ids([AccountId::from_num(3)])?
//!     .set_node_id(1)?
//!     .set_description("relocated to eu-west")?
//!     .freeze()?
//!     .sign(&operator)?;
//!
//! let bytes = tx.to_bytes();
//! let decoded = tessera_sdk::from_bytes(&bytes)?;
//! assert_eq!(decoded.to_bytes(), bytes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod crypto;
pub mod endpoint;
pub mod id;
pub mod operations;
pub mod proto;
pub mod transaction;

pub use config::{ClientConfig, RetryPolicy};
pub use crypto::{Key, PrivateKey, PublicKey};
pub use endpoint::Endpoint;
pub use id::{AccountId, EntityId, LedgerId, Timestamp, TransactionId};
pub use operations::{from_bytes, AccountCreate, AnyTransaction, NodeUpdate, Transfer};
pub use transaction::{
    to_bytes, DecodeError, Hbar, LifecycleState, Payload, Transaction, TransactionError, TransactionKind,
};
