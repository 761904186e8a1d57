//! # Identifiers
//!
//! Entity ids (`shard.realm.num`), the checksum scheme that ties them to a
//! ledger, and transaction ids.

pub mod checksum;
pub mod entity;
pub mod transaction_id;

pub use checksum::{compute_checksum, validate, ChecksumError, LedgerId, LedgerIdError};
pub use entity::{AccountId, EntityId, EntityIdError};
pub use transaction_id::{Timestamp, TransactionId, TransactionIdError};
