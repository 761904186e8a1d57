//! # Operations
//!
//! The concrete transaction kinds. Each module defines a [`Payload`] and the
//! typed setters on `Transaction<ThatPayload>`:
//!
//! ```text
//! node_update.rs    - AddressBookService.updateNode
//! account_create.rs - CryptoService.createAccount
//! transfer.rs       - CryptoService.cryptoTransfer
//! ```
//!
//! [`AnyTransaction`] covers the case where the kind is only known after
//! decoding.

pub mod account_create;
pub mod node_update;
pub mod transfer;

pub use account_create::{AccountCreate, StakedId};
pub use node_update::NodeUpdate;
pub use transfer::{HbarTransfer, Transfer};

use serde::Serializer;

use crate::crypto::PrivateKey;
use crate::transaction::codec::decode_entries;
use crate::transaction::payload::kind_of;
use crate::transaction::{
    DecodeError, SchedulableBody, Transaction, TransactionError, TransactionKind, TransactionSummary,
    VerificationError,
};

/// A decoded transaction of whichever kind the bytes held.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyTransaction {
    NodeUpdate(Transaction<NodeUpdate>),
    AccountCreate(Transaction<AccountCreate>),
    Transfer(Transaction<Transfer>),
}

macro_rules! dispatch {
    ($self:expr, $tx:ident => $body:expr) => {
        match $self {
            AnyTransaction::NodeUpdate($tx) => $body,
            AnyTransaction::AccountCreate($tx) => $body,
            AnyTransaction::Transfer($tx) => $body,
        }
    };
}

impl AnyTransaction {
    /// Decodes bytes produced by [`Transaction::to_bytes`] of any kind.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let entries = decode_entries(bytes)?;
        let data = entries
            .first()
            .and_then(|entry| entry.body.data.as_ref())
            .ok_or(DecodeError::UnknownKind)?;

        Ok(match kind_of(data) {
            TransactionKind::NodeUpdate => Self::NodeUpdate(Transaction::from_entries(entries)?),
            TransactionKind::AccountCreate => Self::AccountCreate(Transaction::from_entries(entries)?),
            TransactionKind::Transfer => Self::Transfer(Transaction::from_entries(entries)?),
        })
    }

    pub fn kind(&self) -> TransactionKind {
        dispatch!(self, tx => tx.kind())
    }

    pub fn is_frozen(&self) -> bool {
        dispatch!(self, tx => tx.is_frozen())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        dispatch!(self, tx => tx.to_bytes())
    }

    pub fn summary(&self) -> TransactionSummary {
        dispatch!(self, tx => tx.summary())
    }

    pub fn sign(&mut self, key: &PrivateKey) -> Result<(), TransactionError> {
        dispatch!(self, tx => tx.sign(key).map(|_| ()))
    }

    pub fn schedule(&self) -> Result<SchedulableBody, TransactionError> {
        dispatch!(self, tx => tx.schedule())
    }

    pub fn transaction_hash(&self) -> Result<[u8; 48], TransactionError> {
        dispatch!(self, tx => tx.transaction_hash())
    }

    pub fn verify_signatures(&self) -> Result<(), VerificationError> {
        dispatch!(self, tx => tx.verify_signatures())
    }
}

impl From<Transaction<NodeUpdate>> for AnyTransaction {
    fn from(tx: Transaction<NodeUpdate>) -> Self {
        Self::NodeUpdate(tx)
    }
}

impl From<Transaction<AccountCreate>> for AnyTransaction {
    fn from(tx: Transaction<AccountCreate>) -> Self {
        Self::AccountCreate(tx)
    }
}

impl From<Transaction<Transfer>> for AnyTransaction {
    fn from(tx: Transaction<Transfer>) -> Self {
        Self::Transfer(tx)
    }
}

/// Decodes bytes of any supported kind. See [`AnyTransaction::from_bytes`].
pub fn from_bytes(bytes: &[u8]) -> Result<AnyTransaction, DecodeError> {
    AnyTransaction::from_bytes(bytes)
}

pub(crate) fn serialize_hex_opt<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}
