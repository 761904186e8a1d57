//! The contract every concrete transaction kind implements.
//!
//! A payload is the operation-specific part of a transaction: the fields of
//! a node update, an account creation, a transfer. The envelope owns
//! everything else (id, nodes, fee, memo, signatures) and only talks to the
//! payload through this trait.

use prost::Message;
use serde::Serialize;
use std::fmt;

use super::error::{ConstructionError, DecodeError};
use super::types::{ServiceDescriptor, TransactionKind};
use crate::id::EntityId;
use crate::proto::{schedulable_transaction_body, transaction_body};

/// Operation-specific data carried by a [`Transaction`](super::Transaction).
///
/// Implementors supply the protobuf mapping (`to_body`/`from_body`), how the
/// body is wrapped into the `data` oneofs, and which of their fields are
/// required. Everything else has a default built on top of those.
pub trait Payload: Clone + fmt::Debug + Default + Serialize + Send + Sync + 'static {
    /// Protobuf message for this kind's body.
    type Body: Message + Default + Clone + PartialEq;

    const KIND: TransactionKind;

    fn to_body(&self) -> Self::Body;

    fn from_body(body: Self::Body) -> Result<Self, DecodeError>;

    /// Places the body into `TransactionBody.data`.
    fn wrap(body: Self::Body) -> transaction_body::Data;

    /// Places the body into `SchedulableTransactionBody.data`.
    fn wrap_schedulable(body: Self::Body) -> schedulable_transaction_body::Data;

    /// Extracts this kind's body, or `None` if `data` holds another kind.
    fn unwrap(data: transaction_body::Data) -> Option<Self::Body>;

    /// Names of required fields that have no value.
    fn required_fields_unset(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Why this payload cannot be submitted yet, if anything.
    ///
    /// Defaults to reporting unset required fields. Kinds with further
    /// completeness rules override it.
    fn construction_error(&self) -> Option<ConstructionError> {
        let fields = self.required_fields_unset();
        if fields.is_empty() {
            None
        } else {
            Some(ConstructionError::MissingRequiredFields {
                kind: Self::KIND,
                fields,
            })
        }
    }

    /// Entity ids inside the payload that are subject to checksum
    /// validation.
    fn entity_ids(&self) -> Vec<&EntityId> {
        Vec::new()
    }

    fn service() -> ServiceDescriptor {
        Self::KIND.service()
    }

    /// The `TransactionBody.data` field number identifying this kind.
    fn discriminator() -> u32 {
        Self::KIND.body_tag()
    }

    /// The payload's own protobuf encoding, without envelope fields.
    fn encode_body(&self) -> Vec<u8> {
        self.to_body().encode_to_vec()
    }

    fn decode_body(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_body(Self::Body::decode(bytes)?)
    }
}

/// Which kind a decoded `data` oneof holds.
pub fn kind_of(data: &transaction_body::Data) -> TransactionKind {
    match data {
        transaction_body::Data::NodeUpdate(_) => TransactionKind::NodeUpdate,
        transaction_body::Data::CryptoCreateAccount(_) => TransactionKind::AccountCreate,
        transaction_body::Data::CryptoTransfer(_) => TransactionKind::Transfer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto;

    #[test]
    fn kind_of_matches_variant() {
        let data = transaction_body::Data::CryptoTransfer(proto::CryptoTransferTransactionBody::default());
        assert_eq!(kind_of(&data), TransactionKind::Transfer);

        let data = transaction_body::Data::NodeUpdate(proto::NodeUpdateTransactionBody::default());
        assert_eq!(kind_of(&data), TransactionKind::NodeUpdate);
    }
}
