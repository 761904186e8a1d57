//! Transaction framing: bodies, signed wrappers, signature maps and the
//! list container a serialized transaction travels in.

use super::addressbook::NodeUpdateTransactionBody;
use super::basic::{AccountId, Duration, TransactionId};
use super::crypto::{CryptoCreateTransactionBody, CryptoTransferTransactionBody};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignaturePair {
    #[prost(bytes = "vec", tag = "1")]
    pub pub_key_prefix: ::prost::alloc::vec::Vec<u8>,
    #[prost(oneof = "signature_pair::Signature", tags = "2, 3, 6")]
    pub signature: ::core::option::Option<signature_pair::Signature>,
}

pub mod signature_pair {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Signature {
        #[prost(bytes = "vec", tag = "2")]
        Contract(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "3")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        #[prost(bytes = "vec", tag = "6")]
        EcdsaSecp256k1(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureMap {
    #[prost(message, repeated, tag = "1")]
    pub sig_pair: ::prost::alloc::vec::Vec<SignaturePair>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: ::core::option::Option<TransactionId>,
    #[prost(message, optional, tag = "2")]
    pub node_account_id: ::core::option::Option<AccountId>,
    #[prost(uint64, tag = "3")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "4")]
    pub transaction_valid_duration: ::core::option::Option<Duration>,
    #[prost(string, tag = "6")]
    pub memo: ::prost::alloc::string::String,
    #[prost(oneof = "transaction_body::Data", tags = "11, 14, 55")]
    pub data: ::core::option::Option<transaction_body::Data>,
}

pub mod transaction_body {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "11")]
        CryptoCreateAccount(super::CryptoCreateTransactionBody),
        #[prost(message, tag = "14")]
        CryptoTransfer(super::CryptoTransferTransactionBody),
        #[prost(message, tag = "55")]
        NodeUpdate(super::NodeUpdateTransactionBody),
    }
}

/// Body embedded in a schedule-create. Carries no id, node or duration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SchedulableTransactionBody {
    #[prost(uint64, tag = "1")]
    pub transaction_fee: u64,
    #[prost(string, tag = "2")]
    pub memo: ::prost::alloc::string::String,
    #[prost(oneof = "schedulable_transaction_body::Data", tags = "7, 9, 43")]
    pub data: ::core::option::Option<schedulable_transaction_body::Data>,
}

pub mod schedulable_transaction_body {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "7")]
        CryptoCreateAccount(super::CryptoCreateTransactionBody),
        #[prost(message, tag = "9")]
        CryptoTransfer(super::CryptoTransferTransactionBody),
        #[prost(message, tag = "43")]
        NodeUpdate(super::NodeUpdateTransactionBody),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedTransaction {
    #[prost(bytes = "vec", tag = "1")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sig_map: ::core::option::Option<SignatureMap>,
}

/// Outer envelope. New clients only set `signed_transaction_bytes`; the
/// legacy `body_bytes`/`sig_map` pair is still accepted on decode.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(message, optional, tag = "3")]
    pub sig_map: ::core::option::Option<SignatureMap>,
    #[prost(bytes = "vec", tag = "4")]
    pub body_bytes: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "5")]
    pub signed_transaction_bytes: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionList {
    #[prost(message, repeated, tag = "1")]
    pub transaction_list: ::prost::alloc::vec::Vec<Transaction>,
}
