//! Crypto service bodies: account creation and transfers.

use super::basic::{AccountId, Duration, Key};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CryptoCreateTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub key: ::core::option::Option<Key>,
    #[prost(uint64, tag = "2")]
    pub initial_balance: u64,
    #[prost(bool, tag = "8")]
    pub receiver_sig_required: bool,
    #[prost(message, optional, tag = "9")]
    pub auto_renew_period: ::core::option::Option<Duration>,
    #[prost(string, tag = "13")]
    pub memo: ::prost::alloc::string::String,
    #[prost(int32, tag = "14")]
    pub max_automatic_token_associations: i32,
    #[prost(oneof = "crypto_create_transaction_body::StakedId", tags = "15, 16")]
    pub staked_id: ::core::option::Option<crypto_create_transaction_body::StakedId>,
    #[prost(bool, tag = "17")]
    pub decline_reward: bool,
    #[prost(bytes = "vec", tag = "18")]
    pub alias: ::prost::alloc::vec::Vec<u8>,
}

pub mod crypto_create_transaction_body {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum StakedId {
        #[prost(message, tag = "15")]
        StakedAccountId(super::AccountId),
        #[prost(int64, tag = "16")]
        StakedNodeId(i64),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountAmount {
    #[prost(message, optional, tag = "1")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(sint64, tag = "2")]
    pub amount: i64,
    #[prost(bool, tag = "3")]
    pub is_approval: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransferList {
    #[prost(message, repeated, tag = "1")]
    pub account_amounts: ::prost::alloc::vec::Vec<AccountAmount>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CryptoTransferTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transfers: ::core::option::Option<TransferList>,
}
