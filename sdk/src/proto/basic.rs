//! Shared wire types: ids, timestamps, keys, endpoints and the
//! `google.protobuf` wrappers.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "account_id::Account", tags = "3, 4")]
    pub account: ::core::option::Option<account_id::Account>,
}

pub mod account_id {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Account {
        #[prost(int64, tag = "3")]
        AccountNum(i64),
        #[prost(bytes = "vec", tag = "4")]
        Alias(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: ::core::option::Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: ::core::option::Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Key {
    #[prost(oneof = "key::Key", tags = "2, 5, 6, 7")]
    pub key: ::core::option::Option<key::Key>,
}

pub mod key {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Key {
        #[prost(bytes = "vec", tag = "2")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        #[prost(message, tag = "5")]
        ThresholdKey(super::ThresholdKey),
        #[prost(message, tag = "6")]
        KeyList(super::KeyList),
        #[prost(bytes = "vec", tag = "7")]
        EcdsaSecp256k1(::prost::alloc::vec::Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ThresholdKey {
    #[prost(uint32, tag = "1")]
    pub threshold: u32,
    #[prost(message, optional, tag = "2")]
    pub keys: ::core::option::Option<KeyList>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyList {
    #[prost(message, repeated, tag = "1")]
    pub keys: ::prost::alloc::vec::Vec<Key>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ServiceEndpoint {
    #[prost(bytes = "vec", tag = "1")]
    pub ip_address_v4: ::prost::alloc::vec::Vec<u8>,
    #[prost(int32, tag = "2")]
    pub port: i32,
    #[prost(string, tag = "3")]
    pub domain_name: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringValue {
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BytesValue {
    #[prost(bytes = "vec", tag = "1")]
    pub value: ::prost::alloc::vec::Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BoolValue {
    #[prost(bool, tag = "1")]
    pub value: bool,
}
