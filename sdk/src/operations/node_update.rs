//! Address-book node update.
//!
//! Lets a node operator change the attributes the network publishes for a
//! consensus node: its account, description, endpoints, certificates, admin
//! key and reward preference. Fields left unset are not changed on the
//! ledger. The transaction must be signed by the node's current admin key,
//! and by the new one too when the admin key is being replaced.
//!
//! `node_id` is required. Updates are staged by the network and applied at
//! the next upgrade freeze.

use serde::Serialize;

use super::serialize_hex_opt;
use crate::crypto::Key;
use crate::endpoint::Endpoint;
use crate::id::{AccountId, EntityId};
use crate::proto;
use crate::transaction::{DecodeError, Payload, Transaction, TransactionError, TransactionKind};

/// Payload of a node update. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeUpdate {
    node_id: Option<u64>,
    account_id: Option<AccountId>,
    description: Option<String>,
    gossip_endpoints: Vec<Endpoint>,
    service_endpoints: Vec<Endpoint>,
    #[serde(serialize_with = "serialize_hex_opt")]
    gossip_ca_certificate: Option<Vec<u8>>,
    #[serde(serialize_with = "serialize_hex_opt")]
    grpc_certificate_hash: Option<Vec<u8>>,
    admin_key: Option<Key>,
    decline_reward: Option<bool>,
    grpc_web_proxy_endpoint: Option<Endpoint>,
}

impl NodeUpdate {
    pub fn node_id(&self) -> Option<u64> {
        self.node_id
    }

    /// The new account to pay node rewards to.
    pub fn account_id(&self) -> Option<&AccountId> {
        self.account_id.as_ref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Endpoints for gossip between consensus nodes. The first is the
    /// internal address, the second the external one.
    pub fn gossip_endpoints(&self) -> &[Endpoint] {
        &self.gossip_endpoints
    }

    /// Endpoints clients submit transactions to.
    pub fn service_endpoints(&self) -> &[Endpoint] {
        &self.service_endpoints
    }

    /// DER-encoded certificate the node signs gossip with.
    pub fn gossip_ca_certificate(&self) -> Option<&[u8]> {
        self.gossip_ca_certificate.as_deref()
    }

    /// SHA-384 of the node's gRPC TLS certificate.
    pub fn grpc_certificate_hash(&self) -> Option<&[u8]> {
        self.grpc_certificate_hash.as_deref()
    }

    pub fn admin_key(&self) -> Option<&Key> {
        self.admin_key.as_ref()
    }

    pub fn decline_reward(&self) -> Option<bool> {
        self.decline_reward
    }

    /// Proxy endpoint for gRPC-web clients.
    pub fn grpc_web_proxy_endpoint(&self) -> Option<&Endpoint> {
        self.grpc_web_proxy_endpoint.as_ref()
    }
}

impl Payload for NodeUpdate {
    type Body = proto::NodeUpdateTransactionBody;

    const KIND: TransactionKind = TransactionKind::NodeUpdate;

    fn to_body(&self) -> Self::Body {
        proto::NodeUpdateTransactionBody {
            node_id: self.node_id.unwrap_or_default(),
            account_id: self.account_id.as_ref().map(AccountId::to_proto),
            description: self
                .description
                .clone()
                .map(|value| proto::StringValue { value }),
            gossip_endpoint: self.gossip_endpoints.iter().map(Endpoint::to_proto).collect(),
            service_endpoint: self.service_endpoints.iter().map(Endpoint::to_proto).collect(),
            gossip_ca_certificate: self
                .gossip_ca_certificate
                .clone()
                .map(|value| proto::BytesValue { value }),
            grpc_certificate_hash: self
                .grpc_certificate_hash
                .clone()
                .map(|value| proto::BytesValue { value }),
            admin_key: self.admin_key.as_ref().map(Key::to_proto),
            decline_reward: self.decline_reward.map(|value| proto::BoolValue { value }),
            grpc_proxy_endpoint: self.grpc_web_proxy_endpoint.as_ref().map(Endpoint::to_proto),
        }
    }

    /// `node_id` has no presence on the wire, so a decoded update always
    /// carries one, even when it is 0.
    fn from_body(body: Self::Body) -> Result<Self, DecodeError> {
        let account_id = body
            .account_id
            .as_ref()
            .map(|pb| {
                AccountId::from_proto(pb).ok_or(DecodeError::InvalidField {
                    field: "account_id",
                    reason: "alias accounts are not supported".into(),
                })
            })
            .transpose()?;
        let endpoints = |list: &[proto::ServiceEndpoint]| -> Result<Vec<Endpoint>, DecodeError> {
            list.iter().map(Endpoint::from_proto).collect()
        };

        Ok(Self {
            node_id: Some(body.node_id),
            account_id,
            description: body.description.map(|v| v.value),
            gossip_endpoints: endpoints(&body.gossip_endpoint)?,
            service_endpoints: endpoints(&body.service_endpoint)?,
            gossip_ca_certificate: body.gossip_ca_certificate.map(|v| v.value),
            grpc_certificate_hash: body.grpc_certificate_hash.map(|v| v.value),
            admin_key: body.admin_key.as_ref().map(Key::from_proto).transpose()?,
            decline_reward: body.decline_reward.map(|v| v.value),
            grpc_web_proxy_endpoint: body
                .grpc_proxy_endpoint
                .as_ref()
                .map(Endpoint::from_proto)
                .transpose()?,
        })
    }

    fn wrap(body: Self::Body) -> proto::transaction_body::Data {
        proto::transaction_body::Data::NodeUpdate(body)
    }

    fn wrap_schedulable(body: Self::Body) -> proto::schedulable_transaction_body::Data {
        proto::schedulable_transaction_body::Data::NodeUpdate(body)
    }

    fn unwrap(data: proto::transaction_body::Data) -> Option<Self::Body> {
        match data {
            proto::transaction_body::Data::NodeUpdate(body) => Some(body),
            _ => None,
        }
    }

    fn required_fields_unset(&self) -> Vec<&'static str> {
        if self.node_id.is_none() {
            vec!["node_id"]
        } else {
            Vec::new()
        }
    }

    fn entity_ids(&self) -> Vec<&EntityId> {
        self.account_id.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Setters
// ---------------------------------------------------------------------------

impl Transaction<NodeUpdate> {
    /// The node to update. Required.
    pub fn set_node_id(&mut self, node_id: u64) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.node_id = Some(node_id))
    }

    pub fn set_account_id(&mut self, account_id: AccountId) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.check_entity(&account_id)?;
        self.update_payload(|p| p.account_id = Some(account_id))
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<&mut Self, TransactionError> {
        let description = description.into();
        self.update_payload(|p| p.description = Some(description))
    }

    /// Leaves the description unchanged on the ledger.
    pub fn clear_description(&mut self) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.description = None)
    }

    pub fn set_gossip_endpoints(&mut self, endpoints: Vec<Endpoint>) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.gossip_endpoints = endpoints)
    }

    pub fn add_gossip_endpoint(&mut self, endpoint: Endpoint) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.gossip_endpoints.push(endpoint))
    }

    pub fn set_service_endpoints(&mut self, endpoints: Vec<Endpoint>) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.service_endpoints = endpoints)
    }

    pub fn add_service_endpoint(&mut self, endpoint: Endpoint) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.service_endpoints.push(endpoint))
    }

    pub fn set_gossip_ca_certificate(&mut self, certificate: Vec<u8>) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.gossip_ca_certificate = Some(certificate))
    }

    pub fn set_grpc_certificate_hash(&mut self, hash: Vec<u8>) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.grpc_certificate_hash = Some(hash))
    }

    pub fn set_admin_key(&mut self, key: impl Into<Key>) -> Result<&mut Self, TransactionError> {
        let key = key.into();
        self.update_payload(|p| p.admin_key = Some(key))
    }

    pub fn set_decline_reward(&mut self, decline: bool) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.decline_reward = Some(decline))
    }

    pub fn set_grpc_web_proxy_endpoint(&mut self, endpoint: Endpoint) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.grpc_web_proxy_endpoint = Some(endpoint))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
