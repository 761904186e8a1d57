//! Account creation.
//!
//! The new account is controlled by `key`, which is the only required
//! field. The payer funds `initial_balance` from its own account.

use serde::Serialize;
use std::time::Duration;

use super::serialize_hex_opt;
use crate::config::DEFAULT_AUTO_RENEW_PERIOD;
use crate::crypto::Key;
use crate::id::{AccountId, EntityId};
use crate::proto::{self, crypto_create_transaction_body};
use crate::transaction::envelope::check_memo;
use crate::transaction::{DecodeError, Hbar, Payload, Transaction, TransactionError, TransactionKind};

/// Where a new account stakes its balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakedId {
    Account(AccountId),
    Node(i64),
}

/// Payload of an account creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountCreate {
    key: Option<Key>,
    initial_balance: Hbar,
    receiver_signature_required: bool,
    auto_renew_period: Option<Duration>,
    account_memo: String,
    max_automatic_token_associations: i32,
    staked_id: Option<StakedId>,
    decline_staking_reward: bool,
    #[serde(serialize_with = "serialize_hex_opt")]
    alias: Option<Vec<u8>>,
}

impl Default for AccountCreate {
    fn default() -> Self {
        Self {
            key: None,
            initial_balance: Hbar::ZERO,
            receiver_signature_required: false,
            auto_renew_period: Some(DEFAULT_AUTO_RENEW_PERIOD),
            account_memo: String::new(),
            max_automatic_token_associations: 0,
            staked_id: None,
            decline_staking_reward: false,
            alias: None,
        }
    }
}

impl AccountCreate {
    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn initial_balance(&self) -> Hbar {
        self.initial_balance
    }

    pub fn receiver_signature_required(&self) -> bool {
        self.receiver_signature_required
    }

    pub fn auto_renew_period(&self) -> Option<Duration> {
        self.auto_renew_period
    }

    pub fn account_memo(&self) -> &str {
        &self.account_memo
    }

    /// `-1` means unlimited.
    pub fn max_automatic_token_associations(&self) -> i32 {
        self.max_automatic_token_associations
    }

    pub fn staked_id(&self) -> Option<&StakedId> {
        self.staked_id.as_ref()
    }

    pub fn decline_staking_reward(&self) -> bool {
        self.decline_staking_reward
    }

    /// EVM address alias, 20 bytes when set locally.
    pub fn alias(&self) -> Option<&[u8]> {
        self.alias.as_deref()
    }
}

impl Payload for AccountCreate {
    type Body = proto::CryptoCreateTransactionBody;

    const KIND: TransactionKind = TransactionKind::AccountCreate;

    fn to_body(&self) -> Self::Body {
        proto::CryptoCreateTransactionBody {
            key: self.key.as_ref().map(Key::to_proto),
            // Setters reject negative balances.
            initial_balance: self.initial_balance.to_tinybars().max(0) as u64,
            receiver_sig_required: self.receiver_signature_required,
            auto_renew_period: self.auto_renew_period.map(|d| proto::Duration {
                seconds: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
            }),
            memo: self.account_memo.clone(),
            max_automatic_token_associations: self.max_automatic_token_associations,
            staked_id: self.staked_id.as_ref().map(|staked| match staked {
                StakedId::Account(id) => crypto_create_transaction_body::StakedId::StakedAccountId(id.to_proto()),
                StakedId::Node(node) => crypto_create_transaction_body::StakedId::StakedNodeId(*node),
            }),
            decline_reward: self.decline_staking_reward,
            alias: self.alias.clone().unwrap_or_default(),
        }
    }

    fn from_body(body: Self::Body) -> Result<Self, DecodeError> {
        let initial_balance = i64::try_from(body.initial_balance)
            .map(Hbar::from_tinybars)
            .map_err(|_| DecodeError::InvalidField {
                field: "initial_balance",
                reason: format!("{} tinybars overflows", body.initial_balance),
            })?;
        let auto_renew_period = body
            .auto_renew_period
            .map(|d| {
                u64::try_from(d.seconds)
                    .map(Duration::from_secs)
                    .map_err(|_| DecodeError::InvalidField {
                        field: "auto_renew_period",
                        reason: format!("negative duration {}s", d.seconds),
                    })
            })
            .transpose()?;
        let staked_id = match body.staked_id {
            Some(crypto_create_transaction_body::StakedId::StakedAccountId(pb)) => {
                Some(StakedId::Account(AccountId::from_proto(&pb).ok_or(DecodeError::InvalidField {
                    field: "staked_account_id",
                    reason: "alias accounts are not supported".into(),
                })?))
            }
            Some(crypto_create_transaction_body::StakedId::StakedNodeId(node)) => Some(StakedId::Node(node)),
            None => None,
        };

        Ok(Self {
            key: body.key.as_ref().map(Key::from_proto).transpose()?,
            initial_balance,
            receiver_signature_required: body.receiver_sig_required,
            auto_renew_period,
            account_memo: body.memo,
            max_automatic_token_associations: body.max_automatic_token_associations,
            staked_id,
            decline_staking_reward: body.decline_reward,
            alias: (!body.alias.is_empty()).then_some(body.alias),
        })
    }

    fn wrap(body: Self::Body) -> proto::transaction_body::Data {
        proto::transaction_body::Data::CryptoCreateAccount(body)
    }

    fn wrap_schedulable(body: Self::Body) -> proto::schedulable_transaction_body::Data {
        proto::schedulable_transaction_body::Data::CryptoCreateAccount(body)
    }

    fn unwrap(data: proto::transaction_body::Data) -> Option<Self::Body> {
        match data {
            proto::transaction_body::Data::CryptoCreateAccount(body) => Some(body),
            _ => None,
        }
    }

    fn required_fields_unset(&self) -> Vec<&'static str> {
        if self.key.is_none() {
            vec!["key"]
        } else {
            Vec::new()
        }
    }

    fn entity_ids(&self) -> Vec<&EntityId> {
        match &self.staked_id {
            Some(StakedId::Account(id)) => vec![id],
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Setters
// ---------------------------------------------------------------------------

impl Transaction<AccountCreate> {
    /// The key that must sign for the new account. Required.
    pub fn set_key(&mut self, key: impl Into<Key>) -> Result<&mut Self, TransactionError> {
        let key = key.into();
        self.update_payload(|p| p.key = Some(key))
    }

    pub fn set_initial_balance(&mut self, balance: Hbar) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        if balance.is_negative() {
            return Err(TransactionError::NegativeAmount {
                field: "initial_balance",
                amount: balance,
            });
        }
        self.update_payload(|p| p.initial_balance = balance)
    }

    pub fn set_receiver_signature_required(&mut self, required: bool) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.receiver_signature_required = required)
    }

    pub fn set_auto_renew_period(&mut self, period: Duration) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.auto_renew_period = Some(period))
    }

    pub fn set_account_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        let memo = memo.into();
        check_memo(&memo)?;
        self.update_payload(|p| p.account_memo = memo)
    }

    pub fn set_max_automatic_token_associations(&mut self, max: i32) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.max_automatic_token_associations = max)
    }

    /// Stakes to an account. Replaces any staked node.
    pub fn set_staked_account_id(&mut self, account_id: AccountId) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.check_entity(&account_id)?;
        self.update_payload(|p| p.staked_id = Some(StakedId::Account(account_id)))
    }

    /// Stakes to a node. Replaces any staked account.
    pub fn set_staked_node_id(&mut self, node_id: i64) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.staked_id = Some(StakedId::Node(node_id)))
    }

    pub fn set_decline_staking_reward(&mut self, decline: bool) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.decline_staking_reward = decline)
    }

    pub fn set_alias(&mut self, evm_address: [u8; 20]) -> Result<&mut Self, TransactionError> {
        self.update_payload(|p| p.alias = Some(evm_address.to_vec()))
    }
}
