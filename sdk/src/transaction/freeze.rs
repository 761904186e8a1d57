//! Freezing: the one-way step from a mutable envelope to fixed body bytes.
//!
//! Everything is computed into locals first and committed at the end, so a
//! failed freeze leaves the envelope exactly as it was.

use prost::Message;
use tracing::debug;

use super::envelope::Transaction;
use super::error::TransactionError;
use super::payload::Payload;
use super::types::{Hbar, LifecycleState};
use crate::config::{ClientConfig, DEFAULT_MAX_TRANSACTION_FEE_TINYBARS};
use crate::id::{AccountId, TransactionId};

impl<P: Payload> Transaction<P> {
    /// Freezes using only what the envelope already carries.
    ///
    /// The transaction id and at least one node must have been set. A
    /// payload missing required fields still freezes; the problem is
    /// recorded and reported by `schedule` and `execute`. Freezing an
    /// already frozen envelope is a no-op.
    pub fn freeze(&mut self) -> Result<&mut Self, TransactionError> {
        self.freeze_inner(None)
    }

    /// Freezes, filling gaps from `config`: a transaction id generated for
    /// the operator, the configured node list and default fee. Validates
    /// every entity checksum when the config asks for it.
    pub fn freeze_with(&mut self, config: &ClientConfig) -> Result<&mut Self, TransactionError> {
        self.freeze_inner(Some(config))
    }

    fn freeze_inner(&mut self, config: Option<&ClientConfig>) -> Result<&mut Self, TransactionError> {
        if self.is_frozen() {
            return Ok(self);
        }

        let transaction_id = match (&self.transaction_id, config.and_then(|c| c.operator_account_id.as_ref())) {
            (Some(id), _) => id.clone(),
            (None, Some(operator)) => TransactionId::generate(operator.clone()),
            (None, None) => return Err(TransactionError::MissingTransactionId),
        };

        let node_account_ids: Vec<AccountId> = if !self.node_account_ids.is_empty() {
            self.node_account_ids.clone()
        } else {
            config.map(|c| c.node_account_ids.clone()).unwrap_or_default()
        };
        if node_account_ids.is_empty() {
            return Err(TransactionError::MissingNodeAccountIds);
        }

        if let Some(ledger) = config.and_then(ClientConfig::checksum_ledger) {
            self.validate_entities_on(ledger, Some(&transaction_id), &node_account_ids)?;
        }

        let max_fee = self.max_transaction_fee.unwrap_or_else(|| {
            config
                .map(ClientConfig::default_max_transaction_fee)
                .unwrap_or(Hbar::from_tinybars(DEFAULT_MAX_TRANSACTION_FEE_TINYBARS))
        });

        let construction_error = self.payload.construction_error();
        let frozen_bodies: Vec<Vec<u8>> = node_account_ids
            .iter()
            .map(|node| {
                self.build_body(Some(&transaction_id), Some(node), max_fee)
                    .encode_to_vec()
            })
            .collect();

        debug!(
            kind = %P::KIND,
            transaction_id = %transaction_id,
            nodes = node_account_ids.len(),
            fee = %max_fee,
            incomplete = construction_error.is_some(),
            "froze transaction"
        );

        self.transaction_id = Some(transaction_id);
        self.node_account_ids = node_account_ids;
        self.max_transaction_fee = Some(max_fee);
        self.construction_error = construction_error;
        self.frozen_bodies = frozen_bodies;
        self.state = LifecycleState::Frozen;
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
