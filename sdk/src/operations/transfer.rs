//! Hbar transfers.
//!
//! A transfer list is a set of signed amounts, one per account, that must
//! sum to zero. Debited accounts sign; credited accounts sign only when
//! they require receiver signatures.

use serde::Serialize;

use crate::id::{AccountId, EntityId};
use crate::proto;
use crate::transaction::{
    ConstructionError, DecodeError, Hbar, Payload, Transaction, TransactionError, TransactionKind,
};

/// One account's side of a transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HbarTransfer {
    pub account_id: AccountId,
    /// Negative for debits.
    pub amount: Hbar,
    /// Spends an allowance granted to the payer rather than the account's
    /// own signature.
    pub is_approved: bool,
}

/// Payload of an hbar transfer.
///
/// Entries are kept sorted by account and there is at most one per
/// account; adding to an account already present adds to its amount.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transfer {
    hbar_transfers: Vec<HbarTransfer>,
}

impl Transfer {
    pub fn hbar_transfers(&self) -> &[HbarTransfer] {
        &self.hbar_transfers
    }

    /// Exact sum of all amounts in tinybars. Zero for a valid transfer.
    pub fn net_tinybars(&self) -> i128 {
        self.hbar_transfers
            .iter()
            .map(|t| i128::from(t.amount.to_tinybars()))
            .sum()
    }

    /// Sum of all amounts, or `None` when it does not fit in an [`Hbar`].
    pub fn net(&self) -> Option<Hbar> {
        i64::try_from(self.net_tinybars()).ok().map(Hbar::from_tinybars)
    }

    /// Leaves the list unchanged when merging would overflow.
    fn add(&mut self, account_id: AccountId, amount: Hbar, is_approved: bool) -> Result<(), TransactionError> {
        let key = |id: &AccountId| (id.shard, id.realm, id.num);
        match self
            .hbar_transfers
            .binary_search_by_key(&key(&account_id), |t| key(&t.account_id))
        {
            Ok(index) => {
                let entry = &mut self.hbar_transfers[index];
                let merged = entry
                    .amount
                    .to_tinybars()
                    .checked_add(amount.to_tinybars())
                    .ok_or(TransactionError::AmountOverflow { account_id })?;
                entry.amount = Hbar::from_tinybars(merged);
                entry.is_approved |= is_approved;
            }
            Err(index) => self.hbar_transfers.insert(
                index,
                HbarTransfer {
                    account_id,
                    amount,
                    is_approved,
                },
            ),
        }
        Ok(())
    }
}

impl Payload for Transfer {
    type Body = proto::CryptoTransferTransactionBody;

    const KIND: TransactionKind = TransactionKind::Transfer;

    fn to_body(&self) -> Self::Body {
        proto::CryptoTransferTransactionBody {
            transfers: Some(proto::TransferList {
                account_amounts: self
                    .hbar_transfers
                    .iter()
                    .map(|t| proto::AccountAmount {
                        account_id: Some(t.account_id.to_proto()),
                        amount: t.amount.to_tinybars(),
                        is_approval: t.is_approved,
                    })
                    .collect(),
            }),
        }
    }

    /// Keeps the wire order, so re-encoding reproduces the same body.
    fn from_body(body: Self::Body) -> Result<Self, DecodeError> {
        let hbar_transfers = body
            .transfers
            .map(|list| list.account_amounts)
            .unwrap_or_default()
            .into_iter()
            .map(|aa| {
                let account_id = aa
                    .account_id
                    .as_ref()
                    .and_then(AccountId::from_proto)
                    .ok_or(DecodeError::InvalidField {
                        field: "transfers.account_id",
                        reason: "missing or alias account".into(),
                    })?;
                Ok(HbarTransfer {
                    account_id,
                    amount: Hbar::from_tinybars(aa.amount),
                    is_approved: aa.is_approval,
                })
            })
            .collect::<Result<Vec<_>, DecodeError>>()?;
        Ok(Self { hbar_transfers })
    }

    fn wrap(body: Self::Body) -> proto::transaction_body::Data {
        proto::transaction_body::Data::CryptoTransfer(body)
    }

    fn wrap_schedulable(body: Self::Body) -> proto::schedulable_transaction_body::Data {
        proto::schedulable_transaction_body::Data::CryptoTransfer(body)
    }

    fn unwrap(data: proto::transaction_body::Data) -> Option<Self::Body> {
        match data {
            proto::transaction_body::Data::CryptoTransfer(body) => Some(body),
            _ => None,
        }
    }

    fn required_fields_unset(&self) -> Vec<&'static str> {
        if self.hbar_transfers.is_empty() {
            vec!["transfers"]
        } else {
            Vec::new()
        }
    }

    fn construction_error(&self) -> Option<ConstructionError> {
        let fields = self.required_fields_unset();
        if !fields.is_empty() {
            return Some(ConstructionError::MissingRequiredFields {
                kind: Self::KIND,
                fields,
            });
        }
        let net_tinybars = self.net_tinybars();
        (net_tinybars != 0).then_some(ConstructionError::UnbalancedTransfers {
            kind: Self::KIND,
            net_tinybars,
        })
    }

    fn entity_ids(&self) -> Vec<&EntityId> {
        self.hbar_transfers.iter().map(|t| &t.account_id).collect()
    }
}

// ---------------------------------------------------------------------------
// Setters
// ---------------------------------------------------------------------------

impl Transaction<Transfer> {
    /// Adds `amount` to `account_id`'s entry, creating it if needed.
    pub fn add_hbar_transfer(&mut self, account_id: AccountId, amount: Hbar) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.check_entity(&account_id)?;
        self.try_update_payload(|p| p.add(account_id, amount, false))
    }

    /// Like [`add_hbar_transfer`](Self::add_hbar_transfer), spending an
    /// allowance.
    pub fn add_approved_hbar_transfer(
        &mut self,
        account_id: AccountId,
        amount: Hbar,
    ) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.check_entity(&account_id)?;
        self.try_update_payload(|p| p.add(account_id, amount, true))
    }
}
