//! The generic transaction envelope.
//!
//! [`Transaction<P>`] holds the fields every transaction kind shares plus
//! one payload `P`. It starts [`Mutable`](LifecycleState::Mutable): every
//! setter works and entity ids are checksum-validated as they are set when a
//! validation ledger is configured. Freezing (see `freeze.rs`) snapshots the
//! body bytes; after that only signatures change.

use std::time::Duration;
use tracing::warn;

use super::error::{ConstructionError, FreezeStateError, TransactionError};
use super::payload::Payload;
use super::signing::SignatureSet;
use super::types::{Hbar, LifecycleState, TransactionKind};
use crate::config::{ClientConfig, RetryPolicy, DEFAULT_VALID_DURATION, MAX_MEMO_BYTES, MAX_VALID_DURATION};
use crate::id::{AccountId, EntityId, LedgerId, TransactionId};

/// A transaction of kind `P` moving through its lifecycle.
///
/// Build one with [`Transaction::new`] (or [`Transaction::for_client`] to
/// pick up checksum validation from a [`ClientConfig`]), set fields, then
/// freeze, sign and encode it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction<P: Payload> {
    pub(crate) transaction_id: Option<TransactionId>,
    pub(crate) node_account_ids: Vec<AccountId>,
    pub(crate) max_transaction_fee: Option<Hbar>,
    pub(crate) memo: String,
    pub(crate) valid_duration: Duration,
    pub(crate) retry: RetryPolicy,
    pub(crate) regenerate_transaction_id: Option<bool>,
    /// Ledger to validate entity checksums against; `None` disables it.
    pub(crate) checksum_ledger: Option<LedgerId>,
    pub(crate) state: LifecycleState,
    pub(crate) construction_error: Option<ConstructionError>,
    /// One encoded `TransactionBody` per node, in node order. Empty while
    /// mutable.
    pub(crate) frozen_bodies: Vec<Vec<u8>>,
    pub(crate) signatures: SignatureSet,
    pub(crate) payload: P,
}

impl<P: Payload> Default for Transaction<P> {
    fn default() -> Self {
        Self::with_payload(P::default())
    }
}

impl<P: Payload> Transaction<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: P) -> Self {
        Self {
            transaction_id: None,
            node_account_ids: Vec::new(),
            max_transaction_fee: None,
            memo: String::new(),
            valid_duration: DEFAULT_VALID_DURATION,
            retry: RetryPolicy::default(),
            regenerate_transaction_id: None,
            checksum_ledger: None,
            state: LifecycleState::Mutable,
            construction_error: None,
            frozen_bodies: Vec::new(),
            signatures: SignatureSet::default(),
            payload,
        }
    }

    /// A fresh envelope that validates checksums the way `config` asks and
    /// carries its valid duration and retry policy.
    pub fn for_client(config: &ClientConfig) -> Self {
        let mut tx = Self::default();
        tx.checksum_ledger = config.checksum_ledger().cloned();
        tx.valid_duration = config.default_valid_duration();
        tx.retry = config.retry_policy();
        tx
    }

    // -----------------------------------------------------------------------
    // Getters
    // -----------------------------------------------------------------------

    pub fn kind(&self) -> TransactionKind {
        P::KIND
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_frozen(&self) -> bool {
        self.state == LifecycleState::Frozen
    }

    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.transaction_id.as_ref()
    }

    pub fn node_account_ids(&self) -> &[AccountId] {
        &self.node_account_ids
    }

    /// The fee ceiling. `None` until set or defaulted at freeze.
    pub fn max_transaction_fee(&self) -> Option<Hbar> {
        self.max_transaction_fee
    }

    pub fn memo(&self) -> &str {
        &self.memo
    }

    pub fn valid_duration(&self) -> Duration {
        self.valid_duration
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn regenerate_transaction_id(&self) -> Option<bool> {
        self.regenerate_transaction_id
    }

    pub fn checksum_validation(&self) -> Option<&LedgerId> {
        self.checksum_ledger.as_ref()
    }

    /// The deferred error recorded at freeze, if the payload was incomplete.
    pub fn construction_error(&self) -> Option<&ConstructionError> {
        self.construction_error.as_ref()
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    pub fn set_transaction_id(&mut self, transaction_id: TransactionId) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.check_entity(&transaction_id.account_id)?;
        self.transaction_id = Some(transaction_id);
        Ok(self)
    }

    pub fn set_node_account_ids(
        &mut self,
        node_account_ids: impl IntoIterator<Item = AccountId>,
    ) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        let node_account_ids: Vec<AccountId> = node_account_ids.into_iter().collect();
        for node in &node_account_ids {
            self.check_entity(node)?;
        }
        self.node_account_ids = node_account_ids;
        Ok(self)
    }

    pub fn set_max_transaction_fee(&mut self, fee: Hbar) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        if fee.is_negative() {
            return Err(TransactionError::NegativeAmount {
                field: "max_transaction_fee",
                amount: fee,
            });
        }
        self.max_transaction_fee = Some(fee);
        Ok(self)
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        let memo = memo.into();
        check_memo(&memo)?;
        self.memo = memo;
        Ok(self)
    }

    pub fn set_valid_duration(&mut self, duration: Duration) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        if duration < Duration::from_secs(1) || duration > MAX_VALID_DURATION {
            return Err(TransactionError::ValidDurationOutOfRange {
                duration,
                max: MAX_VALID_DURATION,
            });
        }
        self.valid_duration = duration;
        Ok(self)
    }

    pub fn set_max_attempts(&mut self, attempts: u32) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.retry.max_attempts = attempts;
        Ok(self)
    }

    pub fn set_min_backoff(&mut self, min: Duration) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        if min > self.retry.max_backoff {
            return Err(TransactionError::BackoffOrder {
                min,
                max: self.retry.max_backoff,
            });
        }
        self.retry.min_backoff = min;
        Ok(self)
    }

    pub fn set_max_backoff(&mut self, max: Duration) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        if max < self.retry.min_backoff {
            return Err(TransactionError::BackoffOrder {
                min: self.retry.min_backoff,
                max,
            });
        }
        self.retry.max_backoff = max;
        Ok(self)
    }

    /// Whether the network layer may replace an expired transaction id on
    /// retry. `None` defers to the client's own setting.
    pub fn set_regenerate_transaction_id(&mut self, regenerate: bool) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        self.regenerate_transaction_id = Some(regenerate);
        Ok(self)
    }

    /// Enables (with `Some(ledger)`) or disables checksum validation.
    ///
    /// Enabling it validates every entity id already present, so a
    /// previously unchecked id cannot slip through.
    pub fn set_checksum_validation(&mut self, ledger: Option<LedgerId>) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        if let Some(ledger) = &ledger {
            self.validate_entities_on(ledger, self.transaction_id.as_ref(), &self.node_account_ids)?;
        }
        self.checksum_ledger = ledger;
        Ok(self)
    }

    // -----------------------------------------------------------------------
    // Helpers for payload setters
    // -----------------------------------------------------------------------

    pub(crate) fn require_mutable(&self) -> Result<(), TransactionError> {
        if self.is_frozen() {
            warn!(kind = %P::KIND, "rejected mutation of frozen transaction");
            return Err(FreezeStateError::AlreadyFrozen.into());
        }
        Ok(())
    }

    pub(crate) fn require_frozen(&self) -> Result<(), TransactionError> {
        if !self.is_frozen() {
            return Err(FreezeStateError::NotFrozen.into());
        }
        Ok(())
    }

    /// Validates `id` against the envelope's ledger, when one is set.
    pub(crate) fn check_entity(&self, id: &EntityId) -> Result<(), TransactionError> {
        match &self.checksum_ledger {
            Some(ledger) => check_entity_on(id, ledger),
            None => Ok(()),
        }
    }

    /// Runs `update` against the payload after confirming the envelope is
    /// still mutable. Every typed payload setter goes through here.
    pub(crate) fn update_payload(&mut self, update: impl FnOnce(&mut P)) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        update(&mut self.payload);
        Ok(self)
    }

    /// Like `update_payload`, for updates that can fail. `update` must leave
    /// the payload untouched when it returns an error.
    pub(crate) fn try_update_payload(
        &mut self,
        update: impl FnOnce(&mut P) -> Result<(), TransactionError>,
    ) -> Result<&mut Self, TransactionError> {
        self.require_mutable()?;
        update(&mut self.payload)?;
        Ok(self)
    }

    /// Checks every entity id the envelope and payload carry.
    pub(crate) fn validate_entities_on(
        &self,
        ledger: &LedgerId,
        transaction_id: Option<&TransactionId>,
        node_account_ids: &[AccountId],
    ) -> Result<(), TransactionError> {
        if let Some(id) = transaction_id {
            check_entity_on(&id.account_id, ledger)?;
        }
        for node in node_account_ids {
            check_entity_on(node, ledger)?;
        }
        for id in self.payload.entity_ids() {
            check_entity_on(id, ledger)?;
        }
        Ok(())
    }
}

fn check_entity_on(id: &EntityId, ledger: &LedgerId) -> Result<(), TransactionError> {
    id.validate_checksum(ledger).map_err(|err| {
        warn!(entity = %id, %ledger, "checksum validation failed");
        TransactionError::Validation(err)
    })
}

pub(crate) fn check_memo(memo: &str) -> Result<(), TransactionError> {
    if memo.len() > MAX_MEMO_BYTES {
        return Err(TransactionError::MemoTooLong {
            len: memo.len(),
            max: MAX_MEMO_BYTES,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_BACKOFF;
    use crate::id::Timestamp;
    use crate::operations::NodeUpdate;

    fn fresh() -> Transaction<NodeUpdate> {
        Transaction::new()
    }

    #[test]
    fn new_envelope_is_mutable_with_defaults() {
        let tx = fresh();
        assert_eq!(tx.state(), LifecycleState::Mutable);
        assert_eq!(tx.valid_duration(), DEFAULT_VALID_DURATION);
        assert!(tx.transaction_id().is_none());
        assert!(tx.max_transaction_fee().is_none());
        assert_eq!(tx.kind(), TransactionKind::NodeUpdate);
    }

    #[test]
    fn memo_limit_is_enforced() {
        let mut tx = fresh();
        assert!(tx.set_memo("a".repeat(MAX_MEMO_BYTES)).is_ok());
        let err = tx.set_memo("a".repeat(MAX_MEMO_BYTES + 1)).unwrap_err();
        assert!(matches!(err, TransactionError::MemoTooLong { len: 101, .. }));
        assert_eq!(tx.memo().len(), MAX_MEMO_BYTES);
    }

    #[test]
    fn valid_duration_bounds() {
        let mut tx = fresh();
        assert!(tx.set_valid_duration(Duration::from_secs(180)).is_ok());
        assert!(tx.set_valid_duration(Duration::ZERO).is_err());
        assert!(tx.set_valid_duration(Duration::from_secs(181)).is_err());
        assert_eq!(tx.valid_duration(), Duration::from_secs(180));
    }

    #[test]
    fn negative_fee_rejected() {
        let mut tx = fresh();
        let err = tx.set_max_transaction_fee(Hbar::from_tinybars(-1)).unwrap_err();
        assert!(matches!(err, TransactionError::NegativeAmount { .. }));
        assert!(tx.max_transaction_fee().is_none());
    }

    #[test]
    fn backoff_order_enforced() {
        let mut tx = fresh();
        let err = tx
            .set_min_backoff(DEFAULT_MAX_BACKOFF + Duration::from_millis(1))
            .unwrap_err();
        assert!(matches!(err, TransactionError::BackoffOrder { .. }));
        assert!(tx.set_max_backoff(Duration::from_millis(1)).is_err());
        tx.set_max_backoff(Duration::from_secs(20)).unwrap();
        tx.set_min_backoff(Duration::from_secs(10)).unwrap();
        assert_eq!(tx.retry_policy().min_backoff, Duration::from_secs(10));
    }

    #[test]
    fn checksum_validated_at_set_time_when_enabled() {
        let mut tx = fresh();
        tx.set_checksum_validation(Some(LedgerId::Testnet)).unwrap();

        let good = AccountId::from_num(3).with_checksum("dmqui");
        assert!(tx.set_node_account_ids([good]).is_ok());

        let bad = AccountId::from_num(3).with_checksum("aaaaa");
        let err = tx.set_node_account_ids([bad]).unwrap_err();
        match err {
            TransactionError::Validation(err) => {
                assert_eq!(err.given, "aaaaa");
                assert_eq!(err.expected, "dmqui");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(tx.node_account_ids().len(), 1);
        assert_eq!(tx.node_account_ids()[0].checksum(), Some("dmqui"));
    }

    #[test]
    fn checksum_ignored_when_validation_disabled() {
        let mut tx = fresh();
        let bad = AccountId::from_num(3).with_checksum("aaaaa");
        assert!(tx.set_node_account_ids([bad]).is_ok());
    }

    #[test]
    fn enabling_validation_checks_existing_ids() {
        let mut tx = fresh();
        tx.set_transaction_id(TransactionId::new(
            AccountId::from_num(123).with_checksum("zzzzz"),
            Timestamp { seconds: 1, nanos: 0 },
        ))
        .unwrap();
        assert!(tx.set_checksum_validation(Some(LedgerId::Testnet)).is_err());
        assert!(tx.checksum_validation().is_none());
    }

    #[test]
    fn for_client_copies_validation_and_retry() {
        let mut config = ClientConfig::for_ledger(LedgerId::Mainnet);
        config.auto_validate_checksums = true;
        config.max_attempts = 3;
        let tx: Transaction<NodeUpdate> = Transaction::for_client(&config);
        assert_eq!(tx.checksum_validation(), Some(&LedgerId::Mainnet));
        assert_eq!(tx.retry_policy().max_attempts, 3);
    }
}
