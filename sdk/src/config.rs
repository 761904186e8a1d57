//! # Client Configuration & Constants
//!
//! Every magic number the transaction engine relies on lives here, next to
//! [`ClientConfig`], the caller-supplied description of the network a client
//! talks to.
//!
//! Several of these values are enforced by the network itself (memo length,
//! valid-duration bounds). Changing them here does not change what the
//! network accepts; it only changes how early we complain.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::id::{AccountId, LedgerId};
use crate::transaction::types::Hbar;

// ---------------------------------------------------------------------------
// Transaction limits
// ---------------------------------------------------------------------------

/// Maximum memo length in bytes (UTF-8 encoded).
pub const MAX_MEMO_BYTES: usize = 100;

/// Default window in which a transaction may reach consensus.
pub const DEFAULT_VALID_DURATION: Duration = Duration::from_secs(120);

/// The network rejects valid durations above this.
pub const MAX_VALID_DURATION: Duration = Duration::from_secs(180);

/// Fee ceiling applied at freeze time when the caller set none, in tinybars
/// (2 ℏ).
pub const DEFAULT_MAX_TRANSACTION_FEE_TINYBARS: i64 = 2 * TINYBARS_PER_HBAR;

/// Tinybars in one hbar.
pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Auto-renew period given to new accounts (about 91 days).
pub const DEFAULT_AUTO_RENEW_PERIOD: Duration = Duration::from_secs(7_890_000);

// ---------------------------------------------------------------------------
// Transaction ids
// ---------------------------------------------------------------------------

/// Generated transaction ids start this many seconds in the past.
pub const TRANSACTION_ID_BACKDATE_SECS: i64 = 8;

/// Upper bound of the extra random backdating, in nanoseconds (5 s).
pub const TRANSACTION_ID_BACKDATE_JITTER_NANOS: i64 = 5_000_000_000;

// ---------------------------------------------------------------------------
// Retry policy (carried for the network layer, never applied here)
// ---------------------------------------------------------------------------

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_MIN_BACKOFF: Duration = Duration::from_millis(250);
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

// ---------------------------------------------------------------------------
// Entity checksums
// ---------------------------------------------------------------------------

/// Length of an entity id checksum suffix.
pub const CHECKSUM_LENGTH: usize = 5;

/// Base of the rolling hashes.
pub const CHECKSUM_WEIGHT: u64 = 31;

/// Final scrambling multiplier (a prime just above one million).
pub const CHECKSUM_MULTIPLIER: u64 = 1_000_003;

/// Zero bytes appended to the ledger id before hashing it.
pub const CHECKSUM_LEDGER_PADDING: usize = 6;

// ---------------------------------------------------------------------------
// Cryptographic parameters
// ---------------------------------------------------------------------------

/// Ed25519 public key length in bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// RetryPolicy
// ---------------------------------------------------------------------------

/// How the network layer should retry a submission. The engine only carries
/// these values to the [`Submitter`](crate::transaction::Submitter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_backoff: DEFAULT_MIN_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }
}

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Errors loading a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid client config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid client config: min backoff {min_ms}ms exceeds max backoff {max_ms}ms")]
    BackoffOrder { min_ms: u64, max_ms: u64 },

    #[error("invalid client config: valid duration {secs}s outside 1..=180s")]
    ValidDuration { secs: u64 },
}

/// What a transaction needs to know about the client that will submit it.
///
/// Loaded from JSON by the CLI; library callers usually build it with
/// [`ClientConfig::for_ledger`] and adjust fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Network identity used for checksum validation.
    pub ledger_id: LedgerId,
    /// Validate entity id checksums as fields are set and at freeze.
    pub auto_validate_checksums: bool,
    /// Account paying for transactions; used to generate transaction ids.
    pub operator_account_id: Option<AccountId>,
    /// Nodes a transaction is prepared for when the caller named none.
    pub node_account_ids: Vec<AccountId>,
    /// Fee ceiling, in tinybars, for transactions that set none.
    pub default_max_transaction_fee: i64,
    pub default_valid_duration_secs: u64,
    pub max_attempts: u32,
    pub min_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_ledger(LedgerId::default())
    }
}

impl ClientConfig {
    /// Defaults for `ledger_id`, with checksum validation switched off.
    pub fn for_ledger(ledger_id: LedgerId) -> Self {
        Self {
            ledger_id,
            auto_validate_checksums: false,
            operator_account_id: None,
            node_account_ids: Vec::new(),
            default_max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE_TINYBARS,
            default_valid_duration_secs: DEFAULT_VALID_DURATION.as_secs(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            min_backoff_ms: DEFAULT_MIN_BACKOFF.as_millis() as u64,
            max_backoff_ms: DEFAULT_MAX_BACKOFF.as_millis() as u64,
        }
    }

    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_backoff_ms > self.max_backoff_ms {
            return Err(ConfigError::BackoffOrder {
                min_ms: self.min_backoff_ms,
                max_ms: self.max_backoff_ms,
            });
        }
        let secs = self.default_valid_duration_secs;
        if secs == 0 || secs > MAX_VALID_DURATION.as_secs() {
            return Err(ConfigError::ValidDuration { secs });
        }
        Ok(())
    }

    /// The ledger to validate checksums against, when validation is on.
    pub fn checksum_ledger(&self) -> Option<&LedgerId> {
        self.auto_validate_checksums.then_some(&self.ledger_id)
    }

    pub fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::from_tinybars(self.default_max_transaction_fee)
    }

    pub fn default_valid_duration(&self) -> Duration {
        Duration::from_secs(self.default_valid_duration_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            min_backoff: Duration::from_millis(self.min_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}
