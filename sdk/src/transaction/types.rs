//! Core vocabulary shared by every transaction kind.
//!
//! These types are small and `Copy` where possible; they appear in every
//! envelope and in every log line the engine emits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::TINYBARS_PER_HBAR;

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction carries.
///
/// The numbers returned by [`body_tag`](Self::body_tag) are the protobuf
/// field numbers of the `data` oneof in `TransactionBody`; they are what a
/// decoder reads to know which payload follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    /// Update a consensus node's address-book entry.
    NodeUpdate,
    /// Create a new account.
    AccountCreate,
    /// Move hbar between accounts.
    Transfer,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 3] = [Self::NodeUpdate, Self::AccountCreate, Self::Transfer];

    /// Field number in `TransactionBody.data`.
    pub const fn body_tag(self) -> u32 {
        match self {
            Self::NodeUpdate => 55,
            Self::AccountCreate => 11,
            Self::Transfer => 14,
        }
    }

    /// Field number in `SchedulableTransactionBody.data`.
    pub const fn schedulable_tag(self) -> u32 {
        match self {
            Self::NodeUpdate => 43,
            Self::AccountCreate => 7,
            Self::Transfer => 9,
        }
    }

    /// The gRPC method a submitter must call for this kind.
    pub const fn service(self) -> ServiceDescriptor {
        match self {
            Self::NodeUpdate => ServiceDescriptor::new("proto.AddressBookService", "updateNode"),
            Self::AccountCreate => ServiceDescriptor::new("proto.CryptoService", "createAccount"),
            Self::Transfer => ServiceDescriptor::new("proto.CryptoService", "cryptoTransfer"),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeUpdate => write!(f, "NodeUpdateTransaction"),
            Self::AccountCreate => write!(f, "AccountCreateTransaction"),
            Self::Transfer => write!(f, "TransferTransaction"),
        }
    }
}

// ---------------------------------------------------------------------------
// ServiceDescriptor
// ---------------------------------------------------------------------------

/// Names the network service endpoint a transaction is submitted to.
/// Consumed by the network layer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub method: &'static str,
}

impl ServiceDescriptor {
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }

    /// `/package.Service/method`, as used in the HTTP/2 `:path` header.
    pub fn grpc_path(&self) -> String {
        format!("/{}/{}", self.service, self.method)
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}

// ---------------------------------------------------------------------------
// LifecycleState
// ---------------------------------------------------------------------------

/// Where an envelope is in its lifecycle. The only transition is
/// `Mutable -> Frozen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Fields may still be set.
    #[default]
    Mutable,
    /// Body bytes are fixed; only signatures may be added.
    Frozen,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mutable => write!(f, "Mutable"),
            Self::Frozen => write!(f, "Frozen"),
        }
    }
}

// ---------------------------------------------------------------------------
// Hbar
// ---------------------------------------------------------------------------

/// An amount of the ledger's native currency, stored in tinybars.
///
/// `value` is always an integer; 1 ℏ is 100 000 000 tinybars. Negative
/// amounts are meaningful in transfer lists (debits) but not as fees.
///
/// # Examples
///
/// ```
/// use tessera_sdk::transaction::Hbar;
///
/// let fee = Hbar::new(2);
/// assert_eq!(fee.to_tinybars(), 200_000_000);
/// assert_eq!(Hbar::from_tinybars(150_000_000).to_string(), "1.50000000 ℏ");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hbar(i64);

impl Hbar {
    pub const ZERO: Hbar = Hbar(0);

    /// Whole hbars. Saturates rather than overflowing.
    pub const fn new(hbars: i64) -> Self {
        Self(hbars.saturating_mul(TINYBARS_PER_HBAR))
    }

    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    pub const fn to_tinybars(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn negated(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per = TINYBARS_PER_HBAR as u64;
        write!(f, "{sign}{}.{:08} ℏ", abs / per, abs % per)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_match_wire_schema() {
        assert_eq!(TransactionKind::NodeUpdate.body_tag(), 55);
        assert_eq!(TransactionKind::NodeUpdate.schedulable_tag(), 43);
        assert_eq!(TransactionKind::AccountCreate.body_tag(), 11);
        assert_eq!(TransactionKind::Transfer.schedulable_tag(), 9);
    }

    #[test]
    fn kind_display() {
        assert_eq!(TransactionKind::NodeUpdate.to_string(), "NodeUpdateTransaction");
        assert_eq!(TransactionKind::Transfer.to_string(), "TransferTransaction");
    }

    #[test]
    fn service_grpc_path() {
        let service = TransactionKind::NodeUpdate.service();
        assert_eq!(service.grpc_path(), "/proto.AddressBookService/updateNode");
        assert_eq!(service.to_string(), "proto.AddressBookService.updateNode");
    }

    #[test]
    fn lifecycle_defaults_to_mutable() {
        assert_eq!(LifecycleState::default(), LifecycleState::Mutable);
        assert_eq!(LifecycleState::Frozen.to_string(), "Frozen");
    }

    #[test]
    fn hbar_conversions() {
        assert_eq!(Hbar::new(1).to_tinybars(), TINYBARS_PER_HBAR);
        assert_eq!(Hbar::from_tinybars(5).to_tinybars(), 5);
        assert!(Hbar::from_tinybars(-1).is_negative());
        assert_eq!(Hbar::new(3).negated(), Hbar::new(-3));
    }

    #[test]
    fn hbar_display() {
        assert_eq!(Hbar::new(2).to_string(), "2.00000000 ℏ");
        assert_eq!(Hbar::from_tinybars(-50).to_string(), "-0.00000050 ℏ");
    }

    #[test]
    fn hbar_serde_is_tinybars() {
        let json = serde_json::to_string(&Hbar::new(1)).unwrap();
        assert_eq!(json, "100000000");
        let back: Hbar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Hbar::new(1));
    }
}
