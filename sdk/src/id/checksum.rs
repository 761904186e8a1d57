//! Entity id checksums.
//!
//! A checksum is a five-letter suffix (`0.0.123-esxsf`) derived from the
//! id's `shard.realm.num` text and the identity of the ledger it belongs to.
//! It exists purely so that a human pasting an id from the wrong network gets
//! an error instead of a silently misdirected transfer. The suffix never
//! reaches the wire.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::entity::EntityId;
use crate::config::{CHECKSUM_LEDGER_PADDING, CHECKSUM_LENGTH, CHECKSUM_MULTIPLIER, CHECKSUM_WEIGHT};

// ---------------------------------------------------------------------------
// LedgerId
// ---------------------------------------------------------------------------

/// Identity of the network a client talks to.
///
/// The well-known networks are single bytes; private networks may use any
/// byte string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerId {
    Mainnet,
    Testnet,
    Previewnet,
    Other(Vec<u8>),
}

/// Errors parsing a [`LedgerId`] from text.
#[derive(Debug, Error)]
#[error("unknown ledger id `{0}`: expected mainnet, testnet, previewnet or hex bytes")]
pub struct LedgerIdError(pub String);

impl LedgerId {
    /// Raw identity bytes mixed into every checksum.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Mainnet => vec![0x00],
            Self::Testnet => vec![0x01],
            Self::Previewnet => vec![0x02],
            Self::Other(bytes) => bytes.clone(),
        }
    }

    /// Maps identity bytes back to a ledger, recognising the named networks.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match bytes {
            [0x00] => Self::Mainnet,
            [0x01] => Self::Testnet,
            [0x02] => Self::Previewnet,
            other => Self::Other(other.to_vec()),
        }
    }
}

impl Default for LedgerId {
    fn default() -> Self {
        Self::Testnet
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
            Self::Previewnet => write!(f, "previewnet"),
            Self::Other(bytes) => write!(f, "{}", hex::encode(bytes)),
        }
    }
}

impl FromStr for LedgerId {
    type Err = LedgerIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "previewnet" => Ok(Self::Previewnet),
            other => hex::decode(other)
                .ok()
                .filter(|bytes| !bytes.is_empty())
                .map(|bytes| Self::from_bytes(&bytes))
                .ok_or_else(|| LedgerIdError(s.to_string())),
        }
    }
}

impl Serialize for LedgerId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LedgerId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Checksum computation
// ---------------------------------------------------------------------------

/// Raised when an id's attached checksum does not match the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "network mismatch or wrong checksum given, given checksum: {given}, correct checksum {expected}, network: {network}"
)]
pub struct ChecksumError {
    /// The checksum the caller attached.
    pub given: String,
    /// The checksum the id should carry on this ledger.
    pub expected: String,
    /// The ledger the id was validated against.
    pub network: LedgerId,
}

/// Computes the five-letter checksum of `address` (`"shard.realm.num"`) on
/// `ledger`.
///
/// Digits map to 0..=9 and `.` maps to 10. Two alternating digit sums mod 11,
/// a base-31 rolling hash of the digits mod 26³ and a base-31 hash of the
/// ledger bytes (zero padded) mod 26⁵ are folded together, multiplied by
/// 1 000 003 and rendered in base 26 using `a`..=`z`.
pub fn compute_checksum(ledger: &LedgerId, address: &str) -> String {
    const P3: u64 = 26 * 26 * 26;
    const P5: u64 = 26 * 26 * 26 * 26 * 26;

    let digits: Vec<u64> = address
        .chars()
        .map(|c| c.to_digit(10).map(u64::from).unwrap_or(10))
        .collect();

    let mut s0 = 0u64;
    let mut s1 = 0u64;
    let mut s = 0u64;
    for (i, digit) in digits.iter().enumerate() {
        s = (CHECKSUM_WEIGHT * s + digit) % P3;
        if i % 2 == 0 {
            s0 = (s0 + digit) % 11;
        } else {
            s1 = (s1 + digit) % 11;
        }
    }

    let mut ledger_bytes = ledger.to_bytes();
    ledger_bytes.extend_from_slice(&[0u8; CHECKSUM_LEDGER_PADDING]);
    let sh = ledger_bytes
        .iter()
        .fold(0u64, |acc, b| (CHECKSUM_WEIGHT * acc + u64::from(*b)) % P5);

    let n = digits.len() as u64;
    let mut checksum = ((((n % 5) * 11 + s0) * 11 + s1) * P3 + s + sh) % P5;
    checksum = (checksum * CHECKSUM_MULTIPLIER) % P5;

    let mut letters = [b'a'; CHECKSUM_LENGTH];
    for slot in letters.iter_mut().rev() {
        *slot = b'a' + (checksum % 26) as u8;
        checksum /= 26;
    }
    letters.iter().map(|b| *b as char).collect()
}

/// Validates the checksum attached to `id` against `ledger`.
///
/// Ids without an attached checksum always pass.
pub fn validate(id: &EntityId, ledger: &LedgerId) -> Result<(), ChecksumError> {
    let Some(given) = id.checksum() else {
        return Ok(());
    };
    let expected = compute_checksum(ledger, &id.to_string());
    if given == expected {
        Ok(())
    } else {
        Err(ChecksumError {
            given: given.to_string(),
            expected,
            network: ledger.clone(),
        })
    }
}
