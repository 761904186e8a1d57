//! Transaction identifiers: the paying account plus the instant the
//! transaction becomes valid.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::entity::{AccountId, EntityIdError};
use crate::config::{TRANSACTION_ID_BACKDATE_JITTER_NANOS, TRANSACTION_ID_BACKDATE_SECS};
use crate::proto;

/// Errors parsing a [`TransactionId`] from text.
#[derive(Debug, Error)]
pub enum TransactionIdError {
    #[error("malformed transaction id `{0}`: expected account@seconds.nanos")]
    Malformed(String),

    #[error(transparent)]
    Account(#[from] EntityIdError),
}

const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// A point in time with nanosecond precision, as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub const fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }

    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub(crate) fn to_proto(self) -> proto::Timestamp {
        proto::Timestamp {
            seconds: self.seconds,
            nanos: self.nanos,
        }
    }

    /// `None` unless `nanos` is within `0..1_000_000_000`.
    pub(crate) fn from_proto(pb: &proto::Timestamp) -> Option<Self> {
        (0..NANOS_PER_SECOND)
            .contains(&pb.nanos)
            .then(|| Self::new(pb.seconds, pb.nanos))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value.timestamp(), value.timestamp_subsec_nanos() as i32)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

/// Identity of a single transaction.
///
/// Two transactions with the same id are the same transaction as far as the
/// network is concerned; the second submission is rejected as a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
    pub scheduled: bool,
    pub nonce: i32,
}

impl TransactionId {
    pub fn new(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
            scheduled: false,
            nonce: 0,
        }
    }

    /// Generates an id for `account_id` starting slightly in the past.
    ///
    /// The start is backdated by a fixed margin plus random jitter so that
    /// a node whose clock runs a few seconds behind still accepts it, and
    /// so that ids generated in the same instant do not collide.
    pub fn generate(account_id: AccountId) -> Self {
        let jitter = rand::thread_rng().gen_range(0..TRANSACTION_ID_BACKDATE_JITTER_NANOS);
        let start = Utc::now()
            - ChronoDuration::seconds(TRANSACTION_ID_BACKDATE_SECS)
            - ChronoDuration::nanoseconds(jitter);
        Self::new(account_id, Timestamp::from(start))
    }

    pub(crate) fn to_proto(&self) -> proto::TransactionId {
        proto::TransactionId {
            transaction_valid_start: Some(self.valid_start.to_proto()),
            account_id: Some(self.account_id.to_proto()),
            scheduled: self.scheduled,
            nonce: self.nonce,
        }
    }

    pub(crate) fn from_proto(pb: &proto::TransactionId) -> Option<Self> {
        let account_id = pb.account_id.as_ref().and_then(AccountId::from_proto)?;
        let valid_start = match pb.transaction_valid_start.as_ref() {
            Some(start) => Timestamp::from_proto(start)?,
            None => Timestamp::default(),
        };
        Some(Self {
            account_id,
            valid_start,
            scheduled: pb.scheduled,
            nonce: pb.nonce,
        })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)?;
        if self.scheduled {
            write!(f, "?scheduled")?;
        }
        if self.nonce != 0 {
            write!(f, "/{}", self.nonce)?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = TransactionIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TransactionIdError::Malformed(s.to_string());

        let (rest, nonce) = match s.rsplit_once('/') {
            Some((rest, nonce)) => (rest, nonce.parse::<i32>().map_err(|_| malformed())?),
            None => (s, 0),
        };
        let (rest, scheduled) = match rest.strip_suffix("?scheduled") {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let (account, start) = rest.split_once('@').ok_or_else(malformed)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(malformed)?;

        Ok(Self {
            account_id: account.parse()?,
            valid_start: Timestamp::new(
                seconds.parse().map_err(|_| malformed())?,
                nanos.parse().map_err(|_| malformed())?,
            ),
            scheduled,
            nonce,
        })
    }
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
