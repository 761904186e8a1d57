//! Entity identifiers: `shard.realm.num` triples naming accounts, nodes,
//! contracts and tokens.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use super::checksum::{compute_checksum, validate, ChecksumError, LedgerId};
use crate::proto;

/// Errors parsing an entity id from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityIdError {
    #[error("malformed entity id `{0}`: expected shard.realm.num[-checksum]")]
    Malformed(String),

    #[error("malformed checksum `{0}`: expected lowercase letters")]
    MalformedChecksum(String),
}

/// A `(shard, realm, num)` triple with an optional display checksum.
///
/// The checksum is carried only so it can be validated against a ledger. It
/// is ignored by equality and hashing and is never encoded on the wire, so
/// `0.0.123` and `0.0.123-esxsf` are the same entity.
#[derive(Debug, Clone, Default)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
    checksum: Option<String>,
}

/// Account ids are entity ids; the alias keeps signatures readable.
pub type AccountId = EntityId;

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self {
            shard,
            realm,
            num,
            checksum: None,
        }
    }

    /// Shorthand for `0.0.num`.
    pub const fn from_num(num: u64) -> Self {
        Self::new(0, 0, num)
    }

    /// Attaches a checksum as if it had been parsed from `shard.realm.num-checksum`.
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// The checksum the caller attached, if any.
    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// Validates the attached checksum against `ledger`.
    pub fn validate_checksum(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        validate(self, ledger)
    }

    /// Renders `shard.realm.num-checksum` for `ledger`.
    pub fn to_string_with_checksum(&self, ledger: &LedgerId) -> String {
        let address = self.to_string();
        let checksum = compute_checksum(ledger, &address);
        format!("{address}-{checksum}")
    }

    pub(crate) fn to_proto(&self) -> proto::AccountId {
        proto::AccountId {
            shard_num: self.shard as i64,
            realm_num: self.realm as i64,
            account: Some(proto::account_id::Account::AccountNum(self.num as i64)),
        }
    }

    /// Alias-addressed accounts are outside what this client models and
    /// decode as `None`.
    pub(crate) fn from_proto(pb: &proto::AccountId) -> Option<Self> {
        match pb.account {
            Some(proto::account_id::Account::AccountNum(num)) => Some(Self::new(
                pb.shard_num as u64,
                pb.realm_num as u64,
                num as u64,
            )),
            Some(proto::account_id::Account::Alias(_)) => None,
            None => Some(Self::new(pb.shard_num as u64, pb.realm_num as u64, 0)),
        }
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        (self.shard, self.realm, self.num) == (other.shard, other.realm, other.num)
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.shard, self.realm, self.num).hash(state);
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = EntityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || EntityIdError::Malformed(s.to_string());

        let (address, checksum) = match s.split_once('-') {
            Some((address, checksum)) => (address, Some(checksum)),
            None => (s, None),
        };

        let parts: Vec<&str> = address.split('.').collect();
        let [shard, realm, num] = parts.as_slice() else {
            return Err(malformed());
        };
        let parse = |part: &str| -> Result<u64, EntityIdError> {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse().map_err(|_| malformed())
        };

        let mut id = Self::new(parse(shard)?, parse(realm)?, parse(num)?);
        if let Some(checksum) = checksum {
            if checksum.is_empty() || !checksum.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(EntityIdError::MalformedChecksum(checksum.to_string()));
            }
            id.checksum = Some(checksum.to_string());
        }
        Ok(id)
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_checksummed() {
        let plain: EntityId = "0.0.123".parse().unwrap();
        assert_eq!(plain, EntityId::from_num(123));
        assert_eq!(plain.checksum(), None);

        let checked: EntityId = "1.2.3-abcde".parse().unwrap();
        assert_eq!((checked.shard, checked.realm, checked.num), (1, 2, 3));
        assert_eq!(checked.checksum(), Some("abcde"));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "0.0", "0.0.0.0", "a.b.c", "0.0.-1", "0..1", "0.0.1-ABCDE", "0.0.1-"] {
            assert!(bad.parse::<EntityId>().is_err(), "{bad}");
        }
    }

    #[test]
    fn checksum_does_not_affect_equality() {
        let a: EntityId = "0.0.123-esxsf".parse().unwrap();
        let b = EntityId::from_num(123);
        assert_eq!(a, b);
    }

    #[test]
    fn display_with_checksum() {
        let id = EntityId::from_num(123);
        assert_eq!(id.to_string(), "0.0.123");
        assert_eq!(id.to_string_with_checksum(&LedgerId::Testnet), "0.0.123-esxsf");
    }

    #[test]
    fn proto_drops_checksum() {
        let id: EntityId = "0.0.42-abcde".parse().unwrap();
        let back = EntityId::from_proto(&id.to_proto()).unwrap();
        assert_eq!(back, id);
        assert_eq!(back.checksum(), None);
    }

    #[test]
    fn serde_uses_text_form() {
        let id = EntityId::new(0, 1, 7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0.1.7\"");
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
