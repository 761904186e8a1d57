//! Authorization policies: single keys, key lists and threshold lists.

use serde::Serialize;
use std::collections::HashSet;

use super::keys::PublicKey;
use crate::proto;
use crate::transaction::DecodeError;

/// A key policy as it appears inside transaction payloads (admin keys,
/// account keys).
///
/// A `KeyList` requires every member to sign; a `Threshold` requires at least
/// `threshold` of its members. Lists nest arbitrarily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Key {
    Ed25519 { public_key: PublicKey },
    KeyList { keys: Vec<Key> },
    Threshold { threshold: u32, keys: Vec<Key> },
}

impl Key {
    pub fn threshold(threshold: u32, keys: impl IntoIterator<Item = Key>) -> Self {
        Self::Threshold {
            threshold,
            keys: keys.into_iter().collect(),
        }
    }

    pub fn list(keys: impl IntoIterator<Item = Key>) -> Self {
        Self::KeyList {
            keys: keys.into_iter().collect(),
        }
    }

    /// Every distinct public key reachable from this policy, depth first.
    pub fn public_keys(&self) -> Vec<PublicKey> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_public_keys(&mut seen, &mut out);
        out
    }

    fn collect_public_keys(&self, seen: &mut HashSet<PublicKey>, out: &mut Vec<PublicKey>) {
        match self {
            Self::Ed25519 { public_key } => {
                if seen.insert(*public_key) {
                    out.push(*public_key);
                }
            }
            Self::KeyList { keys } | Self::Threshold { keys, .. } => {
                for key in keys {
                    key.collect_public_keys(seen, out);
                }
            }
        }
    }

    /// Whether `signers` would satisfy this policy.
    ///
    /// Informational only: the transaction engine never refuses an
    /// under-signed transaction, the network decides.
    pub fn is_satisfied_by(&self, signers: &HashSet<PublicKey>) -> bool {
        match self {
            Self::Ed25519 { public_key } => signers.contains(public_key),
            Self::KeyList { keys } => keys.iter().all(|k| k.is_satisfied_by(signers)),
            Self::Threshold { threshold, keys } => {
                let met = keys.iter().filter(|k| k.is_satisfied_by(signers)).count();
                met >= *threshold as usize
            }
        }
    }

    pub(crate) fn to_proto(&self) -> proto::Key {
        let key = match self {
            Self::Ed25519 { public_key } => proto::key::Key::Ed25519(public_key.to_bytes().to_vec()),
            Self::KeyList { keys } => proto::key::Key::KeyList(Self::list_to_proto(keys)),
            Self::Threshold { threshold, keys } => {
                proto::key::Key::ThresholdKey(proto::ThresholdKey {
                    threshold: *threshold,
                    keys: Some(Self::list_to_proto(keys)),
                })
            }
        };
        proto::Key { key: Some(key) }
    }

    fn list_to_proto(keys: &[Key]) -> proto::KeyList {
        proto::KeyList {
            keys: keys.iter().map(Key::to_proto).collect(),
        }
    }

    pub(crate) fn from_proto(pb: &proto::Key) -> Result<Self, DecodeError> {
        match &pb.key {
            Some(proto::key::Key::Ed25519(bytes)) => Ok(Self::Ed25519 {
                public_key: PublicKey::from_bytes(bytes)?,
            }),
            Some(proto::key::Key::KeyList(list)) => Ok(Self::KeyList {
                keys: Self::list_from_proto(list)?,
            }),
            Some(proto::key::Key::ThresholdKey(threshold)) => Ok(Self::Threshold {
                threshold: threshold.threshold,
                keys: threshold
                    .keys
                    .as_ref()
                    .map(Self::list_from_proto)
                    .transpose()?
                    .unwrap_or_default(),
            }),
            Some(proto::key::Key::EcdsaSecp256k1(_)) => {
                Err(DecodeError::UnsupportedKey("ECDSA(secp256k1)"))
            }
            None => Err(DecodeError::UnsupportedKey("empty")),
        }
    }

    fn list_from_proto(list: &proto::KeyList) -> Result<Vec<Key>, DecodeError> {
        list.keys.iter().map(Key::from_proto).collect()
    }
}

impl From<PublicKey> for Key {
    fn from(public_key: PublicKey) -> Self {
        Self::Ed25519 { public_key }
    }
}
