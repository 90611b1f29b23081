// crates/krill-core/src/identity.rs
//
// Account identity for the Krill Protocol.
//
// Every participant (prover, delegating staker, the slashing authority,
// the reward reporter, the ledger administrator) is addressed by a single
// 32-byte account key. The same key that registers a prover also owns that
// prover's self-collateral position.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A 32-byte account key.
///
/// Serializes as a `0x`-prefixed hex string so that account-keyed maps
/// survive JSON snapshots, where map keys must be strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub [u8; 32]);

impl AccountId {
    /// Construct from raw key bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// DID rendering of this account (e.g. "did:krill:0xabc…").
    pub fn did(&self) -> String {
        format!("did:krill:0x{}", hex::encode(self.0))
    }

    /// Abbreviated hex form for log lines: the first four bytes.
    pub fn short_hex(&self) -> String {
        format!("0x{}…", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(stripped).map_err(serde::de::Error::custom)?;
        let raw: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("account id must be exactly 32 bytes"))?;
        Ok(AccountId(raw))
    }
}
