use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The canonical null identity (the 20-byte zero address).
pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Number of bytes kept when deriving an address-like identity.
const ADDRESS_BYTES: usize = 20;

/// Opaque identity of a ledger caller.
///
/// The ledger never interprets the string beyond equality and the null
/// check; callers are authenticated before they reach the engine. Derived
/// and ephemeral identities are `0x`-prefixed 20-byte hex strings so they
/// look like the addresses operators are used to.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Wrap an identity string as given.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The null identity.
    pub fn null() -> Self {
        Self(NULL_ADDRESS.to_string())
    }

    /// Derive a deterministic address-like identity from a label.
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"fcl-identity-v1:");
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        Self(format!("0x{}", hex::encode(&hash.as_bytes()[..ADDRESS_BYTES])))
    }

    /// Create a random identity for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// Returns `true` for the empty string and for any `0x`-prefixed
    /// string whose digits are all zero.
    pub fn is_null(&self) -> bool {
        let raw = self.0.trim();
        if raw.is_empty() {
            return true;
        }
        raw.strip_prefix("0x")
            .or_else(|| raw.strip_prefix("0X"))
            .is_some_and(|digits| digits.chars().all(|c| c == '0'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for logs and tables (first 10 characters).
    pub fn short_id(&self) -> String {
        if self.0.chars().count() <= 10 {
            return self.0.clone();
        }
        let head: String = self.0.chars().take(10).collect();
        format!("{head}...")
    }
}

impl FromStr for Identity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TypeError::EmptyIdentity);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
