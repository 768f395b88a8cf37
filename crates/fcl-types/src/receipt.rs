use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an accepted mutation (UUID v7, so ids sort by commit time).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReceiptId(uuid::Uuid);

impl ReceiptId {
    /// Generate a new time-ordered receipt id.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for ReceiptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiptId({})", self.short_id())
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rcpt:{}", self.short_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ReceiptId::new(), ReceiptId::new());
    }

    #[test]
    fn display_uses_short_form() {
        let id = ReceiptId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("rcpt:"));
        assert_eq!(shown.len(), 13);
    }

    #[test]
    fn serde_roundtrip() {
        let id = ReceiptId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ReceiptId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
