use serde::{Deserialize, Serialize};

use fcl_types::{Amount, Identity, LedgerTime};

use crate::error::{FabricError, Result};

/// Content-addressed identifier of a ledger event.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId {
    /// BLAKE3 integrity hash of the event.
    pub hash: [u8; 32],
}

impl EventId {
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    /// Short hex representation (first 8 hex chars).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.hash[..4])
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "evt:{}", self.short_hex())
    }
}

/// Classification of ledger events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MemberRegistered,
    WorkoutRecorded,
    ProgressUpdated,
    ChallengeCreated,
    ChallengeJoined,
    MemberDeactivated,
    OwnershipTransferred,
    FundsWithdrawn,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MemberRegistered => "MemberRegistered",
            Self::WorkoutRecorded => "WorkoutRecorded",
            Self::ProgressUpdated => "ProgressUpdated",
            Self::ChallengeCreated => "ChallengeCreated",
            Self::ChallengeJoined => "ChallengeJoined",
            Self::MemberDeactivated => "MemberDeactivated",
            Self::OwnershipTransferred => "OwnershipTransferred",
            Self::FundsWithdrawn => "FundsWithdrawn",
        };
        write!(f, "{s}")
    }
}

/// Data carried by a ledger event. Each variant determines its [`EventKind`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventPayload {
    MemberRegistered {
        member: Identity,
        membership_type: String,
    },
    WorkoutRecorded {
        member: Identity,
        session_id: u64,
    },
    /// Follows every `WorkoutRecorded` with the member's new session count.
    ProgressUpdated {
        member: Identity,
        session_count: u64,
    },
    ChallengeCreated {
        challenge_id: u64,
        name: String,
        prize: Amount,
    },
    ChallengeJoined {
        challenge_id: u64,
        member: Identity,
    },
    MemberDeactivated {
        member: Identity,
    },
    OwnershipTransferred {
        previous: Identity,
        new_owner: Identity,
    },
    FundsWithdrawn {
        owner: Identity,
        amount: Amount,
    },
}

impl EventPayload {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MemberRegistered { .. } => EventKind::MemberRegistered,
            Self::WorkoutRecorded { .. } => EventKind::WorkoutRecorded,
            Self::ProgressUpdated { .. } => EventKind::ProgressUpdated,
            Self::ChallengeCreated { .. } => EventKind::ChallengeCreated,
            Self::ChallengeJoined { .. } => EventKind::ChallengeJoined,
            Self::MemberDeactivated { .. } => EventKind::MemberDeactivated,
            Self::OwnershipTransferred { .. } => EventKind::OwnershipTransferred,
            Self::FundsWithdrawn { .. } => EventKind::FundsWithdrawn,
        }
    }

    /// Identities this event is about.
    pub fn subjects(&self) -> Vec<&Identity> {
        match self {
            Self::MemberRegistered { member, .. }
            | Self::WorkoutRecorded { member, .. }
            | Self::ProgressUpdated { member, .. }
            | Self::ChallengeJoined { member, .. }
            | Self::MemberDeactivated { member } => vec![member],
            Self::OwnershipTransferred {
                previous,
                new_owner,
            } => vec![previous, new_owner],
            Self::FundsWithdrawn { owner, .. } => vec![owner],
            Self::ChallengeCreated { .. } => Vec::new(),
        }
    }

    pub fn challenge_id(&self) -> Option<u64> {
        match self {
            Self::ChallengeCreated { challenge_id, .. }
            | Self::ChallengeJoined { challenge_id, .. } => Some(*challenge_id),
            _ => None,
        }
    }
}

/// A single committed event.
///
/// `seq` starts at 1 and increases by one per event in commit order. The
/// integrity hash covers seq, timestamp, kind, and payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub id: EventId,
    pub seq: u64,
    pub timestamp: LedgerTime,
    pub kind: EventKind,
    pub payload: EventPayload,
    pub integrity_hash: [u8; 32],
}

impl LedgerEvent {
    /// Build an event, computing its integrity hash and id.
    pub fn new(seq: u64, timestamp: LedgerTime, payload: EventPayload) -> Result<Self> {
        let kind = payload.kind();
        let integrity_hash = Self::compute_integrity(seq, timestamp, &kind, &payload)?;
        Ok(Self {
            id: EventId::from_hash(integrity_hash),
            seq,
            timestamp,
            kind,
            payload,
            integrity_hash,
        })
    }

    /// Verify the integrity hash still matches the event's content.
    pub fn verify_integrity(&self) -> bool {
        self.kind == self.payload.kind()
            && Self::compute_integrity(self.seq, self.timestamp, &self.kind, &self.payload)
                .is_ok_and(|h| h == self.integrity_hash && self.id.hash == h)
    }

    fn compute_integrity(
        seq: u64,
        timestamp: LedgerTime,
        kind: &EventKind,
        payload: &EventPayload,
    ) -> Result<[u8; 32]> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"fcl-fabric-event-v1:");
        hasher.update(&seq.to_le_bytes());
        hasher.update(&timestamp.as_secs().to_le_bytes());

        let kind_bytes =
            bincode::serialize(kind).map_err(|e| FabricError::Serialization(e.to_string()))?;
        hasher.update(&kind_bytes);
        let payload_bytes =
            bincode::serialize(payload).map_err(|e| FabricError::Serialization(e.to_string()))?;
        hasher.update(&payload_bytes);

        Ok(*hasher.finalize().as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(seq: u64) -> LedgerEvent {
        LedgerEvent::new(
            seq,
            LedgerTime::from_secs(1_000),
            EventPayload::ChallengeJoined {
                challenge_id: 0,
                member: Identity::derive("m1"),
            },
        )
        .unwrap()
    }

    #[test]
    fn event_integrity_roundtrip() {
        let event = joined(1);
        assert!(event.verify_integrity());
        assert_eq!(event.kind, EventKind::ChallengeJoined);
    }

    #[test]
    fn event_id_is_deterministic() {
        assert_eq!(joined(1).id, joined(1).id);
        assert_ne!(joined(1).id, joined(2).id);
    }

    #[test]
    fn tampering_breaks_integrity() {
        let mut event = joined(1);
        event.payload = EventPayload::ChallengeJoined {
            challenge_id: 1,
            member: Identity::derive("m1"),
        };
        assert!(!event.verify_integrity());

        let mut relabelled = joined(1);
        relabelled.kind = EventKind::MemberDeactivated;
        assert!(!relabelled.verify_integrity());
    }

    #[test]
    fn subjects_and_challenge_ids() {
        let transfer = EventPayload::OwnershipTransferred {
            previous: Identity::derive("a"),
            new_owner: Identity::derive("b"),
        };
        assert_eq!(transfer.subjects().len(), 2);
        assert_eq!(transfer.challenge_id(), None);

        let created = EventPayload::ChallengeCreated {
            challenge_id: 4,
            name: "Weekend Warrior".into(),
            prize: Amount::ZERO,
        };
        assert!(created.subjects().is_empty());
        assert_eq!(created.challenge_id(), Some(4));
    }

    #[test]
    fn display_formats() {
        assert_eq!(EventKind::FundsWithdrawn.to_string(), "FundsWithdrawn");
        assert!(joined(1).id.to_string().starts_with("evt:"));
        assert_eq!(joined(1).id.to_hex().len(), 64);
    }

    #[test]
    fn payload_json_is_tagged() {
        let json = serde_json::to_value(EventPayload::MemberDeactivated {
            member: Identity::derive("m1"),
        })
        .unwrap();
        assert_eq!(json["event"], "member_deactivated");
    }
}
