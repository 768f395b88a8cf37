use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use fcl_types::{Amount, Identity, LedgerTime};

/// A registered club member, keyed by caller identity in the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub membership_type: String,
    /// Set once at registration.
    pub join_timestamp: LedgerTime,
    pub is_active: bool,
    /// Number of sessions logged; also the ordinal of the next session.
    pub session_count: u64,
    /// Unset until the member first reports a level.
    pub fitness_level: Option<u32>,
}

impl Member {
    pub fn new(membership_type: impl Into<String>, join_timestamp: LedgerTime) -> Self {
        Self {
            membership_type: membership_type.into(),
            join_timestamp,
            is_active: true,
            session_count: 0,
            fitness_level: None,
        }
    }
}

/// One logged workout. Sessions are append-only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub calories_burned: u64,
    pub duration_minutes: u32,
    pub intensity: u32,
    pub timestamp: LedgerTime,
    pub completed: bool,
}

/// A time-boxed challenge with an escrowed prize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    /// Global ordinal, equal to the challenge count at creation.
    pub id: u64,
    pub name: String,
    pub target_calories: u64,
    pub duration_days: u32,
    pub start_timestamp: LedgerTime,
    /// `start_timestamp + duration_days`. Informational only.
    pub end_timestamp: LedgerTime,
    pub prize_amount: Amount,
    /// Never transitions to false; no settlement rule exists.
    pub is_active: bool,
    pub participants: BTreeSet<Identity>,
}

impl Challenge {
    pub fn participant_count(&self) -> u64 {
        self.participants.len() as u64
    }

    pub fn has_participant(&self, who: &Identity) -> bool {
        self.participants.contains(who)
    }
}
