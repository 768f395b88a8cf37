use serde::{Deserialize, Serialize};

use fcl_fabric::LedgerEvent;
use fcl_types::{Amount, Identity, LedgerTime, ReceiptId};

/// What an accepted mutation changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
    MemberRegistered {
        member: Identity,
    },
    WorkoutRecorded {
        session_id: u64,
        session_count: u64,
    },
    ChallengeCreated {
        challenge_id: u64,
        escrow_balance: Amount,
    },
    ChallengeJoined {
        challenge_id: u64,
        participant_count: u64,
    },
    FitnessLevelUpdated {
        level: u32,
    },
    /// `changed` is false when the target had no active record.
    MemberDeactivated {
        target: Identity,
        changed: bool,
    },
    OwnershipTransferred {
        previous: Identity,
        new_owner: Identity,
    },
    FundsWithdrawn {
        amount: Amount,
    },
}

impl MutationOutcome {
    /// One-line operator summary.
    pub fn summary(&self) -> String {
        match self {
            Self::MemberRegistered { member } => format!("registered {member}"),
            Self::WorkoutRecorded {
                session_id,
                session_count,
            } => format!("session {session_id} recorded ({session_count} total)"),
            Self::ChallengeCreated {
                challenge_id,
                escrow_balance,
            } => format!("challenge {challenge_id} created, escrow {escrow_balance}"),
            Self::ChallengeJoined {
                challenge_id,
                participant_count,
            } => format!("joined challenge {challenge_id} ({participant_count} participants)"),
            Self::FitnessLevelUpdated { level } => format!("fitness level set to {level}"),
            Self::MemberDeactivated { target, changed } => {
                if *changed {
                    format!("deactivated {target}")
                } else {
                    format!("no active record for {target}")
                }
            }
            Self::OwnershipTransferred {
                previous,
                new_owner,
            } => format!("ownership moved from {previous} to {new_owner}"),
            Self::FundsWithdrawn { amount } => format!("withdrew {amount}"),
        }
    }
}

/// Proof of an accepted mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReceipt {
    pub receipt_id: ReceiptId,
    pub caller: Identity,
    /// snake_case name of the mutation.
    pub op: String,
    pub committed_at: LedgerTime,
    pub outcome: MutationOutcome,
    /// Events emitted by this commit, in order.
    pub events: Vec<LedgerEvent>,
}
