use std::fmt;

use serde::{Deserialize, Serialize};

use fcl_types::{Amount, Identity};

/// The role a caller must hold for a mutation to be considered at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredRole {
    /// The single ledger owner.
    Owner,
    /// A registered member whose record is active.
    ActiveMember,
    /// Anyone.
    Any,
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Owner => "Owner",
            Self::ActiveMember => "ActiveMember",
            Self::Any => "Any",
        };
        f.write_str(s)
    }
}

/// A requested change to the ledger, as submitted by a caller.
///
/// The caller identity travels alongside the mutation, never inside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    RegisterMember {
        membership_type: String,
    },
    RecordWorkout {
        calories: u64,
        duration_minutes: u32,
        intensity: u32,
    },
    CreateChallenge {
        name: String,
        target_calories: u64,
        duration_days: u32,
        /// Prize attached to the challenge and credited to escrow.
        #[serde(default)]
        prize: Amount,
    },
    JoinChallenge {
        challenge_id: u64,
    },
    UpdateFitnessLevel {
        level: u32,
    },
    DeactivateMember {
        target: Identity,
    },
    ChangeOwner {
        new_owner: Identity,
    },
    WithdrawFunds,
}

impl Mutation {
    /// The role the caller needs before any other check runs.
    pub fn required_role(&self) -> RequiredRole {
        match self {
            Self::RegisterMember { .. } => RequiredRole::Any,
            Self::RecordWorkout { .. }
            | Self::JoinChallenge { .. }
            | Self::UpdateFitnessLevel { .. } => RequiredRole::ActiveMember,
            Self::CreateChallenge { .. }
            | Self::DeactivateMember { .. }
            | Self::ChangeOwner { .. }
            | Self::WithdrawFunds => RequiredRole::Owner,
        }
    }

    /// Stable snake_case operation name, used in logs and receipts.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterMember { .. } => "register_member",
            Self::RecordWorkout { .. } => "record_workout",
            Self::CreateChallenge { .. } => "create_challenge",
            Self::JoinChallenge { .. } => "join_challenge",
            Self::UpdateFitnessLevel { .. } => "update_fitness_level",
            Self::DeactivateMember { .. } => "deactivate_member",
            Self::ChangeOwner { .. } => "change_owner",
            Self::WithdrawFunds => "withdraw_funds",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_match_access_model() {
        let register = Mutation::RegisterMember {
            membership_type: "Basic".into(),
        };
        assert_eq!(register.required_role(), RequiredRole::Any);
        assert_eq!(
            Mutation::JoinChallenge { challenge_id: 0 }.required_role(),
            RequiredRole::ActiveMember
        );
        assert_eq!(Mutation::WithdrawFunds.required_role(), RequiredRole::Owner);
        assert_eq!(
            Mutation::ChangeOwner {
                new_owner: Identity::derive("x")
            }
            .required_role(),
            RequiredRole::Owner
        );
    }

    #[test]
    fn json_uses_op_tag() {
        let json = r#"{"op":"record_workout","calories":500,"duration_minutes":45,"intensity":8}"#;
        let parsed: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            Mutation::RecordWorkout {
                calories: 500,
                duration_minutes: 45,
                intensity: 8
            }
        );

        let withdraw: Mutation = serde_json::from_str(r#"{"op":"withdraw_funds"}"#).unwrap();
        assert_eq!(withdraw, Mutation::WithdrawFunds);
    }

    #[test]
    fn challenge_prize_defaults_to_zero() {
        let json = r#"{"op":"create_challenge","name":"Sprint","target_calories":100,"duration_days":1}"#;
        let parsed: Mutation = serde_json::from_str(json).unwrap();
        match parsed {
            Mutation::CreateChallenge { prize, .. } => assert!(prize.is_zero()),
            other => panic!("unexpected mutation {other:?}"),
        }
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(Mutation::WithdrawFunds.to_string(), "withdraw_funds");
        assert_eq!(
            Mutation::UpdateFitnessLevel { level: 3 }.name(),
            "update_fitness_level"
        );
    }
}
