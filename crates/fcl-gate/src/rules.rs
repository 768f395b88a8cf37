//! Stateless validation rules.
//!
//! Each rule is a pure predicate over a single input that either passes or
//! yields the [`MutationError`] the operator sees. Rules never look at ledger
//! state; state-dependent checks live in the eligibility stage.

use fcl_types::{ErrorKind, Identity, MutationError};

use crate::mutation::Mutation;

/// Lowest accepted intensity and fitness level.
pub const MIN_LEVEL: u32 = 1;
/// Highest accepted intensity and fitness level.
pub const MAX_LEVEL: u32 = 10;

fn check(ok: bool, kind: ErrorKind) -> Result<(), MutationError> {
    if ok {
        Ok(())
    } else {
        Err(MutationError::new(kind))
    }
}

fn level_in_range(level: u32) -> bool {
    (MIN_LEVEL..=MAX_LEVEL).contains(&level)
}

pub fn membership_type(value: &str) -> Result<(), MutationError> {
    check(!value.is_empty(), ErrorKind::InvalidMembershipType)
}

pub fn calories(value: u64) -> Result<(), MutationError> {
    check(value > 0, ErrorKind::InvalidCalories)
}

pub fn workout_duration(minutes: u32) -> Result<(), MutationError> {
    check(minutes > 0, ErrorKind::InvalidDuration)
}

pub fn intensity(level: u32) -> Result<(), MutationError> {
    check(level_in_range(level), ErrorKind::InvalidIntensity)
}

pub fn fitness_level(level: u32) -> Result<(), MutationError> {
    check(level_in_range(level), ErrorKind::InvalidFitnessLevel)
}

pub fn challenge_name(name: &str) -> Result<(), MutationError> {
    check(!name.is_empty(), ErrorKind::InvalidChallengeName)
}

pub fn target_calories(value: u64) -> Result<(), MutationError> {
    check(value > 0, ErrorKind::InvalidTargetCalories)
}

pub fn challenge_duration(days: u32) -> Result<(), MutationError> {
    check(days > 0, ErrorKind::InvalidChallengeDuration)
}

pub fn new_owner(candidate: &Identity) -> Result<(), MutationError> {
    check(!candidate.is_null(), ErrorKind::InvalidAddress)
}

/// Run every field rule that applies to `mutation`, in declaration order.
pub fn validate(mutation: &Mutation) -> Result<(), MutationError> {
    match mutation {
        Mutation::RegisterMember { membership_type: t } => membership_type(t),
        Mutation::RecordWorkout {
            calories: kcal,
            duration_minutes,
            intensity: level,
        } => {
            calories(*kcal)?;
            workout_duration(*duration_minutes)?;
            intensity(*level)
        }
        Mutation::CreateChallenge {
            name,
            target_calories: target,
            duration_days,
            ..
        } => {
            challenge_name(name)?;
            target_calories(*target)?;
            challenge_duration(*duration_days)
        }
        Mutation::UpdateFitnessLevel { level } => fitness_level(*level),
        Mutation::ChangeOwner { new_owner: candidate } => new_owner(candidate),
        Mutation::JoinChallenge { .. }
        | Mutation::DeactivateMember { .. }
        | Mutation::WithdrawFunds => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcl_types::Amount;
    use proptest::prelude::*;

    fn kind_of(result: Result<(), MutationError>) -> Option<ErrorKind> {
        result.err().map(|e| e.kind)
    }

    #[test]
    fn membership_type_must_be_non_empty() {
        assert!(membership_type("Basic").is_ok());
        assert!(membership_type("Gold Plus").is_ok());
        assert_eq!(
            kind_of(membership_type("")),
            Some(ErrorKind::InvalidMembershipType)
        );
    }

    #[test]
    fn intensity_boundaries() {
        assert!(intensity(1).is_ok());
        assert!(intensity(10).is_ok());
        assert_eq!(kind_of(intensity(0)), Some(ErrorKind::InvalidIntensity));
        assert_eq!(kind_of(intensity(11)), Some(ErrorKind::InvalidIntensity));
    }

    #[test]
    fn positive_quantities() {
        assert!(calories(1).is_ok());
        assert_eq!(kind_of(calories(0)), Some(ErrorKind::InvalidCalories));
        assert!(workout_duration(1).is_ok());
        assert_eq!(kind_of(workout_duration(0)), Some(ErrorKind::InvalidDuration));
        assert_eq!(
            kind_of(target_calories(0)),
            Some(ErrorKind::InvalidTargetCalories)
        );
        assert_eq!(
            kind_of(challenge_duration(0)),
            Some(ErrorKind::InvalidChallengeDuration)
        );
    }

    #[test]
    fn null_owner_is_rejected() {
        assert_eq!(
            kind_of(new_owner(&Identity::null())),
            Some(ErrorKind::InvalidAddress)
        );
        assert!(new_owner(&Identity::derive("next-owner")).is_ok());
    }

    #[test]
    fn workout_rules_run_in_order() {
        let all_bad = Mutation::RecordWorkout {
            calories: 0,
            duration_minutes: 0,
            intensity: 0,
        };
        assert_eq!(kind_of(validate(&all_bad)), Some(ErrorKind::InvalidCalories));

        let bad_duration = Mutation::RecordWorkout {
            calories: 500,
            duration_minutes: 0,
            intensity: 0,
        };
        assert_eq!(
            kind_of(validate(&bad_duration)),
            Some(ErrorKind::InvalidDuration)
        );
    }

    #[test]
    fn challenge_rules_run_in_order() {
        let mutation = Mutation::CreateChallenge {
            name: String::new(),
            target_calories: 0,
            duration_days: 0,
            prize: Amount::ZERO,
        };
        assert_eq!(
            kind_of(validate(&mutation)),
            Some(ErrorKind::InvalidChallengeName)
        );
    }

    #[test]
    fn mutations_without_fields_always_validate() {
        assert!(validate(&Mutation::WithdrawFunds).is_ok());
        assert!(validate(&Mutation::JoinChallenge { challenge_id: 99 }).is_ok());
        assert!(validate(&Mutation::DeactivateMember {
            target: Identity::null()
        })
        .is_ok());
    }

    proptest! {
        #[test]
        fn levels_accepted_exactly_in_range(level in 0u32..64) {
            let in_range = (1..=10).contains(&level);
            prop_assert_eq!(intensity(level).is_ok(), in_range);
            prop_assert_eq!(fitness_level(level).is_ok(), in_range);
        }

        #[test]
        fn any_positive_workout_input_passes(kcal in 1u64..100_000, minutes in 1u32..1_000, level in 1u32..=10) {
            let mutation = Mutation::RecordWorkout { calories: kcal, duration_minutes: minutes, intensity: level };
            prop_assert!(validate(&mutation).is_ok());
        }
    }
}
