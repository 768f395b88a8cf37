use serde::{Deserialize, Serialize};

use fcl_types::{Amount, Identity, LedgerTime};

use crate::state::LedgerState;

/// Read model of a member. Absent members project as all-zero values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberInfo {
    pub membership_type: String,
    pub join_timestamp: LedgerTime,
    pub is_active: bool,
    pub session_count: u64,
    /// Zero when the member never reported a level.
    pub fitness_level: u32,
}

/// Read model of one workout session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSessionInfo {
    pub calories_burned: u64,
    pub duration_minutes: u32,
    pub intensity: u32,
    pub timestamp: LedgerTime,
    pub completed: bool,
}

/// Read model of a challenge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    pub id: u64,
    pub name: String,
    pub target_calories: u64,
    pub duration_days: u32,
    pub start_timestamp: LedgerTime,
    pub end_timestamp: LedgerTime,
    pub prize_amount: Amount,
    pub is_active: bool,
    pub participant_count: u64,
}

/// Ledger-wide counters taken from a single snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    pub owner: Identity,
    pub total_members: u64,
    pub challenge_count: u64,
    pub escrow_balance: Amount,
    pub total_deposited: Amount,
    pub total_withdrawn: Amount,
}

/// Calendar indices derived from ledger time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    pub now: LedgerTime,
    pub week: u64,
    pub month: u64,
}

impl CalendarInfo {
    pub fn at(now: LedgerTime) -> Self {
        Self {
            now,
            week: now.week_index(),
            month: now.month_index(),
        }
    }
}

/// Deterministic projection builders over a state snapshot.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn member(state: &LedgerState, who: &Identity) -> MemberInfo {
        state
            .member(who)
            .map(|m| MemberInfo {
                membership_type: m.membership_type.clone(),
                join_timestamp: m.join_timestamp,
                is_active: m.is_active,
                session_count: m.session_count,
                fitness_level: m.fitness_level.unwrap_or(0),
            })
            .unwrap_or_default()
    }

    pub fn session(state: &LedgerState, who: &Identity, ordinal: u64) -> WorkoutSessionInfo {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| state.sessions(who).get(i))
            .map(|s| WorkoutSessionInfo {
                calories_burned: s.calories_burned,
                duration_minutes: s.duration_minutes,
                intensity: s.intensity,
                timestamp: s.timestamp,
                completed: s.completed,
            })
            .unwrap_or_default()
    }

    pub fn challenge(state: &LedgerState, id: u64) -> ChallengeInfo {
        state
            .challenge(id)
            .map(|c| ChallengeInfo {
                id: c.id,
                name: c.name.clone(),
                target_calories: c.target_calories,
                duration_days: c.duration_days,
                start_timestamp: c.start_timestamp,
                end_timestamp: c.end_timestamp,
                prize_amount: c.prize_amount,
                is_active: c.is_active,
                participant_count: c.participant_count(),
            })
            .unwrap_or_default()
    }

    pub fn session_count(state: &LedgerState, who: &Identity) -> u64 {
        state.member(who).map(|m| m.session_count).unwrap_or(0)
    }

    pub fn is_participant(state: &LedgerState, challenge_id: u64, who: &Identity) -> bool {
        state
            .challenge(challenge_id)
            .is_some_and(|c| c.has_participant(who))
    }

    pub fn stats(state: &LedgerState) -> LedgerStats {
        LedgerStats {
            owner: state.owner().clone(),
            total_members: state.total_members(),
            challenge_count: state.challenge_count(),
            escrow_balance: state.escrow_balance(),
            total_deposited: state.total_deposited(),
            total_withdrawn: state.total_withdrawn(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> (LedgerState, Identity) {
        let mut state = LedgerState::new(Identity::derive("owner"));
        let who = Identity::derive("m1");
        state
            .apply_register_member(&who, "Premium", LedgerTime::from_secs(100))
            .unwrap();
        state
            .apply_record_workout(&who, 500, 45, 8, LedgerTime::from_secs(200))
            .unwrap();
        state
            .apply_create_challenge(
                "30-Day",
                10_000,
                30,
                Amount::parse_coins("0.5").unwrap(),
                LedgerTime::from_secs(300),
            )
            .unwrap();
        state.apply_join_challenge(0, &who).unwrap();
        (state, who)
    }

    #[test]
    fn absent_records_project_as_zero_values() {
        let state = LedgerState::new(Identity::derive("owner"));
        let ghost = Identity::derive("ghost");

        assert_eq!(ProjectionBuilder::member(&state, &ghost), MemberInfo::default());
        assert!(!ProjectionBuilder::member(&state, &ghost).is_active);
        assert!(!ProjectionBuilder::session(&state, &ghost, 0).completed);
        assert_eq!(ProjectionBuilder::challenge(&state, 3), ChallengeInfo::default());
        assert_eq!(ProjectionBuilder::session_count(&state, &ghost), 0);
        assert!(!ProjectionBuilder::is_participant(&state, 0, &ghost));
    }

    #[test]
    fn member_and_session_projections() {
        let (state, who) = seeded();
        let info = ProjectionBuilder::member(&state, &who);
        assert_eq!(info.membership_type, "Premium");
        assert!(info.is_active);
        assert_eq!(info.session_count, 1);
        assert_eq!(info.fitness_level, 0);

        let session = ProjectionBuilder::session(&state, &who, 0);
        assert_eq!(session.calories_burned, 500);
        assert_eq!(session.timestamp, LedgerTime::from_secs(200));
        assert!(session.completed);
        assert_eq!(
            ProjectionBuilder::session(&state, &who, 1),
            WorkoutSessionInfo::default()
        );
    }

    #[test]
    fn challenge_and_stats_projections() {
        let (state, who) = seeded();
        let info = ProjectionBuilder::challenge(&state, 0);
        assert_eq!(info.name, "30-Day");
        assert_eq!(info.participant_count, 1);
        assert!(ProjectionBuilder::is_participant(&state, 0, &who));

        let stats = ProjectionBuilder::stats(&state);
        assert_eq!(stats.total_members, 1);
        assert_eq!(stats.challenge_count, 1);
        assert_eq!(stats.escrow_balance, Amount::parse_coins("0.5").unwrap());
        assert!(stats.total_withdrawn.is_zero());
    }

    #[test]
    fn calendar_uses_week_and_month_lengths() {
        let cal = CalendarInfo::at(LedgerTime::from_secs(604_800 * 3 + 5));
        assert_eq!(cal.week, 3);
        assert_eq!(cal.month, 0);
        assert_eq!(CalendarInfo::at(LedgerTime::from_secs(2_592_000)).month, 1);
    }
}
