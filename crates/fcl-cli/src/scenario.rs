//! The canonical club scenario replayed by `fcl simulate`.

use anyhow::Context;
use serde::Serialize;

use fcl_engine::{ChallengeInfo, LedgerStats, MemberInfo, MutationEngine, MutationReceipt};
use fcl_types::{Amount, Identity};

/// Member labels and membership types, in registration order.
pub const MEMBERS: [(&str, &str); 4] = [
    ("member-1", "Basic"),
    ("member-2", "Premium"),
    ("member-3", "Elite"),
    ("member-4", "Premium"),
];

/// (member index, calories, minutes, intensity)
pub const WORKOUTS: [(usize, u64, u32, u32); 8] = [
    (0, 450, 45, 7),
    (0, 320, 30, 6),
    (1, 580, 60, 8),
    (1, 420, 40, 7),
    (1, 380, 35, 6),
    (2, 650, 70, 9),
    (2, 520, 50, 8),
    (3, 400, 40, 7),
];

/// (name, target calories, days, prize in coins)
pub const CHALLENGES: [(&str, u64, u32, &str); 3] = [
    ("30-Day Burn Challenge", 10_000, 30, "0.5"),
    ("Weekend Warrior", 2_000, 2, "0.2"),
    ("Elite Endurance", 20_000, 60, "1.0"),
];

/// (member index, challenge id)
pub const JOINS: [(usize, u64); 7] = [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 2), (3, 2)];

/// (member index, fitness level)
pub const FITNESS_LEVELS: [(usize, u32); 4] = [(0, 6), (1, 8), (2, 9), (3, 7)];

#[derive(Clone, Debug, Serialize)]
pub struct MemberReport {
    pub label: &'static str,
    pub identity: Identity,
    pub info: MemberInfo,
}

#[derive(Clone, Debug, Serialize)]
pub struct ScenarioReport {
    pub members: Vec<MemberReport>,
    pub challenges: Vec<ChallengeInfo>,
    pub stats: LedgerStats,
    pub receipts: Vec<MutationReceipt>,
}

/// Replay the scenario against `engine`. Challenges are created by the
/// engine's current owner. Any rejection is an error.
pub fn run(engine: &MutationEngine) -> anyhow::Result<ScenarioReport> {
    let owner = engine.owner()?;
    let members: Vec<Identity> = MEMBERS.iter().map(|(label, _)| Identity::derive(label)).collect();
    let mut receipts = Vec::new();

    for ((label, membership_type), who) in MEMBERS.iter().zip(&members) {
        receipts.push(
            engine
                .register_member(who, *membership_type)
                .with_context(|| format!("registering {label}"))?,
        );
    }

    for (index, calories, minutes, intensity) in WORKOUTS {
        receipts.push(
            engine
                .record_workout(&members[index], calories, minutes, intensity)
                .with_context(|| format!("workout for {}", MEMBERS[index].0))?,
        );
    }

    for (name, target, days, prize) in CHALLENGES {
        let prize = Amount::parse_coins(prize)?;
        receipts.push(
            engine
                .create_challenge(&owner, name, target, days, prize)
                .with_context(|| format!("creating {name:?}"))?,
        );
    }

    for (index, challenge_id) in JOINS {
        receipts.push(
            engine
                .join_challenge(&members[index], challenge_id)
                .with_context(|| format!("{} joining challenge {challenge_id}", MEMBERS[index].0))?,
        );
    }

    for (index, level) in FITNESS_LEVELS {
        receipts.push(
            engine
                .update_fitness_level(&members[index], level)
                .with_context(|| format!("fitness level for {}", MEMBERS[index].0))?,
        );
    }

    let member_reports = MEMBERS
        .iter()
        .zip(members)
        .map(|((label, _), identity)| -> anyhow::Result<MemberReport> {
            Ok(MemberReport {
                label: *label,
                info: engine.member_info(&identity)?,
                identity,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let challenges = (0..engine.challenge_count()?)
        .map(|id| engine.challenge_info(id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScenarioReport {
        members: member_reports,
        challenges,
        stats: engine.stats()?,
        receipts,
    })
}

#[cfg(test)]
mod tests {
    use fcl_engine::EngineConfig;

    use super::*;

    fn engine() -> MutationEngine {
        MutationEngine::initialize(Identity::derive("owner")).unwrap()
    }

    #[test]
    fn scenario_counts() {
        let engine = engine();
        let report = run(&engine).unwrap();
        assert_eq!(report.receipts.len(), 4 + 8 + 3 + 7 + 4);
        assert_eq!(report.stats.total_members, 4);
        assert_eq!(report.stats.challenge_count, 3);
        assert_eq!(report.stats.escrow_balance, Amount::parse_coins("1.7").unwrap());
    }

    #[test]
    fn member_statistics() {
        let report = run(&engine()).unwrap();
        let sessions: Vec<u64> = report.members.iter().map(|m| m.info.session_count).collect();
        assert_eq!(sessions, vec![2, 3, 2, 1]);
        let levels: Vec<u32> = report.members.iter().map(|m| m.info.fitness_level).collect();
        assert_eq!(levels, vec![6, 8, 9, 7]);
        assert_eq!(report.members[2].info.membership_type, "Elite");
        assert!(report.members.iter().all(|m| m.info.is_active));
    }

    #[test]
    fn challenge_participation() {
        let report = run(&engine()).unwrap();
        let participants: Vec<u64> = report.challenges.iter().map(|c| c.participant_count).collect();
        assert_eq!(participants, vec![3, 2, 2]);
        assert_eq!(report.challenges[1].name, "Weekend Warrior");
        assert_eq!(report.challenges[1].duration_days, 2);
    }

    #[test]
    fn configured_owner_creates_challenges() {
        let config = EngineConfig {
            initial_owner: Some(Identity::derive("club-admin")),
            ..EngineConfig::default()
        };
        let engine = MutationEngine::from_config(&config, &Identity::derive("owner")).unwrap();
        let report = run(&engine).unwrap();
        assert_eq!(report.stats.owner, Identity::derive("club-admin"));
        assert_eq!(report.challenges.len(), 3);
    }

    #[test]
    fn replaying_twice_is_rejected() {
        let engine = engine();
        run(&engine).unwrap();
        let err = run(&engine).unwrap_err();
        assert!(format!("{err:#}").contains("Already registered"));
    }

    #[test]
    fn scenario_passes_audit() {
        let engine = engine();
        run(&engine).unwrap();
        assert!(engine.audit().unwrap().is_valid());
    }
}
