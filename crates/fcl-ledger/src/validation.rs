use serde::Serialize;

use fcl_types::Amount;

use crate::state::LedgerState;

/// Result of an invariant audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub member_count: u64,
    pub session_count: u64,
    pub challenge_count: u64,
    pub counters_consistent: bool,
    pub sessions_contiguous: bool,
    pub challenges_contiguous: bool,
    pub escrow_balanced: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns `true` if all checks passed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific invariant breach detected during the audit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ViolationKind {
    MemberCountMismatch,
    SessionOrdinalGap,
    OrphanSessions,
    ChallengeOrdinalGap,
    ChallengeWindowMismatch,
    UnknownParticipant,
    EscrowMismatch,
    NullOwner,
}

/// Recomputes every ledger-wide invariant from raw state.
pub struct InvariantValidator;

impl InvariantValidator {
    pub fn validate(state: &LedgerState) -> ValidationReport {
        let mut violations = Vec::new();
        let mut counters_consistent = true;
        let mut sessions_contiguous = true;
        let mut challenges_contiguous = true;
        let mut escrow_balanced = true;

        if state.owner.is_null() {
            violations.push(Violation {
                kind: ViolationKind::NullOwner,
                description: "owner is the null identity".into(),
            });
        }

        let member_records = state.members.len() as u64;
        if state.total_members != member_records {
            counters_consistent = false;
            violations.push(Violation {
                kind: ViolationKind::MemberCountMismatch,
                description: format!(
                    "total_members is {}, but {member_records} records exist",
                    state.total_members
                ),
            });
        }

        // Session ordinals must be exactly 0..session_count.
        let mut session_total = 0u64;
        for (who, member) in &state.members {
            let logged = state.sessions(who).len() as u64;
            session_total += logged;
            if logged != member.session_count {
                sessions_contiguous = false;
                violations.push(Violation {
                    kind: ViolationKind::SessionOrdinalGap,
                    description: format!(
                        "{} has session_count {} but {logged} sessions",
                        who.short_id(),
                        member.session_count
                    ),
                });
            }
        }
        for (who, sessions) in &state.sessions {
            if !state.members.contains_key(who) {
                sessions_contiguous = false;
                violations.push(Violation {
                    kind: ViolationKind::OrphanSessions,
                    description: format!(
                        "{} sessions logged for unregistered {}",
                        sessions.len(),
                        who.short_id()
                    ),
                });
            }
        }

        let mut prize_total = Amount::ZERO;
        for (index, challenge) in state.challenges.iter().enumerate() {
            let expected_id = index as u64;
            if challenge.id != expected_id {
                challenges_contiguous = false;
                violations.push(Violation {
                    kind: ViolationKind::ChallengeOrdinalGap,
                    description: format!(
                        "challenge at position {expected_id} carries id {}",
                        challenge.id
                    ),
                });
            }

            if challenge.end_timestamp != challenge.start_timestamp.plus_days(challenge.duration_days)
            {
                violations.push(Violation {
                    kind: ViolationKind::ChallengeWindowMismatch,
                    description: format!(
                        "challenge {} ends at {} after {} days from {}",
                        challenge.id,
                        challenge.end_timestamp,
                        challenge.duration_days,
                        challenge.start_timestamp
                    ),
                });
            }

            for who in &challenge.participants {
                if !state.members.contains_key(who) {
                    violations.push(Violation {
                        kind: ViolationKind::UnknownParticipant,
                        description: format!(
                            "challenge {} lists unregistered {}",
                            challenge.id,
                            who.short_id()
                        ),
                    });
                }
            }

            prize_total = match prize_total.checked_add(challenge.prize_amount) {
                Some(total) => total,
                None => {
                    escrow_balanced = false;
                    violations.push(Violation {
                        kind: ViolationKind::EscrowMismatch,
                        description: "sum of prizes overflows".into(),
                    });
                    break;
                }
            };
        }

        if escrow_balanced && prize_total != state.total_deposited {
            escrow_balanced = false;
            violations.push(Violation {
                kind: ViolationKind::EscrowMismatch,
                description: format!(
                    "prizes sum to {prize_total}, deposits recorded {}",
                    state.total_deposited
                ),
            });
        }

        let expected_escrow = state.total_deposited.checked_sub(state.total_withdrawn);
        if expected_escrow != Some(state.escrow_balance) {
            escrow_balanced = false;
            violations.push(Violation {
                kind: ViolationKind::EscrowMismatch,
                description: format!(
                    "escrow is {}, deposits {} minus withdrawals {}",
                    state.escrow_balance, state.total_deposited, state.total_withdrawn
                ),
            });
        }

        ValidationReport {
            member_count: member_records,
            session_count: session_total,
            challenge_count: state.challenges.len() as u64,
            counters_consistent,
            sessions_contiguous,
            challenges_contiguous,
            escrow_balanced,
            violations,
        }
    }
}
