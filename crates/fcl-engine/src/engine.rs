use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use fcl_fabric::{EventFabric, EventFilter, EventPayload, EventStream, FabricConfig, LedgerEvent};
use fcl_gate::{Decision, Mutation, MutationGate};
use fcl_ledger::{
    CalendarInfo, ChallengeInfo, InMemoryLedger, LedgerError, LedgerReader, LedgerState,
    LedgerStats, LedgerWriter, MemberInfo, ProjectionBuilder, ValidationReport,
    WorkoutSessionInfo,
};
use fcl_types::{Amount, ErrorKind, Identity, LedgerClock, LedgerTime, ReceiptId, SystemClock};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::facts::StateFacts;
use crate::receipt::{MutationOutcome, MutationReceipt};

/// Combined audit of ledger state and event log.
#[derive(Clone, Debug, Serialize)]
pub struct EngineAudit {
    pub ledger: ValidationReport,
    pub event_count: u64,
    /// `None` when every event verified.
    pub event_log_error: Option<String>,
    pub state_digest: String,
}

impl EngineAudit {
    pub fn is_valid(&self) -> bool {
        self.ledger.is_valid() && self.event_log_error.is_none()
    }
}

/// The single entry point for every state change.
///
/// Each mutation runs gate, apply, and event emission while holding the
/// ledger's write lock, so mutations never interleave and events appear in
/// commit order. Reads take the shared lock.
pub struct MutationEngine {
    ledger: InMemoryLedger,
    gate: MutationGate,
    fabric: EventFabric,
    clock: Arc<dyn LedgerClock>,
}

impl MutationEngine {
    /// Initialize a ledger owned by `owner`, stamped by the system clock.
    pub fn initialize(owner: Identity) -> EngineResult<Self> {
        Self::with_clock(owner, Arc::new(SystemClock::new()), &EngineConfig::default())
    }

    /// Initialize from configuration. Without a configured owner, the
    /// deployer becomes the owner.
    pub fn from_config(config: &EngineConfig, deployer: &Identity) -> EngineResult<Self> {
        Self::with_clock(config.owner_for(deployer), config.build_clock(), config)
    }

    pub fn with_clock(
        owner: Identity,
        clock: Arc<dyn LedgerClock>,
        config: &EngineConfig,
    ) -> EngineResult<Self> {
        if owner.is_null() {
            return Err(ErrorKind::InvalidAddress.into());
        }
        if config.event_channel_capacity == 0 {
            return Err(EngineError::Config(
                "event_channel_capacity must be at least 1".into(),
            ));
        }

        info!(owner = %owner, "ledger initialized");
        Ok(Self {
            ledger: InMemoryLedger::new(owner),
            gate: MutationGate::with_default_stages(),
            fabric: EventFabric::new(FabricConfig {
                channel_capacity: config.event_channel_capacity,
            }),
            clock,
        })
    }

    // ---- Mutations ----

    /// Gate and apply `mutation` on behalf of `caller`.
    ///
    /// A rejection leaves both the ledger and the event log untouched.
    pub fn submit(&self, caller: &Identity, mutation: Mutation) -> EngineResult<MutationReceipt> {
        let receipt = self.ledger.transact(|state| -> EngineResult<MutationReceipt> {
            let verdict = self
                .gate
                .evaluate(caller, &mutation, &StateFacts(&*state))?;
            if let Decision::Rejected(err) = verdict.decision {
                debug!(
                    op = mutation.name(),
                    caller = %caller.short_id(),
                    kind = %err.kind,
                    "mutation rejected"
                );
                return Err(EngineError::Rejected(err));
            }

            let now = self.clock.now();
            let (outcome, payloads) = apply(state, caller, &mutation, now)?;
            let events = self.fabric.emit_batch(now, payloads)?;

            Ok(MutationReceipt {
                receipt_id: ReceiptId::new(),
                caller: caller.clone(),
                op: mutation.name().to_string(),
                committed_at: now,
                outcome,
                events,
            })
        })?;

        info!(
            op = %receipt.op,
            caller = %caller.short_id(),
            receipt = %receipt.receipt_id,
            "mutation committed"
        );
        Ok(receipt)
    }

    pub fn register_member(
        &self,
        caller: &Identity,
        membership_type: impl Into<String>,
    ) -> EngineResult<MutationReceipt> {
        self.submit(
            caller,
            Mutation::RegisterMember {
                membership_type: membership_type.into(),
            },
        )
    }

    pub fn record_workout(
        &self,
        caller: &Identity,
        calories: u64,
        duration_minutes: u32,
        intensity: u32,
    ) -> EngineResult<MutationReceipt> {
        self.submit(
            caller,
            Mutation::RecordWorkout {
                calories,
                duration_minutes,
                intensity,
            },
        )
    }

    pub fn create_challenge(
        &self,
        caller: &Identity,
        name: impl Into<String>,
        target_calories: u64,
        duration_days: u32,
        prize: Amount,
    ) -> EngineResult<MutationReceipt> {
        self.submit(
            caller,
            Mutation::CreateChallenge {
                name: name.into(),
                target_calories,
                duration_days,
                prize,
            },
        )
    }

    pub fn join_challenge(
        &self,
        caller: &Identity,
        challenge_id: u64,
    ) -> EngineResult<MutationReceipt> {
        self.submit(caller, Mutation::JoinChallenge { challenge_id })
    }

    pub fn update_fitness_level(
        &self,
        caller: &Identity,
        level: u32,
    ) -> EngineResult<MutationReceipt> {
        self.submit(caller, Mutation::UpdateFitnessLevel { level })
    }

    pub fn deactivate_member(
        &self,
        caller: &Identity,
        target: &Identity,
    ) -> EngineResult<MutationReceipt> {
        self.submit(
            caller,
            Mutation::DeactivateMember {
                target: target.clone(),
            },
        )
    }

    pub fn change_owner(
        &self,
        caller: &Identity,
        new_owner: &Identity,
    ) -> EngineResult<MutationReceipt> {
        self.submit(
            caller,
            Mutation::ChangeOwner {
                new_owner: new_owner.clone(),
            },
        )
    }

    pub fn withdraw_funds(&self, caller: &Identity) -> EngineResult<MutationReceipt> {
        self.submit(caller, Mutation::WithdrawFunds)
    }

    // ---- Projections ----

    pub fn member_info(&self, who: &Identity) -> EngineResult<MemberInfo> {
        Ok(self.ledger.read(|s| ProjectionBuilder::member(s, who))?)
    }

    pub fn challenge_info(&self, challenge_id: u64) -> EngineResult<ChallengeInfo> {
        Ok(self
            .ledger
            .read(|s| ProjectionBuilder::challenge(s, challenge_id))?)
    }

    pub fn workout_session(
        &self,
        who: &Identity,
        session_id: u64,
    ) -> EngineResult<WorkoutSessionInfo> {
        Ok(self
            .ledger
            .read(|s| ProjectionBuilder::session(s, who, session_id))?)
    }

    pub fn now(&self) -> LedgerTime {
        self.clock.now()
    }

    pub fn current_week(&self) -> u64 {
        self.now().week_index()
    }

    pub fn current_month(&self) -> u64 {
        self.now().month_index()
    }

    pub fn calendar(&self) -> CalendarInfo {
        CalendarInfo::at(self.now())
    }

    pub fn owner(&self) -> EngineResult<Identity> {
        Ok(self.ledger.read(|s| s.owner().clone())?)
    }

    pub fn total_members(&self) -> EngineResult<u64> {
        Ok(self.ledger.read(LedgerState::total_members)?)
    }

    pub fn challenge_count(&self) -> EngineResult<u64> {
        Ok(self.ledger.read(LedgerState::challenge_count)?)
    }

    pub fn session_count(&self, who: &Identity) -> EngineResult<u64> {
        Ok(self
            .ledger
            .read(|s| ProjectionBuilder::session_count(s, who))?)
    }

    pub fn escrow_balance(&self) -> EngineResult<Amount> {
        Ok(self.ledger.read(LedgerState::escrow_balance)?)
    }

    pub fn total_withdrawn(&self) -> EngineResult<Amount> {
        Ok(self.ledger.read(LedgerState::total_withdrawn)?)
    }

    pub fn is_participant(&self, challenge_id: u64, who: &Identity) -> EngineResult<bool> {
        Ok(self
            .ledger
            .read(|s| ProjectionBuilder::is_participant(s, challenge_id, who))?)
    }

    pub fn stats(&self) -> EngineResult<LedgerStats> {
        Ok(self.ledger.read(ProjectionBuilder::stats)?)
    }

    pub fn events(&self, filter: &EventFilter) -> EngineResult<Vec<LedgerEvent>> {
        Ok(self.fabric.events(filter)?)
    }

    pub fn subscribe(&self, filter: EventFilter) -> EngineResult<EventStream> {
        Ok(self.fabric.subscribe(filter)?)
    }

    /// Owned copy of the committed state.
    pub fn snapshot(&self) -> EngineResult<LedgerState> {
        Ok(self.ledger.snapshot()?)
    }

    /// Audit ledger invariants and the event log against one consistent
    /// snapshot.
    pub fn audit(&self) -> EngineResult<EngineAudit> {
        self.ledger.transact(|state| -> EngineResult<EngineAudit> {
            let ledger = fcl_ledger::InvariantValidator::validate(state);
            let event_log_error = self.fabric.verify().err().map(|e| e.to_string());
            Ok(EngineAudit {
                ledger,
                event_count: self.fabric.len()? as u64,
                event_log_error,
                state_digest: state.digest_hex()?,
            })
        })
    }
}

/// Apply an accepted mutation and describe its effects.
fn apply(
    state: &mut LedgerState,
    caller: &Identity,
    mutation: &Mutation,
    now: LedgerTime,
) -> EngineResult<(MutationOutcome, Vec<EventPayload>)> {
    let applied = match mutation {
        Mutation::RegisterMember { membership_type } => {
            state
                .apply_register_member(caller, membership_type, now)
                .map_err(invariant)?;
            (
                MutationOutcome::MemberRegistered {
                    member: caller.clone(),
                },
                vec![EventPayload::MemberRegistered {
                    member: caller.clone(),
                    membership_type: membership_type.clone(),
                }],
            )
        }
        Mutation::RecordWorkout {
            calories,
            duration_minutes,
            intensity,
        } => {
            let session_id = state
                .apply_record_workout(caller, *calories, *duration_minutes, *intensity, now)
                .map_err(invariant)?;
            let session_count = session_id + 1;
            (
                MutationOutcome::WorkoutRecorded {
                    session_id,
                    session_count,
                },
                vec![
                    EventPayload::WorkoutRecorded {
                        member: caller.clone(),
                        session_id,
                    },
                    EventPayload::ProgressUpdated {
                        member: caller.clone(),
                        session_count,
                    },
                ],
            )
        }
        Mutation::CreateChallenge {
            name,
            target_calories,
            duration_days,
            prize,
        } => {
            let challenge_id = state
                .apply_create_challenge(name, *target_calories, *duration_days, *prize, now)
                .map_err(invariant)?;
            (
                MutationOutcome::ChallengeCreated {
                    challenge_id,
                    escrow_balance: state.escrow_balance(),
                },
                vec![EventPayload::ChallengeCreated {
                    challenge_id,
                    name: name.clone(),
                    prize: *prize,
                }],
            )
        }
        Mutation::JoinChallenge { challenge_id } => {
            let participant_count = state
                .apply_join_challenge(*challenge_id, caller)
                .map_err(invariant)?;
            (
                MutationOutcome::ChallengeJoined {
                    challenge_id: *challenge_id,
                    participant_count,
                },
                vec![EventPayload::ChallengeJoined {
                    challenge_id: *challenge_id,
                    member: caller.clone(),
                }],
            )
        }
        Mutation::UpdateFitnessLevel { level } => {
            state
                .apply_fitness_level(caller, *level)
                .map_err(invariant)?;
            (MutationOutcome::FitnessLevelUpdated { level: *level }, Vec::new())
        }
        Mutation::DeactivateMember { target } => {
            let changed = state.apply_deactivate_member(target);
            let events = if changed {
                vec![EventPayload::MemberDeactivated {
                    member: target.clone(),
                }]
            } else {
                Vec::new()
            };
            (
                MutationOutcome::MemberDeactivated {
                    target: target.clone(),
                    changed,
                },
                events,
            )
        }
        Mutation::ChangeOwner { new_owner } => {
            let previous = state.apply_change_owner(new_owner);
            (
                MutationOutcome::OwnershipTransferred {
                    previous: previous.clone(),
                    new_owner: new_owner.clone(),
                },
                vec![EventPayload::OwnershipTransferred {
                    previous,
                    new_owner: new_owner.clone(),
                }],
            )
        }
        Mutation::WithdrawFunds => {
            let committed = state.active_prize_commitments();
            if !committed.is_zero() {
                warn!(
                    active_prizes = %committed,
                    escrow = %state.escrow_balance(),
                    "withdrawing escrow that still backs active challenge prizes"
                );
            }
            let amount = state.apply_withdraw_all().map_err(invariant)?;
            (
                MutationOutcome::FundsWithdrawn { amount },
                vec![EventPayload::FundsWithdrawn {
                    owner: caller.clone(),
                    amount,
                }],
            )
        }
    };
    Ok(applied)
}

fn invariant(err: LedgerError) -> EngineError {
    EngineError::Invariant(format!("store refused an accepted mutation: {err}"))
}
