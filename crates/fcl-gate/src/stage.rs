use std::time::Duration;

use fcl_types::{Identity, MutationError};

use crate::error::GateError;
use crate::mutation::Mutation;

// ---------------------------------------------------------------------------
// LedgerFacts - read-only view of the state the gate decides against
// ---------------------------------------------------------------------------

/// Membership status of an identity as seen by the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemberStatus {
    /// No member record exists.
    Unregistered,
    /// A record exists and is active.
    Active,
    /// A record exists but the owner deactivated it.
    Inactive,
}

impl MemberStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, Self::Unregistered)
    }
}

/// The ledger facts a gate stage may consult. The engine implements this
/// over the committed store state.
pub trait LedgerFacts {
    fn owner(&self) -> &Identity;
    fn member_status(&self, who: &Identity) -> MemberStatus;
    fn challenge_count(&self) -> u64;
    fn is_participant(&self, challenge_id: u64, who: &Identity) -> bool;
}

// ---------------------------------------------------------------------------
// StageDecision
// ---------------------------------------------------------------------------

/// The outcome of a single gate stage evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageDecision {
    /// The stage passed; proceed to the next stage.
    Pass,
    /// The stage failed; the mutation is rejected.
    Fail(MutationError),
}

impl StageDecision {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail(_))
    }
}

impl From<Result<(), MutationError>> for StageDecision {
    fn from(result: Result<(), MutationError>) -> Self {
        match result {
            Ok(()) => Self::Pass,
            Err(err) => Self::Fail(err),
        }
    }
}

// ---------------------------------------------------------------------------
// StageResult
// ---------------------------------------------------------------------------

/// Recorded result from a completed stage evaluation.
#[derive(Clone, Debug)]
pub struct StageResult {
    pub stage_name: String,
    pub passed: bool,
    /// Populated on failure.
    pub rejection: Option<MutationError>,
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// GateContext
// ---------------------------------------------------------------------------

/// Contextual information available to every gate stage.
pub struct GateContext<'a> {
    /// Authenticated identity of the caller.
    pub caller: &'a Identity,
    /// Committed ledger state at the time of evaluation.
    pub facts: &'a dyn LedgerFacts,
    /// Results from stages that have already run in this evaluation.
    pub previous_stages: Vec<StageResult>,
}

impl<'a> GateContext<'a> {
    pub fn new(caller: &'a Identity, facts: &'a dyn LedgerFacts) -> Self {
        Self {
            caller,
            facts,
            previous_stages: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GateStage trait
// ---------------------------------------------------------------------------

/// A single evaluation stage in the gate pipeline.
///
/// Stages are evaluated in order and must not mutate anything.
pub trait GateStage: Send + Sync {
    /// Human-readable name of this stage (e.g., "role", "validation").
    fn name(&self) -> &str;

    fn evaluate(
        &self,
        mutation: &Mutation,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError>;
}
