use std::time::{Duration, Instant};

use fcl_types::{Identity, MutationError};

use crate::error::GateError;
use crate::mutation::Mutation;
use crate::stage::{GateContext, GateStage, LedgerFacts, StageDecision, StageResult};
use crate::stages::{EligibilityStage, RoleStage, ValidationStage};

// ---------------------------------------------------------------------------
// Decision / GateResult
// ---------------------------------------------------------------------------

/// Final verdict of the gate on one mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(MutationError),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// The outcome of running a mutation through the full gate pipeline.
#[derive(Clone, Debug)]
pub struct GateResult {
    pub decision: Decision,
    /// Per-stage results in evaluation order.
    pub stage_results: Vec<StageResult>,
    /// Total wall-clock time for the pipeline evaluation.
    pub elapsed: Duration,
}

impl GateResult {
    pub fn is_accepted(&self) -> bool {
        self.decision.is_accepted()
    }

    /// Name of the stage that rejected the mutation, if any.
    pub fn rejecting_stage(&self) -> Option<&str> {
        self.stage_results
            .iter()
            .find(|r| !r.passed)
            .map(|r| r.stage_name.as_str())
    }

    /// Collapse into `Ok(())` or the rejection.
    pub fn into_result(self) -> Result<(), MutationError> {
        match self.decision {
            Decision::Accepted => Ok(()),
            Decision::Rejected(err) => Err(err),
        }
    }
}

// ---------------------------------------------------------------------------
// MutationGate
// ---------------------------------------------------------------------------

/// A fail-fast pipeline of stages every mutation must pass before the
/// store applies it.
pub struct MutationGate {
    stages: Vec<Box<dyn GateStage>>,
}

impl MutationGate {
    /// Create a gate with an empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// The standard pipeline: Role -> Eligibility -> Validation.
    pub fn with_default_stages() -> Self {
        let mut gate = Self::new();
        gate.add_stage(Box::new(RoleStage));
        gate.add_stage(Box::new(EligibilityStage));
        gate.add_stage(Box::new(ValidationStage));
        gate
    }

    /// Append a stage to the end of the pipeline.
    pub fn add_stage(&mut self, stage: Box<dyn GateStage>) {
        self.stages.push(stage);
    }

    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Evaluate `mutation` from `caller` against the given ledger facts.
    ///
    /// The first failing stage stops evaluation and produces a `Rejected`
    /// decision. An empty pipeline is a configuration error, never an
    /// implicit accept.
    pub fn evaluate(
        &self,
        caller: &Identity,
        mutation: &Mutation,
        facts: &dyn LedgerFacts,
    ) -> Result<GateResult, GateError> {
        if self.stages.is_empty() {
            return Err(GateError::Config("gate pipeline has no stages".into()));
        }

        let pipeline_start = Instant::now();
        let mut context = GateContext::new(caller, facts);
        let mut stage_results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let stage_start = Instant::now();
            let decision = stage.evaluate(mutation, &context)?;

            let result = StageResult {
                stage_name: stage.name().to_string(),
                passed: decision.is_pass(),
                rejection: match &decision {
                    StageDecision::Pass => None,
                    StageDecision::Fail(err) => Some(err.clone()),
                },
                elapsed: stage_start.elapsed(),
            };
            stage_results.push(result.clone());
            context.previous_stages.push(result);

            if let StageDecision::Fail(err) = decision {
                tracing::debug!(
                    stage = stage.name(),
                    op = mutation.name(),
                    kind = %err.kind,
                    "mutation rejected by gate"
                );
                return Ok(GateResult {
                    decision: Decision::Rejected(err),
                    stage_results,
                    elapsed: pipeline_start.elapsed(),
                });
            }
        }

        Ok(GateResult {
            decision: Decision::Accepted,
            stage_results,
            elapsed: pipeline_start.elapsed(),
        })
    }
}

impl Default for MutationGate {
    fn default() -> Self {
        Self::with_default_stages()
    }
}
