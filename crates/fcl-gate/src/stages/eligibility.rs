use fcl_types::{ErrorKind, MutationError};

use crate::error::GateError;
use crate::mutation::Mutation;
use crate::stage::{GateContext, GateStage, StageDecision};

/// State-dependent preconditions that are not about the caller's role.
///
/// - registration requires that no record exists for the caller, active or not
/// - joining requires an existing challenge the caller has not joined yet
pub struct EligibilityStage;

impl GateStage for EligibilityStage {
    fn name(&self) -> &str {
        "eligibility"
    }

    fn evaluate(
        &self,
        mutation: &Mutation,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let facts = context.facts;
        match mutation {
            Mutation::RegisterMember { .. } => {
                if facts.member_status(context.caller).is_registered() {
                    return Ok(StageDecision::Fail(MutationError::new(
                        ErrorKind::AlreadyRegistered,
                    )));
                }
            }
            Mutation::JoinChallenge { challenge_id } => {
                if *challenge_id >= facts.challenge_count() {
                    return Ok(StageDecision::Fail(MutationError::new(
                        ErrorKind::ChallengeNotFound,
                    )));
                }
                if facts.is_participant(*challenge_id, context.caller) {
                    return Ok(StageDecision::Fail(MutationError::new(
                        ErrorKind::AlreadyJoined,
                    )));
                }
            }
            _ => {}
        }
        Ok(StageDecision::Pass)
    }
}
