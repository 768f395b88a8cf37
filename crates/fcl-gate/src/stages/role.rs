use fcl_types::{ErrorKind, MutationError};

use crate::error::GateError;
use crate::mutation::{Mutation, RequiredRole};
use crate::stage::{GateContext, GateStage, StageDecision};

/// Access-control stage: checks the caller against the role the mutation
/// declares.
pub struct RoleStage;

impl GateStage for RoleStage {
    fn name(&self) -> &str {
        "role"
    }

    fn evaluate(
        &self,
        mutation: &Mutation,
        context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        let decision = match mutation.required_role() {
            RequiredRole::Any => StageDecision::Pass,
            RequiredRole::Owner => {
                if context.facts.owner() == context.caller {
                    StageDecision::Pass
                } else {
                    StageDecision::Fail(MutationError::new(ErrorKind::OnlyOwner))
                }
            }
            RequiredRole::ActiveMember => {
                if context.facts.member_status(context.caller).is_active() {
                    StageDecision::Pass
                } else {
                    StageDecision::Fail(MutationError::new(ErrorKind::NotAnActiveMember))
                }
            }
        };
        Ok(decision)
    }
}
