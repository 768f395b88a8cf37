use crate::error::GateError;
use crate::mutation::Mutation;
use crate::rules;
use crate::stage::{GateContext, GateStage, StageDecision};

/// Field validation stage: applies the stateless [`rules`] to the mutation.
pub struct ValidationStage;

impl GateStage for ValidationStage {
    fn name(&self) -> &str {
        "validation"
    }

    fn evaluate(
        &self,
        mutation: &Mutation,
        _context: &GateContext<'_>,
    ) -> Result<StageDecision, GateError> {
        Ok(rules::validate(mutation).into())
    }
}
