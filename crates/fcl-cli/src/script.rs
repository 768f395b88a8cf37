use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use fcl_engine::{EngineError, Mutation, MutationEngine, MutationReceipt};
use fcl_types::{Identity, MutationError};

/// Resolve an identity argument. `0x`-prefixed values are taken as
/// addresses; anything else is a label and is derived.
pub fn resolve_identity(raw: &str) -> anyhow::Result<Identity> {
    let raw = raw.trim();
    if raw.is_empty() {
        anyhow::bail!("identity must not be empty");
    }
    if raw.starts_with("0x") || raw.starts_with("0X") {
        Ok(raw.parse()?)
    } else {
        Ok(Identity::derive(raw))
    }
}

/// A list of mutations to submit in order.
///
/// ```toml
/// [[steps]]
/// caller = "member-1"
/// mutation = { op = "register_member", membership_type = "Premium" }
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    /// Address or label.
    pub caller: String,
    pub mutation: Mutation,
}

impl Step {
    /// Caller and mutation with every identity argument resolved.
    pub fn resolve(&self) -> anyhow::Result<(Identity, Mutation)> {
        let caller = resolve_identity(&self.caller)?;
        let mutation = match &self.mutation {
            Mutation::DeactivateMember { target } => Mutation::DeactivateMember {
                target: resolve_identity(target.as_str())?,
            },
            Mutation::ChangeOwner { new_owner } => Mutation::ChangeOwner {
                new_owner: resolve_identity(new_owner.as_str())?,
            },
            other => other.clone(),
        };
        Ok((caller, mutation))
    }
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}

/// Result of one submitted step.
#[derive(Clone, Debug, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub caller: Identity,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<MutationReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<MutationError>,
}

impl StepOutcome {
    pub fn is_accepted(&self) -> bool {
        self.receipt.is_some()
    }
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct ScriptRun {
    pub outcomes: Vec<StepOutcome>,
    /// True when a rejection stopped the run early.
    pub halted: bool,
}

impl ScriptRun {
    pub fn accepted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_accepted()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.accepted()
    }
}

/// Submit every step. Rejections are recorded; the run stops at the first
/// one unless `keep_going` is set. Engine faults abort with an error.
pub fn execute(engine: &MutationEngine, script: &Script, keep_going: bool) -> anyhow::Result<ScriptRun> {
    let mut run = ScriptRun::default();
    for (index, step) in script.steps.iter().enumerate() {
        let (caller, mutation) = step
            .resolve()
            .with_context(|| format!("step {index}"))?;
        let op = mutation.name();
        let outcome = match engine.submit(&caller, mutation) {
            Ok(receipt) => StepOutcome {
                step: index,
                caller,
                op,
                receipt: Some(receipt),
                rejection: None,
            },
            Err(EngineError::Rejected(rejection)) => StepOutcome {
                step: index,
                caller,
                op,
                receipt: None,
                rejection: Some(rejection),
            },
            Err(other) => return Err(other).with_context(|| format!("step {index} ({op})")),
        };
        let stop = !outcome.is_accepted() && !keep_going;
        run.outcomes.push(outcome);
        if stop {
            run.halted = index + 1 < script.steps.len();
            break;
        }
    }
    Ok(run)
}

#[cfg(test)]
mod tests {
    use fcl_types::{Amount, ErrorKind};

    use super::*;

    const CLUB: &str = r#"
        [[steps]]
        caller = "member-1"
        mutation = { op = "register_member", membership_type = "Premium" }

        [[steps]]
        caller = "member-1"
        mutation = { op = "record_workout", calories = 500, duration_minutes = 45, intensity = 8 }

        [[steps]]
        caller = "member-1"
        mutation = { op = "create_challenge", name = "30-Day", target_calories = 10000, duration_days = 30, prize = "0.5" }

        [[steps]]
        caller = "owner"
        mutation = { op = "create_challenge", name = "30-Day", target_calories = 10000, duration_days = 30, prize = "0.5" }

        [[steps]]
        caller = "member-1"
        mutation = { op = "join_challenge", challenge_id = 0 }
    "#;

    fn engine() -> MutationEngine {
        MutationEngine::initialize(Identity::derive("owner")).unwrap()
    }

    #[test]
    fn labels_and_addresses_resolve() {
        assert_eq!(resolve_identity("owner").unwrap(), Identity::derive("owner"));
        assert_eq!(resolve_identity(" 0xabc ").unwrap().as_str(), "0xabc");
        assert!(resolve_identity("  ").is_err());
    }

    #[test]
    fn parses_inline_mutations() {
        let script = Script::from_toml(CLUB).unwrap();
        assert_eq!(script.steps.len(), 5);
        assert_eq!(
            script.steps[3].mutation,
            Mutation::CreateChallenge {
                name: "30-Day".into(),
                target_calories: 10_000,
                duration_days: 30,
                prize: Amount::parse_coins("0.5").unwrap(),
            }
        );
    }

    #[test]
    fn empty_script_has_no_steps() {
        assert!(Script::from_toml("").unwrap().steps.is_empty());
    }

    #[test]
    fn unknown_op_fails_to_parse() {
        let raw = r#"
            [[steps]]
            caller = "a"
            mutation = { op = "delete_everything" }
        "#;
        assert!(Script::from_toml(raw).is_err());
    }

    #[test]
    fn identity_arguments_are_resolved() {
        let raw = r#"
            [[steps]]
            caller = "owner"
            mutation = { op = "deactivate_member", target = "member-2" }
        "#;
        let script = Script::from_toml(raw).unwrap();
        let (caller, mutation) = script.steps[0].resolve().unwrap();
        assert_eq!(caller, Identity::derive("owner"));
        assert_eq!(
            mutation,
            Mutation::DeactivateMember {
                target: Identity::derive("member-2")
            }
        );
    }

    #[test]
    fn stops_at_first_rejection() {
        let engine = engine();
        let run = execute(&engine, &Script::from_toml(CLUB).unwrap(), false).unwrap();
        assert_eq!(run.outcomes.len(), 3);
        assert!(run.halted);
        let rejection = run.outcomes[2].rejection.as_ref().unwrap();
        assert_eq!(rejection.kind, ErrorKind::OnlyOwner);
        assert_eq!(engine.challenge_count().unwrap(), 0);
    }

    #[test]
    fn keep_going_runs_every_step() {
        let engine = engine();
        let run = execute(&engine, &Script::from_toml(CLUB).unwrap(), true).unwrap();
        assert_eq!(run.outcomes.len(), 5);
        assert!(!run.halted);
        assert_eq!(run.accepted(), 4);
        assert_eq!(run.rejected(), 1);
        let info = engine.challenge_info(0).unwrap();
        assert_eq!(info.participant_count, 1);
    }

    #[test]
    fn rejection_on_last_step_is_not_a_halt() {
        let raw = r#"
            [[steps]]
            caller = "nobody"
            mutation = { op = "update_fitness_level", level = 5 }
        "#;
        let run = execute(&engine(), &Script::from_toml(raw).unwrap(), false).unwrap();
        assert_eq!(run.rejected(), 1);
        assert!(!run.halted);
    }
}
