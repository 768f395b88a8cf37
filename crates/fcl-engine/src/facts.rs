use fcl_gate::{LedgerFacts, MemberStatus};
use fcl_ledger::{LedgerState, ProjectionBuilder};
use fcl_types::Identity;

/// Gate view over the committed ledger state.
pub(crate) struct StateFacts<'a>(pub(crate) &'a LedgerState);

impl LedgerFacts for StateFacts<'_> {
    fn owner(&self) -> &Identity {
        self.0.owner()
    }

    fn member_status(&self, who: &Identity) -> MemberStatus {
        match self.0.member(who) {
            None => MemberStatus::Unregistered,
            Some(m) if m.is_active => MemberStatus::Active,
            Some(_) => MemberStatus::Inactive,
        }
    }

    fn challenge_count(&self) -> u64 {
        self.0.challenge_count()
    }

    fn is_participant(&self, challenge_id: u64, who: &Identity) -> bool {
        ProjectionBuilder::is_participant(self.0, challenge_id, who)
    }
}
