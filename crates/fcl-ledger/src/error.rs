use fcl_types::Identity;

/// Errors produced by ledger store operations.
///
/// The store re-checks its own structural preconditions before writing. The
/// gate is expected to have rejected these cases already, so surfacing one
/// after an accepted decision indicates a programming error upstream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("member record already exists for {0}")]
    DuplicateMember(Identity),

    #[error("no member record for {0}")]
    UnknownMember(Identity),

    #[error("challenge {0} does not exist")]
    UnknownChallenge(u64),

    #[error("{who} already participates in challenge {challenge_id}")]
    DuplicateParticipant { challenge_id: u64, who: Identity },

    #[error("escrow balance overflow")]
    EscrowOverflow,

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("serialization error: {0}")]
    Serialization(String),
}
