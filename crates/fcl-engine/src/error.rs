use fcl_types::{ErrorKind, MutationError};
use thiserror::Error;

/// Errors returned by the mutation engine.
///
/// `Rejected` is the only user-facing variant. Everything else means the
/// engine itself is unhealthy.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{0}")]
    Rejected(#[from] MutationError),

    #[error("invariant violation: {0}")]
    Invariant(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] fcl_ledger::LedgerError),

    #[error("gate error: {0}")]
    Gate(#[from] fcl_gate::GateError),

    #[error("fabric error: {0}")]
    Fabric(#[from] fcl_fabric::FabricError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// The rejection kind, for user errors.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Rejected(err) => Some(err.kind),
            _ => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

impl From<ErrorKind> for EngineError {
    fn from(kind: ErrorKind) -> Self {
        Self::Rejected(MutationError::new(kind))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
