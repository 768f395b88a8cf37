use std::sync::RwLock;

use fcl_types::Identity;

use crate::error::LedgerError;
use crate::state::LedgerState;
use crate::traits::{LedgerReader, LedgerWriter};
use crate::validation::{InvariantValidator, ValidationReport};

/// In-memory ledger store for embedding, demos, and tests.
pub struct InMemoryLedger {
    inner: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new(owner: Identity) -> Self {
        Self::from_state(LedgerState::new(owner))
    }

    pub fn from_state(state: LedgerState) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Run the invariant audit against the committed state.
    pub fn audit(&self) -> Result<ValidationReport, LedgerError> {
        self.read(InvariantValidator::validate)
    }
}

impl LedgerReader for InMemoryLedger {
    fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> Result<T, LedgerError> {
        let state = self.inner.read().map_err(|_| {
            tracing::error!("ledger read lock poisoned");
            LedgerError::LockPoisoned
        })?;
        Ok(f(&state))
    }
}

impl LedgerWriter for InMemoryLedger {
    fn transact<T, E>(&self, f: impl FnOnce(&mut LedgerState) -> Result<T, E>) -> Result<T, E>
    where
        E: From<LedgerError>,
    {
        let mut state = self.inner.write().map_err(|_| {
            tracing::error!("ledger write lock poisoned");
            LedgerError::LockPoisoned
        })?;
        f(&mut state)
    }
}
