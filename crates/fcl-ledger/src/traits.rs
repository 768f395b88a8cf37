use crate::error::LedgerError;
use crate::state::LedgerState;

/// Read boundary: shared access to the latest committed state.
pub trait LedgerReader: Send + Sync {
    fn read<T>(&self, f: impl FnOnce(&LedgerState) -> T) -> Result<T, LedgerError>;

    /// Owned copy of the committed state.
    fn snapshot(&self) -> Result<LedgerState, LedgerError> {
        self.read(LedgerState::clone)
    }
}

/// Write boundary: exclusive, serialized access for one mutation.
///
/// The closure runs while no other reader or writer can observe the state.
/// It must only write once every precondition has been checked.
pub trait LedgerWriter: Send + Sync {
    fn transact<T, E>(&self, f: impl FnOnce(&mut LedgerState) -> Result<T, E>) -> Result<T, E>
    where
        E: From<LedgerError>;
}
