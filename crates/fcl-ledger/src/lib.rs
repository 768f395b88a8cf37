//! Ledger store for the Fitness Club Ledger.
//!
//! This crate holds the authoritative state. It provides:
//! - Member, workout session, and challenge records
//! - `LedgerState` with precondition-checked apply methods
//! - `LedgerReader` / `LedgerWriter` trait boundaries
//! - `InMemoryLedger`, a lock-serialized store
//! - Projection builders returning zero-valued reads for absent records
//! - Invariant audit over raw state

pub mod error;
pub mod memory;
pub mod projection;
pub mod records;
pub mod state;
pub mod traits;
pub mod validation;

pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use projection::{
    CalendarInfo, ChallengeInfo, LedgerStats, MemberInfo, ProjectionBuilder, WorkoutSessionInfo,
};
pub use records::{Challenge, Member, WorkoutSession};
pub use state::LedgerState;
pub use traits::{LedgerReader, LedgerWriter};
pub use validation::{InvariantValidator, ValidationReport, Violation, ViolationKind};
