//! Mutation engine for the Fitness Club Ledger.
//!
//! The engine is the unified API over the gate, the ledger store, and the
//! event fabric. Every state change goes through [`MutationEngine::submit`]
//! (or one of its typed wrappers) and either commits completely, yielding a
//! [`MutationReceipt`], or is rejected with a [`MutationError`] and leaves
//! nothing behind.

pub mod config;
pub mod engine;
pub mod error;
mod facts;
pub mod receipt;

pub use config::{ClockSource, EngineConfig};
pub use engine::{EngineAudit, MutationEngine};
pub use error::{EngineError, EngineResult};
pub use receipt::{MutationOutcome, MutationReceipt};

// Re-export the vocabulary callers need alongside the engine.
pub use fcl_fabric::{EventFilter, EventKind, EventPayload, EventStream, LedgerEvent};
pub use fcl_gate::{Mutation, RequiredRole};
pub use fcl_ledger::{
    CalendarInfo, ChallengeInfo, LedgerStats, MemberInfo, ValidationReport, WorkoutSessionInfo,
};
pub use fcl_types::{
    Amount, ErrorKind, Identity, LedgerClock, LedgerTime, ManualClock, MutationError, ReceiptId,
    SystemClock,
};
