//! Mutation gate for the Fitness Club Ledger.
//!
//! Every mutation passes through the gate before the ledger store applies
//! it. The gate runs a fail-fast pipeline of stages (role, eligibility,
//! validation) against a read-only view of committed state and produces an
//! accept/reject decision with the per-stage trail.
//!
//! # Quick Start
//!
//! ```rust
//! use fcl_gate::{LedgerFacts, MemberStatus, Mutation, MutationGate};
//! use fcl_types::{ErrorKind, Identity};
//!
//! struct EmptyLedger {
//!     owner: Identity,
//! }
//!
//! impl LedgerFacts for EmptyLedger {
//!     fn owner(&self) -> &Identity { &self.owner }
//!     fn member_status(&self, _who: &Identity) -> MemberStatus { MemberStatus::Unregistered }
//!     fn challenge_count(&self) -> u64 { 0 }
//!     fn is_participant(&self, _id: u64, _who: &Identity) -> bool { false }
//! }
//!
//! let ledger = EmptyLedger { owner: Identity::derive("owner") };
//! let gate = MutationGate::with_default_stages();
//! let newcomer = Identity::derive("newcomer");
//!
//! let register = Mutation::RegisterMember { membership_type: "Premium".into() };
//! assert!(gate.evaluate(&newcomer, &register, &ledger).unwrap().is_accepted());
//!
//! let workout = Mutation::RecordWorkout { calories: 500, duration_minutes: 45, intensity: 8 };
//! let err = gate.evaluate(&newcomer, &workout, &ledger).unwrap().into_result().unwrap_err();
//! assert_eq!(err.kind, ErrorKind::NotAnActiveMember);
//! ```

pub mod error;
pub mod gate;
pub mod mutation;
pub mod rules;
pub mod stage;
pub mod stages;

pub use error::GateError;
pub use gate::{Decision, GateResult, MutationGate};
pub use mutation::{Mutation, RequiredRole};
pub use stage::{GateContext, GateStage, LedgerFacts, MemberStatus, StageDecision, StageResult};
pub use stages::{EligibilityStage, RoleStage, ValidationStage};
