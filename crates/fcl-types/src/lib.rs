//! Foundation types for the Fitness Club Ledger (FCL).
//!
//! This crate provides the identity, currency, temporal, and rejection types
//! shared by every other FCL crate.
//!
//! # Key Types
//!
//! - [`Identity`]: Opaque caller identity (address-like string)
//! - [`Amount`]: Native currency in indivisible base units
//! - [`LedgerTime`]: Ledger-clock seconds since the UNIX epoch
//! - [`LedgerClock`]: Time source abstraction ([`SystemClock`], [`ManualClock`])
//! - [`ReceiptId`]: UUID v7 identifier of an accepted mutation
//! - [`ErrorKind`] / [`MutationError`]: Why the engine rejected a mutation

pub mod amount;
pub mod clock;
pub mod error;
pub mod identity;
pub mod receipt;
pub mod rejection;
pub mod temporal;

pub use amount::{Amount, UNITS_PER_COIN};
pub use clock::{LedgerClock, ManualClock, SystemClock};
pub use error::TypeError;
pub use identity::Identity;
pub use receipt::ReceiptId;
pub use rejection::{ErrorKind, MutationError};
pub use temporal::{LedgerTime, SECONDS_PER_DAY, SECONDS_PER_MONTH, SECONDS_PER_WEEK};
