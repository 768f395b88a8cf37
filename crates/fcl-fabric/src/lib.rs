//! Event fabric for the Fitness Club Ledger.
//!
//! Every accepted mutation announces its effects here. Events are stamped
//! with a gap-free sequence number and ledger time, sealed with a BLAKE3
//! integrity hash, appended to an in-memory log, and fanned out to
//! filtered tokio broadcast subscribers.

pub mod error;
pub mod event;
pub mod fabric;

pub use error::FabricError;
pub use event::{EventId, EventKind, EventPayload, LedgerEvent};
pub use fabric::{EventFabric, EventFilter, EventStream, FabricConfig};
