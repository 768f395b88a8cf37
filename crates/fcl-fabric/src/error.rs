/// Errors produced by the event fabric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FabricError {
    /// Serialization failure while hashing an event.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The event log or router lock was poisoned by a panicking writer.
    #[error("fabric lock poisoned")]
    LockPoisoned,

    /// The stored log no longer matches what was emitted.
    #[error("event log integrity violation at seq {seq}: {reason}")]
    IntegrityViolation { seq: u64, reason: String },
}

/// Convenience alias used throughout the fabric crate.
pub type Result<T> = std::result::Result<T, FabricError>;
