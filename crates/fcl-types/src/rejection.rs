use std::fmt;

use serde::{Deserialize, Serialize};

/// Why the engine refused a mutation.
///
/// Every kind is terminal for the attempted operation: nothing was applied
/// and the engine does not retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    AlreadyRegistered,
    InvalidMembershipType,
    NotAnActiveMember,
    InvalidCalories,
    InvalidDuration,
    InvalidIntensity,
    InvalidFitnessLevel,
    OnlyOwner,
    InvalidChallengeName,
    InvalidTargetCalories,
    InvalidChallengeDuration,
    ChallengeNotFound,
    AlreadyJoined,
    InvalidAddress,
}

impl ErrorKind {
    /// Operator-facing message for this kind.
    pub fn default_reason(&self) -> &'static str {
        match self {
            Self::AlreadyRegistered => "Already registered",
            Self::InvalidMembershipType => "Invalid membership type",
            Self::NotAnActiveMember => "Only active members",
            Self::InvalidCalories => "Invalid calories",
            Self::InvalidDuration => "Invalid duration",
            Self::InvalidIntensity => "Invalid intensity level",
            Self::InvalidFitnessLevel => "Invalid fitness level",
            Self::OnlyOwner => "Only owner can execute",
            Self::InvalidChallengeName => "Invalid challenge name",
            Self::InvalidTargetCalories => "Invalid target calories",
            Self::InvalidChallengeDuration => "Invalid duration",
            Self::ChallengeNotFound => "Challenge does not exist",
            Self::AlreadyJoined => "Already joined this challenge",
            Self::InvalidAddress => "Invalid address",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A rejected mutation: the kind plus the reason surfaced to the operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{reason}")]
pub struct MutationError {
    pub kind: ErrorKind,
    pub reason: String,
}

impl MutationError {
    /// Rejection with the kind's standard reason.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            reason: kind.default_reason().to_string(),
        }
    }

    pub fn with_reason(kind: ErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<ErrorKind> for MutationError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_reason() {
        let err = MutationError::new(ErrorKind::OnlyOwner);
        assert_eq!(err.to_string(), "Only owner can execute");
        assert_eq!(err.kind.to_string(), "OnlyOwner");
    }

    #[test]
    fn both_duration_kinds_share_a_message() {
        assert_eq!(
            ErrorKind::InvalidDuration.default_reason(),
            ErrorKind::InvalidChallengeDuration.default_reason()
        );
    }

    #[test]
    fn custom_reason_is_kept() {
        let err = MutationError::with_reason(ErrorKind::ChallengeNotFound, "no challenge #7");
        assert_eq!(err.kind, ErrorKind::ChallengeNotFound);
        assert_eq!(err.to_string(), "no challenge #7");
    }

    #[test]
    fn serde_roundtrip() {
        let err = MutationError::new(ErrorKind::AlreadyJoined);
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("AlreadyJoined"));
        let parsed: MutationError = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, err);
    }
}
