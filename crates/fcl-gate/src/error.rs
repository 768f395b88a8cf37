/// Errors that stop gate evaluation itself.
///
/// A rejected mutation is not a `GateError`; it is a
/// [`Decision::Rejected`](crate::gate::Decision) carried in the
/// [`GateResult`](crate::gate::GateResult).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// A stage could not evaluate the mutation.
    #[error("stage error in '{stage}': {message}")]
    StageError { stage: String, message: String },

    /// The pipeline is misconfigured.
    #[error("configuration error: {0}")]
    Config(String),
}

impl GateError {
    /// Create a stage error with a name and message.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }
}
