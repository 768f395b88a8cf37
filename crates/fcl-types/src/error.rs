use thiserror::Error;

/// Errors produced when parsing or constructing foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount overflows the base-unit range")]
    AmountOverflow,

    #[error("identity must not be empty")]
    EmptyIdentity,
}
