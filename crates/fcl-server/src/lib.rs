//! HTTP transport for the Fitness Club Ledger.
//!
//! Carries `Mutation` submissions and projection reads as JSON over axum.
//! The caller identity travels in the `x-caller-identity` header and is
//! resolved by a pluggable [`AuthProvider`].

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use auth::{AuthProvider, Credentials, HeaderAuth, CALLER_HEADER};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::FclServer;
