//! Bearer-token access gate for axum.
//!
//! Requests are classified against `exclude` / `optional` rules, then a JWT
//! from `Authorization: Bearer` is verified when one is needed. Verified
//! claims reach handlers as [`api::v1::extractors::AuthCtx`].

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;

pub use config::{ConfigError, GateConfig, RejectionMessages};
pub use error::AuthError;
pub use middleware::auth::{Access, AccessGate};
pub use services::auth::{Claims, JwtVerifier, TokenVerifier, VerificationOptions, VerifyError};
