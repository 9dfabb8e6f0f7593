//! Layered error types for the client.
//!
//! The error hierarchy is structured for actionable diagnostics:
//! - [`ApiError`] - Top-level error type for all client operations
//! - [`ClientError`] - Transport and HTTP status errors
//! - [`ValidationError`] - Response parsing and decoding errors
//! - [`AuthError`] - Authentication strategy and credential-exchange errors

mod api_error;
mod auth_error;
mod client_error;
mod validation_error;

pub use api_error::ApiError;
pub use auth_error::AuthError;
pub use client_error::ClientError;
pub use validation_error::ValidationError;
