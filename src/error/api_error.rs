use thiserror::Error;

use super::{AuthError, ClientError, ValidationError};

/// Top-level error type for all client operations.
///
/// Every fallible operation in the crate returns `Result<_, ApiError>`. The
/// inner variants preserve the layer the failure originated in, so callers can
/// match on transport failures, HTTP status rejections, response-shape
/// problems and authentication failures independently.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication strategy or credential-exchange failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Transport or HTTP status failure.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Response parsing or decoding failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
