use thiserror::Error;

/// Authentication and credential-exchange errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The credentials or URL supplied to an authentication strategy are
    /// unusable (empty key, unparseable authorization URL, ...). Raised at
    /// handler-construction time, before any request is made.
    #[error("invalid authentication configuration: {message}")]
    Configuration { message: String },

    /// The credential exchange was rejected by the authorization server at
    /// request time.
    #[error("authentication rejected (status {status}): {message}")]
    Rejected { status: u16, message: String },
}
