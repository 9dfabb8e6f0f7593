use thiserror::Error;

/// Transport and HTTP status errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network-level failure: timeout, connection refused, TLS or DNS error.
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status. The body is preserved for
    /// diagnostics.
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A URL could not be parsed or joined onto the base URL.
    #[error("invalid URL: {0}")]
    Url(String),

    /// A default header name or value is not a legal HTTP header.
    #[error("invalid header: {0}")]
    Header(String),

    /// The private runtime backing the blocking facade could not be started.
    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
