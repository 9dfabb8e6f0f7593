use thiserror::Error;

/// Response parsing and decoding errors.
///
/// These indicate that a response arrived but could not be shaped into what
/// the caller asked for. They propagate even from blind requests, since a
/// malformed response means the call could not be evaluated at all.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The response body is not valid JSON.
    #[error("failed to parse response body as JSON: {0}")]
    JsonParse(serde_json::Error),

    /// A sub-key named by the caller is absent from the parsed JSON, or an
    /// intermediate value is not an object.
    #[error("sub-key '{key}' not found in response JSON")]
    MissingSubKey { key: String },

    /// List extraction was requested but the located fragment is not a JSON
    /// array.
    #[error("expected a JSON array, found {found}")]
    NotAList { found: &'static str },

    /// The located JSON fragment does not deserialize into the requested
    /// model type.
    #[error("failed to decode response into model: {0}")]
    Decode(serde_json::Error),
}
