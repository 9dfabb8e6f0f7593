//! Authentication strategies.
//!
//! An [`ApiAuth`] value describes how outgoing requests are authenticated.
//! Its one operation, [`construct_handler`](ApiAuth::construct_handler),
//! turns the strategy plus a [`HandlerConfig`] into a ready-to-use
//! [`RequestHandler`]; the strategy itself is never consulted again after
//! construction.

use url::Url;

use crate::error::{ApiError, AuthError};
use crate::handler::{HandlerAuth, HandlerConfig, RequestHandler};
use crate::handler::token::TokenSource;

/// How outgoing requests are authenticated.
///
/// Strategies are plain immutable values; cloning one and constructing two
/// handlers from it yields fully independent handlers.
///
/// ## Examples
///
/// ```rust,ignore
/// use easyrest::{ApiAuth, RestClient};
///
/// // Key sent as ?key=... on every request
/// let client = RestClient::new("https://api.example.com", ApiAuth::api_key("s3cret"))?;
///
/// // Client-credentials grant against the authorization server
/// let auth = ApiAuth::oauth2("my-id", "my-secret", "https://auth.example.com/token");
/// let client = RestClient::new("https://api.example.com", auth)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuth {
    /// No credential injection; requests pass through as built.
    None,
    /// A static API key appended to every request's query string as
    /// `key_param=key`.
    ApiKey { key: String, key_param: String },
    /// OAuth2 client-credentials grant: a bearer token is obtained from
    /// `authorization_url` and attached to every request, refreshed when it
    /// expires.
    OAuth2 {
        client_id: String,
        client_secret: String,
        authorization_url: String,
    },
}

impl ApiAuth {
    /// API-key strategy using the conventional `key` parameter name.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::api_key_as(key, "key")
    }

    /// API-key strategy with an explicit query-parameter name.
    pub fn api_key_as(key: impl Into<String>, key_param: impl Into<String>) -> Self {
        Self::ApiKey {
            key: key.into(),
            key_param: key_param.into(),
        }
    }

    /// OAuth2 client-credentials strategy.
    pub fn oauth2(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        authorization_url: impl Into<String>,
    ) -> Self {
        Self::OAuth2 {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorization_url: authorization_url.into(),
        }
    }

    /// Constructs the request handler this strategy describes.
    ///
    /// ## Errors
    ///
    /// [`AuthError::Configuration`] when the strategy's credentials are
    /// unusable: an empty API key or parameter name, empty client
    /// credentials, or an authorization URL that does not parse. Credential
    /// problems the authorization server only reveals at exchange time
    /// surface later as [`AuthError::Rejected`].
    pub fn construct_handler(&self, config: HandlerConfig) -> Result<RequestHandler, ApiError> {
        let auth = match self {
            Self::None => HandlerAuth::None,
            Self::ApiKey { key, key_param } => {
                if key.is_empty() {
                    return Err(AuthError::Configuration {
                        message: "API key must not be empty".to_string(),
                    }
                    .into());
                }
                if key_param.is_empty() {
                    return Err(AuthError::Configuration {
                        message: "API key parameter name must not be empty".to_string(),
                    }
                    .into());
                }
                HandlerAuth::QueryKey {
                    param: key_param.clone(),
                    key: key.clone(),
                }
            }
            Self::OAuth2 {
                client_id,
                client_secret,
                authorization_url,
            } => {
                if client_id.is_empty() || client_secret.is_empty() {
                    return Err(AuthError::Configuration {
                        message: "OAuth2 client credentials must not be empty".to_string(),
                    }
                    .into());
                }
                let url = Url::parse(authorization_url).map_err(|e| AuthError::Configuration {
                    message: format!("unparseable authorization URL '{authorization_url}': {e}"),
                })?;
                HandlerAuth::OAuth2(TokenSource::new(
                    url,
                    client_id.clone(),
                    client_secret.clone(),
                ))
            }
        };
        RequestHandler::new(config, auth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HandlerConfig {
        HandlerConfig::new(Url::parse("https://api.example.com").unwrap())
    }

    #[test]
    fn test_none_constructs() {
        assert!(ApiAuth::None.construct_handler(config()).is_ok());
    }

    #[test]
    fn test_api_key_defaults_param_name_to_key() {
        let auth = ApiAuth::api_key("s3cret");
        assert_eq!(
            auth,
            ApiAuth::ApiKey {
                key: "s3cret".to_string(),
                key_param: "key".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_api_key_is_a_configuration_error() {
        let err = ApiAuth::api_key("").construct_handler(config()).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Auth(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_empty_key_param_is_a_configuration_error() {
        let err = ApiAuth::api_key_as("s3cret", "")
            .construct_handler(config())
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Auth(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_oauth2_rejects_bad_authorization_url() {
        let err = ApiAuth::oauth2("id", "secret", "not a url")
            .construct_handler(config())
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Auth(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_oauth2_rejects_empty_credentials() {
        let err = ApiAuth::oauth2("", "secret", "https://auth.example.com/token")
            .construct_handler(config())
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::Auth(AuthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_oauth2_with_valid_configuration_constructs() {
        let auth = ApiAuth::oauth2("id", "secret", "https://auth.example.com/token");
        assert!(auth.construct_handler(config()).is_ok());
    }
}
