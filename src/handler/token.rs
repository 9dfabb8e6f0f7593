//! OAuth2 client-credentials token acquisition.
//!
//! A [`TokenSource`] lazily exchanges a client id and secret for a bearer
//! token at the authorization URL and caches it until its expiry horizon.
//! The cache is interior state behind an async lock; the surrounding handler
//! stays immutable and freely shareable.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, AuthError, ClientError};

/// Tokens are refreshed this many seconds before their stated expiry, so a
/// token is never presented moments before the server stops honoring it.
const REFRESH_MARGIN_SECS: u64 = 30;

/// Token-endpoint response body per RFC 6749 section 5.1.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    /// `None` when the server sent no `expires_in`; such tokens are kept for
    /// the client's lifetime.
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// Client-credentials token source bound to one authorization URL.
#[derive(Debug)]
pub(crate) struct TokenSource {
    authorization_url: Url,
    client_id: String,
    client_secret: String,
    cache: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    pub(crate) fn new(authorization_url: Url, client_id: String, client_secret: String) -> Self {
        Self {
            authorization_url,
            client_id,
            client_secret,
            cache: RwLock::new(None),
        }
    }

    /// Returns a currently-valid bearer token, exchanging credentials or
    /// refreshing an expired one as needed.
    pub(crate) async fn bearer_token(&self, client: &reqwest::Client) -> Result<String, ApiError> {
        {
            let cache = self.cache.read().await;
            if let Some(token) = cache.as_ref() {
                if !token.is_expired() {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = cache.as_ref() {
            if !token.is_expired() {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.exchange(client).await?;
        let access_token = token.access_token.clone();
        *cache = Some(token);
        Ok(access_token)
    }

    async fn exchange(&self, client: &reqwest::Client) -> Result<CachedToken, ApiError> {
        let response = client
            .post(self.authorization_url.clone())
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let token: TokenResponse = response.json().await.map_err(|e| AuthError::Rejected {
            status: status.as_u16(),
            message: format!("malformed token response: {e}"),
        })?;

        debug!(url = %self.authorization_url, "obtained client-credentials token");
        let expires_at = token.expires_in.map(|secs| {
            Instant::now() + Duration::from_secs(secs.saturating_sub(REFRESH_MARGIN_SECS))
        });
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source_for(server: &MockServer) -> TokenSource {
        let url = Url::parse(&format!("{}/oauth/token", server.uri())).unwrap();
        TokenSource::new(url, "id".to_string(), "secret".to_string())
    }

    #[tokio::test]
    async fn test_exchange_sends_client_credentials_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "token_type": "bearer",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = reqwest::Client::new();
        let token = source.bearer_token(&client).await.unwrap();
        assert_eq!(token, "tok-1");

        // Second call is served from the cache; the mock expects one hit.
        let token = source.bearer_token(&client).await.unwrap();
        assert_eq!(token, "tok-1");
    }

    #[tokio::test]
    async fn test_expired_token_is_refetched() {
        let server = MockServer::start().await;
        // expires_in below the refresh margin means the token is already
        // stale when cached.
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-short",
                "expires_in": 1,
            })))
            .expect(2)
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = reqwest::Client::new();
        source.bearer_token(&client).await.unwrap();
        source.bearer_token(&client).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejected_exchange_surfaces_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad client"))
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = reqwest::Client::new();
        let err = source.bearer_token(&client).await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::Auth(AuthError::Rejected { status: 401, ref message }) if message == "bad client"
        ));
    }

    #[tokio::test]
    async fn test_malformed_token_response_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let source = source_for(&server);
        let client = reqwest::Client::new();
        let err = source.bearer_token(&client).await.unwrap_err();
        assert!(matches!(err, ApiError::Auth(AuthError::Rejected { .. })));
    }
}
