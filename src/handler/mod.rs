//! Request execution with tracing instrumentation.
//!
//! The [`RequestHandler`] is the collaborator both client facades delegate
//! to: it owns the `reqwest::Client`, knows the base URL and default
//! parameters, injects whatever credentials its authentication strategy
//! configured, and exposes one method per result shape (JSON, text, typed
//! object, typed list, blind success).
//!
//! Handlers are constructed once, by
//! [`ApiAuth::construct_handler`](crate::auth::ApiAuth::construct_handler),
//! and never mutated afterwards; the OAuth2 token cache is the only interior
//! state.

pub(crate) mod token;

use std::time::Duration;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, Span};
use url::Url;

use crate::error::{ApiError, ClientError, ValidationError};
use crate::method::RestMethod;
use crate::response::{materialize, materialize_list, navigate};
use token::TokenSource;

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything an authentication strategy needs to construct a handler:
/// the resolved base URL plus the pass-through configuration collected by a
/// client builder. Built once per client and consumed at construction.
#[derive(Debug)]
pub struct HandlerConfig {
    pub base_url: Url,
    pub default_params: Vec<(String, String)>,
    pub default_headers: HeaderMap,
    pub log_requests: bool,
    pub timeout: Duration,
}

impl HandlerConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            default_params: Vec::new(),
            default_headers: HeaderMap::new(),
            log_requests: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Credential state resolved from an authentication strategy.
#[derive(Debug)]
pub(crate) enum HandlerAuth {
    /// Requests go out exactly as the caller built them.
    None,
    /// `param=key` is appended to every request's query string.
    QueryKey { param: String, key: String },
    /// A bearer token from the client-credentials exchange is attached to
    /// every request.
    OAuth2(TokenSource),
}

/// Executes HTTP requests and shapes their responses.
///
/// One handler serves one client for its whole lifetime; a new base URL or
/// authentication strategy requires a new client. Concurrent calls through a
/// shared handler are safe.
#[derive(Debug)]
pub struct RequestHandler {
    client: reqwest::Client,
    base_url: Url,
    default_params: Vec<(String, String)>,
    log_requests: bool,
    auth: HandlerAuth,
}

impl RequestHandler {
    pub(crate) fn new(config: HandlerConfig, auth: HandlerAuth) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(config.default_headers)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url,
            default_params: config.default_params,
            log_requests: config.log_requests,
            auth,
        })
    }

    /// Returns the base URL requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::Url(format!("{joined}: {e}")).into())
    }

    /// Sends a request without judging the response status.
    ///
    /// Default parameters, caller parameters and credentials are all merged
    /// into the query string; transport failures surface as
    /// [`ClientError::Transport`].
    #[instrument(
        name = "api_request",
        skip(self, params),
        fields(
            http.method = %method,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    async fn send(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint_url(endpoint)?;
        Span::current().record("http.url", url.as_str());

        let mut request = self.client.request(method.to_reqwest(), url.clone());
        if !self.default_params.is_empty() {
            request = request.query(&self.default_params);
        }
        if let Some(params) = params {
            if !params.is_empty() {
                request = request.query(params);
            }
        }
        request = self.apply_auth(request).await?;

        if self.log_requests {
            debug!(%method, url = %url, "dispatching request");
        }

        let response = request.send().await.map_err(ClientError::Transport)?;

        let status = response.status();
        Span::current().record("http.status_code", status.as_u16());
        let otel_status = if status.is_server_error() {
            "ERROR"
        } else if status.is_client_error() {
            "UNSET"
        } else {
            "OK"
        };
        Span::current().record("otel.status_code", otel_status);

        if self.log_requests {
            debug!(status = status.as_u16(), "response received");
        }
        Ok(response)
    }

    /// Sends a request and turns an error status into [`ClientError::HttpStatus`].
    ///
    /// The error body is read and preserved for diagnostics.
    async fn send_checked(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self.send(method, endpoint, params).await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_else(|_| status.to_string());
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        Ok(response)
    }

    async fn apply_auth(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        match &self.auth {
            HandlerAuth::None => Ok(request),
            HandlerAuth::QueryKey { param, key } => {
                Ok(request.query(&[(param.as_str(), key.as_str())]))
            }
            HandlerAuth::OAuth2(source) => {
                let bearer = source.bearer_token(&self.client).await?;
                Ok(request.bearer_auth(bearer))
            }
        }
    }

    /// Issues a request and parses the body as JSON.
    pub async fn json(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        let response = self.send_checked(method, endpoint, params).await?;
        let body = response.text().await.map_err(ClientError::Transport)?;
        serde_json::from_str(&body).map_err(|e| ValidationError::JsonParse(e).into())
    }

    /// Issues a request and returns the body text.
    pub async fn text(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        let response = self.send_checked(method, endpoint, params).await?;
        response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e).into())
    }

    /// Issues a request, descends `sub_keys` into the parsed JSON and decodes
    /// the remaining fragment into `T`.
    pub async fn object<T: DeserializeOwned>(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        let value = self.json(method, endpoint, params).await?;
        let fragment = navigate(value, sub_keys)?;
        Ok(materialize(fragment)?)
    }

    /// Like [`object`](Self::object), but the located fragment must be a JSON
    /// array and each element is decoded into `T` independently.
    pub async fn object_list<T: DeserializeOwned>(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        let value = self.json(method, endpoint, params).await?;
        let fragment = navigate(value, sub_keys)?;
        Ok(materialize_list(fragment)?)
    }

    /// Issues a request and reports only whether it succeeded.
    ///
    /// Success is a non-error status (2xx/3xx). An HTTP error status returns
    /// `Ok(false)` rather than an error; transport failures still propagate,
    /// since they mean the call could not be evaluated at all.
    pub async fn blind(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        let response = self.send(method, endpoint, params).await?;
        let status = response.status();
        Ok(!status.is_client_error() && !status.is_server_error())
    }
}
