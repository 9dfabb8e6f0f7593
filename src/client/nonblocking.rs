//! Async client facade.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::ApiAuth;
use crate::error::{ApiError, ClientError};
use crate::handler::{HandlerConfig, RequestHandler, DEFAULT_TIMEOUT_SECS};
use crate::method::RestMethod;

/// Builder for configuring an [`AsyncRestClient`].
#[derive(Debug)]
pub struct AsyncRestClientBuilder {
    base_url: String,
    auth: ApiAuth,
    default_params: Vec<(String, String)>,
    default_headers: HeaderMap,
    log_requests: bool,
    timeout: Duration,
}

impl AsyncRestClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth: ApiAuth::None,
            default_params: Vec::new(),
            default_headers: HeaderMap::new(),
            log_requests: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the authentication strategy. Defaults to [`ApiAuth::None`].
    pub fn auth(mut self, auth: ApiAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Enables debug logging of request dispatch and response status.
    pub fn log_requests(mut self, log_requests: bool) -> Self {
        self.log_requests = log_requests;
        self
    }

    /// Adds a query parameter sent with every request.
    pub fn default_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_params.push((name.into(), value.into()));
        self
    }

    /// Adds a header sent with every request.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ApiError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ClientError::Header(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ClientError::Header(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the request timeout, forwarded to the underlying transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`AsyncRestClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the base URL does not parse, the authentication
    /// strategy is misconfigured, or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<AsyncRestClient, ApiError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::Url(format!("{}: {e}", self.base_url)))?;
        let config = HandlerConfig {
            base_url,
            default_params: self.default_params,
            default_headers: self.default_headers,
            log_requests: self.log_requests,
            timeout: self.timeout,
        };
        let handler = self.auth.construct_handler(config)?;
        Ok(AsyncRestClient { handler })
    }
}

/// Async REST client.
///
/// Every operation suspends the calling task for exactly one transport call.
/// There is no ordering guarantee between independently issued calls, and
/// cancelling an in-flight call leaves the client fully usable.
///
/// ## Examples
///
/// ```rust,ignore
/// use easyrest::{ApiAuth, AsyncRestClient};
///
/// let client = AsyncRestClient::new("https://api.example.com", ApiAuth::None)?;
/// let item = client.get("/items/1", None).await?;
/// ```
#[derive(Debug)]
pub struct AsyncRestClient {
    handler: RequestHandler,
}

impl AsyncRestClient {
    /// Creates a builder for configuring an async client.
    pub fn builder(base_url: impl Into<String>) -> AsyncRestClientBuilder {
        AsyncRestClientBuilder::new(base_url)
    }

    /// Creates a client with default settings and the given strategy.
    pub fn new(base_url: impl Into<String>, auth: ApiAuth) -> Result<Self, ApiError> {
        Self::builder(base_url).auth(auth).build()
    }

    /// Returns the handler this client dispatches through.
    pub fn handler(&self) -> &RequestHandler {
        &self.handler
    }

    /// Makes a GET request and returns the parsed JSON body.
    pub async fn get(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.handler.json(RestMethod::Get, endpoint, params).await
    }

    /// Makes a GET request and returns the body text.
    pub async fn get_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.handler.text(RestMethod::Get, endpoint, params).await
    }

    /// Makes a GET request and decodes the response into `T`.
    ///
    /// `sub_keys` names, in order, the keys to descend into the parsed JSON
    /// before decoding; pass `&[]` to decode the whole body.
    pub async fn get_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.handler
            .object(RestMethod::Get, endpoint, params, sub_keys)
            .await
    }

    /// Makes a GET request and decodes each element of the located JSON
    /// array into `T`.
    pub async fn get_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.handler
            .object_list(RestMethod::Get, endpoint, params, sub_keys)
            .await
    }

    /// Makes a POST request and returns the parsed JSON body.
    pub async fn post(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.handler.json(RestMethod::Post, endpoint, params).await
    }

    /// Makes a POST request and returns the body text.
    pub async fn post_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.handler.text(RestMethod::Post, endpoint, params).await
    }

    /// Makes a POST request and decodes the response into `T`.
    pub async fn post_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.handler
            .object(RestMethod::Post, endpoint, params, sub_keys)
            .await
    }

    /// Makes a POST request and decodes each element of the located JSON
    /// array into `T`.
    pub async fn post_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.handler
            .object_list(RestMethod::Post, endpoint, params, sub_keys)
            .await
    }

    /// Makes a POST request and returns whether it succeeded.
    ///
    /// An HTTP error status yields `Ok(false)`; transport failures still
    /// propagate.
    pub async fn post_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.handler.blind(RestMethod::Post, endpoint, params).await
    }

    /// Makes a PUT request and returns the parsed JSON body.
    pub async fn put(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.handler.json(RestMethod::Put, endpoint, params).await
    }

    /// Makes a PUT request and returns the body text.
    pub async fn put_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.handler.text(RestMethod::Put, endpoint, params).await
    }

    /// Makes a PUT request and decodes the response into `T`.
    pub async fn put_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.handler
            .object(RestMethod::Put, endpoint, params, sub_keys)
            .await
    }

    /// Makes a PUT request and decodes each element of the located JSON
    /// array into `T`.
    pub async fn put_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.handler
            .object_list(RestMethod::Put, endpoint, params, sub_keys)
            .await
    }

    /// Makes a PUT request and returns whether it succeeded.
    pub async fn put_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.handler.blind(RestMethod::Put, endpoint, params).await
    }

    /// Makes a PATCH request and returns the parsed JSON body.
    pub async fn patch(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.handler.json(RestMethod::Patch, endpoint, params).await
    }

    /// Makes a PATCH request and returns the body text.
    pub async fn patch_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.handler.text(RestMethod::Patch, endpoint, params).await
    }

    /// Makes a PATCH request and decodes the response into `T`.
    pub async fn patch_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.handler
            .object(RestMethod::Patch, endpoint, params, sub_keys)
            .await
    }

    /// Makes a PATCH request and decodes each element of the located JSON
    /// array into `T`.
    pub async fn patch_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.handler
            .object_list(RestMethod::Patch, endpoint, params, sub_keys)
            .await
    }

    /// Makes a PATCH request and returns whether it succeeded.
    pub async fn patch_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.handler.blind(RestMethod::Patch, endpoint, params).await
    }

    /// Makes a DELETE request and returns the parsed JSON body.
    pub async fn delete(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.handler.json(RestMethod::Delete, endpoint, params).await
    }

    /// Makes a DELETE request and returns the body text.
    pub async fn delete_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.handler.text(RestMethod::Delete, endpoint, params).await
    }

    /// Makes a DELETE request and decodes the response into `T`.
    pub async fn delete_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.handler
            .object(RestMethod::Delete, endpoint, params, sub_keys)
            .await
    }

    /// Makes a DELETE request and decodes each element of the located JSON
    /// array into `T`.
    pub async fn delete_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.handler
            .object_list(RestMethod::Delete, endpoint, params, sub_keys)
            .await
    }

    /// Makes a DELETE request and returns whether it succeeded.
    pub async fn delete_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.handler.blind(RestMethod::Delete, endpoint, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestItem {
        id: u64,
    }

    #[tokio::test]
    async fn test_get_returns_exact_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "x"})))
            .mount(&server)
            .await;

        let client = AsyncRestClient::new(server.uri(), ApiAuth::None).unwrap();
        let value = client.get("/items/1", None).await.unwrap();
        assert_eq!(value, json!({"id": 1, "name": "x"}));
    }

    #[tokio::test]
    async fn test_get_object_list_with_sub_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"list": [{"id": 1}, {"id": 2}]}
            })))
            .mount(&server)
            .await;

        let client = AsyncRestClient::new(server.uri(), ApiAuth::None).unwrap();
        let items: Vec<TestItem> = client
            .get_object_list("/items", None, &["data", "list"])
            .await
            .unwrap();
        assert_eq!(items, vec![TestItem { id: 1 }, TestItem { id: 2 }]);
    }

    #[tokio::test]
    async fn test_blind_variants_downgrade_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/items/1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/items/2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AsyncRestClient::new(server.uri(), ApiAuth::None).unwrap();
        assert!(client.delete_blind("/items/1", None).await.unwrap());
        assert!(!client.delete_blind("/items/2", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_api_key_auth_applies_to_every_verb() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/items/1"))
            .and(query_param("key", "s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let client = AsyncRestClient::new(server.uri(), ApiAuth::api_key("s3cret")).unwrap();
        let item: TestItem = client.patch_object("/items/1", None, &[]).await.unwrap();
        assert_eq!(item, TestItem { id: 1 });
    }

    #[tokio::test]
    async fn test_default_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/with-header"))
            .and(header("x-app", "easyrest"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = AsyncRestClient::builder(server.uri())
            .default_header("X-App", "easyrest")
            .unwrap()
            .build()
            .unwrap();
        client.get("/with-header", None).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_base_url_fails_build() {
        let err = AsyncRestClient::new("not a url", ApiAuth::None).unwrap_err();
        assert!(matches!(err, ApiError::Client(ClientError::Url(_))));
    }

    #[tokio::test]
    async fn test_invalid_default_header_is_rejected() {
        let err = AsyncRestClient::builder("https://api.example.com")
            .default_header("bad\nname", "value")
            .unwrap_err();
        assert!(matches!(err, ApiError::Client(ClientError::Header(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_propagates_even_from_blind() {
        // Nothing listens on the discard port; the connection is refused
        // before any HTTP status exists to downgrade.
        let client = AsyncRestClient::new("http://127.0.0.1:9", ApiAuth::None).unwrap();
        let err = client.post_blind("/x", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Client(ClientError::Transport(_))));
    }

    #[tokio::test]
    async fn test_cancelled_call_leaves_client_usable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .mount(&server)
            .await;

        let client = AsyncRestClient::new(server.uri(), ApiAuth::None).unwrap();

        // Cancel an in-flight request by dropping its future at the timeout.
        let cancelled =
            tokio::time::timeout(Duration::from_millis(50), client.get("/slow", None)).await;
        assert!(cancelled.is_err());

        // The client must remain usable afterwards.
        let value = client.get("/fast", None).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_text_and_json_shapes_share_one_surface() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/echo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let client = AsyncRestClient::new(server.uri(), ApiAuth::None).unwrap();
        assert_eq!(client.post_text("/echo", None).await.unwrap(), "pong");
    }
}
