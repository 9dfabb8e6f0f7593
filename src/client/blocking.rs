//! Blocking client facade.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::runtime::Runtime;

use crate::auth::ApiAuth;
use crate::client::nonblocking::AsyncRestClientBuilder;
use crate::error::{ApiError, ClientError};
use crate::method::RestMethod;

/// Builder for configuring a [`RestClient`].
///
/// Accepts the same configuration as
/// [`AsyncRestClientBuilder`](crate::AsyncRestClientBuilder); only the
/// execution mode of the built client differs.
#[derive(Debug)]
pub struct RestClientBuilder {
    inner: AsyncRestClientBuilder,
}

impl RestClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            inner: crate::AsyncRestClient::builder(base_url),
        }
    }

    /// Sets the authentication strategy. Defaults to [`ApiAuth::None`].
    pub fn auth(mut self, auth: ApiAuth) -> Self {
        self.inner = self.inner.auth(auth);
        self
    }

    /// Enables debug logging of request dispatch and response status.
    pub fn log_requests(mut self, log_requests: bool) -> Self {
        self.inner = self.inner.log_requests(log_requests);
        self
    }

    /// Adds a query parameter sent with every request.
    pub fn default_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner = self.inner.default_param(name, value);
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
        self.inner = self.inner.default_header(name, value)?;
        Ok(self)
    }

    /// Sets the request timeout, forwarded to the underlying transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    /// Builds the [`RestClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the base URL does not parse, the authentication
    /// strategy is misconfigured, or the HTTP client or private runtime
    /// cannot be constructed.
    pub fn build(self) -> Result<RestClient, ApiError> {
        let client = self.inner.build()?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientError::Runtime)?;
        Ok(RestClient { runtime, client })
    }
}

/// Blocking REST client.
///
/// Exposes the same verb x shape surface as
/// [`AsyncRestClient`](crate::AsyncRestClient); each call drives the shared
/// handler to completion on a private runtime and occupies the calling
/// thread for its full duration. The verb and shaping logic exists exactly
/// once, in the handler - only the execution mode differs between the two
/// facades.
///
/// Must not be called from within an async runtime; use
/// [`AsyncRestClient`](crate::AsyncRestClient) there instead.
///
/// ## Examples
///
/// ```rust,ignore
/// use easyrest::{ApiAuth, RestClient};
///
/// let client = RestClient::new("https://api.example.com", ApiAuth::None)?;
/// let item = client.get("/items/1", None)?;
/// ```
#[derive(Debug)]
pub struct RestClient {
    runtime: Runtime,
    client: crate::AsyncRestClient,
}

impl RestClient {
    /// Creates a builder for configuring a blocking client.
    pub fn builder(base_url: impl Into<String>) -> RestClientBuilder {
        RestClientBuilder::new(base_url)
    }

    /// Creates a client with default settings and the given strategy.
    pub fn new(base_url: impl Into<String>, auth: ApiAuth) -> Result<Self, ApiError> {
        Self::builder(base_url).auth(auth).build()
    }

    fn json(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.runtime
            .block_on(self.client.handler().json(method, endpoint, params))
    }

    fn text(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.runtime
            .block_on(self.client.handler().text(method, endpoint, params))
    }

    fn object<T: DeserializeOwned>(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.runtime
            .block_on(self.client.handler().object(method, endpoint, params, sub_keys))
    }

    fn object_list<T: DeserializeOwned>(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.runtime
            .block_on(self.client.handler().object_list(method, endpoint, params, sub_keys))
    }

    fn blind(
        &self,
        method: RestMethod,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.runtime
            .block_on(self.client.handler().blind(method, endpoint, params))
    }

    /// Makes a GET request and returns the parsed JSON body.
    pub fn get(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.json(RestMethod::Get, endpoint, params)
    }

    /// Makes a GET request and returns the body text.
    pub fn get_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.text(RestMethod::Get, endpoint, params)
    }

    /// Makes a GET request and decodes the response into `T`.
    ///
    /// `sub_keys` names, in order, the keys to descend into the parsed JSON
    /// before decoding; pass `&[]` to decode the whole body.
    pub fn get_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.object(RestMethod::Get, endpoint, params, sub_keys)
    }

    /// Makes a GET request and decodes each element of the located JSON
    /// array into `T`.
    pub fn get_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.object_list(RestMethod::Get, endpoint, params, sub_keys)
    }

    /// Makes a POST request and returns the parsed JSON body.
    pub fn post(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.json(RestMethod::Post, endpoint, params)
    }

    /// Makes a POST request and returns the body text.
    pub fn post_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.text(RestMethod::Post, endpoint, params)
    }

    /// Makes a POST request and decodes the response into `T`.
    pub fn post_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.object(RestMethod::Post, endpoint, params, sub_keys)
    }

    /// Makes a POST request and decodes each element of the located JSON
    /// array into `T`.
    pub fn post_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.object_list(RestMethod::Post, endpoint, params, sub_keys)
    }

    /// Makes a POST request and returns whether it succeeded.
    ///
    /// An HTTP error status yields `Ok(false)`; transport failures still
    /// propagate.
    pub fn post_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.blind(RestMethod::Post, endpoint, params)
    }

    /// Makes a PUT request and returns the parsed JSON body.
    pub fn put(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.json(RestMethod::Put, endpoint, params)
    }

    /// Makes a PUT request and returns the body text.
    pub fn put_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.text(RestMethod::Put, endpoint, params)
    }

    /// Makes a PUT request and decodes the response into `T`.
    pub fn put_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.object(RestMethod::Put, endpoint, params, sub_keys)
    }

    /// Makes a PUT request and decodes each element of the located JSON
    /// array into `T`.
    pub fn put_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.object_list(RestMethod::Put, endpoint, params, sub_keys)
    }

    /// Makes a PUT request and returns whether it succeeded.
    pub fn put_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.blind(RestMethod::Put, endpoint, params)
    }

    /// Makes a PATCH request and returns the parsed JSON body.
    pub fn patch(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.json(RestMethod::Patch, endpoint, params)
    }

    /// Makes a PATCH request and returns the body text.
    pub fn patch_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.text(RestMethod::Patch, endpoint, params)
    }

    /// Makes a PATCH request and decodes the response into `T`.
    pub fn patch_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.object(RestMethod::Patch, endpoint, params, sub_keys)
    }

    /// Makes a PATCH request and decodes each element of the located JSON
    /// array into `T`.
    pub fn patch_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.object_list(RestMethod::Patch, endpoint, params, sub_keys)
    }

    /// Makes a PATCH request and returns whether it succeeded.
    pub fn patch_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.blind(RestMethod::Patch, endpoint, params)
    }

    /// Makes a DELETE request and returns the parsed JSON body.
    pub fn delete(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<Value, ApiError> {
        self.json(RestMethod::Delete, endpoint, params)
    }

    /// Makes a DELETE request and returns the body text.
    pub fn delete_text(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<String, ApiError> {
        self.text(RestMethod::Delete, endpoint, params)
    }

    /// Makes a DELETE request and decodes the response into `T`.
    pub fn delete_object<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<T, ApiError> {
        self.object(RestMethod::Delete, endpoint, params, sub_keys)
    }

    /// Makes a DELETE request and decodes each element of the located JSON
    /// array into `T`.
    pub fn delete_object_list<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
        sub_keys: &[&str],
    ) -> Result<Vec<T>, ApiError> {
        self.object_list(RestMethod::Delete, endpoint, params, sub_keys)
    }

    /// Makes a DELETE request and returns whether it succeeded.
    pub fn delete_blind(
        &self,
        endpoint: &str,
        params: Option<&[(String, String)]>,
    ) -> Result<bool, ApiError> {
        self.blind(RestMethod::Delete, endpoint, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestItem {
        id: u64,
    }

    // The mock server lives on its own multi-thread runtime so the blocking
    // client can be exercised from a plain sync test.
    #[test]
    fn test_blocking_get_end_to_end() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/items/1"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"id": 1, "name": "x"})),
                )
                .mount(&server)
                .await;
            server
        });

        let client = RestClient::new(server.uri(), ApiAuth::None).unwrap();
        let value = client.get("/items/1", None).unwrap();
        assert_eq!(value, json!({"id": 1, "name": "x"}));
    }

    #[test]
    fn test_blocking_blind_and_object_shapes() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/items"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "data": {"item": {"id": 5}}
                })))
                .mount(&server)
                .await;
            Mock::given(method("DELETE"))
                .and(path("/items/9"))
                .respond_with(ResponseTemplate::new(404))
                .mount(&server)
                .await;
            server
        });

        let client = RestClient::new(server.uri(), ApiAuth::None).unwrap();
        let item: TestItem = client.post_object("/items", None, &["data", "item"]).unwrap();
        assert_eq!(item, TestItem { id: 5 });
        assert!(!client.delete_blind("/items/9", None).unwrap());
    }

    #[test]
    fn test_blocking_api_key_injection() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/items"))
                .and(query_param("key", "s3cret"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(&server)
                .await;
            server
        });

        let client = RestClient::new(server.uri(), ApiAuth::api_key("s3cret")).unwrap();
        client.get("/items", None).unwrap();
    }
}
