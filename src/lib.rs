//! Generic REST API client with pluggable authentication.
//!
//! `easyrest` is the thin layer between application code and an HTTP
//! transport: an authentication strategy ([`ApiAuth`]) constructs a configured
//! request handler, and two client facades map HTTP verbs and result shapes
//! onto that handler uniformly.
//!
//! - [`RestClient`] - blocking facade; each call occupies the calling thread.
//! - [`AsyncRestClient`] - async facade; each call is a single awaited
//!   transport call.
//!
//! Both expose the same verb x shape matrix: raw JSON (`get`, `post`, ...),
//! body text (`get_text`, ...), typed objects (`get_object`,
//! `get_object_list`, ...) and blind success checks (`post_blind`, ...).
//!
//! ## Examples
//!
//! ```rust,ignore
//! use easyrest::{ApiAuth, RestClient};
//!
//! let client = RestClient::new("https://api.example.com", ApiAuth::None)?;
//! let issue = client.get("/repos/tautulli/tautulli/issues/1", None)?;
//! println!("{issue}");
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod handler;
pub mod method;
pub mod params;
pub mod response;
pub mod utils;

pub use auth::ApiAuth;
pub use client::{AsyncRestClient, AsyncRestClientBuilder, RestClient, RestClientBuilder};
pub use error::{ApiError, AuthError, ClientError, ValidationError};
pub use handler::{HandlerConfig, RequestHandler};
pub use method::RestMethod;
pub use params::{optional_params, ParamValue};
