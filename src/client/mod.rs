//! Client facades: the verb x result-shape surface.
//!
//! Both facades expose the same matrix - five verbs (GET/POST/PUT/PATCH/
//! DELETE) crossed with four result shapes (parsed JSON, body text, typed
//! object or list, blind success) - and delegate every call to one shared
//! [`RequestHandler`](crate::handler::RequestHandler). GET has no blind
//! variant: it is safe and always expected to return data.
//!
//! [`RestClient`] blocks the calling thread for each call;
//! [`AsyncRestClient`] suspends the calling task instead. Pick one per
//! client; the two are never mixed on a single instance.

mod blocking;
mod nonblocking;

pub use blocking::{RestClient, RestClientBuilder};
pub use nonblocking::{AsyncRestClient, AsyncRestClientBuilder};
