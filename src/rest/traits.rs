//! The request seam shared by the client and the resource handles.
//!
//! [`OvhApi`] abstracts "run this request", which enables:
//! - Resource handles that work with any implementation
//! - Fake implementations for testing
//! - Decorators around the real client
//!
//! [`PendingRequest`] is the fluent builder returned by the verb methods.

use std::future::Future;

use reqwest::Method;
use serde::Serialize;

use crate::error::OvhError;
use crate::rest::request::{RequestOptions, RequestSpec};
use crate::rest::response::ApiResponse;

/// Trait defining how a request is executed.
///
/// `Ok(None)` means every attempt failed transiently and no response was
/// obtained; it is distinct from a response with an empty body.
pub trait OvhApi: Send + Sync {
    /// Execute a request.
    fn execute(
        &self,
        request: RequestSpec,
    ) -> impl Future<Output = Result<Option<ApiResponse>, OvhError>> + Send;
}

/// A request being assembled, sent with [`PendingRequest::send`].
///
/// Serialization errors raised while assembling are reported by `send`.
#[must_use = "requests do nothing until sent"]
pub struct PendingRequest<'a, C> {
    client: &'a C,
    spec: RequestSpec,
    error: Option<OvhError>,
}

impl<'a, C: OvhApi> PendingRequest<'a, C> {
    /// Start a request against `client`.
    pub fn new(client: &'a C, method: Method, path: impl Into<String>) -> Self {
        Self {
            client,
            spec: RequestSpec::new(method, path),
            error: None,
        }
    }

    /// Add one query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.spec.params.push((key.into(), value.to_string()));
        self
    }

    /// Add several query parameters, in iteration order.
    pub fn queries<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.spec
            .params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    /// Set the JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.spec.data = Some(value),
            Err(e) => {
                self.error.get_or_insert(OvhError::Json(e));
            }
        }
        self
    }

    /// Add a header. Authentication headers take precedence when signing.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.spec.headers.push((name.into(), value.into()));
        self
    }

    /// Replace all per-call options.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.spec.options = options;
        self
    }

    /// Enable or disable signing.
    pub fn sign_request(mut self, sign: bool) -> Self {
        self.spec.options.sign_request = sign;
        self
    }

    /// Override the configured `User-Agent`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.spec.options.user_agent = Some(user_agent.into());
        self
    }

    /// Set the total number of attempts.
    pub fn retries(mut self, retries: u32) -> Self {
        self.spec.options.retries = retries;
        self
    }

    /// The request as assembled so far.
    pub fn spec(&self) -> &RequestSpec {
        &self.spec
    }

    /// Send the request.
    pub async fn send(self) -> Result<Option<ApiResponse>, OvhError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.client.execute(self.spec).await
    }
}
