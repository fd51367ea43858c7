//! OVH REST API client implementation.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use reqwest::Method;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::{RetryDecision, RetryPolicy};
use reqwest_tracing::TracingMiddleware;
use tracing::{debug, info, warn};

use crate::auth::{Clock, SystemClock};
use crate::config::Configuration;
use crate::error::OvhError;
use crate::resources::{AuthApi, IpApi, MeApi, VpsApi};
use crate::rest::request::{OutgoingRequest, RequestSpec, build_request};
use crate::rest::response::{ApiResponse, read_response};
use crate::rest::traits::{OvhApi, PendingRequest};

/// The OVH REST API client.
///
/// Every call goes through the same pipeline: the request is assembled from
/// the shared [`Configuration`], signed with a fresh timestamp, sent, and
/// retried on transient transport failures. Each retry rebuilds and re-signs
/// the request.
///
/// # Example
///
/// ```rust,no_run
/// use ovh_api_client::config::Configuration;
/// use ovh_api_client::rest::OvhClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = OvhClient::new(Configuration::from_env()?)?;
///
///     match client.get("/me").send().await? {
///         Some(response) => println!("{}: {:?}", response.status, response.body),
///         None => println!("no response after retries"),
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct OvhClient {
    http_client: ClientWithMiddleware,
    configuration: Arc<Configuration>,
    clock: Arc<dyn Clock>,
    min_retry_interval: Duration,
    max_retry_interval: Duration,
}

impl OvhClient {
    /// Create a new client with default transport settings.
    pub fn new(configuration: Configuration) -> Result<Self, OvhError> {
        Self::builder(configuration).build()
    }

    /// Create a new client builder.
    pub fn builder(configuration: Configuration) -> OvhClientBuilder {
        OvhClientBuilder::new(configuration)
    }

    /// The configuration snapshot shared by all calls.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Start a request with an arbitrary method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> PendingRequest<'_, Self> {
        PendingRequest::new(self, method, path)
    }

    /// Start a GET request.
    pub fn get(&self, path: impl Into<String>) -> PendingRequest<'_, Self> {
        self.request(Method::GET, path)
    }

    /// Start a POST request.
    pub fn post(&self, path: impl Into<String>) -> PendingRequest<'_, Self> {
        self.request(Method::POST, path)
    }

    /// Start a PUT request.
    pub fn put(&self, path: impl Into<String>) -> PendingRequest<'_, Self> {
        self.request(Method::PUT, path)
    }

    /// Start a DELETE request.
    pub fn delete(&self, path: impl Into<String>) -> PendingRequest<'_, Self> {
        self.request(Method::DELETE, path)
    }

    /// Account routes.
    pub fn me(&self) -> MeApi<'_, Self> {
        MeApi::new(self)
    }

    /// Authentication routes.
    pub fn auth(&self) -> AuthApi<'_, Self> {
        AuthApi::new(self)
    }

    /// IP routes.
    pub fn ip(&self) -> IpApi<'_, Self> {
        IpApi::new(self)
    }

    /// VPS routes.
    pub fn vps(&self) -> VpsApi<'_, Self> {
        VpsApi::new(self)
    }

    /// Run a request through the build, sign, send and retry loop.
    ///
    /// Returns `Ok(None)` when every attempt failed transiently. Non-transient
    /// failures are returned immediately without retrying.
    pub async fn dispatch(&self, spec: &RequestSpec) -> Result<Option<ApiResponse>, OvhError> {
        let policy = ExponentialBackoff::builder()
            .retry_bounds(self.min_retry_interval, self.max_retry_interval)
            .build_with_max_retries(spec.options.retries.max(1) - 1);
        let started = SystemTime::now();
        let mut past_retries = 0u32;

        loop {
            let attempt = past_retries + 1;
            let request = build_request(&self.configuration, spec, self.clock.as_ref())?;
            debug!(attempt, method = %request.method, url = %request.url, "Sending request");

            let error = match self.send(request).await {
                Ok(response) => {
                    debug!(attempt, status = %response.status, "Received response");
                    return Ok(Some(response));
                }
                Err(error) if error.is_transient() => error,
                Err(error) => return Err(error),
            };

            match policy.should_retry(started, past_retries) {
                RetryDecision::Retry { execute_after } => {
                    let delay = execute_after
                        .duration_since(SystemTime::now())
                        .unwrap_or_default();
                    warn!(attempt, error = %error, ?delay, "Transient failure, retrying");
                    tokio::time::sleep(delay).await;
                    past_retries += 1;
                }
                RetryDecision::DoNotRetry => {
                    warn!(attempts = attempt, error = %error, "Retries exhausted without a response");
                    return Ok(None);
                }
            }
        }
    }

    /// Send one attempt and decode its response.
    async fn send(&self, request: OutgoingRequest) -> Result<ApiResponse, OvhError> {
        let verbose = self.configuration.verbose();
        if verbose {
            info!(
                method = %request.method,
                url = %request.url,
                headers = ?request.headers,
                body = request.body.as_deref().unwrap_or_default(),
                "Request"
            );
        }

        let mut builder = self
            .http_client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        if verbose {
            info!(status = %response.status(), headers = ?response.headers(), "Response");
        }

        let response = read_response(response).await?;
        if verbose {
            info!(body = ?response.body, "Response body");
        }
        Ok(response)
    }
}

impl OvhApi for OvhClient {
    async fn execute(&self, request: RequestSpec) -> Result<Option<ApiResponse>, OvhError> {
        self.dispatch(&request).await
    }
}

impl std::fmt::Debug for OvhClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhClient")
            .field("endpoint", &self.configuration.endpoint())
            .field("configuration", &self.configuration)
            .finish()
    }
}

/// Builder for [`OvhClient`].
pub struct OvhClientBuilder {
    configuration: Configuration,
    clock: Option<Arc<dyn Clock>>,
    timeout: Duration,
    connect_timeout: Duration,
    min_retry_interval: Duration,
    max_retry_interval: Duration,
}

impl OvhClientBuilder {
    /// Create a new builder with default transport settings.
    pub fn new(configuration: Configuration) -> Self {
        Self {
            configuration,
            clock: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            min_retry_interval: Duration::from_millis(100),
            max_retry_interval: Duration::from_secs(2),
        }
    }

    /// Set a custom clock for signature timestamps.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the total timeout of a single attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connection-establishment timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the bounds of the exponential backoff between attempts.
    pub fn retry_bounds(mut self, min: Duration, max: Duration) -> Self {
        self.min_retry_interval = min;
        self.max_retry_interval = max.max(min);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<OvhClient, OvhError> {
        let reqwest_client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()?;

        let http_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(OvhClient {
            http_client,
            configuration: Arc::new(self.configuration),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock::new())),
            min_retry_interval: self.min_retry_interval,
            max_retry_interval: self.max_retry_interval,
        })
    }
}
