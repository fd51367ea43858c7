//! Request description and assembly.
//!
//! A [`RequestSpec`] is what the caller asks for; [`build_request`] turns it
//! into an [`OutgoingRequest`] ready for the wire. Building is repeated for
//! every attempt so each one carries a freshly stamped signature.

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use url::Url;

use crate::auth::{APPLICATION_HEADER, AuthHeaders, Clock, header_name, sign_request, with_query};
use crate::config::Configuration;
use crate::error::OvhError;

/// Default number of attempts per call (initial attempt plus two retries).
pub const DEFAULT_RETRIES: u32 = 3;

/// Per-call options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    /// Attach authentication headers. Defaults to `true`.
    pub sign_request: bool,
    /// Overrides the configured default `User-Agent`.
    pub user_agent: Option<String>,
    /// Total attempts, counting the first one. `0` and `1` both mean a single attempt.
    pub retries: u32,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            sign_request: true,
            user_agent: None,
            retries: DEFAULT_RETRIES,
        }
    }
}

/// A call to make against the API.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method
    pub method: Method,
    /// Path appended to the configured endpoint (e.g., `/me`)
    pub path: String,
    /// Query parameters, encoded in this order
    pub params: Vec<(String, String)>,
    /// JSON body; `None`, `null` and empty containers mean "no body"
    pub data: Option<Value>,
    /// Caller-supplied headers
    pub headers: Vec<(String, String)>,
    /// Per-call options
    pub options: RequestOptions,
}

impl RequestSpec {
    /// Create a request with no parameters, body or extra headers.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            data: None,
            headers: Vec::new(),
            options: RequestOptions::default(),
        }
    }

    /// Whether the method carries only a query string and never a body.
    pub fn is_query_only(&self) -> bool {
        matches!(self.method, Method::GET | Method::HEAD | Method::OPTIONS)
    }

    /// Form-encoded query string, empty when there are no parameters.
    pub fn query_string(&self) -> Result<String, OvhError> {
        if self.params.is_empty() {
            return Ok(String::new());
        }
        Ok(serde_urlencoded::to_string(&self.params)?)
    }

    /// JSON text of the body, if one is sent.
    pub fn body_text(&self) -> Result<Option<String>, OvhError> {
        if self.is_query_only() {
            return Ok(None);
        }
        match &self.data {
            Some(value) if !is_empty_payload(value) => Ok(Some(serde_json::to_string(value)?)),
            _ => Ok(None),
        }
    }
}

/// Whether a payload counts as absent.
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// A fully assembled request for a single attempt.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
    /// HTTP method
    pub method: Method,
    /// Target URL including the query string
    pub url: Url,
    /// Merged headers
    pub headers: HeaderMap,
    /// JSON body text, exactly as signed
    pub body: Option<String>,
    /// Authentication headers, when the request is signed
    pub auth: Option<AuthHeaders>,
}

fn ensure_supported(method: &Method) -> Result<(), OvhError> {
    match *method {
        Method::GET
        | Method::HEAD
        | Method::OPTIONS
        | Method::POST
        | Method::PUT
        | Method::PATCH
        | Method::DELETE => Ok(()),
        _ => Err(OvhError::UnsupportedMethod(method.clone())),
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, OvhError> {
    HeaderValue::from_str(value).map_err(|e| OvhError::InvalidHeader(format!("{name}: {e}")))
}

/// Assemble the request for one attempt.
///
/// Headers are merged in this order, later entries replacing earlier ones:
/// caller headers, `User-Agent`, `X-Ovh-Application`, then the authentication
/// headers when signing is enabled. The clock is read only for signed requests.
///
/// The signature covers the parsed URL, so host case, default ports, dot
/// segments and percent-encoding are signed as they are sent.
pub fn build_request(
    config: &Configuration,
    spec: &RequestSpec,
    clock: &dyn Clock,
) -> Result<OutgoingRequest, OvhError> {
    ensure_supported(&spec.method)?;

    let uri = format!("{}{}", config.endpoint(), spec.path);
    let query = spec.query_string()?;
    let body = spec.body_text()?;
    let mut url = Url::parse(&with_query(&uri, &query))?;
    url.set_fragment(None);

    let mut headers = HeaderMap::new();
    for (name, value) in &spec.headers {
        headers.insert(header_name(name)?, header_value(name, value)?);
    }

    let user_agent = spec.options.user_agent.as_deref().or(config.user_agent());
    if let Some(user_agent) = user_agent {
        headers.insert(USER_AGENT, header_value("User-Agent", user_agent)?);
    }

    headers.insert(
        header_name(APPLICATION_HEADER)?,
        header_value(APPLICATION_HEADER, config.application_key())?,
    );

    let auth = if spec.options.sign_request {
        config.ensure_signable()?;
        // Sign the normalized URL exactly as it goes on the wire.
        let mut signed_uri = url.clone();
        signed_uri.set_query(None);
        let auth = sign_request(
            config.credentials(),
            &spec.method,
            signed_uri.as_str(),
            url.query().unwrap_or_default(),
            body.as_deref().unwrap_or_default(),
            clock.unix_timestamp(),
        );
        auth.apply(&mut headers)?;
        Some(auth)
    } else {
        None
    };

    if body.is_some() && !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(OutgoingRequest {
        method: spec.method.clone(),
        url,
        headers,
        body,
        auth,
    })
}
