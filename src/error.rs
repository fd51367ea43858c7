//! Error types for the OVH client library.

use std::error::Error as StdError;

use serde::Deserialize;
use thiserror::Error;

use crate::rest::ApiResponse;

/// The main error type for all OVH client operations.
///
/// Remote application errors (HTTP 4xx/5xx) are *not* represented here: the
/// dispatcher hands them back as an [`ApiResponse`], and callers can decode
/// them with [`ApiResponse::api_error`].
#[derive(Error, Debug)]
pub enum OvhError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP request with middleware failed
    #[error("HTTP request failed: {0}")]
    HttpMiddleware(#[from] reqwest_middleware::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    /// Query parameters could not be form-encoded
    #[error("Query encoding error: {0}")]
    QueryEncoding(#[from] serde_urlencoded::ser::Error),

    /// The response declared a JSON body that could not be decoded
    #[error("Failed to decode {content_type} response body: {source}")]
    Decode {
        /// The content type announced by the server
        content_type: String,
        /// The underlying parse error
        source: serde_json::Error,
    },

    /// A header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The HTTP method is not one the API accepts
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(reqwest::Method),

    /// A field required to sign the request is empty
    #[error("Missing credentials: {0} is required for signed requests")]
    MissingCredentials(&'static str),

    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OvhError {
    /// Whether the failure is worth retrying immediately.
    ///
    /// Connection failures, timeouts and undecodable response bodies are
    /// transient. DNS resolution failures, TLS failures reported outside the
    /// connect phase, malformed requests and configuration problems are not.
    pub fn is_transient(&self) -> bool {
        match self {
            OvhError::Http(err) => is_transient_transport(err),
            OvhError::HttpMiddleware(reqwest_middleware::Error::Reqwest(err)) => {
                is_transient_transport(err)
            }
            OvhError::Decode { .. } => true,
            _ => false,
        }
    }
}

fn is_transient_transport(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }
    err.is_connect() && !is_dns_failure(err)
}

/// The resolver reports failures as connect errors whose cause reads "dns error".
fn is_dns_failure(err: &reqwest::Error) -> bool {
    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if cause.to_string().starts_with("dns error") {
            return true;
        }
        source = cause.source();
    }
    false
}

/// An error reported by the remote API in a non-success response body.
///
/// OVH answers failed calls with an envelope like
/// `{"class": "Client::Forbidden", "message": "Invalid signature", "errorCode": "INVALID_SIGNATURE"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response
    pub status: u16,
    /// Error class (e.g., "Client::NotFound"), when provided
    pub class: Option<String>,
    /// Machine-readable error code (e.g., "INVALID_SIGNATURE"), when provided
    pub error_code: Option<String>,
    /// Human-readable error message
    pub message: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorEnvelope {
    class: Option<String>,
    error_code: Option<String>,
    message: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_code {
            Some(code) => write!(f, "HTTP {} {}: {}", self.status, code, self.message),
            None => write!(f, "HTTP {}: {}", self.status, self.message),
        }
    }
}

impl ApiError {
    /// Create a new API error from a status and message.
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            class: None,
            error_code: None,
            message: message.into(),
        }
    }

    /// Decode the error envelope of a non-success response.
    ///
    /// Returns `None` for successful responses. Bodies that are not a JSON
    /// envelope fall back to their raw text as the message.
    pub fn from_response(response: &ApiResponse) -> Option<Self> {
        if response.status.is_success() {
            return None;
        }
        let status = response.status.as_u16();

        let envelope = response
            .body
            .as_json()
            .and_then(|value| serde_json::from_value::<ErrorEnvelope>(value.clone()).ok());

        Some(match envelope {
            Some(envelope) => Self {
                status,
                class: envelope.class,
                error_code: envelope.error_code,
                message: envelope.message.unwrap_or_default(),
            },
            None => Self::new(status, response.body.as_text().unwrap_or_default()),
        })
    }

    fn has_code(&self, code: &str) -> bool {
        self.error_code.as_deref() == Some(code)
    }

    /// Check if the server rejected the request signature.
    pub fn is_invalid_signature(&self) -> bool {
        self.has_code(error_codes::INVALID_SIGNATURE) || self.message.contains("Invalid signature")
    }

    /// Check if the consumer key is unknown or not yet validated.
    pub fn is_invalid_credential(&self) -> bool {
        self.has_code(error_codes::INVALID_CREDENTIAL) || self.has_code(error_codes::NOT_CREDENTIAL)
    }

    /// Check if the application key is unknown.
    pub fn is_invalid_key(&self) -> bool {
        self.has_code(error_codes::INVALID_KEY)
    }

    /// Check if the consumer key is not allowed to call this route.
    pub fn is_not_granted_call(&self) -> bool {
        self.has_code(error_codes::NOT_GRANTED_CALL)
    }

    /// Check if the request timestamp was outside the server's freshness window.
    pub fn is_query_time_out(&self) -> bool {
        self.has_code(error_codes::QUERY_TIME_OUT)
    }

    /// Check if the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

/// Known OVH error codes for pattern matching.
pub mod error_codes {
    pub const INVALID_SIGNATURE: &str = "INVALID_SIGNATURE";
    pub const INVALID_CREDENTIAL: &str = "INVALID_CREDENTIAL";
    pub const NOT_CREDENTIAL: &str = "NOT_CREDENTIAL";
    pub const INVALID_KEY: &str = "INVALID_KEY";
    pub const NOT_GRANTED_CALL: &str = "NOT_GRANTED_CALL";
    pub const QUERY_TIME_OUT: &str = "QUERY_TIME_OUT";
}
