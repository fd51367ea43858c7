//! SHA-1 signature generation for OVH API authentication.
//!
//! Signed requests carry a signature computed as:
//! ```text
//! "$1$" + hex(SHA1(secret + "+" + consumerKey + "+" + METHOD + "+" + fullUri + "+" + body + "+" + timestamp))
//! ```
//!
//! `fullUri` includes the encoded query string, `body` is the JSON text sent
//! on the wire (empty when there is none) and `timestamp` is unix seconds.
//! The field order is fixed by the server-side verifier.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha1::{Digest, Sha1};

use crate::auth::Credentials;
use crate::error::OvhError;

/// Header carrying the application key.
pub const APPLICATION_HEADER: &str = "X-Ovh-Application";
/// Header carrying the signing timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Ovh-Timestamp";
/// Header carrying the request signature.
pub const SIGNATURE_HEADER: &str = "X-Ovh-Signature";
/// Header carrying the consumer key.
pub const CONSUMER_HEADER: &str = "x-Ovh-Consumer";

/// Version prefix of the signature scheme.
pub const SIGNATURE_PREFIX: &str = "$1$";

const PUZZLE_SEPARATOR: &str = "+";

/// Authentication headers for a single attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Unix timestamp embedded in the signature
    pub timestamp: i64,
    /// `$1$` followed by the hex SHA-1 digest of the puzzle
    pub signature: String,
    /// The consumer key the signature was computed for
    pub consumer_key: String,
}

impl AuthHeaders {
    /// Header name/value pairs in the order they are applied.
    pub fn pairs(&self) -> [(&'static str, String); 3] {
        [
            (TIMESTAMP_HEADER, self.timestamp.to_string()),
            (SIGNATURE_HEADER, self.signature.clone()),
            (CONSUMER_HEADER, self.consumer_key.clone()),
        ]
    }

    /// Insert the headers, replacing any existing value under the same name.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), OvhError> {
        for (name, value) in self.pairs() {
            let value = HeaderValue::from_str(&value)
                .map_err(|e| OvhError::InvalidHeader(format!("{name}: {e}")))?;
            headers.insert(header_name(name)?, value);
        }
        Ok(())
    }
}

/// Parse a header name; names are normalized to lowercase.
pub(crate) fn header_name(name: &str) -> Result<HeaderName, OvhError> {
    HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| OvhError::InvalidHeader(format!("{name}: {e}")))
}

/// Append an already-encoded query string to a URI.
///
/// An empty query leaves the URI untouched, so no dangling `?` is produced.
pub fn with_query(uri: &str, query: &str) -> String {
    if query.is_empty() {
        uri.to_string()
    } else {
        format!("{uri}?{query}")
    }
}

/// Build the plaintext puzzle that gets hashed.
///
/// # Arguments
///
/// * `secret` - The application secret
/// * `consumer_key` - The consumer key
/// * `method` - HTTP method, uppercased before joining
/// * `full_uri` - Target URI including the encoded query string
/// * `body` - JSON body text, or an empty string
/// * `timestamp` - Unix timestamp in seconds
pub fn signature_puzzle(
    secret: &str,
    consumer_key: &str,
    method: &str,
    full_uri: &str,
    body: &str,
    timestamp: i64,
) -> String {
    [
        secret,
        consumer_key,
        &method.to_uppercase(),
        full_uri,
        body,
        &timestamp.to_string(),
    ]
    .join(PUZZLE_SEPARATOR)
}

/// Sign a request for the OVH API.
///
/// # Arguments
///
/// * `credentials` - Application secret and consumer key
/// * `method` - The HTTP method
/// * `uri` - Target URI without the query string
/// * `query` - Form-encoded query string, empty when there are no parameters
/// * `body` - JSON body text, empty when there is no body
/// * `timestamp` - Unix timestamp in seconds
///
/// # Example
///
/// ```rust
/// use ovh_api_client::auth::{Credentials, sign_request};
/// use reqwest::Method;
///
/// let credentials = Credentials::new("app_key", "s", "c");
/// let headers = sign_request(
///     &credentials,
///     &Method::GET,
///     "https://api.example.com/1.0/me",
///     "",
///     "",
///     1_700_000_000,
/// );
/// assert!(headers.signature.starts_with("$1$"));
/// ```
pub fn sign_request(
    credentials: &Credentials,
    method: &Method,
    uri: &str,
    query: &str,
    body: &str,
    timestamp: i64,
) -> AuthHeaders {
    let full_uri = with_query(uri, query);
    let puzzle = signature_puzzle(
        credentials.expose_secret(),
        &credentials.consumer_key,
        method.as_str(),
        &full_uri,
        body,
        timestamp,
    );

    let digest = Sha1::digest(puzzle.as_bytes());

    AuthHeaders {
        timestamp,
        signature: format!("{SIGNATURE_PREFIX}{}", hex::encode(digest)),
        consumer_key: credentials.consumer_key.clone(),
    }
}
