//! Response decoding.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, OvhError};

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body of a response declaring a JSON content type
    Json(Value),
    /// Body of any other response
    Text(String),
    /// The response had no body
    Empty,
}

impl ResponseBody {
    /// Whether the response had no body.
    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }

    /// The JSON value, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    /// The raw text, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A response obtained from the API.
///
/// Returned for every HTTP status: 4xx and 5xx responses are values, not
/// errors. Use [`ApiResponse::api_error`] to interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Decoded body
    pub body: ResponseBody,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The remote error, for non-success responses.
    pub fn api_error(&self) -> Option<ApiError> {
        ApiError::from_response(self)
    }

    /// Deserialize the JSON body into a typed value.
    ///
    /// An empty body deserializes from `null`, so `Option<T>` and `()` targets work.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, OvhError> {
        match &self.body {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value.clone())?),
            ResponseBody::Empty => Ok(serde_json::from_value(Value::Null)?),
            ResponseBody::Text(text) => Ok(serde_json::from_str(text)?),
        }
    }
}

fn is_json_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}

/// Decode a body according to the declared content type.
///
/// A JSON content type whose body does not parse is a [`OvhError::Decode`].
pub fn decode_body(content_type: Option<&str>, text: String) -> Result<ResponseBody, OvhError> {
    if text.is_empty() {
        return Ok(ResponseBody::Empty);
    }
    match content_type {
        Some(content_type) if is_json_content_type(content_type) => serde_json::from_str(&text)
            .map(ResponseBody::Json)
            .map_err(|source| OvhError::Decode {
                content_type: content_type.to_string(),
                source,
            }),
        _ => Ok(ResponseBody::Text(text)),
    }
}

/// Read and decode a transport response.
pub(crate) async fn read_response(response: reqwest::Response) -> Result<ApiResponse, OvhError> {
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let text = response.text().await?;

    Ok(ApiResponse {
        status,
        body: decode_body(content_type.as_deref(), text)?,
    })
}
