//! OVH REST API client.
//!
//! The pipeline behind every call:
//!
//! 1. [`build_request`] joins the configured endpoint and the path, encodes
//!    the query string and JSON body, and merges headers.
//! 2. When signing is enabled, the request is signed with a fresh timestamp.
//! 3. [`OvhClient::dispatch`] sends it and retries transient failures,
//!    rebuilding and re-signing before every attempt.
//!
//! ```rust,no_run
//! use ovh_api_client::config::Configuration;
//! use ovh_api_client::rest::OvhClient;
//!
//! # async fn run() -> Result<(), ovh_api_client::OvhError> {
//! let client = OvhClient::new(Configuration::from_env()?)?;
//! let response = client
//!     .post("/vps/vps-1234.ovh.net/reboot")
//!     .retries(5)
//!     .send()
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod client;
pub mod endpoints;
mod request;
mod response;
mod traits;

pub use client::{OvhClient, OvhClientBuilder};
pub use request::{
    DEFAULT_RETRIES, OutgoingRequest, RequestOptions, RequestSpec, build_request, is_empty_payload,
};
pub use response::{ApiResponse, ResponseBody, decode_body};
pub use traits::{OvhApi, PendingRequest};
