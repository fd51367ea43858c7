//! Resource handles.
//!
//! Each handle borrows something implementing [`OvhApi`](crate::rest::OvhApi)
//! and maps a resource area onto paths; signing, dispatch and retries stay in
//! the shared pipeline. Handles are obtained from the client:
//!
//! ```rust,no_run
//! # async fn run(client: ovh_api_client::rest::OvhClient) -> Result<(), ovh_api_client::OvhError> {
//! let services = client.vps().list().await?;
//! let block = client.ip().get("192.0.2.0/24").await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod ip;
mod me;
mod vps;

pub use auth::AuthApi;
pub use ip::IpApi;
pub use me::MeApi;
pub use vps::VpsApi;

/// Percent-encode a value used as a single path segment.
///
/// Everything but unreserved characters is escaped, so `/`, `+` and spaces
/// stay inside the segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}
