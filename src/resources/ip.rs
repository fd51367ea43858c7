use reqwest::Method;

use crate::error::OvhError;
use crate::resources::encode_segment;
use crate::rest::endpoints::ip;
use crate::rest::{ApiResponse, OvhApi, PendingRequest};

/// IP routes.
pub struct IpApi<'a, C> {
    client: &'a C,
}

impl<'a, C: OvhApi> IpApi<'a, C> {
    /// Wrap a client.
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// List the IP blocks of the account (`GET /ip`).
    ///
    /// `ip_type` filters by block type (e.g., `failover`).
    pub async fn list(&self, ip_type: Option<&str>) -> Result<Option<ApiResponse>, OvhError> {
        let mut request = PendingRequest::new(self.client, Method::GET, ip::IP);
        if let Some(ip_type) = ip_type {
            request = request.query("type", ip_type);
        }
        request.send().await
    }

    /// Get one IP block (`GET /ip/{ip}`), e.g. `192.0.2.0/24`.
    pub async fn get(&self, block: &str) -> Result<Option<ApiResponse>, OvhError> {
        let path = format!("{}/{}", ip::IP, encode_segment(block));
        PendingRequest::new(self.client, Method::GET, path)
            .send()
            .await
    }
}
