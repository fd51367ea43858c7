use reqwest::Method;

use crate::error::OvhError;
use crate::resources::encode_segment;
use crate::rest::endpoints::vps;
use crate::rest::{ApiResponse, OvhApi, PendingRequest};

/// VPS routes.
pub struct VpsApi<'a, C> {
    client: &'a C,
}

impl<'a, C: OvhApi> VpsApi<'a, C> {
    /// Wrap a client.
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// List the VPS services of the account (`GET /vps`).
    pub async fn list(&self) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::GET, vps::VPS)
            .send()
            .await
    }

    /// Get one VPS (`GET /vps/{service}`).
    pub async fn get(&self, service: &str) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::GET, service_path(service, ""))
            .send()
            .await
    }

    /// Reboot a VPS (`POST /vps/{service}/reboot`).
    pub async fn reboot(&self, service: &str) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::POST, service_path(service, "/reboot"))
            .send()
            .await
    }
}

fn service_path(service: &str, suffix: &str) -> String {
    format!("{}/{}{}", vps::VPS, encode_segment(service), suffix)
}
