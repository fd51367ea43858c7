use reqwest::Method;

use crate::error::OvhError;
use crate::rest::endpoints::me;
use crate::rest::{ApiResponse, OvhApi, PendingRequest};

/// Account routes.
pub struct MeApi<'a, C> {
    client: &'a C,
}

impl<'a, C: OvhApi> MeApi<'a, C> {
    /// Wrap a client.
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Get the account details (`GET /me`).
    pub async fn get(&self) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::GET, me::ME)
            .send()
            .await
    }
}
