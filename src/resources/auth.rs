use reqwest::Method;

use crate::error::OvhError;
use crate::rest::endpoints::auth;
use crate::rest::{ApiResponse, OvhApi, PendingRequest};

/// Authentication routes.
///
/// Acquiring a consumer key is out of scope; these calls inspect or end the
/// session a pre-provisioned key belongs to.
pub struct AuthApi<'a, C> {
    client: &'a C,
}

impl<'a, C: OvhApi> AuthApi<'a, C> {
    /// Wrap a client.
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Get the server's unix time (`GET /auth/time`).
    ///
    /// Sent unsigned, so it works before credentials are validated.
    pub async fn time(&self) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::GET, auth::TIME)
            .sign_request(false)
            .send()
            .await
    }

    /// Describe the credential in use (`GET /auth/currentCredential`).
    pub async fn current_credential(&self) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::GET, auth::CURRENT_CREDENTIAL)
            .send()
            .await
    }

    /// Expire the credential in use (`POST /auth/logout`).
    pub async fn logout(&self) -> Result<Option<ApiResponse>, OvhError> {
        PendingRequest::new(self.client, Method::POST, auth::LOGOUT)
            .send()
            .await
    }
}
