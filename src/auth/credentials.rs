//! Credential management for OVH API authentication.

use secrecy::{ExposeSecret, SecretString};

/// The identity triple used to sign requests.
///
/// The application key and secret identify the registered application; the
/// consumer key identifies the authorized end-user session.
#[derive(Clone)]
pub struct Credentials {
    /// The application key (public identifier, sent as `X-Ovh-Application`)
    pub application_key: String,
    /// The application secret (private, only ever part of the signed puzzle)
    application_secret: SecretString,
    /// The consumer key (sent as `x-Ovh-Consumer`)
    pub consumer_key: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(
        application_key: impl Into<String>,
        application_secret: impl Into<String>,
        consumer_key: impl Into<String>,
    ) -> Self {
        Self {
            application_key: application_key.into(),
            application_secret: SecretString::from(application_secret.into()),
            consumer_key: consumer_key.into(),
        }
    }

    /// Get the application secret for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.application_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("application_key", &self.application_key)
            .field("application_secret", &"[REDACTED]")
            .field("consumer_key", &self.consumer_key)
            .finish()
    }
}
