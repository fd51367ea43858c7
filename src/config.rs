//! Client configuration.
//!
//! A [`Configuration`] is an immutable snapshot: it is assembled once through
//! [`ConfigurationBuilder`] (or loaded from the environment) and then shared
//! read-only by every call the client makes.

use secrecy::{ExposeSecret, SecretString};

use crate::auth::Credentials;
use crate::error::OvhError;
use crate::rest::endpoints::{DEFAULT_API_VERSION, OVH_EU};

/// Environment variable names read by [`Configuration::from_env`].
pub mod env {
    pub const APPLICATION_KEY: &str = "OVH_APPLICATION_KEY";
    pub const APPLICATION_SECRET: &str = "OVH_APPLICATION_SECRET";
    pub const CONSUMER_KEY: &str = "OVH_CONSUMER_KEY";
    pub const API_HOST: &str = "OVH_API_HOST";
    pub const API_VERSION: &str = "OVH_API_VERSION";
    pub const USER_AGENT: &str = "OVH_USER_AGENT";
    pub const VERBOSE: &str = "OVH_VERBOSE";
}

/// Identity and endpoint settings for the client.
#[derive(Clone)]
pub struct Configuration {
    credentials: Credentials,
    api_host: String,
    api_version: String,
    user_agent: Option<String>,
    verbose: bool,
}

impl Configuration {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
    }

    /// Load the configuration from `OVH_*` environment variables.
    ///
    /// The application key, application secret and consumer key are required.
    /// `OVH_API_HOST` and `OVH_API_VERSION` fall back to the OVH Europe
    /// endpoint and version `1.0`.
    pub fn from_env() -> Result<Self, OvhError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Try to load the configuration from the environment.
    ///
    /// Returns `None` if a required variable is not set.
    pub fn try_from_env() -> Option<Self> {
        Self::from_env().ok()
    }

    /// Load the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, OvhError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| OvhError::Config(format!("environment variable {name} not set")))
        };

        let mut builder = Self::builder()
            .application_key(required(env::APPLICATION_KEY)?)
            .application_secret(required(env::APPLICATION_SECRET)?)
            .consumer_key(required(env::CONSUMER_KEY)?);

        if let Some(host) = lookup(env::API_HOST) {
            builder = builder.api_host(host);
        }
        if let Some(version) = lookup(env::API_VERSION) {
            builder = builder.api_version(version);
        }
        if let Some(user_agent) = lookup(env::USER_AGENT) {
            builder = builder.user_agent(user_agent);
        }
        if let Some(verbose) = lookup(env::VERBOSE) {
            builder = builder.verbose(parse_flag(&verbose));
        }

        builder.build()
    }

    /// The signing credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The application key.
    pub fn application_key(&self) -> &str {
        &self.credentials.application_key
    }

    /// The consumer key.
    pub fn consumer_key(&self) -> &str {
        &self.credentials.consumer_key
    }

    /// The API host, including the scheme (e.g., `https://eu.api.ovh.com`).
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// The API version segment (e.g., `1.0`).
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The default `User-Agent`, if any.
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Whether request and response headers and bodies are logged.
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Base endpoint every request path is appended to: `{api_host}/{api_version}`.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_host, self.api_version)
    }

    /// Check that every field taking part in a signature is set.
    pub fn ensure_signable(&self) -> Result<(), OvhError> {
        let fields = [
            ("application key", self.credentials.application_key.as_str()),
            ("application secret", self.credentials.expose_secret()),
            ("consumer key", self.credentials.consumer_key.as_str()),
            ("API host", self.api_host.as_str()),
            ("API version", self.api_version.as_str()),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(OvhError::MissingCredentials(name));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("credentials", &self.credentials)
            .field("api_host", &self.api_host)
            .field("api_version", &self.api_version)
            .field("user_agent", &self.user_agent)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Builder for [`Configuration`].
pub struct ConfigurationBuilder {
    application_key: String,
    application_secret: SecretString,
    consumer_key: String,
    api_host: String,
    api_version: String,
    user_agent: Option<String>,
    verbose: bool,
}

impl ConfigurationBuilder {
    /// Create a new builder targeting OVH Europe, API version `1.0`.
    pub fn new() -> Self {
        Self {
            application_key: String::new(),
            application_secret: SecretString::from(String::new()),
            consumer_key: String::new(),
            api_host: OVH_EU.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            user_agent: None,
            verbose: false,
        }
    }

    /// Set the application key.
    pub fn application_key(mut self, key: impl Into<String>) -> Self {
        self.application_key = key.into();
        self
    }

    /// Set the application secret.
    pub fn application_secret(mut self, secret: impl Into<String>) -> Self {
        self.application_secret = SecretString::from(secret.into());
        self
    }

    /// Set the consumer key.
    pub fn consumer_key(mut self, key: impl Into<String>) -> Self {
        self.consumer_key = key.into();
        self
    }

    /// Set all three identity fields at once.
    pub fn credentials(self, credentials: &Credentials) -> Self {
        self.application_key(credentials.application_key.clone())
            .application_secret(credentials.expose_secret())
            .consumer_key(credentials.consumer_key.clone())
    }

    /// Set the API host (useful for testing with a mock server).
    ///
    /// Trailing `/` characters are removed so that the endpoint is joined
    /// with exactly one separator.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = host.into();
        self
    }

    /// Set the API version segment.
    ///
    /// Leading and trailing `/` characters are removed.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the default user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enable or disable verbose request/response logging.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Build the configuration.
    ///
    /// Identity fields may be left empty for clients that only make unsigned
    /// calls; signed calls check them with [`Configuration::ensure_signable`].
    pub fn build(self) -> Result<Configuration, OvhError> {
        let api_host = self.api_host.trim_end_matches('/').to_string();
        if !api_host.is_empty() {
            url::Url::parse(&api_host)?;
        }

        Ok(Configuration {
            credentials: Credentials::new(
                self.application_key,
                self.application_secret.expose_secret(),
                self.consumer_key,
            ),
            api_host,
            api_version: self.api_version.trim_matches('/').to_string(),
            user_agent: self.user_agent,
            verbose: self.verbose,
        })
    }
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
