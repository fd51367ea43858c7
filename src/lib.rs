//! # OVH API Client
//!
//! An async Rust client for OVH-style signed REST APIs.
//!
//! ## Features
//!
//! - Per-request SHA-1 signatures bound to method, URI, body and time
//! - Bounded retries on transient transport failures, re-signed every attempt
//! - Explicit, immutable configuration shared across concurrent calls
//! - Generic JSON decoding with opt-in interpretation of remote errors
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ovh_api_client::config::Configuration;
//! use ovh_api_client::rest::OvhClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let configuration = Configuration::builder()
//!         .application_key("app_key")
//!         .application_secret("app_secret")
//!         .consumer_key("consumer_key")
//!         .build()?;
//!     let client = OvhClient::new(configuration)?;
//!
//!     if let Some(me) = client.me().get().await? {
//!         println!("{}: {:?}", me.status, me.body);
//!     }
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod resources;
pub mod rest;

// Re-export commonly used types at crate root
pub use config::Configuration;
pub use error::{ApiError, OvhError};
pub use rest::{ApiResponse, OvhClient, ResponseBody};

/// Result type alias using OvhError
pub type Result<T> = std::result::Result<T, OvhError>;
