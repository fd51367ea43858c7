//! Authentication module for the OVH API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - The timestamp source embedded in every signature
//! - SHA-1 signature generation and the authentication headers

mod clock;
mod credentials;
mod signature;

pub use clock::{Clock, SystemClock};
pub use credentials::Credentials;
pub(crate) use signature::header_name;
pub use signature::{
    APPLICATION_HEADER, AuthHeaders, CONSUMER_HEADER, SIGNATURE_HEADER, SIGNATURE_PREFIX,
    TIMESTAMP_HEADER, sign_request, signature_puzzle, with_query,
};
