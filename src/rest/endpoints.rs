//! OVH API host and route constants.

/// OVH Europe.
pub const OVH_EU: &str = "https://eu.api.ovh.com";
/// OVH Canada.
pub const OVH_CA: &str = "https://ca.api.ovh.com";
/// OVHcloud US.
pub const OVH_US: &str = "https://api.us.ovhcloud.com";
/// Kimsufi Europe.
pub const KIMSUFI_EU: &str = "https://eu.api.kimsufi.com";
/// Kimsufi Canada.
pub const KIMSUFI_CA: &str = "https://ca.api.kimsufi.com";
/// So you Start Europe.
pub const SOYOUSTART_EU: &str = "https://eu.api.soyoustart.com";
/// So you Start Canada.
pub const SOYOUSTART_CA: &str = "https://ca.api.soyoustart.com";

/// Default API version segment.
pub const DEFAULT_API_VERSION: &str = "1.0";

/// Look up an API host by its conventional short name (e.g., `ovh-eu`).
pub fn host_for(name: &str) -> Option<&'static str> {
    match name {
        "ovh-eu" => Some(OVH_EU),
        "ovh-ca" => Some(OVH_CA),
        "ovh-us" => Some(OVH_US),
        "kimsufi-eu" => Some(KIMSUFI_EU),
        "kimsufi-ca" => Some(KIMSUFI_CA),
        "soyoustart-eu" => Some(SOYOUSTART_EU),
        "soyoustart-ca" => Some(SOYOUSTART_CA),
        _ => None,
    }
}

/// Account routes.
pub mod me {
    /// Current account details.
    pub const ME: &str = "/me";
}

/// Authentication routes.
pub mod auth {
    /// Server time (unsigned).
    pub const TIME: &str = "/auth/time";
    /// Details of the credential in use.
    pub const CURRENT_CREDENTIAL: &str = "/auth/currentCredential";
    /// Expire the credential in use.
    pub const LOGOUT: &str = "/auth/logout";
}

/// IP routes.
pub mod ip {
    /// IP blocks owned by the account.
    pub const IP: &str = "/ip";
}

/// VPS routes.
pub mod vps {
    /// VPS services owned by the account.
    pub const VPS: &str = "/vps";
}
