//! Shared constants for portal components.

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Session lifetime since last activity (24 hours)
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// How often expired sessions are purged
pub const DEFAULT_SESSION_SWEEP_SECS: u64 = 60;

/// CAPTCHA challenge validity (5 minutes)
pub const DEFAULT_CHALLENGE_TTL_SECS: u64 = 300;

/// Cookie carrying the session id
pub const SESSION_COOKIE_NAME: &str = "portal_sid";

/// Status assigned to users, accounts, and cards created without one
pub const DEFAULT_STATUS: &str = "active";

/// Number of transactions shown per account on the dashboard
pub const RECENT_TRANSACTIONS_LIMIT: usize = 3;

/// Demo credentials. Only their SHA-256 digests end up in the config.
pub mod demo_credentials {
    pub const USER_ID: &str = "123123";
    pub const USER_PASSWORD: &str = "123123";
    pub const ADMIN_PASSWORD: &str = "123123";
}

/// Page paths used for redirects
pub mod paths {
    pub const LOGIN: &str = "/";
    pub const MAIN_PAGE: &str = "/main-page";
    pub const MAIN_PAGE_ADMIN: &str = "/main-page?admin=true";
    pub const ADMIN_LOGIN: &str = "/admin-login";
    pub const ADMIN_PANEL: &str = "/admin-panel";
}
