//! Configuration management for the portal.

use anyhow::{Context, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;

use portal_common::constants::{
    DEFAULT_CHALLENGE_TTL_SECS, DEFAULT_LISTEN_ADDR, DEFAULT_SESSION_SWEEP_SECS,
    DEFAULT_SESSION_TTL_SECS, SESSION_COOKIE_NAME, demo_credentials,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Session configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Login credentials
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Session and CAPTCHA lifetimes
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle session lifetime in seconds
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,

    /// Cookie carrying the session id
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Expired-session purge interval in seconds
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Challenge validity in seconds
    #[serde(default = "default_challenge_ttl")]
    pub challenge_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            cookie_name: default_cookie_name(),
            sweep_interval_secs: default_sweep_interval(),
            challenge_ttl_secs: default_challenge_ttl(),
        }
    }
}

/// Demo credentials. Passwords are stored as SHA-256 hex digests.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_user_id")]
    pub user_id: String,

    #[serde(default = "default_user_password")]
    pub user_password_sha256: String,

    #[serde(default = "default_admin_password")]
    pub admin_password_sha256: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
            user_password_sha256: default_user_password(),
            admin_password_sha256: default_admin_password(),
        }
    }
}

impl AuthConfig {
    pub fn check_user(&self, user_id: &str, password: &str) -> bool {
        user_id == self.user_id && digest_matches(password, &self.user_password_sha256)
    }

    pub fn check_admin(&self, password: &str) -> bool {
        digest_matches(password, &self.admin_password_sha256)
    }
}

/// Lowercase hex SHA-256 of `input`
pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

fn digest_matches(password: &str, expected_hex: &str) -> bool {
    sha256_hex(password).eq_ignore_ascii_case(expected_hex.trim())
}

// Default value functions
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_session_ttl() -> u64 { DEFAULT_SESSION_TTL_SECS }
fn default_cookie_name() -> String { SESSION_COOKIE_NAME.to_string() }
fn default_sweep_interval() -> u64 { DEFAULT_SESSION_SWEEP_SECS }
fn default_challenge_ttl() -> u64 { DEFAULT_CHALLENGE_TTL_SECS }
fn default_user_id() -> String { demo_credentials::USER_ID.to_string() }
fn default_user_password() -> String { sha256_hex(demo_credentials::USER_PASSWORD) }
fn default_admin_password() -> String { sha256_hex(demo_credentials::ADMIN_PASSWORD) }

impl AppConfig {
    /// Load configuration from file and `PORTAL__*` env vars, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut builder = config::Config::builder();

        if Path::new(config_path).exists() {
            builder = builder.add_source(config::File::with_name(config_path));
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()
            .context("Failed to load config")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .context("Failed to parse config")?;

        // Apply CLI overrides
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            session: SessionConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config: &str, listen: Option<&str>) -> crate::Args {
        crate::Args {
            config: config.to_string(),
            listen: listen.map(str::to_string),
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    #[test]
    fn test_defaults_accept_demo_credentials() {
        let auth = AuthConfig::default();
        assert!(auth.check_user("123123", "123123"));
        assert!(!auth.check_user("123123", "wrong"));
        assert!(!auth.check_user("someone", "123123"));
        assert!(auth.check_admin("123123"));
        assert!(!auth.check_admin(""));
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does/not/exist.toml", &args("", Some("0.0.0.0:8080"))).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.session.cookie_name, SESSION_COOKIE_NAME);
        assert_eq!(config.session.challenge_ttl_secs, DEFAULT_CHALLENGE_TTL_SECS);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let path = std::env::temp_dir().join(format!("portal-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "listen_addr = \"127.0.0.1:9999\"\n\n[session]\nttl_secs = 120\n",
        )
        .unwrap();

        let path_str = path.to_str().unwrap();
        let config = AppConfig::load(path_str, &args(path_str, None)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.listen_addr, "127.0.0.1:9999");
        assert_eq!(config.session.ttl_secs, 120);
        assert_eq!(config.session.sweep_interval_secs, DEFAULT_SESSION_SWEEP_SECS);
    }
}
