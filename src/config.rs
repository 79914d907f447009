//! Runtime settings, read from the environment (and `.env` via `dotenv`).

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_EXPLORER_TX_URL: &str = "https://solscan.io/tx/";
pub const DEFAULT_JWT_TTL_SECS: i64 = 24 * 60 * 60;
pub const DEFAULT_USERS_FILE: &str = "data/users.ndjson";
pub const DEFAULT_DEMO_STATE_FILE: &str = "data/demo_state.json";
pub const DEFAULT_TOTP_ISSUER: &str = "Token Platform";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub solana_rpc_url: String,
    pub explorer_tx_url: String,
    /// HS256 signing secret; no default
    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,
    pub users_file: String,
    pub demo_state_file: String,
    pub totp_issuer: String,
    /// Serve chain reads from an empty in-memory ledger and never submit
    pub dry_run: bool,
    /// Comma-separated browser origins allowed to call with credentials
    pub cors_origins: String,
    /// Mark session cookies `Secure`; turn off only for plain-HTTP development
    pub cookie_secure: bool,
}

impl Settings {
    /// Load from process environment variables (`BIND_ADDR`, `JWT_SECRET`, ...)
    pub fn load() -> Result<Self> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    pub fn from_source(environment: Environment) -> Result<Self> {
        let settings: Settings = Config::builder()
            .set_default("bind_addr", DEFAULT_BIND_ADDR)?
            .set_default("solana_rpc_url", DEFAULT_RPC_URL)?
            .set_default("explorer_tx_url", DEFAULT_EXPLORER_TX_URL)?
            .set_default("jwt_ttl_secs", DEFAULT_JWT_TTL_SECS)?
            .set_default("users_file", DEFAULT_USERS_FILE)?
            .set_default("demo_state_file", DEFAULT_DEMO_STATE_FILE)?
            .set_default("totp_issuer", DEFAULT_TOTP_ISSUER)?
            .set_default("dry_run", false)?
            .set_default("cors_origins", DEFAULT_CORS_ORIGINS)?
            .set_default("cookie_secure", true)?
            .add_source(environment)
            .build()?
            .try_deserialize()
            .context("Invalid settings; JWT_SECRET must be set in environment variables")?;

        if settings.jwt_secret.trim().is_empty() {
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        if settings.jwt_ttl_secs <= 0 {
            anyhow::bail!("JWT_TTL_SECS must be positive");
        }

        for origin in settings.cors_origin_list() {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                anyhow::bail!("CORS_ORIGINS entry is not an http(s) origin: {}", origin);
            }
        }

        Ok(settings)
    }

    pub fn cors_origin_list(&self) -> Vec<&str> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::default().try_parsing(true).source(Some(map))
    }

    #[test]
    fn defaults_fill_everything_but_secret() {
        let settings = Settings::from_source(env(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(settings.explorer_tx_url, DEFAULT_EXPLORER_TX_URL);
        assert_eq!(settings.jwt_ttl_secs, DEFAULT_JWT_TTL_SECS);
        assert_eq!(settings.users_file, DEFAULT_USERS_FILE);
        assert!(!settings.dry_run);
        assert!(settings.cookie_secure);
        assert_eq!(settings.cors_origin_list(), vec![DEFAULT_CORS_ORIGINS]);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_source(env(&[
            ("JWT_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("JWT_TTL_SECS", "60"),
            ("DRY_RUN", "true"),
            ("COOKIE_SECURE", "false"),
            ("CORS_ORIGINS", "https://app.example.com, http://localhost:5173,"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr, "127.0.0.1:8080");
        assert!(!settings.cookie_secure);
        assert_eq!(
            settings.cors_origin_list(),
            vec!["https://app.example.com", "http://localhost:5173"]
        );
        assert_eq!(settings.jwt_ttl_secs, 60);
        assert!(settings.dry_run);
    }

    #[test]
    fn secret_is_required() {
        assert!(Settings::from_source(env(&[])).is_err());
        assert!(Settings::from_source(env(&[("JWT_SECRET", " ")])).is_err());
    }

    #[test]
    fn cors_origins_must_be_http() {
        let err = Settings::from_source(env(&[("JWT_SECRET", "s3cret"), ("CORS_ORIGINS", "*")]));
        assert!(err.is_err());
    }
}
