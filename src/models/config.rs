//! Gateway configuration
//!
//! Read once from the environment at startup. Every value has a default in
//! `utils/constants.rs`, so an empty environment talks to the public realm.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use super::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REALM_PATH, DEFAULT_RPC_RETRIES, DEFAULT_RPC_TIMEOUT_SECS,
    DEFAULT_RPC_URL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Tendermint RPC endpoint of the gno.land node
    pub rpc_url: String,
    /// Package path of the bounty realm
    pub realm_path: String,
    pub host: String,
    pub port: u16,
    /// Bound on one RPC round trip
    pub rpc_timeout: Duration,
    /// Extra attempts after a timeout or connection failure
    pub rpc_retries: u32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            realm_path: DEFAULT_REALM_PATH.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            rpc_retries: DEFAULT_RPC_RETRIES,
        }
    }
}

impl GatewayConfig {
    /// Load from the process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup (the environment in production, a map in tests)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Hosting platforms inject PORT; GNOBOUNTY_PORT is for local runs
        let port = match get("PORT").or_else(|| get("GNOBOUNTY_PORT")) {
            Some(raw) => parse_value("PORT", &raw)?,
            None => defaults.port,
        };

        let rpc_timeout = match get("GNOBOUNTY_RPC_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_value("GNOBOUNTY_RPC_TIMEOUT_SECS", &raw)?),
            None => defaults.rpc_timeout,
        };

        let rpc_retries = match get("GNOBOUNTY_RPC_RETRIES") {
            Some(raw) => parse_value("GNOBOUNTY_RPC_RETRIES", &raw)?,
            None => defaults.rpc_retries,
        };

        let config = Self {
            rpc_url: get("GNOBOUNTY_RPC_URL").unwrap_or(defaults.rpc_url),
            realm_path: get("GNOBOUNTY_REALM").unwrap_or(defaults.realm_path),
            host: get("GNOBOUNTY_HOST").unwrap_or(defaults.host),
            port,
            rpc_timeout,
            rpc_retries,
        };

        info!(
            rpc_url = %config.rpc_url,
            realm = %config.realm_path,
            timeout_secs = config.rpc_timeout.as_secs(),
            retries = config.rpc_retries,
            "Configuration loaded"
        );

        Ok(config)
    }

    pub fn bind_addr(&self) -> AppResult<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .map_err(|_| AppError::invalid_config("GNOBOUNTY_HOST", &raw))
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_config(key, raw))
}
