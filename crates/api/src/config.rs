//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;

use chefbook_auth::{GateConfig, token::DEFAULT_TOKEN_TTL_SECS};

const DEV_JWT_SECRET: &str = "dev-secret";
const DEV_PAYMENT_SECRET: &str = "dev-payment-secret";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Malformed {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub gate: GateConfig,
    /// When set, identity and ownership lookups go to Postgres; otherwise the
    /// in-memory stores are used.
    pub database_url: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });
        let payment_secret = get("PAYMENT_SECRET").unwrap_or_else(|| {
            tracing::warn!("PAYMENT_SECRET not set; using insecure dev default");
            DEV_PAYMENT_SECRET.to_string()
        });

        let token_ttl = match get("TOKEN_TTL_SECS") {
            None => Duration::seconds(DEFAULT_TOKEN_TTL_SECS),
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 => Duration::seconds(secs),
                _ => {
                    return Err(ConfigError::Malformed {
                        var: "TOKEN_TTL_SECS",
                        expected: "positive number of seconds",
                        value: raw,
                    });
                }
            },
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Malformed {
                var: "BIND_ADDR",
                expected: "socket address",
                value: bind_raw.clone(),
            })?;

        Ok(Self {
            bind_addr,
            gate: GateConfig {
                token_secret,
                payment_secret,
                token_ttl,
            },
            database_url: get("DATABASE_URL"),
        })
    }
}
