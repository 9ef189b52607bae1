//! Runtime configuration sourced from the environment.

use std::env;
use std::fmt;
use std::net::SocketAddr;

use dotenvy::dotenv;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "payment_gateway.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid BIND_ADDR {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },
}

/// PayPal REST application credentials.
#[derive(Clone)]
pub struct PayPalCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl PayPalCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// Both halves present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

impl fmt::Debug for PayPalCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub paypal: PayPalCredentials,
    pub database_url: String,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Load from the process environment, after applying any `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let paypal = PayPalCredentials::new(
            lookup("PAYPAL_CLIENT_ID").unwrap_or_default(),
            lookup("PAYPAL_CLIENT_SECRET").unwrap_or_default(),
        );
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: raw_addr.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            paypal,
            database_url,
            bind_addr,
        })
    }
}
