//! Configuration types for the payroll backend.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has a
//! default, so a file only needs the keys it changes.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{DEFAULT_DECIMAL_PLACES, DEFAULT_DEDUCTION_RATE};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Returns `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Binds a TCP listener on [`bind_address`](Self::bind_address).
    ///
    /// `host` may be an IP literal or a name such as `localhost`; names are
    /// resolved and the first address that binds is used.
    pub async fn bind(&self) -> std::io::Result<tokio::net::TcpListener> {
        tokio::net::TcpListener::bind(self.bind_address()).await
    }
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://workflow.db` or `sqlite::memory:`.
    pub url: String,
    /// Upper bound on pooled connections. Ignored for `sqlite::memory:`,
    /// which always uses a single connection.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://workflow.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Payroll computation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PayrollSettings {
    /// Default fraction of gross pay withheld when a request gives no rate.
    pub deduction_rate: Decimal,
    /// Decimal places of the smallest currency unit.
    pub decimal_places: u32,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            deduction_rate: DEFAULT_DEDUCTION_RATE,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

/// The complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Database connection settings.
    pub database: DatabaseConfig,
    /// Payroll computation settings.
    pub payroll: PayrollSettings,
}
