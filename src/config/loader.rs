//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the application
//! configuration from a YAML file and layering environment overrides on top.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::calculation::DeductionPolicy;
use crate::error::{PayrollError, PayrollResult};

use super::types::AppConfig;

/// Environment variable overriding [`DatabaseConfig::url`](super::DatabaseConfig).
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable overriding the listen host.
pub const ENV_APP_HOST: &str = "APP_HOST";
/// Environment variable overriding the listen port.
pub const ENV_APP_PORT: &str = "APP_PORT";
/// Environment variable overriding the default deduction rate.
pub const ENV_DEDUCTION_RATE: &str = "PAYROLL_DEDUCTION_RATE";

/// Loads and provides access to the application configuration.
///
/// # Example
///
/// ```no_run
/// use workflow_payroll::config::ConfigLoader;
///
/// let mut loader = ConfigLoader::load("./config/payroll.yaml")?;
/// loader.apply_env_overrides()?;
/// println!("Listening on {}", loader.config().server.bind_address());
/// # Ok::<(), workflow_payroll::error::PayrollError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from a YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file is not valid YAML for [`AppConfig`] (`ConfigParseError`)
    /// - The payroll settings are out of range (`Validation`)
    pub fn load<P: AsRef<Path>>(path: P) -> PayrollResult<Self> {
        let config = Self::load_yaml::<AppConfig>(path.as_ref())?;
        let loader = Self { config };
        loader.deduction_policy()?;
        Ok(loader)
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AppConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> PayrollResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| PayrollError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| PayrollError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> PayrollResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Recognised keys are [`ENV_DATABASE_URL`], [`ENV_APP_HOST`],
    /// [`ENV_APP_PORT`] and [`ENV_DEDUCTION_RATE`].
    pub fn apply_overrides<F>(&mut self, lookup: F) -> PayrollResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.config.database.url = url;
        }
        if let Some(host) = lookup(ENV_APP_HOST) {
            self.config.server.host = host;
        }
        if let Some(port) = lookup(ENV_APP_PORT) {
            self.config.server.port = port.parse().map_err(|_| PayrollError::ConfigParseError {
                path: ENV_APP_PORT.to_string(),
                message: format!("'{}' is not a valid port", port),
            })?;
        }
        if let Some(rate) = lookup(ENV_DEDUCTION_RATE) {
            self.config.payroll.deduction_rate =
                Decimal::from_str(&rate).map_err(|e| PayrollError::ConfigParseError {
                    path: ENV_DEDUCTION_RATE.to_string(),
                    message: e.to_string(),
                })?;
        }
        self.deduction_policy()?;
        Ok(())
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Builds the default deduction policy from the payroll settings.
    pub fn deduction_policy(&self) -> PayrollResult<DeductionPolicy> {
        DeductionPolicy::new(
            self.config.payroll.deduction_rate,
            self.config.payroll.decimal_places,
        )
    }
}
