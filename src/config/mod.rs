//! Configuration loading and management for the payroll backend.
//!
//! This module loads the server, database and payroll settings from a YAML
//! file, with environment variables taking precedence.
//!
//! # Example
//!
//! ```no_run
//! use workflow_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll.yaml").unwrap();
//! println!("Database: {}", config.config().database.url);
//! ```

mod loader;
mod types;

pub use loader::{
    ConfigLoader, ENV_APP_HOST, ENV_APP_PORT, ENV_DATABASE_URL, ENV_DEDUCTION_RATE,
};
pub use types::{AppConfig, DatabaseConfig, PayrollSettings, ServerConfig};
