//! Persistence for employees and approved payroll runs.
//!
//! A [`Database`] wraps one SQLite connection pool. It is built by the entry
//! point, migrated once, and handed to each store by cloning. Money columns
//! are TEXT holding the decimal's string form, so nothing is lost to floats.
//!
//! # Example
//!
//! ```no_run
//! use workflow_payroll::storage::{Database, EmployeeStore};
//!
//! # async fn run() -> workflow_payroll::error::PayrollResult<()> {
//! let db = Database::connect_in_memory().await?;
//! db.migrate().await?;
//! let employees = EmployeeStore::new(&db);
//! assert!(employees.list(None).await?.is_empty());
//! # Ok(())
//! # }
//! ```

mod employees;
mod ledger;
mod rows;

use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{debug, info};

use crate::config::DatabaseConfig;
use crate::error::PayrollResult;

pub use employees::EmployeeStore;
pub use ledger::PayrollLedger;

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// A handle to the SQLite connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens a pool for the configured URL, creating the file if needed.
    ///
    /// For [`IN_MEMORY_URL`] this is [`connect_in_memory`](Self::connect_in_memory)
    /// and `max_connections` is ignored.
    pub async fn connect(config: &DatabaseConfig) -> PayrollResult<Self> {
        if config.url == IN_MEMORY_URL {
            debug!(
                max_connections = config.max_connections,
                "In-memory database uses one connection; max_connections ignored"
            );
            return Self::connect_in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await?;

        info!(url = %config.url, max_connections = config.max_connections, "Database pool opened");
        Ok(Self { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// Each SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn connect_in_memory() -> PayrollResult<Self> {
        let options = SqliteConnectOptions::from_str(IN_MEMORY_URL)?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> PayrollResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
