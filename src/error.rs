//! Error types for the payroll backend.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the stores, the calculator and the payroll service
//! can report.

use thiserror::Error;

/// The main error type for the payroll backend.
///
/// Caller errors (`NotFound`, `Validation`, `Conflict`) carry enough detail
/// for a client to correct or retry the request. Everything else is an
/// infrastructure failure.
///
/// # Example
///
/// ```
/// use workflow_payroll::error::PayrollError;
///
/// let error = PayrollError::NotFound {
///     entity: "employee",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "employee 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum PayrollError {
    /// A referenced employee or payroll run does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: i64,
    },

    /// A request field was missing or out of range.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A payroll run already exists for the requested period.
    #[error("Payroll for {month:02}/{year} has already been approved")]
    Conflict {
        /// The month of the period.
        month: u32,
        /// The year of the period.
        year: i32,
        /// The identifier of the run that already owns the period, if it could be read.
        existing_run_id: Option<i64>,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A stored value could not be decoded into its domain type.
    #[error("Corrupt value in column '{column}': {value}")]
    CorruptRecord {
        /// The column holding the bad value.
        column: &'static str,
        /// The raw value read from storage.
        value: String,
    },

    /// The database rejected or failed a query.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Schema migrations could not be applied.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl PayrollError {
    /// Shorthand for building a [`PayrollError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return PayrollError.
pub type PayrollResult<T> = Result<T, PayrollError>;
