//! Payroll period model.
//!
//! This module contains the [`PayrollPeriod`] type identifying the month a
//! payroll run covers. A period can only be built through
//! [`PayrollPeriod::new`], so every value in circulation is in range.

use std::fmt;

use serde::Serialize;

use crate::error::{PayrollError, PayrollResult};

/// Earliest year accepted for a payroll period.
pub const MIN_PERIOD_YEAR: i32 = 1900;

/// Latest year accepted for a payroll period.
pub const MAX_PERIOD_YEAR: i32 = 9999;

/// A calendar month for which payroll is computed.
///
/// At most one payroll run may be approved per period.
///
/// # Example
///
/// ```
/// use workflow_payroll::models::PayrollPeriod;
///
/// let period = PayrollPeriod::new(1, 2026).unwrap();
/// assert_eq!(period.month(), 1);
/// assert_eq!(period.year(), 2026);
/// assert_eq!(period.to_string(), "2026-01");
///
/// assert!(PayrollPeriod::new(13, 2026).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PayrollPeriod {
    year: i32,
    month: u32,
}

impl PayrollPeriod {
    /// Creates a period, rejecting months outside 1..=12 and implausible years.
    pub fn new(month: u32, year: i32) -> PayrollResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::validation(
                "month",
                format!("must be between 1 and 12, got {}", month),
            ));
        }
        if !(MIN_PERIOD_YEAR..=MAX_PERIOD_YEAR).contains(&year) {
            return Err(PayrollError::validation(
                "year",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_PERIOD_YEAR, MAX_PERIOD_YEAR, year
                ),
            ));
        }
        Ok(Self { year, month })
    }

    /// The month, 1 through 12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The year.
    pub fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for PayrollPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
