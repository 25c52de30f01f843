//! Request types for the payroll API.
//!
//! Bodies for employee writes reuse [`NewEmployee`](crate::models::NewEmployee)
//! and [`EmployeeUpdate`](crate::models::EmployeeUpdate) directly; this module
//! holds the query-string shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayrollResult;
use crate::models::{EmployeeStatus, PayrollPeriod};

/// Query string for `/payroll/preview` and `/payroll/approve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// Month, 1 to 12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
    /// Optional deduction rate overriding the configured default.
    #[serde(default)]
    pub rate: Option<Decimal>,
}

impl PeriodQuery {
    /// Validates the month and year into a [`PayrollPeriod`].
    pub fn period(&self) -> PayrollResult<PayrollPeriod> {
        PayrollPeriod::new(self.month, self.year)
    }
}

/// Query string for `GET /employees`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeListQuery {
    /// Only list employees with this status.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}
