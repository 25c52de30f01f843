//! Payroll result models.
//!
//! This module contains the per-employee [`PayrollItem`], the unsaved
//! [`PayrollPreview`], and the persisted [`PayrollRun`] with its
//! [`PayrollRunDetail`] view.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayrollPeriod;

/// One employee's computed pay within a preview or an approved run.
///
/// Amounts are snapshots taken at computation time: `gross` is the salary the
/// employee had then, and `net` is always `gross - deductions`.
///
/// # Example
///
/// ```
/// use workflow_payroll::models::PayrollItem;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let item = PayrollItem {
///     employee_id: 1,
///     employee_name: "Ada Lovelace".to_string(),
///     gross: Decimal::from_str("3000.00").unwrap(),
///     deductions: Decimal::from_str("300.00").unwrap(),
///     net: Decimal::from_str("2700.00").unwrap(),
/// };
/// assert!(item.is_balanced());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollItem {
    /// The employee this line belongs to.
    pub employee_id: i64,
    /// The employee's name, for display.
    pub employee_name: String,
    /// Gross pay, equal to the employee's salary at computation time.
    pub gross: Decimal,
    /// Amount withheld.
    pub deductions: Decimal,
    /// Take-home pay.
    pub net: Decimal,
}

impl PayrollItem {
    /// Returns true if `net == gross - deductions`.
    pub fn is_balanced(&self) -> bool {
        self.net == self.gross - self.deductions
    }
}

/// An unsaved projection of what a payroll run for a period would contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPreview {
    /// The month covered.
    pub month: u32,
    /// The year covered.
    pub year: i32,
    /// The deduction rate applied to every item.
    pub deduction_rate: Decimal,
    /// Sum of `net` over all items.
    pub total_cost: Decimal,
    /// One line per active employee.
    pub items: Vec<PayrollItem>,
}

impl PayrollPreview {
    /// Builds a preview for `period` from computed items and their total.
    pub fn new(
        period: PayrollPeriod,
        deduction_rate: Decimal,
        total_cost: Decimal,
        items: Vec<PayrollItem>,
    ) -> Self {
        Self {
            month: period.month(),
            year: period.year(),
            deduction_rate,
            total_cost,
            items,
        }
    }
}

/// The header of an approved, persisted payroll run.
///
/// Runs are immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Identifier assigned by storage.
    pub id: i64,
    /// The month covered.
    pub month: u32,
    /// The year covered.
    pub year: i32,
    /// Sum of `net` over the run's items.
    pub total_cost: Decimal,
    /// The deduction rate the run was computed with.
    pub deduction_rate: Decimal,
    /// When the run was approved.
    pub approved_at: DateTime<Utc>,
}

/// A payroll run together with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRunDetail {
    /// The run header.
    #[serde(flatten)]
    pub run: PayrollRun,
    /// The run's line items, in insertion order.
    pub items: Vec<PayrollItem>,
}
