//! Core data models for the payroll backend.
//!
//! This module contains all the domain models used throughout the crate.

mod employee;
mod pay_period;
mod payroll;

pub use employee::{Employee, EmployeeStatus, EmployeeUpdate, MAX_SALARY, NewEmployee};
pub use pay_period::{MAX_PERIOD_YEAR, MIN_PERIOD_YEAR, PayrollPeriod};
pub use payroll::{PayrollItem, PayrollPreview, PayrollRun, PayrollRunDetail};
