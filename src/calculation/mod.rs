//! Calculation logic for payroll.
//!
//! This module contains the flat-rate deduction policy and the pure payroll
//! computation that maps employees to line items and a total cost.

mod deduction;
mod payroll;

pub use deduction::{
    DEFAULT_DECIMAL_PLACES, DEFAULT_DEDUCTION_RATE, DeductionPolicy, MAX_DECIMAL_PLACES,
    validate_rate,
};
pub use payroll::{PayrollComputation, calculate_pay, calculate_payroll};
