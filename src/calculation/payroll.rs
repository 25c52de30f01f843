//! Payroll computation over a set of employees.
//!
//! This module turns employee records into payroll line items. It is pure:
//! no storage access, no clock, no randomness.

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, PayrollItem};

use super::DeductionPolicy;

/// The items and total produced for one payroll computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollComputation {
    /// One item per active employee, in input order.
    pub items: Vec<PayrollItem>,
    /// Sum of `net` over `items`.
    pub total_cost: Decimal,
}

/// Computes one employee's pay line.
///
/// `gross` is the employee's salary, widened to the policy's currency scale
/// when it has fewer decimal places. `net` is `gross - deductions` exactly.
///
/// # Examples
///
/// ```
/// use workflow_payroll::calculation::{calculate_pay, DeductionPolicy};
/// use workflow_payroll::models::{Employee, EmployeeStatus};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let employee = Employee {
///     id: 1,
///     name: "Ada Lovelace".to_string(),
///     role: Some("Engineer".to_string()),
///     department: None,
///     salary: Decimal::from(300000),
///     bank_account: None,
///     contract_path: None,
///     status: EmployeeStatus::Active,
/// };
///
/// let item = calculate_pay(&employee, &DeductionPolicy::default()).unwrap();
/// assert_eq!(item.deductions, Decimal::from_str("30000.00").unwrap());
/// assert_eq!(item.net, Decimal::from_str("270000.00").unwrap());
/// ```
///
/// # Errors
///
/// Returns `Validation` on `salary` if the amounts overflow `Decimal`.
pub fn calculate_pay(employee: &Employee, policy: &DeductionPolicy) -> PayrollResult<PayrollItem> {
    let gross = policy.widen(employee.salary);
    let deductions = policy.deduction_for(gross)?;
    let net = gross
        .checked_sub(deductions)
        .ok_or_else(|| out_of_range(employee))?;

    Ok(PayrollItem {
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        gross,
        deductions,
        net,
    })
}

/// Computes payroll for every active employee in `employees`.
///
/// Employees that are on leave or have exited are omitted, not zeroed. An
/// input with no active employees yields no items and a zero total.
///
/// # Examples
///
/// ```
/// use workflow_payroll::calculation::{calculate_payroll, DeductionPolicy};
/// use rust_decimal::Decimal;
///
/// let computation = calculate_payroll(&[], &DeductionPolicy::default()).unwrap();
/// assert!(computation.items.is_empty());
/// assert_eq!(computation.total_cost, Decimal::ZERO);
/// ```
///
/// # Errors
///
/// Returns `Validation` on `salary` if an item or the total overflows
/// `Decimal`. No partial computation is returned.
pub fn calculate_payroll(
    employees: &[Employee],
    policy: &DeductionPolicy,
) -> PayrollResult<PayrollComputation> {
    let items = employees
        .iter()
        .filter(|e| e.is_active())
        .map(|e| calculate_pay(e, policy))
        .collect::<PayrollResult<Vec<PayrollItem>>>()?;

    let total = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.net))
        .ok_or_else(|| {
            PayrollError::validation(
                "salary",
                format!(
                    "payroll total over {} employees exceeds the supported range",
                    items.len()
                ),
            )
        })?;

    Ok(PayrollComputation {
        items,
        total_cost: policy.widen(total),
    })
}

fn out_of_range(employee: &Employee) -> PayrollError {
    PayrollError::validation(
        "salary",
        format!(
            "pay for employee {} exceeds the supported range",
            employee.id
        ),
    )
}
