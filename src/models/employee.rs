//! Employee model and related types.
//!
//! This module defines the [`Employee`] record, its [`EmployeeStatus`], and the
//! input types used to create and partially update employees.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// Largest monthly salary accepted on create or update (10^15).
pub const MAX_SALARY: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Employment status of an employee.
///
/// Only [`EmployeeStatus::Active`] employees are included in payroll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed and paid.
    #[default]
    Active,
    /// Employed but temporarily excluded from payroll.
    OnLeave,
    /// Employment has ended. The record is kept for payroll history.
    Exited,
}

impl EmployeeStatus {
    /// Returns the stored (and serialized) form of the status.
    ///
    /// # Examples
    ///
    /// ```
    /// use workflow_payroll::models::EmployeeStatus;
    ///
    /// assert_eq!(EmployeeStatus::OnLeave.as_str(), "on_leave");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::OnLeave => "on_leave",
            EmployeeStatus::Exited => "exited",
        }
    }

    /// Returns true if the employee is eligible for payroll.
    pub fn is_payable(&self) -> bool {
        *self == EmployeeStatus::Active
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeStatus {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EmployeeStatus::Active),
            "on_leave" => Ok(EmployeeStatus::OnLeave),
            "exited" => Ok(EmployeeStatus::Exited),
            other => Err(PayrollError::validation(
                "status",
                format!("unknown status '{}', expected active, on_leave or exited", other),
            )),
        }
    }
}

/// An employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier assigned by storage on creation.
    pub id: i64,
    /// Full name of the employee.
    pub name: String,
    /// Job role or title.
    pub role: Option<String>,
    /// Department name.
    pub department: Option<String>,
    /// Monthly gross salary.
    pub salary: Decimal,
    /// Opaque bank account reference.
    pub bank_account: Option<String>,
    /// Path to the stored contract or documents.
    pub contract_path: Option<String>,
    /// Current employment status.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee should be included in payroll.
    ///
    /// # Examples
    ///
    /// ```
    /// use workflow_payroll::models::{Employee, EmployeeStatus};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: 1,
    ///     name: "Ada Lovelace".to_string(),
    ///     role: None,
    ///     department: None,
    ///     salary: Decimal::from(5000),
    ///     bank_account: None,
    ///     contract_path: None,
    ///     status: EmployeeStatus::OnLeave,
    /// };
    /// assert!(!employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status.is_payable()
    }
}

/// Fields required to create an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmployee {
    /// Full name of the employee. Must not be blank.
    pub name: String,
    /// Job role or title.
    #[serde(default)]
    pub role: Option<String>,
    /// Department name.
    #[serde(default)]
    pub department: Option<String>,
    /// Monthly gross salary. Must not be negative.
    pub salary: Decimal,
    /// Opaque bank account reference.
    #[serde(default)]
    pub bank_account: Option<String>,
    /// Path to the stored contract or documents.
    #[serde(default)]
    pub contract_path: Option<String>,
    /// Initial status, `active` when omitted.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

impl NewEmployee {
    /// Creates an active employee input with only the required fields set.
    pub fn new(name: impl Into<String>, salary: Decimal) -> Self {
        Self {
            name: name.into(),
            role: None,
            department: None,
            salary,
            bank_account: None,
            contract_path: None,
            status: None,
        }
    }

    /// Checks required fields and ranges.
    pub fn validate(&self) -> PayrollResult<()> {
        validate_name(&self.name)?;
        validate_salary(self.salary)
    }
}

/// A partial update of an employee. Only `Some` fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New role.
    #[serde(default)]
    pub role: Option<String>,
    /// New department.
    #[serde(default)]
    pub department: Option<String>,
    /// New monthly gross salary.
    #[serde(default)]
    pub salary: Option<Decimal>,
    /// New bank account reference.
    #[serde(default)]
    pub bank_account: Option<String>,
    /// New contract path.
    #[serde(default)]
    pub contract_path: Option<String>,
    /// New status.
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

impl EmployeeUpdate {
    /// Checks the fields that were provided.
    pub fn validate(&self) -> PayrollResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(salary) = self.salary {
            validate_salary(salary)?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> PayrollResult<()> {
    if name.trim().is_empty() {
        return Err(PayrollError::validation("name", "must not be blank"));
    }
    Ok(())
}

fn validate_salary(salary: Decimal) -> PayrollResult<()> {
    if salary < Decimal::ZERO {
        return Err(PayrollError::validation(
            "salary",
            format!("must not be negative, got {}", salary),
        ));
    }
    if salary > MAX_SALARY {
        return Err(PayrollError::validation(
            "salary",
            format!("must be at most {}, got {}", MAX_SALARY, salary),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_status_serialization_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::OnLeave).unwrap(),
            "\"on_leave\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Exited).unwrap(),
            "\"exited\""
        );
    }

    #[test]
    fn test_status_parses_stored_form() {
        for status in [
            EmployeeStatus::Active,
            EmployeeStatus::OnLeave,
            EmployeeStatus::Exited,
        ] {
            assert_eq!(EmployeeStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_is_validation_error() {
        match EmployeeStatus::from_str("retired") {
            Err(PayrollError::Validation { field, .. }) => assert_eq!(field, "status"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_only_active_is_payable() {
        assert!(EmployeeStatus::Active.is_payable());
        assert!(!EmployeeStatus::OnLeave.is_payable());
        assert!(!EmployeeStatus::Exited.is_payable());
    }

    #[test]
    fn test_deserialize_new_employee_with_defaults() {
        let json = r#"{ "name": "Grace Hopper", "salary": "4200.50" }"#;

        let employee: NewEmployee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.name, "Grace Hopper");
        assert_eq!(employee.salary, dec("4200.50"));
        assert!(employee.role.is_none());
        assert!(employee.status.is_none());
    }

    #[test]
    fn test_new_employee_missing_salary_fails_to_deserialize() {
        let json = r#"{ "name": "Grace Hopper" }"#;
        let result: Result<NewEmployee, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let employee = NewEmployee::new("   ", dec("100"));
        match employee.validate() {
            Err(PayrollError::Validation { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let employee = NewEmployee::new("Alan Turing", dec("-0.01"));
        match employee.validate() {
            Err(PayrollError::Validation { field, .. }) => assert_eq!(field, "salary"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_salary_is_accepted() {
        assert!(NewEmployee::new("Volunteer", Decimal::ZERO).validate().is_ok());
    }

    #[test]
    fn test_salary_upper_bound_is_inclusive() {
        assert_eq!(MAX_SALARY, dec("1000000000000000"));
        assert!(NewEmployee::new("Top", MAX_SALARY).validate().is_ok());

        match NewEmployee::new("Over", MAX_SALARY + dec("0.01")).validate() {
            Err(PayrollError::Validation { field, .. }) => assert_eq!(field, "salary"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_update_validates_only_provided_fields() {
        assert!(EmployeeUpdate::default().validate().is_ok());

        let update = EmployeeUpdate {
            salary: Some(dec("-5")),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = EmployeeUpdate {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
