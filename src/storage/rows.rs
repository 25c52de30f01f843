//! Raw row shapes and their conversion into domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, EmployeeStatus, PayrollItem, PayrollRun};

pub(crate) const EMPLOYEE_COLUMNS: &str =
    "id, name, role, department, salary, bank_account, contract_path, status";

pub(crate) const RUN_COLUMNS: &str = "id, month, year, total_cost, deduction_rate, approved_at";

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct EmployeeRow {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub department: Option<String>,
    pub salary: String,
    pub bank_account: Option<String>,
    pub contract_path: Option<String>,
    pub status: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct RunRow {
    pub id: i64,
    pub month: i64,
    pub year: i64,
    pub total_cost: String,
    pub deduction_rate: String,
    pub approved_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub employee_id: i64,
    pub employee_name: String,
    pub gross: String,
    pub deductions: String,
    pub net: String,
}

pub(crate) fn parse_decimal(column: &'static str, value: &str) -> PayrollResult<Decimal> {
    Decimal::from_str(value).map_err(|_| PayrollError::CorruptRecord {
        column,
        value: value.to_string(),
    })
}

impl TryFrom<EmployeeRow> for Employee {
    type Error = PayrollError;

    fn try_from(row: EmployeeRow) -> PayrollResult<Self> {
        let salary = parse_decimal("salary", &row.salary)?;
        let status = EmployeeStatus::from_str(&row.status).map_err(|_| {
            PayrollError::CorruptRecord {
                column: "status",
                value: row.status.clone(),
            }
        })?;

        Ok(Employee {
            id: row.id,
            name: row.name,
            role: row.role,
            department: row.department,
            salary,
            bank_account: row.bank_account,
            contract_path: row.contract_path,
            status,
        })
    }
}

impl TryFrom<RunRow> for PayrollRun {
    type Error = PayrollError;

    fn try_from(row: RunRow) -> PayrollResult<Self> {
        let month = u32::try_from(row.month).map_err(|_| PayrollError::CorruptRecord {
            column: "month",
            value: row.month.to_string(),
        })?;
        let year = i32::try_from(row.year).map_err(|_| PayrollError::CorruptRecord {
            column: "year",
            value: row.year.to_string(),
        })?;

        Ok(PayrollRun {
            id: row.id,
            month,
            year,
            total_cost: parse_decimal("total_cost", &row.total_cost)?,
            deduction_rate: parse_decimal("deduction_rate", &row.deduction_rate)?,
            approved_at: row.approved_at,
        })
    }
}

impl TryFrom<ItemRow> for PayrollItem {
    type Error = PayrollError;

    fn try_from(row: ItemRow) -> PayrollResult<Self> {
        Ok(PayrollItem {
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            gross: parse_decimal("gross", &row.gross)?,
            deductions: parse_decimal("deductions", &row.deductions)?,
            net: parse_decimal("net", &row.net)?,
        })
    }
}
