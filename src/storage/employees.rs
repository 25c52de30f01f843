//! Employee records.

use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, EmployeeStatus, EmployeeUpdate, NewEmployee};

use super::Database;
use super::rows::{EMPLOYEE_COLUMNS, EmployeeRow};

/// Create, read, update and terminate employees.
///
/// Employees are never deleted; [`terminate`](Self::terminate) moves them to
/// [`EmployeeStatus::Exited`] so past payroll items keep their reference.
#[derive(Debug, Clone)]
pub struct EmployeeStore {
    pool: SqlitePool,
}

impl EmployeeStore {
    /// Creates a store over the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Inserts a new employee. Status defaults to active.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewEmployee) -> PayrollResult<Employee> {
        new.validate()?;
        let status = new.status.unwrap_or_default();

        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "INSERT INTO employees (name, role, department, salary, bank_account, contract_path, status) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(new.name.trim())
        .bind(new.role)
        .bind(new.department)
        .bind(new.salary.to_string())
        .bind(new.bank_account)
        .bind(new.contract_path)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        let employee = Employee::try_from(row)?;
        info!(employee_id = employee.id, status = %employee.status, "Employee created");
        Ok(employee)
    }

    /// Lists employees ordered by id, optionally only those with `status`.
    #[instrument(skip(self))]
    pub async fn list(&self, status: Option<EmployeeStatus>) -> PayrollResult<Vec<Employee>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, EmployeeRow>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE status = ? ORDER BY id"
                ))
                .bind(status.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, EmployeeRow>(&format!(
                    "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = rows.len(), "Employees listed");
        rows.into_iter().map(Employee::try_from).collect()
    }

    /// Lists the employees that are paid in a payroll run, ordered by id.
    pub async fn list_active(&self) -> PayrollResult<Vec<Employee>> {
        self.list(Some(EmployeeStatus::Active)).await
    }

    /// Fetches one employee.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> PayrollResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or(PayrollError::NotFound {
            entity: "employee",
            id,
        })?
        .try_into()
    }

    /// Applies the provided fields of `update`; absent fields are unchanged.
    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i64, update: EmployeeUpdate) -> PayrollResult<Employee> {
        update.validate()?;

        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "UPDATE employees SET \
                 name = COALESCE(?, name), \
                 role = COALESCE(?, role), \
                 department = COALESCE(?, department), \
                 salary = COALESCE(?, salary), \
                 bank_account = COALESCE(?, bank_account), \
                 contract_path = COALESCE(?, contract_path), \
                 status = COALESCE(?, status) \
             WHERE id = ? \
             RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(update.name.as_deref().map(str::trim))
        .bind(update.role)
        .bind(update.department)
        .bind(update.salary.map(|salary| salary.to_string()))
        .bind(update.bank_account)
        .bind(update.contract_path)
        .bind(update.status.map(|status| status.as_str()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let employee: Employee = row
            .ok_or(PayrollError::NotFound {
                entity: "employee",
                id,
            })?
            .try_into()?;
        info!(employee_id = id, "Employee updated");
        Ok(employee)
    }

    /// Marks an employee as exited. Terminating twice is not an error.
    #[instrument(skip(self))]
    pub async fn terminate(&self, id: i64) -> PayrollResult<Employee> {
        let row = sqlx::query_as::<_, EmployeeRow>(&format!(
            "UPDATE employees SET status = ? WHERE id = ? RETURNING {EMPLOYEE_COLUMNS}"
        ))
        .bind(EmployeeStatus::Exited.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let employee: Employee = row
            .ok_or(PayrollError::NotFound {
                entity: "employee",
                id,
            })?
            .try_into()?;
        info!(employee_id = id, "Employee terminated");
        Ok(employee)
    }
}
