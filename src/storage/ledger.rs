//! Approved payroll runs and their line items.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};

use crate::calculation::PayrollComputation;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayrollItem, PayrollPeriod, PayrollRun, PayrollRunDetail};

use super::Database;
use super::rows::{ItemRow, RUN_COLUMNS, RunRow};

/// The record of approved payroll runs.
///
/// Runs are written once and never changed. The `UNIQUE (year, month)`
/// constraint on `payroll_runs` is what guarantees a single run per period,
/// including under concurrent approvals.
#[derive(Debug, Clone)]
pub struct PayrollLedger {
    pool: SqlitePool,
}

impl PayrollLedger {
    /// Creates a ledger over the given database.
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    /// Persists a run header and all of its items in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the period already has a run. Nothing is written
    /// in that case, nor when any item insert fails.
    #[instrument(skip(self, period, computation), fields(period = %period, items = computation.items.len()))]
    pub async fn save(
        &self,
        period: PayrollPeriod,
        deduction_rate: Decimal,
        computation: &PayrollComputation,
    ) -> PayrollResult<PayrollRun> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, RunRow>(&format!(
            "INSERT INTO payroll_runs (month, year, total_cost, deduction_rate, approved_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING {RUN_COLUMNS}"
        ))
        .bind(i64::from(period.month()))
        .bind(i64::from(period.year()))
        .bind(computation.total_cost.to_string())
        .bind(deduction_rate.to_string())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await;

        let header = match inserted {
            Ok(row) => row,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tx.rollback().await?;
                let existing_run_id = self.find_by_period(period).await?.map(|run| run.id);
                warn!(period = %period, ?existing_run_id, "Payroll period already approved");
                return Err(PayrollError::Conflict {
                    month: period.month(),
                    year: period.year(),
                    existing_run_id,
                });
            }
            Err(e) => return Err(e.into()),
        };

        for item in &computation.items {
            sqlx::query(
                "INSERT INTO payroll_items (payroll_id, employee_id, gross, deductions, net) \
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(header.id)
            .bind(item.employee_id)
            .bind(item.gross.to_string())
            .bind(item.deductions.to_string())
            .bind(item.net.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        let run = PayrollRun::try_from(header)?;
        info!(
            payroll_id = run.id,
            total_cost = %run.total_cost,
            "Payroll run saved"
        );
        Ok(run)
    }

    /// Lists all runs, newest period first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> PayrollResult<Vec<PayrollRun>> {
        let rows = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {RUN_COLUMNS} FROM payroll_runs ORDER BY year DESC, month DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PayrollRun::try_from).collect()
    }

    /// Fetches a run together with its items, in the order they were saved.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> PayrollResult<PayrollRunDetail> {
        let header = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {RUN_COLUMNS} FROM payroll_runs WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(PayrollError::NotFound {
            entity: "payroll run",
            id,
        })?;

        let items = sqlx::query_as::<_, ItemRow>(
            "SELECT pi.employee_id, e.name AS employee_name, pi.gross, pi.deductions, pi.net \
             FROM payroll_items pi \
             JOIN employees e ON e.id = pi.employee_id \
             WHERE pi.payroll_id = ? \
             ORDER BY pi.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(PayrollItem::try_from)
        .collect::<PayrollResult<Vec<_>>>()?;

        Ok(PayrollRunDetail {
            run: header.try_into()?,
            items,
        })
    }

    /// Returns the run for a period, if one has been approved.
    #[instrument(skip(self))]
    pub async fn find_by_period(&self, period: PayrollPeriod) -> PayrollResult<Option<PayrollRun>> {
        let row = sqlx::query_as::<_, RunRow>(&format!(
            "SELECT {RUN_COLUMNS} FROM payroll_runs WHERE month = ? AND year = ?"
        ))
        .bind(i64::from(period.month()))
        .bind(i64::from(period.year()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(PayrollRun::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{DeductionPolicy, calculate_payroll};
    use crate::models::NewEmployee;
    use crate::storage::EmployeeStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    async fn setup() -> (Database, EmployeeStore, PayrollLedger) {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let employees = EmployeeStore::new(&db);
        let ledger = PayrollLedger::new(&db);
        (db, employees, ledger)
    }

    async fn computation(employees: &EmployeeStore) -> PayrollComputation {
        let active = employees.list_active().await.unwrap();
        calculate_payroll(&active, &DeductionPolicy::default()).unwrap()
    }

    #[tokio::test]
    async fn test_save_and_get_round_trip() {
        let (_db, employees, ledger) = setup().await;
        employees
            .create(NewEmployee::new("Ada", dec("300000")))
            .await
            .unwrap();
        employees
            .create(NewEmployee::new("Grace", dec("1234.55")))
            .await
            .unwrap();
        let computed = computation(&employees).await;
        let period = PayrollPeriod::new(1, 2025).unwrap();

        let run = ledger.save(period, dec("0.10"), &computed).await.unwrap();
        assert_eq!(run.month, 1);
        assert_eq!(run.year, 2025);
        assert_eq!(run.total_cost, computed.total_cost);
        assert_eq!(run.deduction_rate, dec("0.10"));

        let detail = ledger.get(run.id).await.unwrap();
        assert_eq!(detail.run, run);
        assert_eq!(detail.items, computed.items);
        assert_eq!(detail.items[1].deductions.to_string(), "123.46");
    }

    #[tokio::test]
    async fn test_second_save_for_period_conflicts_and_writes_nothing() {
        let (db, employees, ledger) = setup().await;
        employees
            .create(NewEmployee::new("Ada", dec("1000")))
            .await
            .unwrap();
        let computed = computation(&employees).await;
        let period = PayrollPeriod::new(6, 2025).unwrap();

        let first = ledger.save(period, dec("0.10"), &computed).await.unwrap();
        match ledger.save(period, dec("0.10"), &computed).await {
            Err(PayrollError::Conflict {
                month,
                year,
                existing_run_id,
            }) => {
                assert_eq!((month, year), (6, 2025));
                assert_eq!(existing_run_id, Some(first.id));
            }
            other => panic!("Expected Conflict, got {:?}", other),
        }

        let item_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payroll_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(item_count, 1);
        assert_eq!(ledger.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_item_insert_rolls_back_header() {
        let (_db, _employees, ledger) = setup().await;
        let computed = PayrollComputation {
            items: vec![PayrollItem {
                employee_id: 404,
                employee_name: "Nobody".to_string(),
                gross: dec("1.00"),
                deductions: dec("0.10"),
                net: dec("0.90"),
            }],
            total_cost: dec("0.90"),
        };
        let period = PayrollPeriod::new(2, 2025).unwrap();

        let result = ledger.save(period, dec("0.10"), &computed).await;
        assert!(matches!(result, Err(PayrollError::Storage(_))));
        assert!(ledger.find_by_period(period).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (_db, _employees, ledger) = setup().await;
        let empty = PayrollComputation {
            items: Vec::new(),
            total_cost: dec("0.00"),
        };
        for (month, year) in [(12, 2024), (3, 2025), (1, 2025)] {
            let period = PayrollPeriod::new(month, year).unwrap();
            ledger.save(period, dec("0.10"), &empty).await.unwrap();
        }

        let periods: Vec<(u32, i32)> = ledger
            .list()
            .await
            .unwrap()
            .iter()
            .map(|run| (run.month, run.year))
            .collect();
        assert_eq!(periods, vec![(3, 2025), (1, 2025), (12, 2024)]);
    }

    #[tokio::test]
    async fn test_get_unknown_run_is_not_found() {
        let (_db, _employees, ledger) = setup().await;
        assert!(matches!(
            ledger.get(42).await,
            Err(PayrollError::NotFound {
                entity: "payroll run",
                id: 42
            })
        ));
    }

    #[tokio::test]
    async fn test_deleting_run_cascades_to_items() {
        let (db, employees, ledger) = setup().await;
        employees
            .create(NewEmployee::new("Ada", dec("1000")))
            .await
            .unwrap();
        let computed = computation(&employees).await;
        let run = ledger
            .save(PayrollPeriod::new(4, 2025).unwrap(), dec("0.10"), &computed)
            .await
            .unwrap();

        sqlx::query("DELETE FROM payroll_runs WHERE id = ?")
            .bind(run.id)
            .execute(db.pool())
            .await
            .unwrap();

        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payroll_items")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_items_keep_snapshot_after_salary_change() {
        let (_db, employees, ledger) = setup().await;
        let ada = employees
            .create(NewEmployee::new("Ada", dec("1000")))
            .await
            .unwrap();
        let computed = computation(&employees).await;
        let run = ledger
            .save(PayrollPeriod::new(5, 2025).unwrap(), dec("0.10"), &computed)
            .await
            .unwrap();

        employees
            .update(
                ada.id,
                crate::models::EmployeeUpdate {
                    salary: Some(dec("9999")),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let detail = ledger.get(run.id).await.unwrap();
        assert_eq!(detail.items[0].gross, dec("1000.00"));
    }
}
