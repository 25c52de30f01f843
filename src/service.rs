//! Payroll preview and approval.
//!
//! [`PayrollService`] joins the employee store, the calculator and the ledger.
//! A preview and an approval for the same period and rate run the exact same
//! computation; an approval never accepts items from the caller.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::calculation::{DeductionPolicy, PayrollComputation, calculate_payroll};
use crate::error::PayrollResult;
use crate::models::{PayrollPeriod, PayrollPreview, PayrollRun};
use crate::storage::{Database, EmployeeStore, PayrollLedger};

/// Computes and approves monthly payroll.
///
/// # Example
///
/// ```no_run
/// use workflow_payroll::calculation::DeductionPolicy;
/// use workflow_payroll::models::PayrollPeriod;
/// use workflow_payroll::service::PayrollService;
/// use workflow_payroll::storage::Database;
///
/// # async fn run() -> workflow_payroll::error::PayrollResult<()> {
/// let db = Database::connect_in_memory().await?;
/// db.migrate().await?;
/// let service = PayrollService::new(&db, DeductionPolicy::default());
///
/// let period = PayrollPeriod::new(1, 2025)?;
/// let preview = service.preview(period).await?;
/// let run = service.approve(period).await?;
/// assert_eq!(run.total_cost, preview.total_cost);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PayrollService {
    employees: EmployeeStore,
    ledger: PayrollLedger,
    policy: DeductionPolicy,
}

impl PayrollService {
    /// Creates a service over `db` using `policy` when no rate is given.
    pub fn new(db: &Database, policy: DeductionPolicy) -> Self {
        Self::from_parts(EmployeeStore::new(db), PayrollLedger::new(db), policy)
    }

    /// Creates a service from existing stores.
    pub fn from_parts(employees: EmployeeStore, ledger: PayrollLedger, policy: DeductionPolicy) -> Self {
        Self {
            employees,
            ledger,
            policy,
        }
    }

    /// The default deduction policy.
    pub fn policy(&self) -> DeductionPolicy {
        self.policy
    }

    /// The employee store this service reads from.
    pub fn employees(&self) -> &EmployeeStore {
        &self.employees
    }

    /// The ledger this service writes to.
    pub fn ledger(&self) -> &PayrollLedger {
        &self.ledger
    }

    /// Previews payroll for `period` at the default rate.
    pub async fn preview(&self, period: PayrollPeriod) -> PayrollResult<PayrollPreview> {
        self.preview_with_policy(period, self.policy).await
    }

    /// Previews payroll for `period` at an explicit `rate`.
    pub async fn preview_with_rate(
        &self,
        period: PayrollPeriod,
        rate: Decimal,
    ) -> PayrollResult<PayrollPreview> {
        let policy = self.policy.with_rate(rate)?;
        self.preview_with_policy(period, policy).await
    }

    /// Approves payroll for `period` at the default rate.
    pub async fn approve(&self, period: PayrollPeriod) -> PayrollResult<PayrollRun> {
        self.approve_with_policy(period, self.policy).await
    }

    /// Approves payroll for `period` at an explicit `rate`.
    pub async fn approve_with_rate(
        &self,
        period: PayrollPeriod,
        rate: Decimal,
    ) -> PayrollResult<PayrollRun> {
        let policy = self.policy.with_rate(rate)?;
        self.approve_with_policy(period, policy).await
    }

    #[instrument(skip(self, period, policy), fields(period = %period, rate = %policy.rate()))]
    async fn preview_with_policy(
        &self,
        period: PayrollPeriod,
        policy: DeductionPolicy,
    ) -> PayrollResult<PayrollPreview> {
        let computation = self.compute(&policy).await?;
        info!(
            employees = computation.items.len(),
            total_cost = %computation.total_cost,
            "Payroll previewed"
        );
        Ok(PayrollPreview::new(
            period,
            policy.rate(),
            computation.total_cost,
            computation.items,
        ))
    }

    #[instrument(skip(self, period, policy), fields(period = %period, rate = %policy.rate()))]
    async fn approve_with_policy(
        &self,
        period: PayrollPeriod,
        policy: DeductionPolicy,
    ) -> PayrollResult<PayrollRun> {
        let computation = self.compute(&policy).await?;
        let run = self.ledger.save(period, policy.rate(), &computation).await?;
        info!(
            payroll_id = run.id,
            employees = computation.items.len(),
            total_cost = %run.total_cost,
            "Payroll approved"
        );
        Ok(run)
    }

    async fn compute(&self, policy: &DeductionPolicy) -> PayrollResult<PayrollComputation> {
        let active = self.employees.list_active().await?;
        calculate_payroll(&active, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::error::PayrollError;
    use crate::models::{EmployeeStatus, EmployeeUpdate, NewEmployee};
    use std::path::Path;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn period(month: u32, year: i32) -> PayrollPeriod {
        PayrollPeriod::new(month, year).unwrap()
    }

    async fn service() -> PayrollService {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        PayrollService::new(&db, DeductionPolicy::default())
    }

    async fn hire(service: &PayrollService, name: &str, salary: &str) -> i64 {
        service
            .employees()
            .create(NewEmployee::new(name, dec(salary)))
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_preview_with_no_employees_is_empty() {
        let service = service().await;
        let preview = service.preview(period(1, 2025)).await.unwrap();
        assert!(preview.items.is_empty());
        assert_eq!(preview.total_cost, Decimal::ZERO);
        assert_eq!(preview.deduction_rate, dec("0.10"));
    }

    #[tokio::test]
    async fn test_preview_is_deterministic_and_unsaved() {
        let service = service().await;
        hire(&service, "Ada", "300000").await;
        hire(&service, "Grace", "1234.55").await;

        let first = service.preview(period(3, 2025)).await.unwrap();
        let second = service.preview(period(3, 2025)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.total_cost, dec("271111.09"));
        assert!(service.ledger().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_on_leave_employee_is_excluded() {
        let service = service().await;
        hire(&service, "Ada", "300000").await;
        let mut on_leave = NewEmployee::new("Bob", dec("100000"));
        on_leave.status = Some(EmployeeStatus::OnLeave);
        service.employees().create(on_leave).await.unwrap();

        let preview = service.preview(period(1, 2025)).await.unwrap();
        assert_eq!(preview.items.len(), 1);
        assert_eq!(preview.total_cost, dec("270000"));
    }

    #[tokio::test]
    async fn test_terminated_employee_is_excluded() {
        let service = service().await;
        let ada = hire(&service, "Ada", "1000").await;
        hire(&service, "Grace", "2000").await;
        service.employees().terminate(ada).await.unwrap();

        let preview = service.preview(period(2, 2025)).await.unwrap();
        assert_eq!(preview.items.len(), 1);
        assert_eq!(preview.items[0].employee_name, "Grace");
    }

    #[tokio::test]
    async fn test_approve_matches_preview() {
        let service = service().await;
        hire(&service, "Ada", "300000").await;
        let p = period(4, 2025);

        let preview = service.preview(p).await.unwrap();
        let run = service.approve(p).await.unwrap();
        assert_eq!(run.total_cost, preview.total_cost);

        let detail = service.ledger().get(run.id).await.unwrap();
        assert_eq!(detail.items, preview.items);
    }

    #[tokio::test]
    async fn test_second_approve_conflicts_and_keeps_first_run() {
        let service = service().await;
        let ada = hire(&service, "Ada", "1000").await;
        let p = period(5, 2025);
        let first = service.approve(p).await.unwrap();
        let before = service.ledger().get(first.id).await.unwrap();

        service
            .employees()
            .update(
                ada,
                EmployeeUpdate {
                    salary: Some(dec("5000")),
                    ..EmployeeUpdate::default()
                },
            )
            .await
            .unwrap();

        match service.approve(p).await {
            Err(PayrollError::Conflict {
                existing_run_id, ..
            }) => assert_eq!(existing_run_id, Some(first.id)),
            other => panic!("Expected Conflict, got {:?}", other),
        }

        assert_eq!(service.ledger().get(first.id).await.unwrap(), before);
        assert_eq!(service.ledger().list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_approvals_commit_once() {
        let service = service().await;
        hire(&service, "Ada", "1000").await;
        let p = period(7, 2025);

        let (a, b) = tokio::join!(service.approve(p), service.approve(p));

        let ok = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(ok, 1);
        assert!(matches!(a.err().or(b.err()), Some(PayrollError::Conflict { .. })));
        assert_eq!(service.ledger().list().await.unwrap().len(), 1);
    }

    fn remove_database_files(path: &Path) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.as_os_str().to_owned();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_approvals_on_shared_file_commit_once() {
        let path = std::env::temp_dir().join(format!("workflow-payroll-{}.db", uuid::Uuid::new_v4()));
        let config = DatabaseConfig {
            url: format!("sqlite://{}", path.display()),
            max_connections: 8,
        };
        let db = Database::connect(&config).await.unwrap();
        db.migrate().await.unwrap();
        let service = PayrollService::new(&db, DeductionPolicy::default());
        hire(&service, "Ada", "1000").await;
        hire(&service, "Grace", "2500.50").await;
        let p = period(3, 2025);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.approve(p).await })
            })
            .collect();

        let mut ok = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(PayrollError::Conflict { existing_run_id, .. }) => {
                    assert!(existing_run_id.is_some());
                    conflicts += 1;
                }
                Err(other) => panic!("Expected Ok or Conflict, got {:?}", other),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(conflicts, 15);

        let runs = service.ledger().list().await.unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(service.ledger().get(runs[0].id).await.unwrap().items.len(), 2);

        db.pool().close().await;
        remove_database_files(&path);
    }

    #[tokio::test]
    async fn test_rate_override_is_applied_and_recorded() {
        let service = service().await;
        hire(&service, "Ada", "1000").await;
        let p = period(8, 2025);

        let preview = service.preview_with_rate(p, dec("0.25")).await.unwrap();
        assert_eq!(preview.items[0].deductions, dec("250.00"));

        let run = service.approve_with_rate(p, dec("0.25")).await.unwrap();
        assert_eq!(run.deduction_rate, dec("0.25"));
        assert_eq!(run.total_cost, dec("750.00"));
    }

    #[tokio::test]
    async fn test_invalid_rate_is_rejected_before_saving() {
        let service = service().await;
        let p = period(9, 2025);
        let result = service.approve_with_rate(p, dec("2")).await;
        assert!(matches!(result, Err(PayrollError::Validation { .. })));
        assert!(service.ledger().find_by_period(p).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_approving_different_periods_is_allowed() {
        let service = service().await;
        hire(&service, "Ada", "1000").await;
        service.approve(period(1, 2025)).await.unwrap();
        service.approve(period(2, 2025)).await.unwrap();
        assert_eq!(service.ledger().list().await.unwrap().len(), 2);
    }
}
