//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::service::PayrollService;
use crate::storage::{EmployeeStore, PayrollLedger};

/// Shared application state.
///
/// Holds the payroll service, which in turn owns the employee store and the
/// ledger. Cloning is cheap; every clone shares one connection pool.
#[derive(Clone)]
pub struct AppState {
    service: Arc<PayrollService>,
}

impl AppState {
    /// Creates a new application state around the given service.
    pub fn new(service: PayrollService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Returns the payroll service.
    pub fn service(&self) -> &PayrollService {
        &self.service
    }

    /// Returns the employee store.
    pub fn employees(&self) -> &EmployeeStore {
        self.service.employees()
    }

    /// Returns the payroll ledger.
    pub fn ledger(&self) -> &PayrollLedger {
        self.service.ledger()
    }
}
