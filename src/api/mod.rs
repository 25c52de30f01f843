//! HTTP API module for the payroll backend.
//!
//! This module provides the REST endpoints for managing employees, previewing
//! and approving monthly payroll, and reading back approved runs.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EmployeeListQuery, PeriodQuery};
pub use response::{ApiError, ApiErrorResponse, ApprovalResponse, HealthResponse};
pub use state::AppState;
