//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints and the
//! router that wires them together.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::{EmployeeUpdate, NewEmployee};

use super::request::{EmployeeListQuery, PeriodQuery};
use super::response::{ApiError, ApiErrorResponse, ApprovalResponse, HealthResponse};
use super::state::AppState;

type ApiResult<T> = Result<T, ApiErrorResponse>;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(terminate_employee_handler),
        )
        .route("/payroll/preview", get(preview_handler))
        .route("/payroll/approve", post(approve_handler))
        .route("/payrolls", get(list_payrolls_handler))
        .route("/payrolls/:id", get(get_payroll_handler))
        .with_state(state)
}

/// Maps a body rejection to an error response.
fn json_rejection(rejection: JsonRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

/// Maps a query-string rejection to an error response.
fn query_rejection(rejection: QueryRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid query string"
    );
    ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
}

/// Maps a path rejection (e.g. a non-numeric id) to an error response.
fn path_rejection(rejection: PathRejection, correlation_id: Uuid) -> ApiErrorResponse {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Invalid path parameter"
    );
    ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
}

/// Handler for GET /health.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Handler for GET /employees.
async fn list_employees_handler(
    State(state): State<AppState>,
    query: Result<Query<EmployeeListQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| query_rejection(r, correlation_id))?;

    let employees = state.employees().list(query.status).await?;
    info!(
        correlation_id = %correlation_id,
        status = ?query.status,
        count = employees.len(),
        "Employees listed"
    );
    Ok(Json(employees))
}

/// Handler for POST /employees.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<NewEmployee>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing create employee request");
    let Json(new) = payload.map_err(|r| json_rejection(r, correlation_id))?;

    let employee = state.employees().create(new).await.inspect_err(|err| {
        warn!(correlation_id = %correlation_id, error = %err, "Create employee failed")
    })?;
    info!(
        correlation_id = %correlation_id,
        employee_id = employee.id,
        "Employee created"
    );
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|r| path_rejection(r, correlation_id))?;

    let employee = state.employees().get(id).await?;
    Ok(Json(employee))
}

/// Handler for PUT /employees/:id.
///
/// Only fields present in the body are changed.
async fn update_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|r| path_rejection(r, correlation_id))?;
    let Json(update) = payload.map_err(|r| json_rejection(r, correlation_id))?;

    let employee = state.employees().update(id, update).await.inspect_err(|err| {
        warn!(correlation_id = %correlation_id, employee_id = id, error = %err, "Update employee failed")
    })?;
    info!(correlation_id = %correlation_id, employee_id = id, "Employee updated");
    Ok(Json(employee))
}

/// Handler for DELETE /employees/:id.
///
/// Terminates rather than deletes; the employee is returned with status
/// `exited`.
async fn terminate_employee_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|r| path_rejection(r, correlation_id))?;

    let employee = state.employees().terminate(id).await?;
    info!(correlation_id = %correlation_id, employee_id = id, "Employee terminated");
    Ok(Json(employee))
}

/// Handler for GET /payroll/preview.
async fn preview_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| query_rejection(r, correlation_id))?;
    let period = query.period()?;

    let service = state.service();
    let preview = match query.rate {
        Some(rate) => service.preview_with_rate(period, rate).await?,
        None => service.preview(period).await?,
    };
    info!(
        correlation_id = %correlation_id,
        period = %period,
        items = preview.items.len(),
        total_cost = %preview.total_cost,
        "Payroll preview served"
    );
    Ok(Json(preview))
}

/// Handler for POST /payroll/approve.
///
/// Recomputes the payroll server-side and persists it. A second approval for
/// the same period answers 409.
async fn approve_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Query(query) = query.map_err(|r| query_rejection(r, correlation_id))?;
    let period = query.period()?;
    info!(correlation_id = %correlation_id, period = %period, "Processing payroll approval");

    let service = state.service();
    let result = match query.rate {
        Some(rate) => service.approve_with_rate(period, rate).await,
        None => service.approve(period).await,
    };
    let run = result.inspect_err(|err| {
        warn!(correlation_id = %correlation_id, period = %period, error = %err, "Payroll approval failed")
    })?;

    info!(
        correlation_id = %correlation_id,
        payroll_id = run.id,
        total_cost = %run.total_cost,
        "Payroll approved"
    );
    Ok((
        StatusCode::CREATED,
        Json(ApprovalResponse {
            payroll_id: run.id,
            message: format!("Payroll for {} approved", period),
        }),
    ))
}

/// Handler for GET /payrolls.
async fn list_payrolls_handler(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let runs = state.ledger().list().await?;
    Ok(Json(runs))
}

/// Handler for GET /payrolls/:id.
async fn get_payroll_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<impl IntoResponse> {
    let correlation_id = Uuid::new_v4();
    let Path(id) = id.map_err(|r| path_rejection(r, correlation_id))?;

    let detail = state.ledger().get(id).await?;
    Ok(Json(detail))
}
