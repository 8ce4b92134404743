use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quotedesk_core::assignment::AssignmentError;
use quotedesk_core::error::CoreError;
use quotedesk_db::StoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`], [`AssignmentError`], [`StoreError`] and
/// `sqlx::Error` and adds HTTP-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A typed assignment outcome from the resolver or the guarded write.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Assignment(err) => classify_assignment_error(err),
            AppError::Store(store) => match store {
                StoreError::Core(core) => classify_core_error(core),
                StoreError::Assignment(err) => classify_assignment_error(err),
                StoreError::Database(err) => classify_sqlx_error(err),
            },
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal_error()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal_error()
        }
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

/// Assignment outcomes are client-visible: an existing assignment is a
/// conflict, everything else is an unprocessable request.
fn classify_assignment_error(err: &AssignmentError) -> (StatusCode, &'static str, String) {
    let (status, code) = match err {
        AssignmentError::AlreadyAssigned { .. } => (StatusCode::CONFLICT, "ALREADY_ASSIGNED"),
        AssignmentError::InvalidReassignment(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REASSIGNMENT")
        }
        AssignmentError::NoMatch => (StatusCode::UNPROCESSABLE_ENTITY, "NO_MATCH"),
        AssignmentError::NoEngineersAvailable { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "NO_ENGINEERS_AVAILABLE")
        }
        AssignmentError::AutoAssignDisabled { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "AUTO_ASSIGN_DISABLED")
        }
        AssignmentError::UnknownEngineer { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_ENGINEER")
        }
    };
    (status, code, err.to_string())
}
