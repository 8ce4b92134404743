//! Route definitions for engineer workloads.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::engineers;
use crate::state::AppState;

/// Routes mounted at `/engineers`.
///
/// ```text
/// GET    /workload          -> list_workloads   (?category, ?available_only)
/// PUT    /{id}/workload     -> upsert_workload
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/workload", get(engineers::list_workloads))
        .route("/{id}/workload", put(engineers::upsert_workload))
}
