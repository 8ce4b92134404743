//! Route definitions for the `/assignment-rules` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assignment_rules;
use crate::state::AppState;

/// Routes mounted at `/assignment-rules`.
///
/// ```text
/// GET    /              -> list_rules   (?include_inactive)
/// POST   /              -> create_rule
/// GET    /{id}          -> get_rule
/// PUT    /{id}          -> update_rule
/// DELETE /{id}          -> delete_rule
/// POST   /{id}/toggle   -> toggle_rule
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(assignment_rules::list_rules).post(assignment_rules::create_rule),
        )
        .route(
            "/{id}",
            get(assignment_rules::get_rule)
                .put(assignment_rules::update_rule)
                .delete(assignment_rules::delete_rule),
        )
        .route("/{id}/toggle", post(assignment_rules::toggle_rule))
}
