pub mod assignment_rules;
pub mod engineers;
pub mod health;
pub mod inquiries;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /assignment-rules                       rule settings CRUD, toggle
/// /engineers                              workload listing and upsert
/// /inquiries                              create, get
/// /inquiries/{id}/assignment/*            rules, suggestion, auto, manual,
///                                         confirm, history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/assignment-rules", assignment_rules::router())
        .nest("/engineers", engineers::router())
        .nest("/inquiries", inquiries::router())
}
