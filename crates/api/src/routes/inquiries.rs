//! Route definitions for the `/inquiries` resource and its assignment
//! sub-resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{assignment, inquiries};
use crate::state::AppState;

/// Routes mounted at `/inquiries`.
///
/// ```text
/// GET    /?unassigned=                  -> list_inquiries
/// POST   /                              -> create_inquiry
/// GET    /{id}                          -> get_inquiry
/// GET    /{id}/assignment/rules         -> matching_rules
/// GET    /{id}/assignment/suggestion    -> suggestion
/// POST   /{id}/assignment/auto          -> auto
/// POST   /{id}/assignment/manual        -> manual
/// POST   /{id}/assignment/confirm       -> confirm
/// GET    /{id}/assignment/history       -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(inquiries::list_inquiries).post(inquiries::create_inquiry),
        )
        .route("/{id}", get(inquiries::get_inquiry))
        .route("/{id}/assignment/rules", get(assignment::matching_rules))
        .route("/{id}/assignment/suggestion", get(assignment::suggestion))
        .route("/{id}/assignment/auto", post(assignment::auto))
        .route("/{id}/assignment/manual", post(assignment::manual))
        .route("/{id}/assignment/confirm", post(assignment::confirm))
        .route("/{id}/assignment/history", get(assignment::history))
}
