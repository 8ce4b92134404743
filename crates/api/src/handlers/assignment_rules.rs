//! Handlers for the `/assignment-rules` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quotedesk_core::error::CoreError;
use quotedesk_core::types::DbId;
use quotedesk_db::models::assignment_rule::{
    AssignmentRuleRow, CreateAssignmentRule, UpdateAssignmentRule,
};
use quotedesk_db::repositories::AssignmentRuleRepo;
use quotedesk_events::{DomainEvent, EVENT_ASSIGNMENT_RULE_CHANGED};

use crate::error::{AppError, AppResult};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn rule_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "AssignmentRule",
        id,
    })
}

fn publish_rule_changed(state: &AppState, id: DbId, change: &str) {
    state.event_bus.publish(
        DomainEvent::new(EVENT_ASSIGNMENT_RULE_CHANGED)
            .with_source("assignment_rule", id)
            .with_payload(serde_json::json!({ "change": change })),
    );
}

/// GET /api/v1/assignment-rules?include_inactive=
///
/// Rules in evaluation order (priority, then id).
pub async fn list_rules(
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<AssignmentRuleRow>>>> {
    let rules = AssignmentRuleRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: rules }))
}

/// GET /api/v1/assignment-rules/{id}
pub async fn get_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssignmentRuleRow>>> {
    let rule = AssignmentRuleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| rule_not_found(id))?;
    Ok(Json(DataResponse { data: rule }))
}

/// POST /api/v1/assignment-rules
///
/// Create a rule. Returns the created rule with HTTP 201.
pub async fn create_rule(
    State(state): State<AppState>,
    Json(input): Json<CreateAssignmentRule>,
) -> AppResult<(StatusCode, Json<DataResponse<AssignmentRuleRow>>)> {
    let rule = AssignmentRuleRepo::create(&state.pool, &input).await?;

    tracing::info!(
        rule_id = rule.id,
        rule_name = %rule.rule_name,
        rule_type = %rule.rule_type,
        priority = rule.priority,
        "Assignment rule created"
    );
    publish_rule_changed(&state, rule.id, "created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}

/// PUT /api/v1/assignment-rules/{id}
///
/// Partial update. Returns 404 if the rule does not exist.
pub async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssignmentRule>,
) -> AppResult<Json<DataResponse<AssignmentRuleRow>>> {
    let rule = AssignmentRuleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| rule_not_found(id))?;

    tracing::info!(rule_id = id, "Assignment rule updated");
    publish_rule_changed(&state, id, "updated");

    Ok(Json(DataResponse { data: rule }))
}

/// DELETE /api/v1/assignment-rules/{id}
///
/// Returns 204 on success, 404 if not found.
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AssignmentRuleRepo::delete(&state.pool, id).await? {
        return Err(rule_not_found(id));
    }

    tracing::info!(rule_id = id, "Assignment rule deleted");
    publish_rule_changed(&state, id, "deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/assignment-rules/{id}/toggle
///
/// Flip the rule's active flag.
pub async fn toggle_rule(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssignmentRuleRow>>> {
    let rule = AssignmentRuleRepo::toggle(&state.pool, id)
        .await?
        .ok_or_else(|| rule_not_found(id))?;

    tracing::info!(rule_id = id, is_active = rule.is_active, "Assignment rule toggled");
    publish_rule_changed(
        &state,
        id,
        if rule.is_active { "activated" } else { "deactivated" },
    );

    Ok(Json(DataResponse { data: rule }))
}
