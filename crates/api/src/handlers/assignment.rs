//! Handlers for `/inquiries/{id}/assignment/*`.
//!
//! The resolver only decides. Every write goes through
//! [`InquiryRepo::confirm_assignment`] with the version the decision was
//! based on, so a concurrent assignment surfaces as 409 instead of being
//! overwritten.

use axum::extract::{Path, State};
use axum::Json;
use quotedesk_core::assignment::{
    auto_assign, evaluate_rules, manual_assign, normalize_reason, suggest_engineer,
    AssignmentRule, AssignmentSuggestion, AssignmentType,
};
use quotedesk_core::types::DbId;
use quotedesk_db::models::assignment_history::{AssignmentRecord, ConfirmAssignment};
use quotedesk_db::repositories::{
    AssignmentHistoryRepo, AssignmentRuleRepo, AssignmentWrite, EngineerRepo, InquiryRepo,
};
use quotedesk_events::{DomainEvent, EVENT_INQUIRY_ASSIGNED};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::inquiries::load_inquiry;
use crate::response::DataResponse;
use crate::state::AppState;

/// Actor recorded for assignments made by the resolver.
const AUTO_ACTOR: &str = "auto";

/// Request body for a manual assignment.
#[derive(Debug, Deserialize)]
pub struct ManualAssignRequest {
    pub engineer_id: DbId,
    /// Defaults to `assign`; changing an existing engineer needs `reassign`.
    #[serde(default = "default_manual_type")]
    pub assignment_type: AssignmentType,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
}

fn default_manual_type() -> AssignmentType {
    AssignmentType::Assign
}

/// Write the decision and announce it. Replays publish nothing.
async fn confirm_and_publish(
    state: &AppState,
    inquiry_id: DbId,
    cmd: &ConfirmAssignment,
) -> AppResult<AssignmentWrite> {
    let write = InquiryRepo::confirm_assignment(&state.pool, inquiry_id, cmd).await?;

    if let Some(record) = &write.record {
        tracing::info!(
            inquiry_id,
            engineer_id = record.engineer_id,
            previous_engineer_id = ?record.previous_engineer_id,
            assignment_type = %record.assignment_type,
            rule_id = ?record.rule_id,
            "Inquiry assigned"
        );

        let mut event = DomainEvent::new(EVENT_INQUIRY_ASSIGNED)
            .with_source("inquiry", inquiry_id)
            .with_payload(serde_json::json!({
                "engineer_id": record.engineer_id,
                "previous_engineer_id": record.previous_engineer_id,
                "assignment_type": record.assignment_type,
                "rule_id": record.rule_id,
                "version": write.inquiry.version,
            }));
        if let Some(actor) = &record.assigned_by {
            event = event.with_actor(actor.clone());
        }
        state.event_bus.publish(event);
    } else {
        tracing::debug!(inquiry_id, "Assignment already in place, nothing written");
    }

    Ok(write)
}

/// GET /api/v1/inquiries/{id}/assignment/rules
///
/// Active rules that accept the inquiry, governing rule first.
pub async fn matching_rules(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentRule>>>> {
    let inquiry = load_inquiry(&state, id).await?;
    let rules = AssignmentRuleRepo::load_active_rules(&state.pool).await?;
    let matching = evaluate_rules(&inquiry.to_inquiry(), &rules);
    Ok(Json(DataResponse { data: matching }))
}

/// GET /api/v1/inquiries/{id}/assignment/suggestion
///
/// Advisory only. Nothing is written.
pub async fn suggestion(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssignmentSuggestion>>> {
    let inquiry = load_inquiry(&state, id).await?;
    let rules = AssignmentRuleRepo::load_active_rules(&state.pool).await?;
    let roster = EngineerRepo::roster(&state.pool).await?;

    let suggestion = suggest_engineer(&inquiry.to_inquiry(), &rules, &roster);
    tracing::debug!(
        inquiry_id = id,
        outcome = ?suggestion.outcome,
        engineer_id = ?suggestion.suggested_engineer.as_ref().map(|e| e.engineer_id),
        "Assignment suggested"
    );

    Ok(Json(DataResponse { data: suggestion }))
}

/// POST /api/v1/inquiries/{id}/assignment/auto
///
/// Decide with the active rules and current roster, then write the result
/// against the version that was read.
pub async fn auto(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AssignmentWrite>>> {
    let row = load_inquiry(&state, id).await?;
    let inquiry = row.to_inquiry();
    let rules = AssignmentRuleRepo::load_active_rules(&state.pool).await?;
    let roster = EngineerRepo::roster(&state.pool).await?;

    let engineer_id = auto_assign(&inquiry, &rules, &roster)?;
    let governing = evaluate_rules(&inquiry, &rules).into_iter().next();

    let cmd = ConfirmAssignment {
        engineer_id,
        expected_version: row.version,
        assignment_type: AssignmentType::Auto,
        reason: governing
            .as_ref()
            .map(|r| format!("auto-assigned by rule '{}'", r.rule_name)),
        rule_id: governing.as_ref().map(|r| r.id),
        assigned_by: Some(AUTO_ACTOR.to_string()),
    };
    let write = confirm_and_publish(&state, id, &cmd).await?;
    Ok(Json(DataResponse { data: write }))
}

/// POST /api/v1/inquiries/{id}/assignment/manual
///
/// Validate an explicit choice against the roster, then write it.
pub async fn manual(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ManualAssignRequest>,
) -> AppResult<Json<DataResponse<AssignmentWrite>>> {
    let row = load_inquiry(&state, id).await?;
    let roster = EngineerRepo::roster(&state.pool).await?;

    let decision = manual_assign(
        &row.to_inquiry(),
        &roster,
        input.engineer_id,
        input.reason.as_deref(),
        input.assignment_type,
    )?;

    let cmd = ConfirmAssignment {
        engineer_id: decision.engineer_id,
        expected_version: row.version,
        assignment_type: decision.assignment_type,
        reason: decision.reason,
        rule_id: None,
        assigned_by: input.assigned_by,
    };
    let write = confirm_and_publish(&state, id, &cmd).await?;
    Ok(Json(DataResponse { data: write }))
}

/// POST /api/v1/inquiries/{id}/assignment/confirm
///
/// Write a decision made elsewhere (typically from a suggestion). The
/// caller supplies the inquiry version it read. Only `assign` and
/// `reassign` are accepted; `auto` records come from the auto endpoint,
/// which checks the governing rule allows them. A cited `rule_id` must
/// name an existing rule.
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut cmd): Json<ConfirmAssignment>,
) -> AppResult<Json<DataResponse<AssignmentWrite>>> {
    if cmd.assignment_type == AssignmentType::Auto {
        return Err(AppError::BadRequest(
            "assignment_type 'auto' is reserved for the auto-assign endpoint".to_string(),
        ));
    }
    cmd.reason = normalize_reason(cmd.reason.as_deref());

    let write = confirm_and_publish(&state, id, &cmd).await?;
    Ok(Json(DataResponse { data: write }))
}

/// GET /api/v1/inquiries/{id}/assignment/history
pub async fn history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentRecord>>>> {
    load_inquiry(&state, id).await?;
    let records = AssignmentHistoryRepo::list_for_inquiry(&state.pool, id).await?;
    Ok(Json(DataResponse { data: records }))
}
