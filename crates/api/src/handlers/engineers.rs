//! Handlers for engineer workload records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quotedesk_core::types::DbId;
use quotedesk_db::models::engineer::{
    EngineerFilter, EngineerWorkloadRow, UpsertEngineerWorkload,
};
use quotedesk_db::repositories::EngineerRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/engineers/workload?category=&available_only=
pub async fn list_workloads(
    State(state): State<AppState>,
    Query(filter): Query<EngineerFilter>,
) -> AppResult<Json<DataResponse<Vec<EngineerWorkloadRow>>>> {
    let engineers = EngineerRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: engineers }))
}

/// PUT /api/v1/engineers/{id}/workload
///
/// Create or replace an engineer's workload record. Responds 201 when the
/// engineer was not known before, 200 otherwise.
pub async fn upsert_workload(
    State(state): State<AppState>,
    Path(engineer_id): Path<DbId>,
    Json(input): Json<UpsertEngineerWorkload>,
) -> AppResult<(StatusCode, Json<DataResponse<EngineerWorkloadRow>>)> {
    let (record, created) = EngineerRepo::upsert(&state.pool, engineer_id, &input).await?;

    tracing::info!(
        engineer_id,
        created,
        current_inquiries = record.current_inquiries,
        is_available = record.is_available,
        "Engineer workload saved"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: record })))
}
