//! Handlers for the `/inquiries` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use quotedesk_core::error::CoreError;
use quotedesk_core::types::DbId;
use quotedesk_db::models::inquiry::{CreateInquiry, InquiryFilter, InquiryRow};
use quotedesk_db::repositories::InquiryRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load an inquiry or fail with 404.
pub(crate) async fn load_inquiry(state: &AppState, id: DbId) -> AppResult<InquiryRow> {
    InquiryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Inquiry",
            id,
        }))
}

/// POST /api/v1/inquiries
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(input): Json<CreateInquiry>,
) -> AppResult<(StatusCode, Json<DataResponse<InquiryRow>>)> {
    let inquiry = InquiryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        inquiry_id = inquiry.id,
        inquiry_number = %inquiry.inquiry_number,
        product_category = %inquiry.product_category,
        "Inquiry created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}

/// GET /api/v1/inquiries?unassigned=
///
/// Inquiries oldest first; `unassigned=true` keeps only those still
/// waiting for an engineer.
pub async fn list_inquiries(
    State(state): State<AppState>,
    Query(filter): Query<InquiryFilter>,
) -> AppResult<Json<DataResponse<Vec<InquiryRow>>>> {
    let inquiries = InquiryRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// GET /api/v1/inquiries/{id}
pub async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InquiryRow>>> {
    let inquiry = load_inquiry(&state, id).await?;
    Ok(Json(DataResponse { data: inquiry }))
}
