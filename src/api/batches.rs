use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, Actor};
use crate::api::pagination::default_limit;
use crate::api::validation::{validate_batch_name, validate_semester_override};
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, today_utc};
use crate::db::types::{BatchStatus, ProfileRole};
use crate::repositories;
use crate::schemas::batch::{BatchCreate, BatchResponse, BatchUpdate};

#[derive(Debug, Deserialize)]
pub(crate) struct BatchListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    department_id: Option<String>,
    #[serde(default)]
    status: Option<BatchStatus>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_batches).post(create_batch))
        .route("/:batch_id", get(get_batch).patch(update_batch))
}

async fn list_batches(
    Query(params): Query<BatchListQuery>,
    Actor(_actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<Vec<BatchResponse>>, ApiError> {
    let batches = repositories::batches::list(
        state.db(),
        params.department_id.as_deref(),
        params.status,
        params.skip,
        params.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list batches"))?;

    let today = today_utc();
    Ok(Json(batches.into_iter().map(|row| BatchResponse::from_db(row, today)).collect()))
}

async fn get_batch(
    Path(batch_id): Path<String>,
    Actor(_actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<BatchResponse>, ApiError> {
    let batch = repositories::batches::find_by_id(state.db(), &batch_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch batch"))?;

    let Some(batch) = batch else {
        return Err(ApiError::NotFound("Batch not found".to_string()));
    };

    Ok(Json(BatchResponse::from_db(batch, today_utc())))
}

async fn create_batch(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(payload): Json<BatchCreate>,
) -> Result<(StatusCode, Json<BatchResponse>), ApiError> {
    require_role(&actor, ProfileRole::Admin)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_batch_name(&payload.name)?;

    let department = repositories::departments::find_by_id(state.db(), &payload.department_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check department"))?;
    if department.is_none() {
        return Err(ApiError::BadRequest("Unknown department".to_string()));
    }

    let now = primitive_now_utc();
    let batch = repositories::batches::create(
        state.db(),
        repositories::batches::CreateBatch {
            id: &Uuid::new_v4().to_string(),
            name: payload.name.trim(),
            section: payload.section.as_deref().map(str::trim).filter(|s| !s.is_empty()),
            department_id: &payload.department_id,
            tutor_id: payload.tutor_id.as_deref(),
            status: BatchStatus::Active,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create batch"))?;

    tracing::info!(
        admin_id = %actor.id,
        batch_id = %batch.id,
        action = "batch_create",
        "Admin created batch"
    );

    let created = repositories::batches::find_by_id(state.db(), &batch.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch created batch"))?
        .ok_or_else(|| ApiError::Internal("Batch missing after create".to_string()))?;

    Ok((StatusCode::CREATED, Json(BatchResponse::from_db(created, today_utc()))))
}

async fn update_batch(
    Path(batch_id): Path<String>,
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(payload): Json<BatchUpdate>,
) -> Result<Json<BatchResponse>, ApiError> {
    require_role(&actor, ProfileRole::Admin)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    if let Some(name) = payload.name.as_deref() {
        validate_batch_name(name)?;
    }
    if let Some(semester_override) = payload.semester_override {
        validate_semester_override(semester_override)?;
    }

    let existing = repositories::batches::find_by_id(state.db(), &batch_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch batch"))?;
    if existing.is_none() {
        return Err(ApiError::NotFound("Batch not found".to_string()));
    }

    repositories::batches::update(
        state.db(),
        &batch_id,
        repositories::batches::UpdateBatch {
            name: payload.name.as_deref(),
            section: payload.section.as_deref(),
            tutor_id: payload.tutor_id.as_deref(),
            status: payload.status,
            semester_override: payload.semester_override,
            clear_semester_override: payload.clear_semester_override,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update batch"))?;

    let updated = repositories::batches::find_by_id(state.db(), &batch_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch updated batch"))?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

    tracing::info!(
        admin_id = %actor.id,
        batch_id = %batch_id,
        action = "batch_update",
        "Admin updated batch"
    );

    Ok(Json(BatchResponse::from_db(updated, today_utc())))
}
