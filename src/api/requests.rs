use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_role, Actor};
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::{primitive_now_utc, today_utc};
use crate::db::models::CertificateRequest;
use crate::db::types::{ProfileRole, RequestStatus};
use crate::repositories;
use crate::schemas::request::{
    CertificateResponse, RequestCreate, RequestResponse, TransitionPayload,
};
use crate::services::renderer::{RenderError, TemplateSource};
use crate::services::{lifecycle, renderer};

#[derive(Debug, Deserialize)]
pub(crate) struct RequestListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    status: Option<RequestStatus>,
    #[serde(default)]
    student_id: Option<String>,
    #[serde(default)]
    batch_id: Option<String>,
    #[serde(default)]
    department_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CertificateQuery {
    #[serde(default)]
    include_signature: bool,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_requests).post(create_request))
        .route("/:request_id", get(get_request))
        .route("/:request_id/transition", post(transition_request))
        .route("/:request_id/certificate", get(get_certificate))
}

async fn create_request(
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(payload): Json<RequestCreate>,
) -> Result<(StatusCode, Json<RequestResponse>), ApiError> {
    require_role(&actor, ProfileRole::Student)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let student = repositories::students::find_details_by_id(state.db(), &actor.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student record"))?;
    if student.is_none() {
        return Err(ApiError::NotFound("Student record not found".to_string()));
    }

    let now = primitive_now_utc();
    let request = repositories::requests::create(
        state.db(),
        repositories::requests::CreateRequest {
            id: &Uuid::new_v4().to_string(),
            student_id: &actor.id,
            request_date: today_utc(),
            request_type: payload.request_type.trim(),
            sub_type: payload
                .sub_type
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty()),
            reason: payload.reason.trim(),
            status: RequestStatus::PendingTutorApproval,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create certificate request"))?;

    tracing::info!(
        student_id = %request.student_id,
        request_id = %request.id,
        action = "request_create",
        "Certificate request created"
    );

    Ok((StatusCode::CREATED, Json(RequestResponse::from_db(request))))
}

async fn list_requests(
    Query(params): Query<RequestListQuery>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<RequestResponse>>, ApiError> {
    // Students only ever see their own requests; reviewer dashboards scope
    // through the query filters.
    let own_id = actor.id.clone();
    let student_id = if actor.role == ProfileRole::Student {
        Some(own_id.as_str())
    } else {
        params.student_id.as_deref()
    };

    let filter = repositories::requests::RequestFilter {
        status: params.status,
        student_id,
        batch_id: params.batch_id.as_deref(),
        department_id: params.department_id.as_deref(),
    };

    let total_count = repositories::requests::count(state.db(), filter.clone())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count certificate requests"))?;
    let requests = repositories::requests::list(state.db(), filter, params.skip, params.limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list certificate requests"))?;

    Ok(Json(PaginatedResponse {
        items: requests.into_iter().map(RequestResponse::from_db).collect(),
        total_count,
        skip: params.skip,
        limit: params.limit,
    }))
}

async fn get_request(
    Path(request_id): Path<String>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<RequestResponse>, ApiError> {
    let request = fetch_request(&state, &request_id).await?;

    if actor.role == ProfileRole::Student && request.student_id != actor.id {
        return Err(ApiError::Forbidden("Students may only view their own requests"));
    }

    Ok(Json(RequestResponse::from_db(request)))
}

async fn transition_request(
    Path(request_id): Path<String>,
    Actor(actor): Actor,
    State(state): State<AppState>,
    Json(payload): Json<TransitionPayload>,
) -> Result<Json<RequestResponse>, ApiError> {
    let request = fetch_request(&state, &request_id).await?;
    let expected = request.status;

    let data = lifecycle::TransitionData {
        template_id: payload.template_id,
        return_reason: payload.return_reason,
    };
    let updated =
        lifecycle::apply_transition(&request, actor.role, payload.target_status, &data)
            .map_err(|e| ApiError::Conflict(e.to_string()))?;

    // The write is conditioned on the status we just validated; a miss means
    // another reviewer acted first and the caller must re-read.
    let stored =
        repositories::requests::apply_transition(state.db(), expected, &updated, primitive_now_utc())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to store the transition"))?
            .ok_or_else(|| {
                ApiError::Conflict(
                    "Request status changed concurrently; reload and retry".to_string(),
                )
            })?;

    metrics::counter!(
        "request_transitions_total",
        "to" => stored.status.as_str()
    )
    .increment(1);
    tracing::info!(
        actor_id = %actor.id,
        role = %actor.role,
        request_id = %stored.id,
        from = %expected,
        to = %stored.status,
        action = "request_transition",
        "Certificate request transitioned"
    );

    if stored.status == RequestStatus::Approved {
        issue_certificate(&state, &stored).await;
    }

    Ok(Json(RequestResponse::from_db(stored)))
}

async fn get_certificate(
    Path(request_id): Path<String>,
    Query(params): Query<CertificateQuery>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<CertificateResponse>, ApiError> {
    let request = fetch_request(&state, &request_id).await?;

    if actor.role == ProfileRole::Student && request.student_id != actor.id {
        return Err(ApiError::Forbidden("Students may only view their own certificates"));
    }

    if request.status != RequestStatus::Approved {
        return Err(ApiError::Conflict(format!(
            "Certificate is only available for approved requests; current status is '{}'",
            request.status
        )));
    }

    let certificate = render_certificate(&state, &request, params.include_signature).await?;
    Ok(Json(certificate))
}

async fn fetch_request(
    state: &AppState,
    request_id: &str,
) -> Result<CertificateRequest, ApiError> {
    let request = repositories::requests::find_by_id(state.db(), request_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch certificate request"))?;

    request.ok_or_else(|| ApiError::NotFound("Certificate request not found".to_string()))
}

/// Resolves the request's template and branches: html templates go through
/// the renderer, uploaded templates are handed out by reference and the
/// renderer is never invoked.
async fn render_certificate(
    state: &AppState,
    request: &CertificateRequest,
    include_signature: bool,
) -> Result<CertificateResponse, ApiError> {
    let template_id = request.template_id.as_deref().ok_or_else(|| {
        ApiError::Conflict("No certificate template was selected for this request".to_string())
    })?;

    let template = repositories::templates::find_by_id(state.db(), template_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch certificate template"))?;
    let Some(template) = template else {
        return Err(ApiError::NotFound("Certificate template not found".to_string()));
    };

    match renderer::template_source(&template).map_err(map_render_error)? {
        TemplateSource::Inline(_) => {
            let student = repositories::students::find_details_by_id(state.db(), &request.student_id)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load student record"))?;

            let body = renderer::render(
                request,
                student.as_ref(),
                Some(&template),
                include_signature,
                today_utc(),
            )
            .map_err(map_render_error)?;

            metrics::counter!("certificates_rendered_total").increment(1);
            Ok(CertificateResponse::Text {
                request_id: request.id.clone(),
                template_id: template_id.to_string(),
                body,
            })
        }
        TemplateSource::File(file_url) => Ok(CertificateResponse::File {
            request_id: request.id.clone(),
            template_id: template_id.to_string(),
            template_type: template.template_type,
            file_url: file_url.to_string(),
        }),
    }
}

fn map_render_error(err: RenderError) -> ApiError {
    match err {
        RenderError::MissingTemplate => {
            ApiError::NotFound("Certificate template not found".to_string())
        }
        RenderError::MissingStudent => ApiError::NotFound("Student record not found".to_string()),
    }
}

/// Rendering and export after approval are side effects of the transition:
/// a failure here is logged, never rolled back into the already-committed
/// status change. The certificate endpoint re-renders on demand.
async fn issue_certificate(state: &AppState, request: &CertificateRequest) {
    match render_certificate(state, request, true).await {
        Ok(CertificateResponse::Text { body, .. }) => {
            match state.exporter().export(&request.id, &body).await {
                Ok(document) => tracing::info!(
                    request_id = %request.id,
                    filename = %document.filename,
                    content_type = %document.content_type,
                    size = document.bytes.len(),
                    "Certificate exported"
                ),
                Err(err) => tracing::error!(
                    error = %err,
                    request_id = %request.id,
                    "Certificate export failed"
                ),
            }
        }
        Ok(CertificateResponse::File { file_url, .. }) => {
            tracing::info!(
                request_id = %request.id,
                file_url = %file_url,
                "Certificate uses an uploaded template document"
            );
        }
        Err(err) => {
            tracing::error!(error = ?err, request_id = %request.id, "Certificate rendering failed after approval");
        }
    }
}
