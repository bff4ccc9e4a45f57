use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::{require_any_role, Actor};
use crate::api::pagination::default_limit;
use crate::core::state::AppState;
use crate::db::types::{ProfileRole, TemplateType};
use crate::repositories;
use crate::schemas::template::TemplateResponse;

const TEMPLATE_ROLES: &[ProfileRole] = &[
    ProfileRole::Tutor,
    ProfileRole::Hod,
    ProfileRole::Admin,
    ProfileRole::Principal,
    ProfileRole::Office,
];

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    template_type: Option<TemplateType>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_templates)).route("/:template_id", get(get_template))
}

async fn list_templates(
    Query(params): Query<TemplateListQuery>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateResponse>>, ApiError> {
    require_any_role(&actor, TEMPLATE_ROLES)?;

    let templates =
        repositories::templates::list(state.db(), params.template_type, params.skip, params.limit)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list templates"))?;

    Ok(Json(templates.into_iter().map(TemplateResponse::from_db).collect()))
}

async fn get_template(
    Path(template_id): Path<String>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<TemplateResponse>, ApiError> {
    require_any_role(&actor, TEMPLATE_ROLES)?;

    let template = repositories::templates::find_by_id(state.db(), &template_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch template"))?;

    let Some(template) = template else {
        return Err(ApiError::NotFound("Template not found".to_string()));
    };

    Ok(Json(TemplateResponse::from_db(template)))
}
