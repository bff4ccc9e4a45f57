use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::{require_any_role, Actor};
use crate::api::pagination::default_limit;
use crate::core::state::AppState;
use crate::core::time::today_utc;
use crate::db::types::ProfileRole;
use crate::repositories;
use crate::schemas::student::StudentDetailsResponse;

const REVIEWING_ROLES: &[ProfileRole] = &[
    ProfileRole::Tutor,
    ProfileRole::Hod,
    ProfileRole::Admin,
    ProfileRole::Principal,
    ProfileRole::Office,
];

#[derive(Debug, Deserialize)]
pub(crate) struct StudentListQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    batch_id: Option<String>,
    #[serde(default)]
    department_id: Option<String>,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_students)).route("/:student_id", get(get_student))
}

async fn list_students(
    Query(params): Query<StudentListQuery>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentDetailsResponse>>, ApiError> {
    require_any_role(&actor, REVIEWING_ROLES)?;

    let students = repositories::students::list_details(
        state.db(),
        params.batch_id.as_deref(),
        params.department_id.as_deref(),
        params.skip,
        params.limit,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    let today = today_utc();
    Ok(Json(
        students.into_iter().map(|details| StudentDetailsResponse::from_db(details, today)).collect(),
    ))
}

async fn get_student(
    Path(student_id): Path<String>,
    Actor(actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<StudentDetailsResponse>, ApiError> {
    if actor.role == ProfileRole::Student && actor.id != student_id {
        return Err(ApiError::Forbidden("Students may only view their own record"));
    }

    let details = repositories::students::find_details_by_id(state.db(), &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?;

    let Some(details) = details else {
        return Err(ApiError::NotFound("Student not found".to_string()));
    };

    Ok(Json(StudentDetailsResponse::from_db(details, today_utc())))
}
