use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::Actor;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::department::DepartmentResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_departments)).route("/:department_id", get(get_department))
}

async fn list_departments(
    Actor(_actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartmentResponse>>, ApiError> {
    let departments = repositories::departments::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list departments"))?;

    Ok(Json(departments.into_iter().map(DepartmentResponse::from_db).collect()))
}

async fn get_department(
    Path(department_id): Path<String>,
    Actor(_actor): Actor,
    State(state): State<AppState>,
) -> Result<Json<DepartmentResponse>, ApiError> {
    let department = repositories::departments::find_by_id(state.db(), &department_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch department"))?;

    let Some(department) = department else {
        return Err(ApiError::NotFound("Department not found".to_string()));
    };

    Ok(Json(DepartmentResponse::from_db(department)))
}
