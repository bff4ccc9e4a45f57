use sqlx::PgPool;

use crate::db::models::Department;

const COLUMNS: &str = "id, name, created_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(&format!("SELECT {COLUMNS} FROM departments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>(&format!("SELECT {COLUMNS} FROM departments ORDER BY name"))
        .fetch_all(pool)
        .await
}
