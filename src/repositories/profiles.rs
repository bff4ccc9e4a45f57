use sqlx::PgPool;

use crate::db::models::Profile;

const COLUMNS: &str = "\
    id, first_name, last_name, email, phone, role, department_id, is_active, \
    created_at, updated_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(&format!("SELECT {COLUMNS} FROM profiles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}
