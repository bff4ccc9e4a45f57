use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::StudentDetails;

const DETAILS_COLUMNS: &str = "\
    s.profile_id AS student_id, s.register_number, p.first_name, p.last_name, p.email, p.phone, \
    s.parent_name, s.gender, b.id AS batch_id, b.name AS batch_name, b.section AS batch_section, \
    d.id AS department_id, d.name AS department_name, t.id AS tutor_id, \
    NULLIF(TRIM(CONCAT(t.first_name, ' ', t.last_name)), '') AS tutor_name, h.id AS hod_id, \
    NULLIF(TRIM(CONCAT(h.first_name, ' ', h.last_name)), '') AS hod_name";

const DETAILS_FROM: &str = "\
    FROM students s \
    JOIN profiles p ON p.id = s.profile_id \
    LEFT JOIN batches b ON b.id = s.batch_id \
    LEFT JOIN departments d ON d.id = b.department_id \
    LEFT JOIN profiles t ON t.id = b.tutor_id \
    LEFT JOIN LATERAL ( \
        SELECT id, first_name, last_name FROM profiles \
        WHERE role = 'hod' AND department_id = b.department_id \
        ORDER BY created_at LIMIT 1 \
    ) h ON TRUE";

pub(crate) async fn find_details_by_id(
    pool: &PgPool,
    student_id: &str,
) -> Result<Option<StudentDetails>, sqlx::Error> {
    sqlx::query_as::<_, StudentDetails>(&format!(
        "SELECT {DETAILS_COLUMNS} {DETAILS_FROM} WHERE s.profile_id = $1"
    ))
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_details(
    pool: &PgPool,
    batch_id: Option<&str>,
    department_id: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<Vec<StudentDetails>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {DETAILS_COLUMNS} {DETAILS_FROM}"));
    let mut has_where = false;

    if let Some(batch_id) = batch_id {
        builder.push(" WHERE s.batch_id = ");
        builder.push_bind(batch_id);
        has_where = true;
    }
    if let Some(department_id) = department_id {
        if has_where {
            builder.push(" AND ");
        } else {
            builder.push(" WHERE ");
        }
        builder.push("b.department_id = ");
        builder.push_bind(department_id);
    }

    builder.push(" ORDER BY s.register_number");
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<StudentDetails>().fetch_all(pool).await
}
