use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::Batch;
use crate::db::types::BatchStatus;

const COLUMNS: &str = "\
    b.id, b.name, b.section, b.department_id, b.tutor_id, b.status, b.semester_override, \
    b.created_at, b.updated_at, d.name AS department_name";

#[derive(Debug, Clone, FromRow)]
pub(crate) struct BatchWithDepartment {
    #[sqlx(flatten)]
    pub(crate) batch: Batch,
    pub(crate) department_name: String,
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<BatchWithDepartment>, sqlx::Error> {
    sqlx::query_as::<_, BatchWithDepartment>(&format!(
        "SELECT {COLUMNS} FROM batches b JOIN departments d ON d.id = b.department_id \
         WHERE b.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    department_id: Option<&str>,
    status: Option<BatchStatus>,
    skip: i64,
    limit: i64,
) -> Result<Vec<BatchWithDepartment>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM batches b JOIN departments d ON d.id = b.department_id"
    ));
    let mut has_where = false;

    if let Some(department_id) = department_id {
        builder.push(" WHERE b.department_id = ");
        builder.push_bind(department_id);
        has_where = true;
    }
    if let Some(status) = status {
        if has_where {
            builder.push(" AND ");
        } else {
            builder.push(" WHERE ");
        }
        builder.push("b.status = ");
        builder.push_bind(status);
    }

    builder.push(" ORDER BY b.name, b.section");
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<BatchWithDepartment>().fetch_all(pool).await
}

pub(crate) struct CreateBatch<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub section: Option<&'a str>,
    pub department_id: &'a str,
    pub tutor_id: Option<&'a str>,
    pub status: BatchStatus,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateBatch<'_>) -> Result<Batch, sqlx::Error> {
    sqlx::query_as::<_, Batch>(
        "INSERT INTO batches (id, name, section, department_id, tutor_id, status, created_at, updated_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
         RETURNING id, name, section, department_id, tutor_id, status, semester_override, \
                   created_at, updated_at",
    )
    .bind(params.id)
    .bind(params.name)
    .bind(params.section)
    .bind(params.department_id)
    .bind(params.tutor_id)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateBatch<'a> {
    pub name: Option<&'a str>,
    pub section: Option<&'a str>,
    pub tutor_id: Option<&'a str>,
    pub status: Option<BatchStatus>,
    pub semester_override: Option<i32>,
    pub clear_semester_override: bool,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateBatch<'_>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE batches SET
            name = COALESCE($1, name),
            section = COALESCE($2, section),
            tutor_id = COALESCE($3, tutor_id),
            status = COALESCE($4, status),
            semester_override = CASE WHEN $5 THEN NULL
                                     ELSE COALESCE($6, semester_override) END,
            updated_at = $7
         WHERE id = $8",
    )
    .bind(params.name)
    .bind(params.section)
    .bind(params.tutor_id)
    .bind(params.status)
    .bind(params.clear_semester_override)
    .bind(params.semester_override)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}
