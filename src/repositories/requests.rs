use sqlx::{PgPool, Postgres, QueryBuilder};
use time::{Date, PrimitiveDateTime};

use crate::db::models::CertificateRequest;
use crate::db::types::RequestStatus;

const COLUMNS: &str = "\
    id, student_id, request_date, request_type, sub_type, reason, status, \
    template_id, return_reason, created_at, updated_at";

const PREFIXED_COLUMNS: &str = "\
    r.id, r.student_id, r.request_date, r.request_type, r.sub_type, r.reason, r.status, \
    r.template_id, r.return_reason, r.created_at, r.updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<CertificateRequest>, sqlx::Error> {
    sqlx::query_as::<_, CertificateRequest>(&format!(
        "SELECT {COLUMNS} FROM certificate_requests WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateRequest<'a> {
    pub id: &'a str,
    pub student_id: &'a str,
    pub request_date: Date,
    pub request_type: &'a str,
    pub sub_type: Option<&'a str>,
    pub reason: &'a str,
    pub status: RequestStatus,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateRequest<'_>,
) -> Result<CertificateRequest, sqlx::Error> {
    sqlx::query_as::<_, CertificateRequest>(&format!(
        "INSERT INTO certificate_requests (
            id, student_id, request_date, request_type, sub_type, reason, status,
            created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.student_id)
    .bind(params.request_date)
    .bind(params.request_type)
    .bind(params.sub_type)
    .bind(params.reason)
    .bind(params.status)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

#[derive(Debug, Default, Clone)]
pub(crate) struct RequestFilter<'a> {
    pub(crate) status: Option<RequestStatus>,
    pub(crate) student_id: Option<&'a str>,
    pub(crate) batch_id: Option<&'a str>,
    pub(crate) department_id: Option<&'a str>,
}

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, filter: &RequestFilter<'a>) {
    let mut has_where = false;
    let mut push_clause = |builder: &mut QueryBuilder<'a, Postgres>| {
        if has_where {
            builder.push(" AND ");
        } else {
            builder.push(" WHERE ");
            has_where = true;
        }
    };

    if let Some(status) = filter.status {
        push_clause(builder);
        builder.push("r.status = ");
        builder.push_bind(status);
    }
    if let Some(student_id) = filter.student_id {
        push_clause(builder);
        builder.push("r.student_id = ");
        builder.push_bind(student_id);
    }
    if let Some(batch_id) = filter.batch_id {
        push_clause(builder);
        builder.push("s.batch_id = ");
        builder.push_bind(batch_id);
    }
    if let Some(department_id) = filter.department_id {
        push_clause(builder);
        builder.push("b.department_id = ");
        builder.push_bind(department_id);
    }
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: RequestFilter<'_>,
    skip: i64,
    limit: i64,
) -> Result<Vec<CertificateRequest>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {PREFIXED_COLUMNS}
         FROM certificate_requests r
         JOIN students s ON s.profile_id = r.student_id
         JOIN batches b ON b.id = s.batch_id"
    ));
    push_filters(&mut builder, &filter);
    builder.push(" ORDER BY r.created_at DESC");
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<CertificateRequest>().fetch_all(pool).await
}

pub(crate) async fn count(
    pool: &PgPool,
    filter: RequestFilter<'_>,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(
        "SELECT COUNT(*)
         FROM certificate_requests r
         JOIN students s ON s.profile_id = r.student_id
         JOIN batches b ON b.id = s.batch_id",
    );
    push_filters(&mut builder, &filter);

    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Compare-and-swap status write: the update only lands while the row still
/// carries the status that was validated just before. `None` means another
/// reviewer got there first and the caller must re-read.
pub(crate) async fn apply_transition(
    pool: &PgPool,
    expected: RequestStatus,
    updated: &CertificateRequest,
    now: PrimitiveDateTime,
) -> Result<Option<CertificateRequest>, sqlx::Error> {
    sqlx::query_as::<_, CertificateRequest>(&format!(
        "UPDATE certificate_requests
         SET status = $1, template_id = $2, return_reason = $3, updated_at = $4
         WHERE id = $5 AND status = $6
         RETURNING {COLUMNS}",
    ))
    .bind(updated.status)
    .bind(&updated.template_id)
    .bind(&updated.return_reason)
    .bind(now)
    .bind(&updated.id)
    .bind(expected)
    .fetch_optional(pool)
    .await
}
