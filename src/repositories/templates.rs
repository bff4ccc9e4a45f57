use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::models::CertificateTemplate;
use crate::db::types::TemplateType;

const COLUMNS: &str = "id, name, template_type, content, file_url, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &PgPool,
    id: &str,
) -> Result<Option<CertificateTemplate>, sqlx::Error> {
    sqlx::query_as::<_, CertificateTemplate>(&format!(
        "SELECT {COLUMNS} FROM certificate_templates WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    template_type: Option<TemplateType>,
    skip: i64,
    limit: i64,
) -> Result<Vec<CertificateTemplate>, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {COLUMNS} FROM certificate_templates"
    ));

    if let Some(template_type) = template_type {
        builder.push(" WHERE template_type = ");
        builder.push_bind(template_type);
    }

    builder.push(" ORDER BY name");
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.push(" LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));

    builder.build_query_as::<CertificateTemplate>().fetch_all(pool).await
}
