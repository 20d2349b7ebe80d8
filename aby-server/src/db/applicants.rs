use shared::models::{Applicant, ApplicantCreate, ApplicantStatus, ApplicantUpdate};
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SEARCH_COLUMNS: &[&str] = &["first_name", "last_name", "email"];

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicantFilter {
    pub status: Option<ApplicantStatus>,
    pub job_id: Option<i64>,
}

/// Stored file paths of a new application
pub struct ApplicantFiles<'a> {
    pub cv_file: &'a str,
    pub profile_img: Option<&'a str>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: ApplicantFilter, query: &ListQuery) {
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(job_id) = filter.job_id {
        qb.push(" AND job_id = ").push_bind(job_id);
    }
    super::push_search(qb, SEARCH_COLUMNS, query);
}

pub async fn list(
    pool: &PgPool,
    filter: ApplicantFilter,
    query: &ListQuery,
) -> Result<(Vec<Applicant>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM applicants WHERE TRUE");
    push_filters(&mut count_qb, filter, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM applicants WHERE TRUE");
    push_filters(&mut qb, filter, query);
    super::push_page(&mut qb, "created_at DESC, id DESC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Applicant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM applicants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    data: &ApplicantCreate,
    email: &str,
    files: &ApplicantFiles<'_>,
) -> Result<Applicant, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        "INSERT INTO applicants (id, job_id, first_name, last_name, email, phone, cover_letter, cv_file, profile_img, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'pending', $10, $10)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(data.job_id)
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(email)
    .bind(data.phone.as_deref())
    .bind(data.cover_letter.as_deref())
    .bind(files.cv_file)
    .bind(files.profile_img)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ApplicantUpdate,
    email: Option<&str>,
) -> Result<Option<Applicant>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE applicants SET
            status = COALESCE($2, status),
            notes = COALESCE($3, notes),
            first_name = COALESCE($4, first_name),
            last_name = COALESCE($5, last_name),
            email = COALESCE($6, email),
            phone = COALESCE($7, phone),
            updated_at = $8
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.status)
    .bind(data.notes.as_deref())
    .bind(data.first_name.as_deref().map(str::trim))
    .bind(data.last_name.as_deref().map(str::trim))
    .bind(email)
    .bind(data.phone.as_deref())
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Applicant>, sqlx::Error> {
    sqlx::query_as("DELETE FROM applicants WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
