use shared::models::{EmploymentType, Job, JobCreate, JobStatus, JobUpdate};
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SEARCH_COLUMNS: &[&str] = &["title", "department", "location"];

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, status: Option<JobStatus>, query: &ListQuery) {
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status);
    }
    super::push_search(qb, SEARCH_COLUMNS, query);
}

pub async fn list(
    pool: &PgPool,
    status: Option<JobStatus>,
    query: &ListQuery,
) -> Result<(Vec<Job>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM jobs WHERE TRUE");
    push_filters(&mut count_qb, status, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM jobs WHERE TRUE");
    push_filters(&mut qb, status, query);
    super::push_page(&mut qb, "created_at DESC, id DESC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, data: &JobCreate, created_by: i64) -> Result<Job, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        "INSERT INTO jobs (id, title, description, department, location, employment_type, salary_range, status, deadline, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(data.title.trim())
    .bind(&data.description)
    .bind(data.department.as_deref())
    .bind(data.location.as_deref())
    .bind(data.employment_type.unwrap_or(EmploymentType::FullTime))
    .bind(data.salary_range.as_deref())
    .bind(data.status.unwrap_or(JobStatus::Open))
    .bind(data.deadline)
    .bind(created_by)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i64, data: &JobUpdate) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE jobs SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            department = COALESCE($4, department),
            location = COALESCE($5, location),
            employment_type = COALESCE($6, employment_type),
            salary_range = COALESCE($7, salary_range),
            status = COALESCE($8, status),
            deadline = COALESCE($9, deadline),
            updated_at = $10
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.title.as_deref().map(str::trim))
    .bind(data.description.as_deref())
    .bind(data.department.as_deref())
    .bind(data.location.as_deref())
    .bind(data.employment_type)
    .bind(data.salary_range.as_deref())
    .bind(data.status)
    .bind(data.deadline)
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

/// A deleted job and the upload paths of the applications removed with it
#[derive(Debug)]
pub struct DeletedJob {
    pub job: Job,
    pub files: Vec<String>,
}

/// Delete a job and its applications in one transaction.
///
/// The job row is locked first, so an application racing the delete either
/// commits before (and its files are returned) or fails its foreign key.
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<DeletedJob>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let locked: Option<(i64,)> = sqlx::query_as("SELECT id FROM jobs WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
    if locked.is_none() {
        return Ok(None);
    }

    let rows: Vec<(String, Option<String>)> = sqlx::query_as(
        "DELETE FROM applicants WHERE job_id = $1 RETURNING cv_file, profile_img",
    )
    .bind(id)
    .fetch_all(&mut *tx)
    .await?;

    let job: Job = sqlx::query_as("DELETE FROM jobs WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    let files = rows
        .into_iter()
        .flat_map(|(cv, img)| std::iter::once(cv).chain(img))
        .collect();
    Ok(Some(DeletedJob { job, files }))
}
