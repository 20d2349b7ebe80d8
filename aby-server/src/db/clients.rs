use shared::models::{Client, ClientCreate, ClientStatus, ClientUpdate};
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SEARCH_COLUMNS: &[&str] = &[
    "first_name",
    "last_name",
    "email",
    "company",
    "national_id",
];

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, status: Option<ClientStatus>, query: &ListQuery) {
    if let Some(status) = status {
        qb.push(" AND status = ").push_bind(status);
    }
    super::push_search(qb, SEARCH_COLUMNS, query);
}

pub async fn list(
    pool: &PgPool,
    status: Option<ClientStatus>,
    query: &ListQuery,
) -> Result<(Vec<Client>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM clients WHERE TRUE");
    push_filters(&mut count_qb, status, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM clients WHERE TRUE");
    push_filters(&mut qb, status, query);
    super::push_page(&mut qb, "created_at DESC, id DESC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM clients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    data: &ClientCreate,
    email: &str,
    profile_img: Option<&str>,
) -> Result<Client, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        "INSERT INTO clients (id, first_name, last_name, email, phone, company, address, national_id, status, profile_img, notes, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(data.first_name.trim())
    .bind(data.last_name.trim())
    .bind(email)
    .bind(data.phone.as_deref())
    .bind(data.company.as_deref())
    .bind(data.address.as_deref())
    .bind(data.national_id.as_deref())
    .bind(data.status.unwrap_or(ClientStatus::Active))
    .bind(profile_img)
    .bind(data.notes.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Partial update; `profile_img` replaces the stored path when `Some`
pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &ClientUpdate,
    email: Option<&str>,
    profile_img: Option<&str>,
) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE clients SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            email = COALESCE($4, email),
            phone = COALESCE($5, phone),
            company = COALESCE($6, company),
            address = COALESCE($7, address),
            national_id = COALESCE($8, national_id),
            status = COALESCE($9, status),
            notes = COALESCE($10, notes),
            profile_img = COALESCE($11, profile_img),
            updated_at = $12
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.first_name.as_deref().map(str::trim))
    .bind(data.last_name.as_deref().map(str::trim))
    .bind(email)
    .bind(data.phone.as_deref())
    .bind(data.company.as_deref())
    .bind(data.address.as_deref())
    .bind(data.national_id.as_deref())
    .bind(data.status)
    .bind(data.notes.as_deref())
    .bind(profile_img)
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as("DELETE FROM clients WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
