use shared::models::{Department, DepartmentCreate, DepartmentUpdate};
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SEARCH_COLUMNS: &[&str] = &["name", "head"];

pub async fn list(
    pool: &PgPool,
    query: &ListQuery,
) -> Result<(Vec<Department>, i64), sqlx::Error> {
    let mut count_qb =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM departments WHERE TRUE");
    super::push_search(&mut count_qb, SEARCH_COLUMNS, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM departments WHERE TRUE");
    super::push_search(&mut qb, SEARCH_COLUMNS, query);
    super::push_page(&mut qb, "name ASC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, data: &DepartmentCreate) -> Result<Department, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        "INSERT INTO departments (id, name, description, head, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(data.name.trim())
    .bind(data.description.as_deref())
    .bind(data.head.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &DepartmentUpdate,
) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE departments SET
            name = COALESCE($2, name),
            description = COALESCE($3, description),
            head = COALESCE($4, head),
            updated_at = $5
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(data.description.as_deref())
    .bind(data.head.as_deref())
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as("DELETE FROM departments WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
