use shared::models::Activity;
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SEARCH_COLUMNS: &[&str] = &["action", "resource", "description"];

/// One activity log line
pub struct NewActivity<'a> {
    pub admin_id: Option<i64>,
    pub action: &'a str,
    pub resource: &'a str,
    pub resource_id: Option<i64>,
    pub description: Option<&'a str>,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, admin_id: Option<i64>, query: &ListQuery) {
    if let Some(admin_id) = admin_id {
        qb.push(" AND admin_id = ").push_bind(admin_id);
    }
    super::push_search(qb, SEARCH_COLUMNS, query);
}

pub async fn list(
    pool: &PgPool,
    admin_id: Option<i64>,
    query: &ListQuery,
) -> Result<(Vec<Activity>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM activities WHERE TRUE");
    push_filters(&mut count_qb, admin_id, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM activities WHERE TRUE");
    push_filters(&mut qb, admin_id, query);
    super::push_page(&mut qb, "created_at DESC, id DESC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<Activity>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM activities ORDER BY created_at DESC, id DESC LIMIT $1")
        .bind(limit)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Activity>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM activities WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, new: &NewActivity<'_>) -> Result<Activity, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO activities (id, admin_id, action, resource, resource_id, description, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(new.admin_id)
    .bind(new.action)
    .bind(new.resource)
    .bind(new.resource_id)
    .bind(new.description)
    .bind(now_millis())
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Activity>, sqlx::Error> {
    sqlx::query_as("DELETE FROM activities WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
