use shared::models::{
    CategoryCount, NationalFigure, NationalFigureCreate, NationalFigureFilter, NationalFigureUpdate,
};
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

const SEARCH_COLUMNS: &[&str] = &["indicator", "category", "source"];

fn push_filters(
    qb: &mut QueryBuilder<'_, Postgres>,
    filter: &NationalFigureFilter,
    query: &ListQuery,
) {
    if let Some(category) = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        qb.push(" AND category = ").push_bind(category.to_string());
    }
    if let Some(year) = filter.year {
        qb.push(" AND year = ").push_bind(year);
    }
    if let Some(goal) = filter.sdg_goal {
        qb.push(" AND sdg_goal = ").push_bind(goal);
    }
    super::push_search(qb, SEARCH_COLUMNS, query);
}

pub async fn list(
    pool: &PgPool,
    filter: &NationalFigureFilter,
    query: &ListQuery,
) -> Result<(Vec<NationalFigure>, i64), sqlx::Error> {
    let mut count_qb =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM national_figures WHERE TRUE");
    push_filters(&mut count_qb, filter, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM national_figures WHERE TRUE");
    push_filters(&mut qb, filter, query);
    super::push_page(&mut qb, "year DESC, category ASC, indicator ASC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn categories(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
    sqlx::query_as(
        "SELECT category, COUNT(*) AS count FROM national_figures
         GROUP BY category ORDER BY category",
    )
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<NationalFigure>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM national_figures WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    data: &NationalFigureCreate,
) -> Result<NationalFigure, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        "INSERT INTO national_figures (id, indicator, category, value, unit, year, sdg_goal, source, description, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(data.indicator.trim())
    .bind(data.category.trim())
    .bind(data.value)
    .bind(data.unit.as_deref())
    .bind(data.year)
    .bind(data.sdg_goal)
    .bind(data.source.as_deref())
    .bind(data.description.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &NationalFigureUpdate,
) -> Result<Option<NationalFigure>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE national_figures SET
            indicator = COALESCE($2, indicator),
            category = COALESCE($3, category),
            value = COALESCE($4, value),
            unit = COALESCE($5, unit),
            year = COALESCE($6, year),
            sdg_goal = COALESCE($7, sdg_goal),
            source = COALESCE($8, source),
            description = COALESCE($9, description),
            updated_at = $10
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.indicator.as_deref().map(str::trim))
    .bind(data.category.as_deref().map(str::trim))
    .bind(data.value)
    .bind(data.unit.as_deref())
    .bind(data.year)
    .bind(data.sdg_goal)
    .bind(data.source.as_deref())
    .bind(data.description.as_deref())
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<NationalFigure>, sqlx::Error> {
    sqlx::query_as("DELETE FROM national_figures WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
