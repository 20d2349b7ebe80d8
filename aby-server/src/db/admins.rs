use shared::models::{Admin, AdminRole, AdminUpdate, ProfileUpdate};
use shared::query::ListQuery;
use shared::util::{now_millis, snowflake_id};
use sqlx::{PgPool, Postgres, QueryBuilder};

/// Admin row including the password hash (never leaves the server)
#[derive(sqlx::FromRow)]
pub struct AdminWithHash {
    #[sqlx(flatten)]
    pub admin: Admin,
    pub password_hash: String,
}

/// Fields the auth extractor re-checks on every request
#[derive(sqlx::FromRow)]
pub struct AdminAccess {
    pub role: AdminRole,
    pub is_active: bool,
}

pub struct NewAdmin<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: Option<&'a str>,
    pub role: AdminRole,
}

const SEARCH_COLUMNS: &[&str] = &["email", "first_name", "last_name"];

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await
}

pub async fn create(pool: &PgPool, new: &NewAdmin<'_>) -> Result<Admin, sqlx::Error> {
    let now = now_millis();
    sqlx::query_as(
        "INSERT INTO admins (id, email, password_hash, first_name, last_name, phone, role, is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, $8, $8)
         RETURNING *",
    )
    .bind(snowflake_id())
    .bind(new.email)
    .bind(new.password_hash)
    .bind(new.first_name)
    .bind(new.last_name)
    .bind(new.phone)
    .bind(new.role)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email_with_hash(
    pool: &PgPool,
    email: &str,
) -> Result<Option<AdminWithHash>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admins WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_with_hash(pool: &PgPool, id: i64) -> Result<Option<AdminWithHash>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_access(pool: &PgPool, id: i64) -> Result<Option<AdminAccess>, sqlx::Error> {
    sqlx::query_as("SELECT role, is_active FROM admins WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<(Vec<Admin>, i64), sqlx::Error> {
    let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM admins WHERE TRUE");
    super::push_search(&mut count_qb, SEARCH_COLUMNS, query);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM admins WHERE TRUE");
    super::push_search(&mut qb, SEARCH_COLUMNS, query);
    super::push_page(&mut qb, "created_at DESC, id DESC", query);
    let rows = qb.build_query_as().fetch_all(pool).await?;

    Ok((rows, total))
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &AdminUpdate,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE admins SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            phone = COALESCE($4, phone),
            role = COALESCE($5, role),
            is_active = COALESCE($6, is_active),
            updated_at = $7
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.first_name.as_deref())
    .bind(data.last_name.as_deref())
    .bind(data.phone.as_deref())
    .bind(data.role)
    .bind(data.is_active)
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    data: &ProfileUpdate,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE admins SET
            first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            phone = COALESCE($4, phone),
            updated_at = $5
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(data.first_name.as_deref())
    .bind(data.last_name.as_deref())
    .bind(data.phone.as_deref())
    .bind(now_millis())
    .fetch_optional(pool)
    .await
}

pub async fn update_password(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE admins SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_profile_img(
    pool: &PgPool,
    id: i64,
    profile_img: &str,
) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as("UPDATE admins SET profile_img = $1, updated_at = $2 WHERE id = $3 RETURNING *")
        .bind(profile_img)
        .bind(now_millis())
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Returns the deleted row, `None` when it did not exist
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Admin>, sqlx::Error> {
    sqlx::query_as("DELETE FROM admins WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await
}
