use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Department, DepartmentCreate, DepartmentUpdate};
use shared::query::{ListQuery, PaginatedResponse};

use crate::api::{ApiResult, Created, announce, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

const RESOURCE: &str = "department";

fn not_found() -> AppError {
    AppError::new(ErrorCode::DepartmentNotFound)
}

/// GET /departments
pub async fn list(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<Department>> {
    let (rows, total) = db::departments::list(&state.pool, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /departments/{id}
pub async fn get(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Department> {
    let department = db::departments::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(department))
}

/// POST /departments
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(req): Json<DepartmentCreate>,
) -> Created<Department> {
    validate(&req)?;
    let department = db::departments::create(&state.pool, &req)
        .await
        .map_err(ServiceError::from)?;

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Created,
        department.id,
        Some(&department),
        format!("Created department {}", department.name),
    )
    .await;

    Ok((StatusCode::CREATED, Json(department)))
}

/// PUT /departments/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
    Json(req): Json<DepartmentUpdate>,
) -> ApiResult<Department> {
    validate(&req)?;
    let department = db::departments::update(&state.pool, id, &req)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Updated,
        department.id,
        Some(&department),
        format!("Updated department {}", department.name),
    )
    .await;

    Ok(Json(department))
}

/// DELETE /departments/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let department = db::departments::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    announce::<Department>(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Deleted,
        department.id,
        None,
        format!("Deleted department {}", department.name),
    )
    .await;

    Ok(Json(ApiResponse::ok()))
}
