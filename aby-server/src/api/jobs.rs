//! `/jobs`: public listings, admin-managed

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Job, JobCreate, JobStatus, JobUpdate};
use shared::query::{ListQuery, PaginatedResponse};

use crate::api::{ApiResult, Created, announce, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

const RESOURCE: &str = "job";

#[derive(Debug, Deserialize)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::JobNotFound)
}

/// GET /jobs (public)
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<JobFilter>,
) -> ApiResult<PaginatedResponse<Job>> {
    let (rows, total) = db::jobs::list(&state.pool, filter.status, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /jobs/{id} (public)
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Job> {
    let job = db::jobs::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(job))
}

/// POST /jobs
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(req): Json<JobCreate>,
) -> Created<Job> {
    validate(&req)?;
    let job = db::jobs::create(&state.pool, &req, current.id)
        .await
        .map_err(ServiceError::from)?;

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Created,
        job.id,
        Some(&job),
        format!("Posted job {}", job.title),
    )
    .await;

    Ok((StatusCode::CREATED, Json(job)))
}

/// PUT /jobs/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
    Json(req): Json<JobUpdate>,
) -> ApiResult<Job> {
    validate(&req)?;
    let job = db::jobs::update(&state.pool, id, &req)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Updated,
        job.id,
        Some(&job),
        format!("Updated job {}", job.title),
    )
    .await;

    Ok(Json(job))
}

/// DELETE /jobs/{id}
///
/// Applications to the job go with it, including their stored files.
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let db::jobs::DeletedJob { job, files } = db::jobs::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    for file in &files {
        state.uploads.remove(file).await;
    }

    announce::<Job>(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Deleted,
        job.id,
        None,
        format!("Deleted job {}", job.title),
    )
    .await;

    Ok(Json(ApiResponse::ok()))
}
