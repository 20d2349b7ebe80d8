//! `/activities`: the admin activity feed
//!
//! Most entries are written by the other handlers on every mutation; this
//! module also accepts manual notes attributed to the calling admin.

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Activity, ActivityCreate};
use shared::query::{ListQuery, PaginatedResponse};

use crate::api::{ApiResult, Created, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::db::activities::NewActivity;
use crate::error::ServiceError;
use crate::state::AppState;

const RESOURCE: &str = "activity";

#[derive(Debug, Deserialize)]
pub struct ActivityFilter {
    pub admin_id: Option<i64>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::ActivityNotFound)
}

/// GET /activities
pub async fn list(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Query(query): Query<ListQuery>,
    Query(filter): Query<ActivityFilter>,
) -> ApiResult<PaginatedResponse<Activity>> {
    let (rows, total) = db::activities::list(&state.pool, filter.admin_id, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /activities/{id}
pub async fn get(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Activity> {
    let activity = db::activities::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(activity))
}

/// POST /activities
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(req): Json<ActivityCreate>,
) -> Created<Activity> {
    validate(&req)?;
    let activity = db::activities::create(
        &state.pool,
        &NewActivity {
            admin_id: Some(current.id),
            action: req.action.trim(),
            resource: req.resource.trim(),
            resource_id: req.resource_id,
            description: req.description.as_deref(),
        },
    )
    .await
    .map_err(ServiceError::from)?;

    state
        .live
        .publish_record(RESOURCE, LiveAction::Created, activity.id, &activity);

    Ok((StatusCode::CREATED, Json(activity)))
}

/// DELETE /activities/{id}
pub async fn delete(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let activity = db::activities::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    state.live.publish_deleted(RESOURCE, activity.id);

    Ok(Json(ApiResponse::ok()))
}
