//! `/national-figures`: public statistics, admin-managed

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{
    CategoryCount, MAX_SDG_GOAL, NationalFigure, NationalFigureCreate, NationalFigureFilter,
    NationalFigureUpdate,
};
use shared::query::{ListQuery, PaginatedResponse};

use crate::api::{ApiResult, Created, announce, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

const RESOURCE: &str = "national_figure";

fn not_found() -> AppError {
    AppError::new(ErrorCode::NationalFigureNotFound)
}

fn check_sdg_goal(goal: Option<i32>) -> Result<(), AppError> {
    match goal {
        Some(g) if !(1..=MAX_SDG_GOAL).contains(&g) => Err(AppError::with_message(
            ErrorCode::InvalidSdgGoal,
            format!("sdg_goal must be between 1 and {MAX_SDG_GOAL}"),
        )
        .with_detail("sdg_goal", g)),
        _ => Ok(()),
    }
}

/// GET /national-figures (public)
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
    Query(filter): Query<NationalFigureFilter>,
) -> ApiResult<PaginatedResponse<NationalFigure>> {
    check_sdg_goal(filter.sdg_goal)?;
    let (rows, total) = db::national_figures::list(&state.pool, &filter, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /national-figures/categories (public)
pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryCount>> {
    let categories = db::national_figures::categories(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(categories))
}

/// GET /national-figures/{id} (public)
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<NationalFigure> {
    let figure = db::national_figures::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(figure))
}

/// POST /national-figures
pub async fn create(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(req): Json<NationalFigureCreate>,
) -> Created<NationalFigure> {
    check_sdg_goal(req.sdg_goal)?;
    validate(&req)?;
    let figure = db::national_figures::create(&state.pool, &req)
        .await
        .map_err(ServiceError::from)?;

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Created,
        figure.id,
        Some(&figure),
        format!("Added {} ({})", figure.indicator, figure.year),
    )
    .await;

    Ok((StatusCode::CREATED, Json(figure)))
}

/// PUT /national-figures/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
    Json(req): Json<NationalFigureUpdate>,
) -> ApiResult<NationalFigure> {
    check_sdg_goal(req.sdg_goal)?;
    validate(&req)?;
    let figure = db::national_figures::update(&state.pool, id, &req)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Updated,
        figure.id,
        Some(&figure),
        format!("Updated {} ({})", figure.indicator, figure.year),
    )
    .await;

    Ok(Json(figure))
}

/// DELETE /national-figures/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let figure = db::national_figures::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    announce::<NationalFigure>(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Deleted,
        figure.id,
        None,
        format!("Deleted {} ({})", figure.indicator, figure.year),
    )
    .await;

    Ok(Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_sdg_goal() {
        assert!(check_sdg_goal(None).is_ok());
        assert!(check_sdg_goal(Some(1)).is_ok());
        assert!(check_sdg_goal(Some(17)).is_ok());

        let err = check_sdg_goal(Some(18)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidSdgGoal);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert!(check_sdg_goal(Some(0)).is_err());
    }
}
