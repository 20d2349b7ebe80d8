use axum::Json;
use axum::extract::State;
use shared::models::DashboardStats;

use crate::api::ApiResult;
use crate::auth::CurrentAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;

/// GET /admin/dashboard
pub async fn get_stats(
    State(state): State<AppState>,
    _current: CurrentAdmin,
) -> ApiResult<DashboardStats> {
    let stats = db::stats::dashboard(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(stats))
}
