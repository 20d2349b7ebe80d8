//! Health check endpoint

use axum::Json;
use axum::extract::State;

use crate::state::AppState;

fn status_of(ok: bool) -> &'static str {
    if ok { "ok" } else { "unavailable" }
}

pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    let cache = state.kv.ping().await.is_ok();

    Json(serde_json::json!({
        "status": if database && cache { "ok" } else { "degraded" },
        "service": "aby-server",
        "version": env!("CARGO_PKG_VERSION"),
        "database": status_of(database),
        "cache": status_of(cache),
        "cache_backend": state.kv.backend_name(),
    }))
}
