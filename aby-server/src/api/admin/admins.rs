//! Admin account management (super admin only)

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Admin, AdminCreate, AdminRole, AdminUpdate};
use shared::query::{ListQuery, PaginatedResponse};

use crate::api::{ApiResult, Created, announce, validate};
use crate::auth::SuperAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;
use crate::util::{hash_secret, normalize_email};

fn not_found() -> AppError {
    AppError::new(ErrorCode::AdminNotFound)
}

/// GET /admin
pub async fn list(
    State(state): State<AppState>,
    SuperAdmin(_): SuperAdmin,
    Query(query): Query<ListQuery>,
) -> ApiResult<PaginatedResponse<Admin>> {
    let (rows, total) = db::admins::list(&state.pool, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /admin/{id}
pub async fn get(
    State(state): State<AppState>,
    SuperAdmin(_): SuperAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Admin> {
    let admin = db::admins::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(admin))
}

/// POST /admin
pub async fn create(
    State(state): State<AppState>,
    SuperAdmin(current): SuperAdmin,
    Json(req): Json<AdminCreate>,
) -> Created<Admin> {
    validate(&req)?;

    let email = normalize_email(&req.email);
    let password_hash = hash_secret(&req.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    let admin = db::admins::create(
        &state.pool,
        &db::admins::NewAdmin {
            email: &email,
            password_hash: &password_hash,
            first_name: req.first_name.trim(),
            last_name: req.last_name.trim(),
            phone: req.phone.as_deref(),
            role: req.role.unwrap_or(AdminRole::Admin),
        },
    )
    .await
    .map_err(ServiceError::from)?;

    security_log!(
        "INFO",
        "admin_created",
        admin_id = admin.id,
        by = current.id,
        role = admin.role.as_str()
    );
    announce(
        &state,
        Some(current.id),
        "admin",
        LiveAction::Created,
        admin.id,
        Some(&admin),
        format!("Created admin {}", admin.email),
    )
    .await;

    Ok((StatusCode::CREATED, Json(admin)))
}

/// PUT /admin/{id}
pub async fn update(
    State(state): State<AppState>,
    SuperAdmin(current): SuperAdmin,
    Path(id): Path<i64>,
    Json(req): Json<AdminUpdate>,
) -> ApiResult<Admin> {
    validate(&req)?;

    // A super admin cannot lock themselves out
    if id == current.id
        && (req.is_active == Some(false) || req.role.is_some_and(|r| r != AdminRole::SuperAdmin))
    {
        return Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "Cannot demote or deactivate your own account",
        ));
    }

    let admin = db::admins::update(&state.pool, id, &req)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    if req.role.is_some() || req.is_active.is_some() {
        security_log!(
            "INFO",
            "admin_access_changed",
            admin_id = admin.id,
            by = current.id,
            role = admin.role.as_str(),
            is_active = admin.is_active
        );
    }
    announce(
        &state,
        Some(current.id),
        "admin",
        LiveAction::Updated,
        admin.id,
        Some(&admin),
        format!("Updated admin {}", admin.email),
    )
    .await;

    Ok(Json(admin))
}

/// DELETE /admin/{id}
pub async fn delete(
    State(state): State<AppState>,
    SuperAdmin(current): SuperAdmin,
    Path(id): Path<i64>,
) -> ApiResult<shared::ApiResponse<()>> {
    if id == current.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    let admin = db::admins::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    state.uploads.remove_opt(admin.profile_img.as_deref()).await;

    security_log!("INFO", "admin_deleted", admin_id = admin.id, by = current.id);
    announce::<Admin>(
        &state,
        Some(current.id),
        "admin",
        LiveAction::Deleted,
        admin.id,
        None,
        format!("Deleted admin {}", admin.email),
    )
    .await;

    Ok(Json(shared::ApiResponse::ok()))
}
