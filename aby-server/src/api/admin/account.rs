//! Own-account endpoints: profile, password, profile image

use axum::Json;
use axum::extract::{Multipart, State};
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Admin, PasswordChange, ProfileUpdate};

use crate::api::form::MultipartForm;
use crate::api::{ApiResult, announce, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;
use crate::upload::UploadCategory;
use crate::util::{hash_secret, verify_secret};

fn not_found() -> AppError {
    AppError::new(ErrorCode::AdminNotFound)
}

/// GET /admin/me
pub async fn get_profile(
    State(state): State<AppState>,
    current: CurrentAdmin,
) -> ApiResult<Admin> {
    let admin = db::admins::find_by_id(&state.pool, current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(admin))
}

/// PUT /admin/me
pub async fn update_profile(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(req): Json<ProfileUpdate>,
) -> ApiResult<Admin> {
    validate(&req)?;
    let admin = db::admins::update_profile(&state.pool, current.id, &req)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    announce(
        &state,
        Some(current.id),
        "admin",
        LiveAction::Updated,
        admin.id,
        Some(&admin),
        "Updated own profile".to_string(),
    )
    .await;

    Ok(Json(admin))
}

/// PUT /admin/me/password
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Json(req): Json<PasswordChange>,
) -> ApiResult<serde_json::Value> {
    validate(&req)?;

    let row = db::admins::find_with_hash(&state.pool, current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    if !verify_secret(&req.current_password, &row.password_hash) {
        security_log!("WARN", "password_change_failed", admin_id = current.id);
        return Err(AppError::invalid_credentials());
    }

    let new_hash = hash_secret(&req.new_password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::new(ErrorCode::InternalError)
    })?;
    db::admins::update_password(&state.pool, current.id, &new_hash)
        .await
        .map_err(ServiceError::from)?;

    security_log!("INFO", "password_changed", admin_id = current.id);

    Ok(Json(serde_json::json!({ "message": "Password changed" })))
}

/// POST /admin/me/profile-img (multipart `profileImg`)
pub async fn upload_profile_img(
    State(state): State<AppState>,
    current: CurrentAdmin,
    multipart: Multipart,
) -> ApiResult<Admin> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form
        .take_file("profile_img")
        .ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;

    let previous = db::admins::find_by_id(&state.pool, current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?
        .profile_img;

    let stored = state.uploads.save(UploadCategory::Admins, &file).await?;

    let admin = match db::admins::set_profile_img(&state.pool, current.id, &stored).await {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            state.uploads.remove(&stored).await;
            return Err(not_found());
        }
        Err(e) => {
            state.uploads.remove(&stored).await;
            return Err(ServiceError::from(e).into());
        }
    };
    state.uploads.remove_opt(previous.as_deref()).await;

    announce(
        &state,
        Some(current.id),
        "admin",
        LiveAction::Updated,
        admin.id,
        Some(&admin),
        "Updated own profile image".to_string(),
    )
    .await;

    Ok(Json(admin))
}
