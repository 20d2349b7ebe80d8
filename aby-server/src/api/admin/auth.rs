//! Admin login flow: password → OTP → session cookie, plus lock / unlock / logout

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use http::{HeaderMap, header};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Admin, AuthenticatedResponse, LoginRequest, OtpPendingResponse, SessionResponse, SessionState,
    UnlockRequest, VerifyOtpRequest,
};

use crate::api::{ApiResult, validate};
use crate::auth::{SessionAdmin, cookie, otp, session};
use crate::db;
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;
use crate::util::{normalize_email, verify_secret, verify_secret_or_dummy};

/// Password step shared by login and resend-otp
async fn check_password(state: &AppState, email: &str, password: &str) -> Result<Admin, AppError> {
    let email = normalize_email(email);
    let row = db::admins::find_by_email_with_hash(&state.pool, &email)
        .await
        .map_err(ServiceError::from)?;

    let hash = row.as_ref().map(|r| r.password_hash.as_str());
    let matched = verify_secret_or_dummy(password, hash);
    let Some(row) = row.filter(|_| matched) else {
        security_log!("WARN", "login_failed", email = email);
        return Err(AppError::invalid_credentials());
    };

    if !row.admin.is_active {
        security_log!("WARN", "login_inactive", admin_id = row.admin.id);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    Ok(row.admin)
}

/// Issue a fresh OTP and mail it
async fn send_otp(state: &AppState, admin: &Admin) -> ApiResult<OtpPendingResponse> {
    let code = otp::issue(&state.kv, state.otp_policy, admin.id).await?;

    if let Err(e) = state
        .mailer
        .send_login_code(&admin.email, &code, state.otp_policy.ttl_secs)
        .await
    {
        tracing::error!(admin_id = admin.id, error = %e, "Failed to deliver login code");
        let _ = otp::discard(&state.kv, admin.id).await;
        return Err(AppError::new(ErrorCode::MailDeliveryFailed));
    }

    security_log!("INFO", "otp_issued", admin_id = admin.id);

    Ok(Json(OtpPendingResponse {
        state: SessionState::OtpPending,
        email: admin.email.clone(),
        expires_in: state.otp_policy.ttl_secs,
    }))
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<OtpPendingResponse> {
    validate(&req)?;
    let admin = check_password(&state, &req.email, &req.password).await?;
    send_otp(&state, &admin).await
}

/// POST /admin/resend-otp
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<OtpPendingResponse> {
    validate(&req)?;
    let admin = check_password(&state, &req.email, &req.password).await?;
    send_otp(&state, &admin).await
}

/// POST /admin/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate(&req)?;
    let email = normalize_email(&req.email);

    // Unknown email looks the same as "no pending code"
    let admin = db::admins::find_by_email_with_hash(&state.pool, &email)
        .await
        .map_err(ServiceError::from)?
        .map(|row| row.admin)
        .ok_or_else(|| AppError::new(ErrorCode::OtpExpired))?;

    if let Err(e) = otp::verify(&state.kv, state.otp_policy, admin.id, &req.otp).await {
        security_log!(
            "WARN",
            "otp_failed",
            admin_id = admin.id,
            reason = e.to_string()
        );
        return Err(e.into());
    }

    if !admin.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let (token, _claims) = state.jwt.generate_token(&admin).map_err(|e| {
        tracing::error!(error = %e, "JWT creation failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    security_log!("INFO", "login_success", admin_id = admin.id);

    let cookie = cookie::session_cookie(&token, state.session_max_age(), state.secure_cookies);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthenticatedResponse {
            state: SessionState::Authenticated,
            admin,
            token,
        }),
    ))
}

/// POST /admin/logout
///
/// Always clears the cookie; a still-valid token is revoked for the rest of its lifetime.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = cookie::extract_token(&headers)
        && let Ok(claims) = state.jwt.validate_token(&token)
    {
        session::revoke(&state.kv, &claims)
            .await
            .map_err(ServiceError::from)?;
        security_log!("INFO", "logout", admin_id = claims.sub);
    }

    Ok((
        [(header::SET_COOKIE, cookie::clear_cookie(state.secure_cookies))],
        Json(SessionResponse {
            state: SessionState::Unauthenticated,
            admin: None,
        }),
    ))
}

async fn load_admin(state: &AppState, id: i64) -> Result<Admin, AppError> {
    db::admins::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))
}

/// POST /admin/lock
pub async fn lock(
    State(state): State<AppState>,
    SessionAdmin(current): SessionAdmin,
) -> ApiResult<SessionResponse> {
    session::lock(&state.kv, &current.claims)
        .await
        .map_err(ServiceError::from)?;
    security_log!("INFO", "session_locked", admin_id = current.id);

    Ok(Json(SessionResponse {
        state: SessionState::Locked,
        admin: Some(load_admin(&state, current.id).await?),
    }))
}

/// POST /admin/unlock
pub async fn unlock(
    State(state): State<AppState>,
    SessionAdmin(current): SessionAdmin,
    Json(req): Json<UnlockRequest>,
) -> ApiResult<SessionResponse> {
    validate(&req)?;

    let row = db::admins::find_with_hash(&state.pool, current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::AdminNotFound))?;

    if !verify_secret(&req.password, &row.password_hash) {
        security_log!("WARN", "unlock_failed", admin_id = current.id);
        return Err(AppError::invalid_credentials());
    }

    session::unlock(&state.kv, &current.claims)
        .await
        .map_err(ServiceError::from)?;
    security_log!("INFO", "session_unlocked", admin_id = current.id);

    Ok(Json(SessionResponse {
        state: SessionState::Authenticated,
        admin: Some(row.admin),
    }))
}

/// GET /admin/session
pub async fn session(
    State(state): State<AppState>,
    SessionAdmin(current): SessionAdmin,
) -> ApiResult<SessionResponse> {
    let admin = load_admin(&state, current.id).await?;
    Ok(Json(SessionResponse {
        state: if current.locked {
            SessionState::Locked
        } else {
            SessionState::Authenticated
        },
        admin: Some(admin),
    }))
}
