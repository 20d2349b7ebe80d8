//! Admin session extractors
//!
//! - [`CurrentAdmin`]: any active, unlocked admin session
//! - [`SessionAdmin`]: like `CurrentAdmin` but also accepts a locked session
//!   (used by `session`, `unlock` and `logout`)
//! - [`SuperAdmin`]: a `CurrentAdmin` with the `super_admin` role
//!
//! The token is read from the `AccessAdminToken` cookie or a Bearer header.
//! Role and active flag are re-read from the database on every request so
//! demotion or deactivation takes effect immediately.

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::error::{AppError, ErrorCode};
use shared::models::AdminRole;

use crate::db;
use crate::error::ServiceError;
use crate::security_log;
use crate::state::AppState;

use super::cookie;
use super::jwt::{Claims, JwtError};
use super::session::{self, SessionStatus};

#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub id: i64,
    pub email: String,
    pub role: AdminRole,
    pub locked: bool,
    pub claims: Claims,
}

impl CurrentAdmin {
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }
}

/// Validate a raw token and load the session it belongs to
pub async fn resolve_token(state: &AppState, token: &str) -> Result<CurrentAdmin, AppError> {
    let claims = state.jwt.validate_token(token).map_err(|e| {
        security_log!("WARN", "auth_failed", error = format!("{}", e));
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let locked = match session::status(&state.kv, &claims)
        .await
        .map_err(ServiceError::from)?
    {
        SessionStatus::Revoked => return Err(AppError::new(ErrorCode::SessionRevoked)),
        SessionStatus::Locked => true,
        SessionStatus::Active => false,
    };

    let id = claims
        .admin_id()
        .map_err(|e| AppError::invalid_token(e.to_string()))?;

    let access = db::admins::find_access(&state.pool, id)
        .await
        .map_err(ServiceError::from)?;
    let role = match access {
        Some(access) if access.is_active => access.role,
        _ => {
            security_log!("WARN", "auth_inactive_account", admin_id = id);
            return Err(AppError::new(ErrorCode::AccountDisabled));
        }
    };

    Ok(CurrentAdmin {
        id,
        email: claims.email.clone(),
        role,
        locked,
        claims,
    })
}

async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<CurrentAdmin, AppError> {
    if let Some(admin) = parts.extensions.get::<CurrentAdmin>() {
        return Ok(admin.clone());
    }

    let Some(token) = cookie::extract_token(&parts.headers) else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", parts.uri));
        return Err(AppError::not_authenticated());
    };

    let admin = resolve_token(state, &token).await?;
    parts.extensions.insert(admin.clone());
    Ok(admin)
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authenticate(parts, state).await?;
        if admin.locked {
            return Err(AppError::new(ErrorCode::SessionLocked));
        }
        Ok(admin)
    }
}

/// Session that may be locked
#[derive(Debug, Clone)]
pub struct SessionAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for SessionAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).await.map(SessionAdmin)
    }
}

#[derive(Debug, Clone)]
pub struct SuperAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for SuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = CurrentAdmin::from_request_parts(parts, state).await?;
        if !admin.is_super_admin() {
            security_log!(
                "WARN",
                "permission_denied",
                admin_id = admin.id,
                required_role = "super_admin"
            );
            return Err(AppError::new(ErrorCode::SuperAdminRequired));
        }
        Ok(SuperAdmin(admin))
    }
}
