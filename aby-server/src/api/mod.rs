//! API routes for aby-server

pub mod activities;
pub mod admin;
pub mod applicants;
pub mod clients;
pub mod departments;
pub mod form;
pub mod health;
pub mod jobs;
pub mod national_figures;
pub mod ws;

use axum::Json;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use http::StatusCode;
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use validator::{Validate, ValidationErrors};

use crate::auth::rate_limit::auth_rate_limit;
use crate::db;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

/// 201 with the created record
pub type Created<T> = Result<(StatusCode, Json<T>), AppError>;

/// Reject a payload that fails its `validator` rules, with per-field messages in `details`
pub fn validate<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut err = AppError::with_message(ErrorCode::ValidationFailed, "Validation failed");
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        err = err.with_detail(field.to_string(), messages);
    }
    err
}

/// Record an activity line and push the change to live subscribers.
///
/// The activity insert is best-effort: a failure is logged and the mutation
/// still succeeds.
pub async fn announce<T: Serialize>(
    state: &AppState,
    actor: Option<i64>,
    resource: &'static str,
    action: LiveAction,
    id: i64,
    record: Option<&T>,
    description: String,
) {
    match record {
        Some(record) => state.live.publish_record(resource, action, id, record),
        None => state.live.publish_deleted(resource, id),
    }

    let activity = db::activities::NewActivity {
        admin_id: actor,
        action: action.as_str(),
        resource,
        resource_id: Some(id),
        description: Some(&description),
    };
    match db::activities::create(&state.pool, &activity).await {
        Ok(activity) => {
            state
                .live
                .publish_record("activity", LiveAction::Created, activity.id, &activity)
        }
        Err(e) => {
            tracing::warn!(error = %e, resource, id, "Failed to record activity");
        }
    }
}

/// Create the API router (state attached by the caller)
pub fn router(state: AppState) -> Router<AppState> {
    // Login / OTP (no session, rate limited)
    let login = Router::new()
        .route("/admin/login", post(admin::auth::login))
        .route("/admin/verify-otp", post(admin::auth::verify_otp))
        .route("/admin/resend-otp", post(admin::auth::resend_otp))
        .route_layer(middleware::from_fn_with_state(state, auth_rate_limit));

    let session = Router::new()
        .route("/admin/logout", post(admin::auth::logout))
        .route("/admin/lock", post(admin::auth::lock))
        .route("/admin/unlock", post(admin::auth::unlock))
        .route("/admin/session", get(admin::auth::session));

    let account = Router::new()
        .route(
            "/admin/me",
            get(admin::account::get_profile).put(admin::account::update_profile),
        )
        .route("/admin/me/password", put(admin::account::change_password))
        .route(
            "/admin/me/profile-img",
            post(admin::account::upload_profile_img),
        )
        .route("/admin/dashboard", get(admin::dashboard::get_stats));

    let admins = Router::new()
        .route(
            "/admin",
            get(admin::admins::list).post(admin::admins::create),
        )
        .route(
            "/admin/{id}",
            get(admin::admins::get)
                .put(admin::admins::update)
                .delete(admin::admins::delete),
        );

    let resources = Router::new()
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route(
            "/jobs/{id}",
            get(jobs::get).put(jobs::update).delete(jobs::delete),
        )
        .route("/applicants", get(applicants::list).post(applicants::apply))
        .route(
            "/applicants/{id}",
            get(applicants::get)
                .put(applicants::update)
                .delete(applicants::delete),
        )
        .route(
            "/departments",
            get(departments::list).post(departments::create),
        )
        .route(
            "/departments/{id}",
            get(departments::get)
                .put(departments::update)
                .delete(departments::delete),
        )
        .route(
            "/activities",
            get(activities::list).post(activities::create),
        )
        .route(
            "/activities/{id}",
            get(activities::get).delete(activities::delete),
        )
        .route(
            "/national-figures",
            get(national_figures::list).post(national_figures::create),
        )
        .route(
            "/national-figures/categories",
            get(national_figures::categories),
        )
        .route(
            "/national-figures/{id}",
            get(national_figures::get)
                .put(national_figures::update)
                .delete(national_figures::delete),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(ws::handle_ws))
        .merge(login)
        .merge(session)
        .merge(account)
        .merge(admins)
        .merge(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ClientCreate;

    #[test]
    fn test_validation_error_lists_fields() {
        let payload = ClientCreate {
            first_name: String::new(),
            last_name: "Mugisha".into(),
            email: "not-an-email".into(),
            phone: None,
            company: None,
            address: None,
            national_id: None,
            status: None,
            notes: None,
        };
        let err = validate(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details.contains_key("email"));
        assert!(details.contains_key("first_name"));
        assert!(!details.contains_key("last_name"));
        assert_eq!(details["email"][0], "must be a valid email");
    }
}
