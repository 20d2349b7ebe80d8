//! Unified service-layer error type
//!
//! `ServiceError` bridges infrastructure errors (`sqlx::Error`, TTL store
//! errors, `BoxError`) and the API-layer error (`AppError`), so handlers can
//! use `?` without hand-written `map_err` logging at every call site.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::kv::KvError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (logged, mapped to DatabaseError)
/// - `Kv`: TTL store errors (logged, mapped to CacheError)
/// - `App`: Business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    Kv(KvError),
    App(AppError),
}

/// Error code for a violated unique constraint
fn unique_violation_code(constraint: Option<&str>) -> ErrorCode {
    match constraint {
        Some("admins_email_key") => ErrorCode::AdminEmailExists,
        Some("clients_email_key") => ErrorCode::ClientEmailExists,
        Some("departments_name_key") => ErrorCode::DepartmentNameExists,
        Some("applicants_job_id_email_key") => ErrorCode::ApplicantAlreadyApplied,
        _ => ErrorCode::AlreadyExists,
    }
}

fn foreign_key_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("applicants_job_id_fkey") => "Referenced job does not exist",
        Some("activities_admin_id_fkey") => "Referenced admin does not exist",
        _ => "Referenced record does not exist",
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => ServiceError::App(AppError::new(ErrorCode::NotFound)),
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let code = unique_violation_code(db_err.constraint());
                ServiceError::App(AppError::new(code))
            }
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                let msg = foreign_key_message(db_err.constraint());
                ServiceError::App(AppError::validation(msg))
            }
            other => ServiceError::Db(other.into()),
        }
    }
}

impl From<KvError> for ServiceError {
    fn from(e: KvError) -> Self {
        ServiceError::Kv(e)
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
            ServiceError::Kv(kv_err) => {
                tracing::error!(error = %kv_err, "TTL store error");
                AppError::new(ErrorCode::CacheError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_404() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_unique_violation_codes() {
        assert_eq!(
            unique_violation_code(Some("departments_name_key")),
            ErrorCode::DepartmentNameExists
        );
        assert_eq!(
            unique_violation_code(Some("something_else")),
            ErrorCode::AlreadyExists
        );
        assert_eq!(unique_violation_code(None), ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_infra_errors_are_masked() {
        let err: AppError = ServiceError::from(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database error");

        let err: AppError = ServiceError::from(KvError::NotCounter("otp:1".into())).into();
        assert_eq!(err.code, ErrorCode::CacheError);
    }

    #[test]
    fn test_app_error_passthrough() {
        let err: AppError = ServiceError::from(AppError::new(ErrorCode::JobClosed)).into();
        assert_eq!(err.code, ErrorCode::JobClosed);
    }
}
