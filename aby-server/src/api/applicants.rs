//! `/applicants`: public job applications, admin review

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use http::StatusCode;
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::live::LiveAction;
use shared::models::{Applicant, ApplicantCreate, ApplicantStatus, ApplicantUpdate, Job};
use shared::query::{ListQuery, PaginatedResponse};

use crate::api::form::MultipartForm;
use crate::api::{ApiResult, Created, announce, validate};
use crate::auth::CurrentAdmin;
use crate::db;
use crate::db::applicants::{ApplicantFiles, ApplicantFilter};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::upload::UploadCategory;
use crate::util::normalize_email;

const RESOURCE: &str = "applicant";

#[derive(Debug, Deserialize)]
pub struct ApplicantListFilter {
    pub status: Option<ApplicantStatus>,
    pub job_id: Option<i64>,
}

fn not_found() -> AppError {
    AppError::new(ErrorCode::ApplicantNotFound)
}

fn create_payload(form: &MultipartForm) -> Result<ApplicantCreate, AppError> {
    Ok(ApplicantCreate {
        job_id: form.parse_required("job_id")?,
        first_name: form.required("first_name")?,
        last_name: form.required("last_name")?,
        email: form.required("email")?,
        phone: form.text("phone"),
        cover_letter: form.text("cover_letter"),
    })
}

/// Open and, when a deadline is set, not past it
fn ensure_accepting(job: &Job, today: chrono::NaiveDate) -> Result<(), AppError> {
    let past_deadline = job.deadline.is_some_and(|d| d < today);
    if !job.accepts_applications() || past_deadline {
        return Err(AppError::new(ErrorCode::JobClosed).with_detail("job_id", job.id));
    }
    Ok(())
}

/// GET /applicants
pub async fn list(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Query(query): Query<ListQuery>,
    Query(filter): Query<ApplicantListFilter>,
) -> ApiResult<PaginatedResponse<Applicant>> {
    let filter = ApplicantFilter {
        status: filter.status,
        job_id: filter.job_id,
    };
    let (rows, total) = db::applicants::list(&state.pool, filter, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(PaginatedResponse::from_query(rows, total, &query)))
}

/// GET /applicants/{id}
pub async fn get(
    State(state): State<AppState>,
    _current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Applicant> {
    let applicant = db::applicants::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    Ok(Json(applicant))
}

/// POST /applicants (public, multipart: fields + `cvFile` + optional `profileImg`)
pub async fn apply(State(state): State<AppState>, multipart: Multipart) -> Created<Applicant> {
    let mut form = MultipartForm::read(multipart).await?;
    let req = create_payload(&form)?;
    validate(&req)?;
    let email = normalize_email(&req.email);

    let job = db::jobs::find_by_id(&state.pool, req.job_id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::JobNotFound))?;
    ensure_accepting(&job, chrono::Utc::now().date_naive())?;

    let cv = form.take_file("cv_file").ok_or_else(|| {
        AppError::with_message(ErrorCode::NoFileProvided, "cvFile is required")
            .with_detail("field", "cvFile")
    })?;
    let image = form.take_file("profile_img");

    let cv_file = state.uploads.save(UploadCategory::Cvs, &cv).await?;
    let profile_img = match image {
        Some(file) => match state.uploads.save(UploadCategory::Applicants, &file).await {
            Ok(path) => Some(path),
            Err(e) => {
                state.uploads.remove(&cv_file).await;
                return Err(e);
            }
        },
        None => None,
    };

    let files = ApplicantFiles {
        cv_file: &cv_file,
        profile_img: profile_img.as_deref(),
    };
    let applicant = match db::applicants::create(&state.pool, &req, &email, &files).await {
        Ok(applicant) => applicant,
        Err(e) => {
            state.uploads.remove(&cv_file).await;
            state.uploads.remove_opt(profile_img.as_deref()).await;
            return Err(ServiceError::from(e).into());
        }
    };

    tracing::info!(applicant_id = applicant.id, job_id = job.id, "Application received");
    announce(
        &state,
        None,
        RESOURCE,
        LiveAction::Created,
        applicant.id,
        Some(&applicant),
        format!(
            "{} {} applied for {}",
            applicant.first_name, applicant.last_name, job.title
        ),
    )
    .await;

    Ok((StatusCode::CREATED, Json(applicant)))
}

/// PUT /applicants/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
    Json(req): Json<ApplicantUpdate>,
) -> ApiResult<Applicant> {
    validate(&req)?;
    let email = req.email.as_deref().map(normalize_email);

    let applicant = db::applicants::update(&state.pool, id, &req, email.as_deref())
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;

    let description = match req.status {
        Some(status) => format!(
            "Moved applicant {} {} to {status}",
            applicant.first_name, applicant.last_name
        ),
        None => format!(
            "Updated applicant {} {}",
            applicant.first_name, applicant.last_name
        ),
    };
    announce(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Updated,
        applicant.id,
        Some(&applicant),
        description,
    )
    .await;

    Ok(Json(applicant))
}

/// DELETE /applicants/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentAdmin,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let applicant = db::applicants::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(not_found)?;
    state.uploads.remove(&applicant.cv_file).await;
    state.uploads.remove_opt(applicant.profile_img.as_deref()).await;

    announce::<Applicant>(
        &state,
        Some(current.id),
        RESOURCE,
        LiveAction::Deleted,
        applicant.id,
        None,
        format!(
            "Deleted applicant {} {}",
            applicant.first_name, applicant.last_name
        ),
    )
    .await;

    Ok(Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::{EmploymentType, JobStatus};

    fn job(status: JobStatus, deadline: Option<NaiveDate>) -> Job {
        Job {
            id: 7,
            title: "Data analyst".into(),
            description: "NISR survey support".into(),
            department: None,
            location: Some("Kigali".into()),
            employment_type: EmploymentType::FullTime,
            salary_range: None,
            status,
            deadline,
            created_by: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_ensure_accepting() {
        let today = date(2026, 3, 10);
        assert!(ensure_accepting(&job(JobStatus::Open, None), today).is_ok());
        assert!(ensure_accepting(&job(JobStatus::Open, Some(today)), today).is_ok());

        let closed = ensure_accepting(&job(JobStatus::Closed, None), today).unwrap_err();
        assert_eq!(closed.code, ErrorCode::JobClosed);

        let expired = ensure_accepting(&job(JobStatus::Open, Some(date(2026, 3, 9))), today);
        assert_eq!(expired.unwrap_err().code, ErrorCode::JobClosed);
    }

    #[test]
    fn test_create_payload_requires_job_id() {
        let form = MultipartForm::with_fields(&[
            ("firstName", "Eric"),
            ("lastName", "Habimana"),
            ("email", "eric@example.rw"),
        ]);
        assert_eq!(
            create_payload(&form).unwrap_err().code,
            ErrorCode::RequiredField
        );

        let form = MultipartForm::with_fields(&[
            ("jobId", "12"),
            ("firstName", "Eric"),
            ("lastName", "Habimana"),
            ("email", "eric@example.rw"),
            ("coverLetter", "Motivated"),
        ]);
        let req = create_payload(&form).unwrap();
        assert_eq!(req.job_id, 12);
        assert_eq!(req.cover_letter.as_deref(), Some("Motivated"));
    }
}
