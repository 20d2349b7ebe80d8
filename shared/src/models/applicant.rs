//! Applicant Model

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire_enum;

wire_enum! {
    /// Recruitment pipeline stage
    ApplicantStatus as "applicant_status" {
        Pending => "pending",
        Reviewed => "reviewed",
        Shortlisted => "shortlisted",
        Interview => "interview",
        Hired => "hired",
        Rejected => "rejected",
    }
}

/// Job application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Applicant {
    pub id: i64,
    pub job_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    /// Relative path under the uploads root, e.g. `cvs/<uuid>.pdf`
    pub cv_file: String,
    pub profile_img: Option<String>,
    pub status: ApplicantStatus,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Public application payload (multipart text fields; files travel separately)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApplicantCreate {
    pub job_id: i64,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 5000))]
    pub cover_letter: Option<String>,
}

/// Admin review payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ApplicantUpdate {
    pub status: Option<ApplicantStatus>,
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "must be a valid email"))]
    pub email: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicant_update_status_only() {
        let update: ApplicantUpdate = serde_json::from_str(r#"{"status":"shortlisted"}"#).unwrap();
        assert_eq!(update.status, Some(ApplicantStatus::Shortlisted));
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_applicant_create_rejects_bad_email() {
        let create = ApplicantCreate {
            job_id: 1,
            first_name: "Eric".into(),
            last_name: "Mugisha".into(),
            email: "eric-at-example".into(),
            phone: None,
            cover_letter: None,
        };
        assert!(create.validate().is_err());
    }
}
