//! Job Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::wire_enum;

wire_enum! {
    /// Whether a job still accepts applications
    JobStatus as "job_status" {
        Open => "open",
        Closed => "closed",
    }
}

wire_enum! {
    EmploymentType as "employment_type" {
        FullTime => "full_time",
        PartTime => "part_time",
        Contract => "contract",
        Internship => "internship",
    }
}

/// Job posting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    pub salary_range: Option<String>,
    pub status: JobStatus,
    pub deadline: Option<NaiveDate>,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Job {
    pub fn accepts_applications(&self) -> bool {
        self.status == JobStatus::Open
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobCreate {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub description: String,
    #[validate(length(max = 200))]
    pub department: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    #[validate(length(max = 100))]
    pub salary_range: Option<String>,
    pub status: Option<JobStatus>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct JobUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub department: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    #[validate(length(max = 100))]
    pub salary_range: Option<String>,
    pub status: Option<JobStatus>,
    pub deadline: Option<NaiveDate>,
}
