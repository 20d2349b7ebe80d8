//! Dashboard summary

use serde::{Deserialize, Serialize};

use super::Activity;

/// Row count for one status value
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub clients_by_status: Vec<StatusCount>,
    pub total_applicants: i64,
    pub applicants_by_status: Vec<StatusCount>,
    pub open_jobs: i64,
    pub departments: i64,
    pub national_figures: i64,
    pub recent_activities: Vec<Activity>,
}
