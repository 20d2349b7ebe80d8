//! Dashboard aggregates

use shared::models::{DashboardStats, StatusCount};
use sqlx::PgPool;

const RECENT_ACTIVITY_LIMIT: i64 = 10;

pub async fn dashboard(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
    let clients_by_status: Vec<StatusCount> = sqlx::query_as(
        "SELECT status::TEXT AS status, COUNT(*) AS count FROM clients
         GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let applicants_by_status: Vec<StatusCount> = sqlx::query_as(
        "SELECT status::TEXT AS status, COUNT(*) AS count FROM applicants
         GROUP BY status ORDER BY status",
    )
    .fetch_all(pool)
    .await?;

    let (open_jobs, departments, national_figures): (i64, i64, i64) = sqlx::query_as(
        "SELECT
            (SELECT COUNT(*) FROM jobs WHERE status = 'open'),
            (SELECT COUNT(*) FROM departments),
            (SELECT COUNT(*) FROM national_figures)",
    )
    .fetch_one(pool)
    .await?;

    let recent_activities = super::activities::recent(pool, RECENT_ACTIVITY_LIMIT).await?;

    Ok(DashboardStats {
        total_clients: clients_by_status.iter().map(|s| s.count).sum(),
        clients_by_status,
        total_applicants: applicants_by_status.iter().map(|s| s.count).sum(),
        applicants_by_status,
        open_jobs,
        departments,
        national_figures,
        recent_activities,
    })
}
