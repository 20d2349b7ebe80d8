//! Activity Model
//!
//! Audit trail of admin actions. Rows are written by the server for every
//! mutation; admins can also add manual notes.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Activity {
    pub id: i64,
    /// Null once the acting admin has been deleted
    pub admin_id: Option<i64>,
    /// e.g. `create`, `update`, `delete`, `login`, `note`
    pub action: String,
    /// e.g. `client`, `job`, `national_figure`
    pub resource: String,
    pub resource_id: Option<i64>,
    pub description: Option<String>,
    pub created_at: i64,
}

/// Manual activity note
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivityCreate {
    #[validate(length(min = 1, max = 50))]
    pub action: String,
    #[validate(length(min = 1, max = 50))]
    pub resource: String,
    pub resource_id: Option<i64>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}
