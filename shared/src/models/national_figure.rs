//! National Figure Model
//!
//! A single statistical indicator value for a year, optionally tagged with
//! the UN Sustainable Development Goal it reports on.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Highest UN SDG number
pub const MAX_SDG_GOAL: i32 = 17;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct NationalFigure {
    pub id: i64,
    pub indicator: String,
    pub category: String,
    pub value: f64,
    pub unit: Option<String>,
    pub year: i32,
    pub sdg_goal: Option<i32>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NationalFigureCreate {
    #[validate(length(min = 1, max = 200))]
    pub indicator: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub value: f64,
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(range(min = 1, max = 17, message = "must be between 1 and 17"))]
    pub sdg_goal: Option<i32>,
    #[validate(length(max = 300))]
    pub source: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NationalFigureUpdate {
    #[validate(length(min = 1, max = 200))]
    pub indicator: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,
    pub value: Option<f64>,
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 17, message = "must be between 1 and 17"))]
    pub sdg_goal: Option<i32>,
    #[validate(length(max = 300))]
    pub source: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Filters accepted by the public list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NationalFigureFilter {
    pub category: Option<String>,
    pub year: Option<i32>,
    pub sdg_goal: Option<i32>,
}

/// Category with the number of figures filed under it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}
