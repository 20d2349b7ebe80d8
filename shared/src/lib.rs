//! Shared types for the ABY HR backend
//!
//! Wire types used by the server and by any Rust client: the unified error
//! system, entity models and DTOs, list/pagination types and live events.

pub mod error;
pub mod live;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use live::{LiveAction, LiveEvent};
pub use query::{ListQuery, PaginatedResponse};
