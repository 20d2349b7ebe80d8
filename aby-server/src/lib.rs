//! aby-server: REST backend of the Rwanda Data Monitor / ABY HR system
//!
//! ```text
//! aby-server/src/
//! ├── api/       # HTTP routes and handlers, websocket relay
//! ├── auth/      # JWT, cookie, OTP, session lock/logout, extractors, rate limit
//! ├── db/        # sqlx queries, one module per table
//! ├── config.rs  # environment configuration
//! ├── kv.rs      # TTL store (Redis or in-process)
//! ├── live.rs    # broadcast fan-out of resource changes
//! ├── upload.rs  # validated file storage under uploads/<category>/
//! └── state.rs   # shared application state
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod kv;
pub mod live;
pub mod logger;
pub mod state;
pub mod upload;
pub mod util;

pub use config::Config;
pub use state::AppState;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Largest accepted request body (a CV plus a profile image and form fields)
pub const MAX_BODY_SIZE: usize = 16 * 1024 * 1024;

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Credentialed CORS for the configured dashboard origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Build the fully configured application
pub fn build_app(state: AppState, config: &Config) -> Router {
    let uploads = ServeDir::new(state.uploads.root());
    let request_id = HeaderName::from_static("x-request-id");

    api::router(state.clone())
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, XRequestId))
        .with_state(state)
}
