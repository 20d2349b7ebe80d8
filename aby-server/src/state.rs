//! Application state for aby-server

use std::sync::Arc;

use shared::models::AdminRole;
use sqlx::PgPool;

use crate::auth::otp::OtpPolicy;
use crate::auth::{JwtService, RateLimiter};
use crate::config::Config;
use crate::db;
use crate::email::Mailer;
use crate::kv::KvStore;
use crate::live::LiveHub;
use crate::upload::UploadStore;
use crate::util::{hash_secret, normalize_email};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// TTL store for OTP codes and session markers
    pub kv: KvStore,
    pub jwt: Arc<JwtService>,
    pub otp_policy: OtpPolicy,
    /// OTP delivery
    pub mailer: Mailer,
    /// Websocket fan-out
    pub live: LiveHub,
    pub uploads: UploadStore,
    /// Rate limiter for login / OTP routes
    pub rate_limiter: RateLimiter,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let kv = match config.redis_url {
            Some(ref url) => KvStore::connect_redis(url).await?,
            None => {
                tracing::warn!("REDIS_URL not set, using in-process TTL store");
                KvStore::memory()
            }
        };
        kv.ping().await?;
        tracing::info!(backend = kv.backend_name(), "TTL store ready");

        let mailer = Mailer::from_config(config).await;

        let state = Self::from_parts(pool, kv, mailer, config);
        state.uploads.ensure_dirs().await?;

        seed_admin(&state.pool, config).await?;

        Ok(state)
    }

    /// Assemble state from already-built backends
    pub fn from_parts(pool: PgPool, kv: KvStore, mailer: Mailer, config: &Config) -> Self {
        Self {
            pool,
            kv,
            jwt: Arc::new(JwtService::new(
                &config.jwt_secret,
                config.jwt_expiration_days,
            )),
            otp_policy: OtpPolicy {
                ttl_secs: config.otp_ttl_secs,
                max_attempts: config.otp_max_attempts,
            },
            mailer,
            live: LiveHub::new(),
            uploads: UploadStore::new(config.upload_dir.clone()),
            rate_limiter: RateLimiter::new(),
            secure_cookies: config.is_production(),
        }
    }

    /// Cookie / token lifetime in seconds
    pub fn session_max_age(&self) -> i64 {
        self.jwt.lifetime_secs()
    }
}

/// Create the bootstrap super admin when the admin table is empty
async fn seed_admin(pool: &PgPool, config: &Config) -> Result<(), BoxError> {
    let (Some(email), Some(password)) = (&config.seed_admin_email, &config.seed_admin_password)
    else {
        return Ok(());
    };

    if db::admins::count(pool).await? > 0 {
        return Ok(());
    }

    let email = normalize_email(email);
    let password_hash = hash_secret(password).map_err(|e| format!("hash seed password: {e}"))?;
    let admin = db::admins::create(
        pool,
        &db::admins::NewAdmin {
            email: &email,
            password_hash: &password_hash,
            first_name: "Super",
            last_name: "Admin",
            phone: None,
            role: AdminRole::SuperAdmin,
        },
    )
    .await?;

    tracing::info!(admin_id = admin.id, email = %admin.email, "Seeded super admin");
    Ok(())
}
