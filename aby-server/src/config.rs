//! Server configuration

use std::path::PathBuf;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Minimum JWT secret length outside development
const MIN_JWT_SECRET_LEN: usize = 32;

/// How OTP codes reach the admin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransport {
    /// AWS SES
    Ses,
    /// Write the code to the log (development only)
    Log,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// HS256 secret for admin tokens
    pub jwt_secret: String,
    /// Token and cookie lifetime
    pub jwt_expiration_days: i64,
    /// Redis URL; unset selects the in-process TTL store
    pub redis_url: Option<String>,
    /// OTP lifetime in seconds
    pub otp_ttl_secs: u64,
    /// Wrong codes allowed before the OTP is burned
    pub otp_max_attempts: u32,
    /// Root of `uploads/<category>/`
    pub upload_dir: PathBuf,
    /// Allowed CORS origins (credentials enabled)
    pub cors_origins: Vec<String>,
    /// OTP sender address
    pub ses_from_email: String,
    pub mail_transport: MailTransport,
    /// Bootstrap super admin, used only while the admin table is empty
    pub seed_admin_email: Option<String>,
    pub seed_admin_password: Option<String>,
    /// Log level for the console/file layers
    pub log_level: String,
    /// Optional directory for rolling log files
    pub log_dir: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production-use-only")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn optional_var(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let jwt_secret = Self::require_secret("JWT_SECRET", &environment)?;
        if environment != "development" && jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(
                format!("JWT_SECRET must be at least {MIN_JWT_SECRET_LEN} characters").into(),
            );
        }

        let mail_transport = match std::env::var("MAIL_TRANSPORT").as_deref() {
            Ok("ses") => MailTransport::Ses,
            Ok("log") | Err(_) => MailTransport::Log,
            Ok(other) => return Err(format!("Unknown MAIL_TRANSPORT '{other}'").into()),
        };
        if mail_transport == MailTransport::Log && environment == "production" {
            return Err("MAIL_TRANSPORT=log is not allowed in production".into());
        }

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: Self::parse_var("HTTP_PORT", 4000),
            jwt_secret,
            jwt_expiration_days: Self::parse_var("JWT_EXPIRATION_DAYS", 7),
            redis_url: Self::optional_var("REDIS_URL"),
            otp_ttl_secs: Self::parse_var("OTP_TTL_SECONDS", 300),
            otp_max_attempts: Self::parse_var("OTP_MAX_ATTEMPTS", 3),
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into()),
            ),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@abyhr.rw".into()),
            mail_transport,
            seed_admin_email: Self::optional_var("SEED_ADMIN_EMAIL"),
            seed_admin_password: Self::optional_var("SEED_ADMIN_PASSWORD"),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: Self::optional_var("LOG_DIR"),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Development defaults, used by tests and local tooling
    pub fn for_development(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            http_port: 4000,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production-use-only".into(),
            jwt_expiration_days: 7,
            redis_url: None,
            otp_ttl_secs: 300,
            otp_max_attempts: 3,
            upload_dir: PathBuf::from("uploads"),
            cors_origins: vec!["http://localhost:5173".into()],
            ses_from_email: "noreply@abyhr.rw".into(),
            mail_transport: MailTransport::Log,
            seed_admin_email: None,
            seed_admin_password: None,
            log_level: "info".into(),
            log_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_secret_development_fallback() {
        let val = Config::require_secret("ABY_TEST_SECRET_THAT_IS_NEVER_SET", "development")
            .unwrap();
        assert!(val.starts_with("dev-"));
    }

    #[test]
    fn test_require_secret_production_missing() {
        let err = Config::require_secret("ABY_TEST_SECRET_THAT_IS_NEVER_SET", "production")
            .unwrap_err();
        assert!(err.to_string().contains("must be set"));
    }

    #[test]
    fn test_development_defaults() {
        let config = Config::for_development("postgres://localhost/aby");
        assert_eq!(config.http_port, 4000);
        assert_eq!(config.jwt_expiration_days, 7);
        assert!(!config.is_production());
        assert!(config.jwt_secret.len() >= MIN_JWT_SECRET_LEN);
    }
}
