//! Login one-time codes
//!
//! A pending code is two keys sharing the OTP lifetime as TTL:
//! `otp:<admin_id>` holds the argon2 hash and `otp:<admin_id>:attempts` the
//! number of checks made so far. Each check reserves its attempt with an
//! atomic increment before hashing, so parallel guesses cannot exceed the
//! budget. The last allowed wrong guess burns the code.

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

use crate::kv::{KvError, KvStore};
use crate::util::{generate_otp, hash_secret, verify_secret};

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("no pending code or code expired")]
    Expired,

    #[error("code does not match ({remaining} attempts left)")]
    Invalid { remaining: u32 },

    #[error("too many wrong codes")]
    TooManyAttempts,

    #[error("failed to hash code: {0}")]
    Hash(String),

    #[error(transparent)]
    Kv(#[from] KvError),
}

impl From<OtpError> for AppError {
    fn from(e: OtpError) -> Self {
        match e {
            OtpError::Expired => AppError::new(ErrorCode::OtpExpired),
            OtpError::Invalid { remaining } => {
                AppError::new(ErrorCode::OtpInvalid).with_detail("remaining_attempts", remaining)
            }
            OtpError::TooManyAttempts => AppError::new(ErrorCode::TooManyAttempts),
            OtpError::Hash(msg) => {
                tracing::error!(error = %msg, "OTP hashing failed");
                AppError::new(ErrorCode::InternalError)
            }
            OtpError::Kv(e) => {
                tracing::error!(error = %e, "OTP store error");
                AppError::new(ErrorCode::CacheError)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OtpPolicy {
    pub ttl_secs: u64,
    pub max_attempts: u32,
}

fn key(admin_id: i64) -> String {
    format!("otp:{admin_id}")
}

fn attempts_key(admin_id: i64) -> String {
    format!("otp:{admin_id}:attempts")
}

/// Generate and store a new code, replacing any pending one. Returns the plain code.
pub async fn issue(kv: &KvStore, policy: OtpPolicy, admin_id: i64) -> Result<String, OtpError> {
    let code = generate_otp();
    let hash = hash_secret(&code).map_err(|e| OtpError::Hash(e.to_string()))?;
    kv.set_ex(&attempts_key(admin_id), "0", policy.ttl_secs).await?;
    kv.set_ex(&key(admin_id), &hash, policy.ttl_secs).await?;
    Ok(code)
}

/// Check a submitted code. A match consumes it.
pub async fn verify(
    kv: &KvStore,
    policy: OtpPolicy,
    admin_id: i64,
    code: &str,
) -> Result<(), OtpError> {
    let key = key(admin_id);
    let attempts_key = attempts_key(admin_id);

    let attempt = kv
        .incr_existing(&attempts_key)
        .await?
        .ok_or(OtpError::Expired)?;
    if attempt > u64::from(policy.max_attempts) {
        burn(kv, &key, &attempts_key).await?;
        return Err(OtpError::TooManyAttempts);
    }

    let hash = kv.get(&key).await?.ok_or(OtpError::Expired)?;

    if verify_secret(code.trim(), &hash) {
        // Only the caller that actually deletes the hash wins
        if !kv.remove(&key).await? {
            return Err(OtpError::Expired);
        }
        kv.del(&attempts_key).await?;
        return Ok(());
    }

    if attempt >= u64::from(policy.max_attempts) {
        burn(kv, &key, &attempts_key).await?;
        return Err(OtpError::TooManyAttempts);
    }

    Err(OtpError::Invalid {
        remaining: policy.max_attempts - attempt as u32,
    })
}

async fn burn(kv: &KvStore, key: &str, attempts_key: &str) -> Result<(), OtpError> {
    kv.del(key).await?;
    kv.del(attempts_key).await?;
    Ok(())
}

/// Drop any pending code
pub async fn discard(kv: &KvStore, admin_id: i64) -> Result<(), OtpError> {
    burn(kv, &key(admin_id), &attempts_key(admin_id)).await
}
