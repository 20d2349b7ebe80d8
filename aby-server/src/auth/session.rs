//! Per-session lock and logout markers
//!
//! Tokens are stateless, so lock and logout are recorded against the token's
//! `jti` in the TTL store, expiring together with the token itself.

use crate::kv::{KvResult, KvStore};

use super::jwt::Claims;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Active,
    Locked,
    Revoked,
}

fn lock_key(jti: &str) -> String {
    format!("session:locked:{jti}")
}

fn revoked_key(jti: &str) -> String {
    format!("session:revoked:{jti}")
}

pub async fn status(kv: &KvStore, claims: &Claims) -> KvResult<SessionStatus> {
    if kv.exists(&revoked_key(&claims.jti)).await? {
        return Ok(SessionStatus::Revoked);
    }
    if kv.exists(&lock_key(&claims.jti)).await? {
        return Ok(SessionStatus::Locked);
    }
    Ok(SessionStatus::Active)
}

pub async fn lock(kv: &KvStore, claims: &Claims) -> KvResult<()> {
    let ttl = claims.remaining_secs().max(1);
    kv.set_ex(&lock_key(&claims.jti), "1", ttl).await
}

pub async fn unlock(kv: &KvStore, claims: &Claims) -> KvResult<()> {
    kv.del(&lock_key(&claims.jti)).await
}

/// Logout: the token stays cryptographically valid but is refused from now on
pub async fn revoke(kv: &KvStore, claims: &Claims) -> KvResult<()> {
    let ttl = claims.remaining_secs().max(1);
    kv.set_ex(&revoked_key(&claims.jti), "1", ttl).await?;
    kv.del(&lock_key(&claims.jti)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AdminRole;

    fn claims(jti: &str) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "1".into(),
            email: "ops@abyhr.rw".into(),
            role: AdminRole::Admin,
            jti: jti.into(),
            iat: now,
            exp: now + 3600,
        }
    }

    #[tokio::test]
    async fn test_lock_unlock_cycle() {
        let kv = KvStore::memory();
        let c = claims("s1");
        assert_eq!(status(&kv, &c).await.unwrap(), SessionStatus::Active);

        lock(&kv, &c).await.unwrap();
        assert_eq!(status(&kv, &c).await.unwrap(), SessionStatus::Locked);

        unlock(&kv, &c).await.unwrap();
        assert_eq!(status(&kv, &c).await.unwrap(), SessionStatus::Active);
    }

    #[tokio::test]
    async fn test_revoke_wins_over_lock() {
        let kv = KvStore::memory();
        let c = claims("s2");
        lock(&kv, &c).await.unwrap();
        revoke(&kv, &c).await.unwrap();
        assert_eq!(status(&kv, &c).await.unwrap(), SessionStatus::Revoked);
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let kv = KvStore::memory();
        lock(&kv, &claims("a")).await.unwrap();
        assert_eq!(
            status(&kv, &claims("b")).await.unwrap(),
            SessionStatus::Active
        );
    }
}
