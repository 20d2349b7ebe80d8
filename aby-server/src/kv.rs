//! TTL key-value store
//!
//! Holds short-lived auth state: pending OTP codes and per-session lock /
//! revocation markers. Expiry is delegated to the store itself.
//!
//! - `Redis`: production backend (`REDIS_URL`)
//! - `Memory`: in-process map for development and tests

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use dashmap::DashMap;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("value at '{0}' is not a counter")]
    NotCounter(String),
}

pub type KvResult<T> = Result<T, KvError>;

static INCR_EXISTING: LazyLock<redis::Script> = LazyLock::new(|| {
    redis::Script::new(
        r"if redis.call('EXISTS', KEYS[1]) == 1 then return redis.call('INCR', KEYS[1]) else return nil end",
    )
});

#[derive(Clone)]
pub enum KvStore {
    Redis(RedisStore),
    Memory(MemoryStore),
}

impl KvStore {
    /// Connect to Redis
    pub async fn connect_redis(url: &str) -> KvResult<Self> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(KvStore::Redis(RedisStore { conn }))
    }

    pub fn memory() -> Self {
        KvStore::Memory(MemoryStore::default())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            KvStore::Redis(_) => "redis",
            KvStore::Memory(_) => "memory",
        }
    }

    /// Store `value` under `key` for `ttl_secs` seconds, replacing any previous value
    pub async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> KvResult<()> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                let _: () = conn.set_ex(key, value, ttl_secs).await?;
                Ok(())
            }
            KvStore::Memory(store) => {
                store.set_ex(key, value, ttl_secs);
                Ok(())
            }
        }
    }

    pub async fn get(&self, key: &str) -> KvResult<Option<String>> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                Ok(conn.get(key).await?)
            }
            KvStore::Memory(store) => Ok(store.get(key)),
        }
    }

    /// Atomically increment an integer counter that already exists, keeping its TTL.
    ///
    /// Returns `None` when the key is missing or expired; it is never created.
    pub async fn incr_existing(&self, key: &str) -> KvResult<Option<u64>> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                let next: Option<u64> = INCR_EXISTING.key(key).invoke_async(&mut conn).await?;
                Ok(next)
            }
            KvStore::Memory(store) => store.incr_existing(key),
        }
    }

    pub async fn exists(&self, key: &str) -> KvResult<bool> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                Ok(conn.exists(key).await?)
            }
            KvStore::Memory(store) => Ok(store.get(key).is_some()),
        }
    }

    pub async fn del(&self, key: &str) -> KvResult<()> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                let _: () = conn.del(key).await?;
                Ok(())
            }
            KvStore::Memory(store) => {
                store.entries.remove(key);
                Ok(())
            }
        }
    }

    /// Delete `key`, reporting whether a live value was removed.
    ///
    /// Of several concurrent callers at most one sees `true`.
    pub async fn remove(&self, key: &str) -> KvResult<bool> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                let removed: u64 = conn.del(key).await?;
                Ok(removed > 0)
            }
            KvStore::Memory(store) => Ok(store
                .entries
                .remove(key)
                .is_some_and(|(_, entry)| entry.expires_at > Instant::now())),
        }
    }

    /// Round-trip check for the health endpoint
    pub async fn ping(&self) -> KvResult<()> {
        match self {
            KvStore::Redis(store) => {
                let mut conn = store.conn.clone();
                let _: String = redis::cmd("PING").query_async(&mut conn).await?;
                Ok(())
            }
            KvStore::Memory(_) => Ok(()),
        }
    }

    /// Drop expired entries of the in-process store (no-op for Redis)
    pub fn purge_expired(&self) {
        if let KvStore::Memory(store) = self {
            let now = Instant::now();
            store.entries.retain(|_, entry| entry.expires_at > now);
        }
    }
}

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) {
        self.entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
    }

    fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let value = {
            let entry = self.entries.get(key)?;
            (entry.expires_at > now).then(|| entry.value.clone())
        };
        if value.is_none() {
            self.entries.remove_if(key, |_, e| e.expires_at <= now);
        }
        value
    }

    fn incr_existing(&self, key: &str) -> KvResult<Option<u64>> {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return Ok(None);
        };
        if entry.expires_at <= Instant::now() {
            return Ok(None);
        }
        let next = entry
            .value
            .parse::<u64>()
            .map_err(|_| KvError::NotCounter(key.to_string()))?
            + 1;
        entry.value = next.to_string();
        Ok(Some(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_get_del() {
        let kv = KvStore::memory();
        kv.set_ex("otp:1", "hash", 60).await.unwrap();
        assert_eq!(kv.get("otp:1").await.unwrap().as_deref(), Some("hash"));
        assert!(kv.exists("otp:1").await.unwrap());

        kv.del("otp:1").await.unwrap();
        assert_eq!(kv.get("otp:1").await.unwrap(), None);
        assert!(!kv.exists("otp:1").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_expiry() {
        let kv = KvStore::memory();
        kv.set_ex("lock:abc", "1", 5).await.unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(kv.exists("lock:abc").await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!kv.exists("lock:abc").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_incr_existing_keeps_ttl() {
        let kv = KvStore::memory();
        assert_eq!(kv.incr_existing("otp:2:attempts").await.unwrap(), None);
        assert!(!kv.exists("otp:2:attempts").await.unwrap());

        kv.set_ex("otp:2:attempts", "0", 10).await.unwrap();
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(kv.incr_existing("otp:2:attempts").await.unwrap(), Some(1));
        assert_eq!(kv.incr_existing("otp:2:attempts").await.unwrap(), Some(2));

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(kv.incr_existing("otp:2:attempts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_incr_existing_rejects_non_counter() {
        let kv = KvStore::memory();
        kv.set_ex("otp:3", "$argon2id$...", 60).await.unwrap();
        assert!(matches!(
            kv.incr_existing("otp:3").await,
            Err(KvError::NotCounter(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_incr_existing_concurrent_is_exact() {
        let kv = KvStore::memory();
        kv.set_ex("n", "0", 60).await.unwrap();

        let tasks: Vec<_> = (0..64)
            .map(|_| {
                let kv = kv.clone();
                tokio::spawn(async move { kv.incr_existing("n").await.unwrap() })
            })
            .collect();
        let mut seen = Vec::new();
        for task in tasks {
            seen.push(task.await.unwrap().unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=64).collect::<Vec<u64>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_reports_live_value_once() {
        let kv = KvStore::memory();
        kv.set_ex("otp:4", "hash", 10).await.unwrap();
        assert!(kv.remove("otp:4").await.unwrap());
        assert!(!kv.remove("otp:4").await.unwrap());

        kv.set_ex("otp:5", "hash", 1).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!kv.remove("otp:5").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let kv = KvStore::memory();
        kv.set_ex("a", "1", 1).await.unwrap();
        kv.set_ex("b", "1", 100).await.unwrap();
        tokio::time::advance(Duration::from_secs(2)).await;
        kv.purge_expired();

        let KvStore::Memory(store) = &kv else {
            panic!("expected memory store");
        };
        assert_eq!(store.entries.len(), 1);
    }
}
