//! Memoized call storage.
//!
//! Provides the `memoize` wrapper used around every upstream fetcher, plus
//! the raw entry operations and purge strategies behind it.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_rusqlite::{params, rusqlite};

use super::connection::CacheDb;
use super::hash::compute_cache_key;
use crate::Error;

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

impl CacheDb {
    /// Return the cached value for `function(args)` or compute and store it.
    ///
    /// A fresh entry is returned without calling `compute`. On a miss the
    /// caller takes the key's in-flight lock, checks again, then computes and
    /// upserts. Whatever `compute` returns is cached, including error values.
    ///
    /// Cache faults (storage errors, undecodable entries) are logged and
    /// degrade to computing directly; they never surface to the caller.
    pub async fn memoize<A, T, F, Fut>(&self, function: &str, args: &A, ttl: Duration, compute: F) -> T
    where
        A: Serialize + ?Sized,
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let args_json = match serde_json::to_string(args) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(function, error = %e, "arguments not serializable, bypassing cache");
                return compute().await;
            }
        };
        let key = compute_cache_key(function, &args_json);

        if let Some(value) = self.lookup(&key, function).await {
            return value;
        }

        let handle = self.inflight.handle(&key);
        let value = {
            let _guard = handle.lock().await;
            match self.lookup(&key, function).await {
                Some(value) => value,
                None => {
                    tracing::debug!(function, args = %args_json, "cache miss");
                    let value = compute().await;
                    self.store(&key, function, &args_json, &value, ttl).await;
                    value
                }
            }
        };
        self.inflight.release(&key, &handle);

        value
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str, function: &str) -> Option<T> {
        match self.get_fresh(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(value) => {
                    tracing::trace!(function, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    tracing::warn!(function, error = %e, "discarding undecodable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(function, error = %e, "cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &str, function: &str, args_json: &str, value: &T, ttl: Duration) {
        let value_json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(function, error = %e, "result not serializable, not caching");
                return;
            }
        };

        if let Err(e) = self.put_entry(key, function, args_json, &value_json, ttl).await {
            tracing::warn!(function, error = %e, "failed to cache result");
        }
    }

    /// Get a cached value by key hash if it has not expired.
    pub async fn get_fresh(&self, key_hash: &str) -> Result<Option<String>, Error> {
        let key_hash = key_hash.to_string();
        let now = now_millis();
        self.conn
            .call(move |conn| -> Result<Option<String>, Error> {
                let mut stmt =
                    conn.prepare("SELECT value_json FROM memo_cache WHERE key_hash = ?1 AND expires_at > ?2")?;

                match stmt.query_row(params![key_hash, now], |row| row.get(0)) {
                    Ok(json) => Ok(Some(json)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update a cached value.
    ///
    /// Uses UPSERT semantics; concurrent writers for one key are last-writer-wins.
    pub async fn put_entry(
        &self, key_hash: &str, function: &str, args_json: &str, value_json: &str, ttl: Duration,
    ) -> Result<(), Error> {
        let key_hash = key_hash.to_string();
        let function = function.to_string();
        let args_json = args_json.to_string();
        let value_json = value_json.to_string();

        let created_at = now_millis();
        let expires_at = created_at.saturating_add(ttl_millis(ttl));

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO memo_cache (key_hash, function, args_json, value_json, created_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(key_hash) DO UPDATE SET
                        function = excluded.function,
                        args_json = excluded.args_json,
                        value_json = excluded.value_json,
                        created_at = excluded.created_at,
                        expires_at = excluded.expires_at",
                    params![key_hash, function, args_json, value_json, created_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored entries, fresh or not.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM memo_cache", [], |row| row.get(0))?;
                Ok(count.max(0) as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete expired entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = now_millis();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM memo_cache WHERE expires_at <= ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry produced by one memoized function.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_function(&self, function: &str) -> Result<u64, Error> {
        let function = function.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM memo_cache WHERE function = ?1", params![function])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Purge oldest entries until count <= max_entries.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_lru(&self, max_entries: usize) -> Result<u64, Error> {
        let max = i64::try_from(max_entries).unwrap_or(i64::MAX);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM memo_cache", [], |row| row.get(0))?;
                if count <= max {
                    return Ok(0);
                }

                let to_delete = count - max;
                let deleted = conn.execute(
                    "DELETE FROM memo_cache WHERE key_hash IN (
                    SELECT key_hash FROM memo_cache ORDER BY created_at ASC LIMIT ?1
                )",
                    params![to_delete],
                )?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::{ErrorKind, FetchError};

    const HOUR: Duration = Duration::from_secs(3600);

    async fn counted(counter: &AtomicUsize, value: u32) -> u32 {
        counter.fetch_add(1, Ordering::SeqCst);
        value
    }

    #[tokio::test]
    async fn test_memoize_hits_within_ttl() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let calls = AtomicUsize::new(0);

        let first = db.memoize("f", &(118, "HR", 1), HOUR, || counted(&calls, 7)).await;
        let second = db.memoize("f", &(118, "HR", 1), HOUR, || counted(&calls, 8)).await;

        assert_eq!(first, 7);
        assert_eq!(second, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_memoize_recomputes_after_expiry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_millis(50);

        let first = db.memoize("f", &(1,), ttl, || counted(&calls, 1)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        let second = db.memoize("f", &(1,), ttl, || counted(&calls, 2)).await;

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_memoize_keys_on_function_and_args() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let calls = AtomicUsize::new(0);

        db.memoize("f", &(1,), HOUR, || counted(&calls, 1)).await;
        db.memoize("f", &(2,), HOUR, || counted(&calls, 2)).await;
        db.memoize("g", &(1,), HOUR, || counted(&calls, 3)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(db.entry_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_memoize_caches_error_results() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let calls = AtomicUsize::new(0);

        let compute = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err::<u32, FetchError>(FetchError::new(ErrorKind::Timeout, "slow upstream"))
        };

        let first = db.memoize("f", &("x",), HOUR, compute).await;
        let second = db
            .memoize("f", &("x",), HOUR, || async { Ok::<u32, FetchError>(1) })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second.unwrap_err().kind, ErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_memoize_single_flight() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let calls = Arc::new(AtomicUsize::new(0));

        let slow = |calls: Arc<AtomicUsize>| async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            42u32
        };

        let (a, b) = tokio::join!(
            db.memoize("f", &(1,), HOUR, || slow(calls.clone())),
            db.memoize("f", &(1,), HOUR, || slow(calls.clone())),
        );

        assert_eq!((a, b), (42, 42));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(db.inflight.len(), 0);
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_recomputed() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let key = compute_cache_key("f", "[1]");
        db.put_entry(&key, "f", "[1]", "\"not a number\"", HOUR).await.unwrap();

        let calls = AtomicUsize::new(0);
        let value = db.memoize("f", &(1,), HOUR, || counted(&calls, 5)).await;

        assert_eq!(value, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("expiring", "f", "[]", "1", Duration::from_millis(10)).await.unwrap();
        db.put_entry("fresh", "f", "[]", "2", HOUR).await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let deleted = db.purge_expired().await.unwrap();
        assert_eq!(deleted, 1);
        assert!(db.get_fresh("expiring").await.unwrap().is_none());
        assert!(db.get_fresh("fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_function() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("a", "bill_detail", "[]", "1", HOUR).await.unwrap();
        db.put_entry("b", "bill_detail", "[]", "2", HOUR).await.unwrap();
        db.put_entry("c", "congress_list", "[]", "3", HOUR).await.unwrap();

        assert_eq!(db.purge_function("bill_detail").await.unwrap(), 2);
        assert_eq!(db.entry_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_lru() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("old", "f", "[]", "1", HOUR).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        db.put_entry("new", "f", "[]", "2", HOUR).await.unwrap();

        assert_eq!(db.purge_lru(5).await.unwrap(), 0);
        assert_eq!(db.purge_lru(1).await.unwrap(), 1);
        assert!(db.get_fresh("old").await.unwrap().is_none());
        assert!(db.get_fresh("new").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_upsert_entry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_entry("k", "f", "[]", r#"{"old":1}"#, HOUR).await.unwrap();
        db.put_entry("k", "f", "[]", r#"{"new":2}"#, HOUR).await.unwrap();

        assert_eq!(db.get_fresh("k").await.unwrap().as_deref(), Some(r#"{"new":2}"#));
        assert_eq!(db.entry_count().await.unwrap(), 1);
    }
}
