//! 读穿透缓存适配器

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error, warn};

use super::{CacheResult, ObjectCache};
use crate::errors::{RatingsError, Result};

/// 缓存键：`<操作名>:<参数>`，同一操作的不同参数不会冲突
pub fn cache_key(operation: &str, argument: &str) -> String {
    format!("{operation}:{argument}")
}

/// 可选的读穿透缓存
///
/// 写操作不做失效，读到旧数据的窗口等于 TTL。
#[derive(Clone)]
pub enum CacheAside {
    Disabled,
    Enabled {
        cache: Arc<dyn ObjectCache>,
        /// 条目存活时间（秒）
        ttl: u64,
    },
}

impl CacheAside {
    pub fn enabled(cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        CacheAside::Enabled { cache, ttl }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, CacheAside::Enabled { .. })
    }

    /// 先查缓存，未命中时执行 `load` 并回填
    ///
    /// 缓存不可用或条目损坏都按未命中处理；`load` 的错误原样返回且不回填。
    pub async fn fetch<T, Fut>(&self, key: String, load: Fut) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T>>,
    {
        let CacheAside::Enabled { cache, ttl } = self else {
            return load.await;
        };

        if let Some(value) = lookup(cache.as_ref(), &key).await {
            return Ok(value);
        }

        let value = load.await?;
        backfill(cache.as_ref(), key, &value, *ttl).await;
        Ok(value)
    }

    pub async fn close(&self) {
        if let CacheAside::Enabled { cache, .. } = self {
            cache.close().await;
        }
    }
}

async fn lookup<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str(&json).map_err(RatingsError::from) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Corrupt cache entry for {}: {}, reading through", key, e);
                None
            }
        },
        CacheResult::NotFound => None,
        CacheResult::Unavailable => {
            debug!("Cache unavailable for {}, reading through", key);
            None
        }
    }
}

/// 回填失败只记录日志，不影响本次读取结果
async fn backfill<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    let result = match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key, json, ttl).await,
        Err(e) => Err(RatingsError::from(e)),
    };

    if let Err(e) = result {
        error!("Cache backfill failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaObjectCache;
    use crate::config::{CacheBackend, CacheConfig, MemoryConfig, RedisConfig};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 永远不可用的后端
    struct BrokenCache;

    #[async_trait]
    impl ObjectCache for BrokenCache {
        async fn get_raw(&self, _key: &str) -> CacheResult<String> {
            CacheResult::Unavailable
        }

        async fn insert_raw(&self, _key: String, _value: String, _ttl: u64) -> Result<()> {
            Err(RatingsError::cache_connection("connection refused"))
        }

        async fn close(&self) {}
    }

    fn moka() -> CacheAside {
        let config = CacheConfig {
            backend: CacheBackend::Moka,
            default_ttl: 60,
            redis: RedisConfig {
                url: String::new(),
                key_prefix: String::new(),
            },
            memory: MemoryConfig { max_capacity: 100 },
        };
        CacheAside::enabled(Arc::new(MokaObjectCache::new(&config)), 60)
    }

    async fn counted(calls: &AtomicUsize, value: Vec<String>) -> Result<Vec<String>> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("last_courses", ""), "last_courses:");
        assert_ne!(
            cache_key("scores_by_course_code", "S209"),
            cache_key("scores_by_course_code", "S2")
        );
    }

    #[tokio::test]
    async fn test_second_read_is_served_from_cache() {
        let cache = moka();
        let calls = AtomicUsize::new(0);

        let first = cache
            .fetch("k:1".into(), counted(&calls, vec!["a".into()]))
            .await
            .unwrap();
        let second = cache
            .fetch("k:1".into(), counted(&calls, vec!["changed".into()]))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_load_error_is_not_cached() {
        let cache = moka();
        let err = cache
            .fetch::<Vec<String>, _>("k:err".into(), async {
                Err(RatingsError::database_operation("boom"))
            })
            .await
            .expect_err("load failed");
        assert_eq!(err.code(), "E008");

        let calls = AtomicUsize::new(0);
        cache
            .fetch("k:err".into(), counted(&calls, vec![]))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_reads_through() {
        let cache = moka();
        if let CacheAside::Enabled { cache: inner, .. } = &cache {
            inner
                .insert_raw("k:bad".into(), "{not json".into(), 60)
                .await
                .unwrap();
        }

        let value = cache
            .fetch("k:bad".into(), async { Ok(vec!["fresh".to_string()]) })
            .await
            .unwrap();
        assert_eq!(value, vec!["fresh".to_string()]);
    }

    #[tokio::test]
    async fn test_broken_backend_fails_open() {
        let cache = CacheAside::enabled(Arc::new(BrokenCache), 60);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .fetch("k:1".into(), counted(&calls, vec!["a".into()]))
                .await
                .unwrap();
            assert_eq!(value, vec!["a".to_string()]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_disabled_always_loads() {
        let cache = CacheAside::Disabled;
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            cache
                .fetch("k:1".into(), counted(&calls, vec![]))
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
