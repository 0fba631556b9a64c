use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;
use crate::errors::Result;

/// 进程内缓存，条目存活时间在创建时统一设定
pub struct MokaObjectCache {
    inner: Cache<String, String>,
    ttl: u64,
}

impl MokaObjectCache {
    pub fn new(config: &CacheConfig) -> Self {
        let inner = Cache::builder()
            .max_capacity(config.memory.max_capacity)
            .time_to_live(Duration::from_secs(config.default_ttl))
            .build();

        debug!(
            "MokaObjectCache initialized with max capacity: {}, TTL: {}s",
            config.memory.max_capacity, config.default_ttl
        );
        Self {
            inner,
            ttl: config.default_ttl,
        }
    }
}

#[async_trait]
impl ObjectCache for MokaObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(value)
            }
            None => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) -> Result<()> {
        // Moka 使用构建时的全局 TTL
        if ttl != self.ttl {
            debug!(
                "Moka cache ignores per-item TTL {}s, using {}s",
                ttl, self.ttl
            );
        }
        self.inner.insert(key, value).await;
        Ok(())
    }

    async fn close(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CacheBackend, MemoryConfig, RedisConfig};

    fn config() -> CacheConfig {
        CacheConfig {
            backend: CacheBackend::Moka,
            default_ttl: 60,
            redis: RedisConfig {
                url: String::new(),
                key_prefix: String::new(),
            },
            memory: MemoryConfig { max_capacity: 10 },
        }
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = MokaObjectCache::new(&config());
        assert_eq!(cache.get_raw("last_courses:").await, CacheResult::NotFound);

        cache
            .insert_raw("last_courses:".into(), "[]".into(), 60)
            .await
            .unwrap();
        assert_eq!(
            cache.get_raw("last_courses:").await,
            CacheResult::Found("[]".to_string())
        );
    }

    #[tokio::test]
    async fn test_close_drops_entries() {
        let cache = MokaObjectCache::new(&config());
        cache.insert_raw("k".into(), "v".into(), 60).await.unwrap();
        cache.close().await;
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
