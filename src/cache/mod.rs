//! 缓存层
//!
//! `ObjectCache` 是后端无关的键值接口，`CacheAside` 在其上实现读穿透与回填。

pub mod aside;
pub mod object_cache;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{CacheBackend, CacheConfig};
use crate::errors::Result;

pub use aside::{CacheAside, cache_key};
use object_cache::{moka::MokaObjectCache, redis::RedisObjectCache};

/// 缓存读取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端不可用，调用方按未命中处理
    Unavailable,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// 写入条目，ttl 单位为秒
    async fn insert_raw(&self, key: String, value: String, ttl: u64) -> Result<()>;
    /// 释放后端连接
    async fn close(&self);
}

/// 根据配置创建缓存适配器
///
/// 未配置后端、Redis 缺少 URL 或客户端无法创建时退化为 `Disabled`，引擎照常工作。
pub fn create_cache(config: &CacheConfig) -> CacheAside {
    match config.backend {
        CacheBackend::None => {
            info!("Cache disabled by configuration");
            CacheAside::Disabled
        }
        CacheBackend::Moka => {
            let cache = MokaObjectCache::new(config);
            info!("Moka (in-memory) cache backend initialized");
            CacheAside::enabled(Arc::new(cache), config.default_ttl)
        }
        CacheBackend::Redis if config.redis.url.trim().is_empty() => {
            warn!("Redis cache selected but no URL configured, caching disabled");
            CacheAside::Disabled
        }
        CacheBackend::Redis => match RedisObjectCache::new(config) {
            Ok(cache) => {
                info!("Redis cache backend initialized");
                CacheAside::enabled(Arc::new(cache), config.default_ttl)
            }
            Err(e) => {
                warn!("Failed to create redis cache: {}, caching disabled", e);
                CacheAside::Disabled
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MemoryConfig, RedisConfig};

    fn cache_config(backend: CacheBackend, redis_url: &str) -> CacheConfig {
        CacheConfig {
            backend,
            default_ttl: 60,
            redis: RedisConfig {
                url: redis_url.to_string(),
                key_prefix: "ratings:".to_string(),
            },
            memory: MemoryConfig { max_capacity: 100 },
        }
    }

    #[test]
    fn test_backend_selection() {
        assert!(!create_cache(&cache_config(CacheBackend::None, "")).is_enabled());
        assert!(create_cache(&cache_config(CacheBackend::Moka, "")).is_enabled());
        assert!(!create_cache(&cache_config(CacheBackend::Redis, " ")).is_enabled());
        assert!(!create_cache(&cache_config(CacheBackend::Redis, "not a url")).is_enabled());
        // 客户端延迟连接，不可达的地址也能创建
        assert!(
            create_cache(&cache_config(CacheBackend::Redis, "redis://127.0.0.1:1/")).is_enabled()
        );
    }
}
