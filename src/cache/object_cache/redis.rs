use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::CacheConfig;
use crate::errors::{RatingsError, Result};

/// 建立连接的最长等待时间
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis 缓存，首次使用时建立多路复用连接，命令失败后丢弃连接以便下次重连
pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    conn: RwLock<Option<MultiplexedConnection>>,
}

impl RedisObjectCache {
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let redis_config = &config.redis;
        let client = redis::Client::open(redis_config.url.as_str()).map_err(|e| {
            RatingsError::cache_connection(format!("Invalid redis URL {}: {e}", redis_config.url))
        })?;

        debug!(
            "RedisObjectCache created with prefix: '{}', TTL: {}s",
            redis_config.key_prefix, config.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            conn: RwLock::new(None),
        })
    }

    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut slot = self.conn.write().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }

        let conn = tokio::time::timeout(
            CONNECT_TIMEOUT,
            self.client.get_multiplexed_async_connection(),
        )
        .await
        .map_err(|_| RatingsError::cache_connection("Redis connect timed out"))?
        .map_err(|e| RatingsError::cache_connection(format!("Redis connect failed: {e}")))?;

        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn reset_connection(&self) {
        self.conn.write().await.take();
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let mut conn = match self.get_connection().await {
            Ok(c) => c,
            Err(e) => {
                warn!("Redis unavailable, reading through: {}", e);
                return CacheResult::Unavailable;
            }
        };

        let result: redis::RedisResult<Option<String>> = conn.get(self.make_key(key)).await;

        match result {
            Ok(Some(data)) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                self.reset_connection().await;
                CacheResult::Unavailable
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) -> Result<()> {
        let mut conn = self.get_connection().await?;

        match conn
            .set_ex::<String, String, ()>(self.make_key(&key), value, ttl)
            .await
        {
            Ok(()) => {
                debug!("Inserted key into cache: {} (TTL: {}s)", key, ttl);
                Ok(())
            }
            Err(e) => {
                self.reset_connection().await;
                Err(RatingsError::cache_connection(format!(
                    "Failed to insert key '{key}': {e}"
                )))
            }
        }
    }

    async fn close(&self) {
        self.reset_connection().await;
    }
}
