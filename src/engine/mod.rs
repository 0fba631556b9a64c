//! 存储与缓存引擎
//!
//! 对外的唯一入口：写操作直达存储层（评分先经过重复评分检查），
//! 读操作先查缓存，未命中再查存储并回填。

mod catalog;
mod grading;
mod queries;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{CacheAside, cache_key, create_cache};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::{Storage, create_storage};
use crate::utils::with_deadline;

/// 引擎只持有不可变句柄，可通过 `Arc` 在多个任务间共享
#[derive(Clone)]
pub struct RatingEngine {
    storage: Arc<dyn Storage>,
    cache: CacheAside,
    deadline: Option<Duration>,
}

impl RatingEngine {
    pub fn new(storage: Arc<dyn Storage>, cache: CacheAside, deadline: Option<Duration>) -> Self {
        Self {
            storage,
            cache,
            deadline,
        }
    }

    /// 按配置连接数据库（执行迁移）并创建缓存
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        let storage = create_storage(&config.database).await?;
        let cache = create_cache(&config.cache);
        let deadline = config.operation_timeout();

        info!(
            "Rating engine ready (cache: {}, deadline: {:?})",
            if cache.is_enabled() { "enabled" } else { "disabled" },
            deadline
        );

        Ok(Self::new(storage, cache, deadline))
    }

    /// 释放缓存连接与数据库连接池
    pub async fn close(self) -> Result<()> {
        self.cache.close().await;
        self.storage.close().await?;
        info!("Rating engine closed");
        Ok(())
    }

    /// 在配置的截止时间内执行
    async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.deadline {
            Some(deadline) => with_deadline(deadline, operation).await,
            None => operation.await,
        }
    }

    /// 带缓存的读操作
    async fn cached<T, F>(&self, operation: &str, argument: &str, load: F) -> Result<T>
    where
        T: serde::Serialize + serde::de::DeserializeOwned,
        F: Future<Output = Result<T>>,
    {
        self.run(self.cache.fetch(cache_key(operation, argument), load))
            .await
    }
}
