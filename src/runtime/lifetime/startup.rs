use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::engine::RatingEngine;
use crate::errors::Result;

/// 准备启动：安装 TLS 加密后端，连接数据库（执行迁移）并创建缓存
pub async fn prepare_startup(config: &AppConfig) -> Result<RatingEngine> {
    // rediss:// 与 PostgreSQL TLS 连接需要进程级加密后端
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let engine = RatingEngine::connect(config).await?;
    warn!("Storage backend initialized and migrations completed");

    Ok(engine)
}
