use tokio::signal;
use tracing::{error, warn};

use crate::engine::RatingEngine;
use crate::errors::Result;

pub async fn listen_for_shutdown() {
    // 等待 Ctrl+C 信号
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        return;
    }
    warn!("Shutdown signal received, releasing resources...");
}

/// 关闭缓存连接与数据库连接池
pub async fn shutdown(engine: RatingEngine) -> Result<()> {
    engine.close().await?;
    warn!("Graceful shutdown: all resources released");
    Ok(())
}
