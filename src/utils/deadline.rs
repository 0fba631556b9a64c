use std::future::Future;
use std::time::Duration;

use crate::errors::{RatingsError, Result};

/// 在截止时间内等待操作完成
///
/// 超时后内部 future 被丢弃，进行中的数据库/缓存 I/O 随之取消，返回 `Timeout`。
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(deadline, operation)
        .await
        .map_err(|_| {
            RatingsError::timeout(format!(
                "operation did not finish within {} ms",
                deadline.as_millis()
            ))
        })?
}
