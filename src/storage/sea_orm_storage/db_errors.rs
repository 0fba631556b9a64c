//! 数据库约束错误到业务错误的映射

use sea_orm::{DbErr, SqlErr};

use crate::errors::RatingsError;

/// 写操作类型：外键失败在插入时表示引用目标不存在，在删除时表示仍有依赖行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOp {
    Insert,
    Delete,
}

fn foreign_key_error(op: WriteOp, context: &str, detail: &str) -> RatingsError {
    match op {
        WriteOp::Insert => {
            RatingsError::not_found(format!("{context}: referenced row does not exist ({detail})"))
        }
        WriteOp::Delete => {
            RatingsError::integrity(format!("{context}: row is still referenced ({detail})"))
        }
    }
}

/// 将写入失败归类为 Conflict / NotFound / Integrity / Validation
pub(crate) fn map_write_error(err: DbErr, op: WriteOp, context: &str) -> RatingsError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            return RatingsError::conflict(format!("{context}: {detail}"));
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            return foreign_key_error(op, context, &detail);
        }
        _ => {}
    }

    // 驱动未给出错误码时按消息判断（SQLite / PostgreSQL 措辞）
    let message = err.to_string();
    let lowered = message.to_lowercase();
    if lowered.contains("unique constraint") || lowered.contains("duplicate key") {
        RatingsError::conflict(format!("{context}: {message}"))
    } else if lowered.contains("foreign key constraint") {
        foreign_key_error(op, context, &message)
    } else if lowered.contains("check constraint") {
        RatingsError::validation(format!("{context}: {message}"))
    } else {
        RatingsError::database_operation(format!("{context}: {message}"))
    }
}

/// 读操作失败统一为 DatabaseOperation
pub(crate) fn map_read_error(err: DbErr, context: &str) -> RatingsError {
    RatingsError::database_operation(format!("{context}: {err}"))
}
