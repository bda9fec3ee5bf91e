//! 数据库操作超时控制
//!
//! 每次存储调用都有独立的超时；超时即视为存储故障，不自动重试。

use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use tracing::{error, warn};

use crate::errors::RegistryError;

/// 判断数据库错误是否属于瞬时故障（连接、死锁、锁超时）
pub fn is_transient_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | // 连接池获取失败
        DbErr::Conn(_) => true, // 连接问题
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => {
            is_transient_runtime_error(runtime_err)
        }
        DbErr::Custom(msg) => msg.contains("timed out"),
        _ => false,
    }
}

fn is_transient_runtime_error(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            if let Some(db_err) = sqlx_err.deref().as_database_error()
                && let Some(code) = db_err.code()
            {
                return matches!(
                    code.as_ref(),
                    // MySQL 死锁和锁超时
                    "1213" | "1205" |
                    // PostgreSQL 序列化失败和死锁
                    "40001" | "40P01" |
                    // SQLite BUSY 和 LOCKED
                    "5" | "6"
                );
            }
            is_transient_error_message(&sqlx_err.to_string().to_lowercase())
        }
        RuntimeErr::Internal(msg) => is_transient_error_message(&msg.to_lowercase()),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn is_transient_error_message(err_str: &str) -> bool {
    err_str.contains("deadlock")
        || err_str.contains("lock wait timeout")
        || err_str.contains("database is locked")
        || err_str.contains("serialization failure")
}

/// Run one store operation under `timeout`.
///
/// An elapsed deadline comes back as `DbErr::Custom` so callers treat it
/// like any other store failure.
pub async fn with_deadline<T, Fut>(
    operation_name: &str,
    timeout: Duration,
    operation: Fut,
) -> Result<T, DbErr>
where
    Fut: Future<Output = Result<T, DbErr>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_elapsed) => {
            warn!(
                "Operation '{}' timed out after {} ms",
                operation_name,
                timeout.as_millis()
            );
            Err(DbErr::Custom(format!(
                "Operation '{}' timed out after {} ms",
                operation_name,
                timeout.as_millis()
            )))
        }
    }
}

/// Log the raw error and turn it into a caller-safe `StoreUnavailable`.
pub fn store_failure(operation_name: &str, err: DbErr) -> RegistryError {
    if is_transient_error(&err) {
        warn!("Store operation '{}' failed (transient): {}", operation_name, err);
    } else {
        error!("Store operation '{}' failed: {}", operation_name, err);
    }
    RegistryError::store_unavailable(format!("Store operation '{}' failed", operation_name))
}
