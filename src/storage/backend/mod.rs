//! SeaORM storage backend
//!
//! This module provides database storage using SeaORM,
//! supporting SQLite, MySQL/MariaDB, and PostgreSQL.

mod connection;
mod converters;
pub mod deadline;
mod mutations;
mod query;

use std::time::Duration;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::errors::{RegistryError, Result};
use crate::storage::{InsertOutcome, Link, LinkStore};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use converters::{model_to_link, new_link_active_model};
pub use mutations::is_unique_violation;

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(RegistryError::database_config(format!(
            "Cannot infer database type from URL: {}. Supported: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based link store
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 单次数据库操作的超时
    op_timeout: Duration,
}

impl SeaOrmStorage {
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(RegistryError::database_config("DATABASE_URL is empty"));
        }

        let config = crate::config::get_config();

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            connect_generic(database_url, backend_name).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            op_timeout: Duration::from_secs(config.database.timeout.max(1)),
        };

        run_migrations(&storage.db).await?;

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// Override the per-operation deadline.
    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = timeout;
        self
    }
}

#[async_trait]
impl LinkStore for SeaOrmStorage {
    async fn insert_unique(&self, code: &str, url: &str) -> Result<InsertOutcome> {
        SeaOrmStorage::insert_unique(self, code, url).await
    }

    async fn select_by_code(&self, code: &str) -> Result<Option<Link>> {
        SeaOrmStorage::select_by_code(self, code).await
    }

    async fn increment_click(&self, code: &str) -> Result<bool> {
        SeaOrmStorage::increment_click(self, code).await
    }

    async fn delete_by_code(&self, code: &str) -> Result<u64> {
        SeaOrmStorage::delete_by_code(self, code).await
    }

    async fn select_all_ordered(&self) -> Result<Vec<Link>> {
        SeaOrmStorage::select_all_ordered(self).await
    }

    async fn ping(&self) -> Result<()> {
        SeaOrmStorage::ping(self).await
    }

    fn backend_name(&self) -> &str {
        &self.backend_name
    }
}
