use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{InsertOutcome, Link};

/// Durable link table with a unique constraint on `code`.
///
/// Concurrency control lives entirely behind this trait: uniqueness is the
/// store's constraint and click counting is a single store-side update.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a fresh row with `click_count = 0`. A duplicate code yields
    /// `Ok(InsertOutcome::Conflict)`, never an error.
    async fn insert_unique(&self, code: &str, url: &str) -> Result<InsertOutcome>;

    async fn select_by_code(&self, code: &str) -> Result<Option<Link>>;

    /// `click_count = click_count + 1, last_clicked = now`. Returns `false`
    /// when no row has that code.
    async fn increment_click(&self, code: &str) -> Result<bool>;

    /// Returns the number of rows removed.
    async fn delete_by_code(&self, code: &str) -> Result<u64>;

    /// All links, newest `created_at` first.
    async fn select_all_ordered(&self) -> Result<Vec<Link>>;

    async fn ping(&self) -> Result<()>;

    fn backend_name(&self) -> &str;
}

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let storage = SeaOrmStorage::new(database_url, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
