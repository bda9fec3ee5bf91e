//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::trace;

use super::SeaOrmStorage;
use super::converters::model_to_link;
use super::deadline::{store_failure, with_deadline};
use crate::errors::Result;
use crate::storage::Link;

use migration::entities::link;

impl SeaOrmStorage {
    pub async fn select_by_code(&self, code: &str) -> Result<Option<Link>> {
        let db = &self.db;

        let model = with_deadline(
            "select_by_code",
            self.op_timeout,
            link::Entity::find()
                .filter(link::Column::Code.eq(code))
                .one(db),
        )
        .await
        .map_err(|e| store_failure("select_by_code", e))?;

        Ok(model.map(model_to_link))
    }

    /// 按创建时间倒序加载全部链接；同一时刻创建的按插入顺序倒序
    pub async fn select_all_ordered(&self) -> Result<Vec<Link>> {
        let db = &self.db;

        let models = with_deadline(
            "select_all_ordered",
            self.op_timeout,
            link::Entity::find()
                .order_by_desc(link::Column::CreatedAt)
                .order_by_desc(link::Column::Id)
                .all(db),
        )
        .await
        .map_err(|e| store_failure("select_all_ordered", e))?;

        trace!("Loaded {} short links", models.len());
        Ok(models.into_iter().map(model_to_link).collect())
    }

    pub async fn ping(&self) -> Result<()> {
        with_deadline("ping", self.op_timeout, self.db.ping())
            .await
            .map_err(|e| store_failure("ping", e))
    }
}
