//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, ExprTrait, QueryFilter, SqlErr, sea_query::Expr,
};
use tracing::{debug, info};

use super::SeaOrmStorage;
use super::converters::{model_to_link, new_link_active_model};
use super::deadline::{store_failure, with_deadline};
use crate::errors::Result;
use crate::storage::InsertOutcome;

use migration::entities::link;

/// 判断是否是唯一约束冲突错误
pub fn is_unique_violation(err: &DbErr) -> bool {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return true;
    }

    match err {
        DbErr::Exec(sea_orm::RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Query(sea_orm::RuntimeErr::SqlxError(sqlx_err)) => {
            use std::ops::Deref;
            sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .map(|c| {
                    c == "2067" // SQLite SQLITE_CONSTRAINT_UNIQUE
                        || c == "1555" // SQLite SQLITE_CONSTRAINT_PRIMARYKEY
                        || c == "1062" // MySQL ER_DUP_ENTRY
                        || c == "23505" // PostgreSQL unique_violation
                })
                .unwrap_or(false)
        }
        _ => false,
    }
}

impl SeaOrmStorage {
    /// Plain INSERT; the unique index on `code` decides conflicts.
    pub async fn insert_unique(&self, code: &str, url: &str) -> Result<InsertOutcome> {
        let db = &self.db;
        let active_model = new_link_active_model(code, url, Utc::now());

        let result = with_deadline("insert_unique", self.op_timeout, active_model.insert(db)).await;

        match result {
            Ok(model) => {
                info!("Short link created: {}", code);
                Ok(InsertOutcome::Inserted(model_to_link(model)))
            }
            Err(e) if is_unique_violation(&e) => {
                debug!("Insert rejected by unique index: {}", code);
                Ok(InsertOutcome::Conflict)
            }
            Err(e) => Err(store_failure("insert_unique", e)),
        }
    }

    /// Single-statement increment, evaluated by the store.
    pub async fn increment_click(&self, code: &str) -> Result<bool> {
        let db = &self.db;
        let now = Utc::now();

        let result = with_deadline(
            "increment_click",
            self.op_timeout,
            link::Entity::update_many()
                .col_expr(
                    link::Column::ClickCount,
                    Expr::col(link::Column::ClickCount).add(Expr::val(1i64)),
                )
                .col_expr(link::Column::LastClicked, Expr::val(now))
                .filter(Expr::col(link::Column::Code).eq(Expr::val(code)))
                .exec(db),
        )
        .await
        .map_err(|e| store_failure("increment_click", e))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_by_code(&self, code: &str) -> Result<u64> {
        let db = &self.db;

        let result = with_deadline(
            "delete_by_code",
            self.op_timeout,
            link::Entity::delete_many()
                .filter(Expr::col(link::Column::Code).eq(Expr::val(code)))
                .exec(db),
        )
        .await
        .map_err(|e| store_failure("delete_by_code", e))?;

        if result.rows_affected > 0 {
            info!("Short link deleted: {}", code);
        }
        Ok(result.rows_affected)
    }
}
