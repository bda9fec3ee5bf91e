use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        manager.create_table(links_table(backend)).await?;

        // The one place code uniqueness is decided
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_code_unique")
                    .table(Links::Table)
                    .col(Links::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_links_created_at")
                    .table(Links::Table)
                    .col(Links::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_links_created_at")
                    .table(Links::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_links_code_unique")
                    .table(Links::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Links::Table).to_owned())
            .await
    }
}

/// `links` 表定义
///
/// MySQL/MariaDB 默认排序规则不区分大小写，`code` 列需显式使用二进制排序，
/// 否则 `abcDEF` 与 `ABCdef` 会撞上唯一索引。
fn links_table(backend: DatabaseBackend) -> TableCreateStatement {
    let mut code = ColumnDef::new(Links::Code);
    code.string_len(8).not_null();
    if backend == DatabaseBackend::MySql {
        code.extra("CHARACTER SET utf8mb4 COLLATE utf8mb4_bin");
    }

    Table::create()
        .table(Links::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Links::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(&mut code)
        .col(ColumnDef::new(Links::Url).text().not_null())
        .col(
            ColumnDef::new(Links::ClickCount)
                .big_integer()
                .not_null()
                .default(0),
        )
        .col(
            ColumnDef::new(Links::LastClicked)
                .timestamp_with_time_zone()
                .null(),
        )
        .col(
            ColumnDef::new(Links::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Links {
    Table,
    Id,
    Code,
    Url,
    ClickCount,
    LastClicked,
    CreatedAt,
}
