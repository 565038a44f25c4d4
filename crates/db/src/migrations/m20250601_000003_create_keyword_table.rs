//! Create keyword table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Keyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Keyword::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Deliberately NOT unique: find-or-create races are accepted
                    .col(ColumnDef::new(Keyword::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(Keyword::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: name (find-or-create lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_keyword_name")
                    .table(Keyword::Table)
                    .col(Keyword::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Keyword::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Keyword {
    Table,
    Id,
    Name,
    CreatedAt,
}
