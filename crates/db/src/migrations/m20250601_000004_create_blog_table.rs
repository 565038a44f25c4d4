//! Create blog table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Blog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Blog::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Blog::Title).string_len(256).not_null())
                    .col(ColumnDef::new(Blog::ImageUrl).string_len(1024))
                    .col(ColumnDef::new(Blog::Content).text())
                    .col(ColumnDef::new(Blog::VideoUrl).string_len(1024))
                    .col(ColumnDef::new(Blog::Country).string_len(128))
                    .col(
                        ColumnDef::new(Blog::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Blog::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Blog::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Blog::UserId).integer())
                    .col(
                        ColumnDef::new(Blog::TotalFav)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Blog::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Blog::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_category")
                            .from(Blog::Table, Blog::CategoryId)
                            .to(Category::Table, Category::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_user")
                            .from(Blog::Table, Blog::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: category_id (listing filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_category_id")
                    .table(Blog::Table)
                    .col(Blog::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (own-posts listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_user_id")
                    .table(Blog::Table)
                    .col(Blog::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: total_fav (most-favorited listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_total_fav")
                    .table(Blog::Table)
                    .col(Blog::TotalFav)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Blog::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Blog {
    Table,
    Id,
    Title,
    ImageUrl,
    Content,
    VideoUrl,
    Country,
    IsPublished,
    IsDeleted,
    CategoryId,
    UserId,
    TotalFav,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
