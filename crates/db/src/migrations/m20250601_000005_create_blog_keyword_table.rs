//! Create blog-keyword join table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogKeyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlogKeyword::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlogKeyword::BlogId).integer().not_null())
                    .col(ColumnDef::new(BlogKeyword::KeywordId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_keyword_blog")
                            .from(BlogKeyword::Table, BlogKeyword::BlogId)
                            .to(Blog::Table, Blog::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_blog_keyword_keyword")
                            .from(BlogKeyword::Table, BlogKeyword::KeywordId)
                            .to(Keyword::Table, Keyword::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // No composite uniqueness on (blog_id, keyword_id), matching the
        // original schema.
        manager
            .create_index(
                Index::create()
                    .name("idx_blog_keyword_blog_id")
                    .table(BlogKeyword::Table)
                    .col(BlogKeyword::BlogId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BlogKeyword::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BlogKeyword {
    Table,
    Id,
    BlogId,
    KeywordId,
}

#[derive(Iden)]
enum Blog {
    Table,
    Id,
}

#[derive(Iden)]
enum Keyword {
    Table,
    Id,
}
