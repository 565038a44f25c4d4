//! Blog post entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    /// Storage key of the cover image
    #[sea_orm(nullable)]
    pub image_url: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub content: Option<String>,

    #[sea_orm(nullable)]
    pub video_url: Option<String>,

    #[sea_orm(nullable)]
    pub country: Option<String>,

    /// Carried from the original schema, not consulted by any handler
    #[sea_orm(default_value = true)]
    pub is_published: bool,

    /// Carried from the original schema; deletion is a hard delete
    #[sea_orm(default_value = false)]
    pub is_deleted: bool,

    pub category_id: i32,

    /// NULL when the author account is gone
    #[sea_orm(nullable)]
    pub user_id: Option<i32>,

    /// Likes count (denormalized)
    #[sea_orm(default_value = 0)]
    pub total_fav: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    User,

    #[sea_orm(has_many = "super::blog_keyword::Entity")]
    BlogKeywords,

    #[sea_orm(has_many = "super::like::Entity")]
    Likes,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl Related<super::keyword::Entity> for Entity {
    fn to() -> RelationDef {
        super::blog_keyword::Relation::Keyword.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::blog_keyword::Relation::Blog.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
