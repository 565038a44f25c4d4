//! Keyword entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "keyword")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Not unique; find-or-create can race and leave duplicates
    pub name: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog_keyword::Entity")]
    BlogKeywords,
}

impl Related<super::blog_keyword::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogKeywords.def()
    }
}

impl Related<super::blog::Entity> for Entity {
    fn to() -> RelationDef {
        super::blog_keyword::Relation::Blog.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::blog_keyword::Relation::Keyword.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
