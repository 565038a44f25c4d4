//! Like repository.

use std::sync::Arc;

use crate::entities::{Like, User, like, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QuerySelect, Set,
};
use wanderblog_common::{AppError, AppResult};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and blog.
    pub async fn find_by_user_and_blog(
        &self,
        user_id: i32,
        blog_id: i32,
    ) -> AppResult<Option<like::Model>> {
        Like::find()
            .filter(like::Column::UserId.eq(user_id))
            .filter(like::Column::BlogId.eq(blog_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check if a user has liked a blog.
    pub async fn has_liked(&self, user_id: i32, blog_id: i32) -> AppResult<bool> {
        Ok(self
            .find_by_user_and_blog(user_id, blog_id)
            .await?
            .is_some())
    }

    /// Create a new like.
    pub async fn create(&self, user_id: i32, blog_id: i32) -> AppResult<like::Model> {
        let model = like::ActiveModel {
            user_id: Set(user_id),
            blog_id: Set(blog_id),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a like row.
    pub async fn delete(&self, model: like::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// IDs of blogs the user has liked.
    pub async fn find_blog_ids_by_user(&self, user_id: i32) -> AppResult<Vec<i32>> {
        let rows: Vec<i32> = Like::find()
            .select_only()
            .column(like::Column::BlogId)
            .filter(like::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(rows)
    }

    /// Likes on the given blogs, paired with the liking user.
    pub async fn find_for_blogs(
        &self,
        blog_ids: &[i32],
    ) -> AppResult<Vec<(like::Model, Option<user::Model>)>> {
        if blog_ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(like::Column::BlogId.is_in(blog_ids.to_vec()))
            .find_also_related(User)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_like(id: i32, user_id: i32, blog_id: i32) -> like::Model {
        like::Model {
            id,
            user_id,
            blog_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_has_liked_true() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_like(1, 10, 20)]])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(repo.has_liked(10, 20).await.unwrap());
    }

    #[tokio::test]
    async fn test_has_liked_false() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<like::Model>::new()])
                .into_connection(),
        );

        let repo = LikeRepository::new(db);
        assert!(!repo.has_liked(10, 21).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_for_blogs_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = LikeRepository::new(db);
        assert!(repo.find_for_blogs(&[]).await.unwrap().is_empty());
    }
}
