//! Keyword repository.

use std::sync::Arc;

use crate::entities::{BlogKeyword, Keyword, blog_keyword, keyword};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use wanderblog_common::{AppError, AppResult};

/// Keyword repository for database operations.
#[derive(Clone)]
pub struct KeywordRepository {
    db: Arc<DatabaseConnection>,
}

impl KeywordRepository {
    /// Create a new keyword repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a keyword by name (first match).
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<keyword::Model>> {
        Keyword::find()
            .filter(keyword::Column::Name.eq(name))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a keyword by name, creating it if absent.
    ///
    /// The lookup-then-insert is not transactional; two concurrent calls can
    /// both insert. Accepted, matching the original behavior.
    pub async fn find_or_create(&self, name: &str) -> AppResult<keyword::Model> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok(existing);
        }

        let model = keyword::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Associate a keyword with a blog.
    pub async fn attach_to_blog(&self, blog_id: i32, keyword_id: i32) -> AppResult<()> {
        let model = blog_keyword::ActiveModel {
            blog_id: Set(blog_id),
            keyword_id: Set(keyword_id),
            ..Default::default()
        };

        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    /// Keywords attached to the given blogs, paired with their join rows.
    pub async fn find_for_blogs(
        &self,
        blog_ids: &[i32],
    ) -> AppResult<Vec<(blog_keyword::Model, Option<keyword::Model>)>> {
        if blog_ids.is_empty() {
            return Ok(vec![]);
        }

        BlogKeyword::find()
            .filter(blog_keyword::Column::BlogId.is_in(blog_ids.to_vec()))
            .find_also_related(Keyword)
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
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn test_keyword(id: i32, name: &str) -> keyword::Model {
        keyword::Model {
            id,
            name: name.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_or_create_returns_existing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_keyword(3, "bali")]])
                .into_connection(),
        );

        let repo = KeywordRepository::new(db);
        let result = repo.find_or_create("bali").await.unwrap();

        assert_eq!(result.id, 3);
    }

    #[tokio::test]
    async fn test_find_or_create_inserts_when_absent() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                // lookup misses
                .append_query_results([Vec::<keyword::Model>::new()])
                .append_exec_results([MockExecResult {
                    last_insert_id: 5,
                    rows_affected: 1,
                }])
                // insert returning
                .append_query_results([[test_keyword(5, "hiking")]])
                .into_connection(),
        );

        let repo = KeywordRepository::new(db);
        let result = repo.find_or_create("hiking").await.unwrap();

        assert_eq!(result.id, 5);
        assert_eq!(result.name, "hiking");
    }

    #[tokio::test]
    async fn test_find_for_blogs_empty() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = KeywordRepository::new(db);
        assert!(repo.find_for_blogs(&[]).await.unwrap().is_empty());
    }
}
