//! Category service.

use wanderblog_common::AppResult;
use wanderblog_db::{entities::category, repositories::CategoryRepository};

/// Category service for business logic.
#[derive(Clone)]
pub struct CategoryService {
    category_repo: CategoryRepository,
}

impl CategoryService {
    /// Create a new category service.
    #[must_use]
    pub const fn new(category_repo: CategoryRepository) -> Self {
        Self { category_repo }
    }

    /// List every category, ordered by ID.
    pub async fn get_all(&self) -> AppResult<Vec<category::Model>> {
        self.category_repo.find_all().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    category::Model {
                        id: 1,
                        name: "Beaches".to_string(),
                    },
                    category::Model {
                        id: 2,
                        name: "Cities".to_string(),
                    },
                ]])
                .into_connection(),
        );

        let svc = CategoryService::new(CategoryRepository::new(db));
        let all = svc.get_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[1].name, "Cities");
    }
}
