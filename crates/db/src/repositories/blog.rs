//! Blog repository.

use std::sync::Arc;

use crate::entities::{Blog, blog};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, sea_query::Expr,
};
use wanderblog_common::{AppError, AppResult};

/// Sort direction for blog listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parse a query-string value; anything but `DESC` (any case) is ASC.
    #[must_use]
    pub fn from_query_param(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    const fn to_order(self) -> Order {
        match self {
            Self::Asc => Order::Asc,
            Self::Desc => Order::Desc,
        }
    }
}

/// Map a client-supplied sort key onto a blog column. Unknown keys sort by
/// nothing rather than erroring.
#[must_use]
pub fn sort_column(name: &str) -> Option<blog::Column> {
    match name {
        "id" => Some(blog::Column::Id),
        "title" => Some(blog::Column::Title),
        "country" => Some(blog::Column::Country),
        "total_fav" | "totalFav" => Some(blog::Column::TotalFav),
        "createdAt" | "created_at" => Some(blog::Column::CreatedAt),
        "updatedAt" | "updated_at" => Some(blog::Column::UpdatedAt),
        _ => None,
    }
}

/// Listing filter shared by all blog listing variants.
#[derive(Debug, Clone)]
pub struct BlogFilter {
    /// Restrict to a category.
    pub category_id: Option<i32>,
    /// Title substring search.
    pub search: Option<String>,
    /// Client-chosen sort column (whitelisted via [`sort_column`]).
    pub sort_by: Option<String>,
    /// Sort direction for `sort_by`.
    pub sort: SortDirection,
    /// 1-based page number.
    pub page: u64,
    /// Page size.
    pub size: u64,
}

impl Default for BlogFilter {
    fn default() -> Self {
        Self {
            category_id: None,
            search: None,
            sort_by: None,
            sort: SortDirection::Asc,
            page: 1,
            size: 10,
        }
    }
}

impl BlogFilter {
    /// Row offset for the current page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)) * self.size
    }
}

/// Base predicate for the four listing variants.
#[derive(Debug, Clone)]
pub enum BlogScope {
    /// Every blog.
    All,
    /// Blogs authored by the given user.
    Author(i32),
    /// Blogs whose IDs are in the given set (liked-by-caller listing).
    Ids(Vec<i32>),
}

/// Blog repository for database operations.
#[derive(Clone)]
pub struct BlogRepository {
    db: Arc<DatabaseConnection>,
}

impl BlogRepository {
    /// Create a new blog repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a blog by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<blog::Model>> {
        Blog::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a blog by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<blog::Model> {
        self.find_by_id(id).await?.ok_or(AppError::BlogNotFound)
    }

    /// Create a new blog.
    pub async fn create(&self, model: blog::ActiveModel) -> AppResult<blog::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Hard-delete a blog row.
    pub async fn delete(&self, model: blog::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Increment the denormalized likes counter (single UPDATE, no fetch).
    pub async fn increment_total_fav(&self, blog_id: i32) -> AppResult<()> {
        Blog::update_many()
            .col_expr(
                blog::Column::TotalFav,
                Expr::col(blog::Column::TotalFav).add(1),
            )
            .filter(blog::Column::Id.eq(blog_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Decrement the denormalized likes counter.
    pub async fn decrement_total_fav(&self, blog_id: i32) -> AppResult<()> {
        Blog::update_many()
            .col_expr(
                blog::Column::TotalFav,
                Expr::col(blog::Column::TotalFav).sub(1),
            )
            .filter(blog::Column::Id.eq(blog_id))
            .filter(blog::Column::TotalFav.gt(0))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count rows matching the scope and filter predicates.
    pub async fn count(&self, scope: &BlogScope, filter: &BlogFilter) -> AppResult<u64> {
        Self::apply_predicates(Blog::find(), scope, filter)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch one page of blogs.
    ///
    /// `most_fav_first` appends a `total_fav DESC` ordering after any
    /// client-chosen sort, for the most-favorited listing variant.
    pub async fn find_page(
        &self,
        scope: &BlogScope,
        filter: &BlogFilter,
        most_fav_first: bool,
    ) -> AppResult<Vec<blog::Model>> {
        let mut query = Self::apply_predicates(Blog::find(), scope, filter);

        // Own-posts listing leads with newest-first.
        if matches!(scope, BlogScope::Author(_)) {
            query = query.order_by_desc(blog::Column::CreatedAt);
        }

        if let Some(col) = filter.sort_by.as_deref().and_then(sort_column) {
            query = query.order_by(col, filter.sort.to_order());
        }

        if most_fav_first {
            query = query.order_by_desc(blog::Column::TotalFav);
        }

        query
            .offset(filter.offset())
            .limit(filter.size)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn apply_predicates(
        mut query: Select<Blog>,
        scope: &BlogScope,
        filter: &BlogFilter,
    ) -> Select<Blog> {
        match scope {
            BlogScope::All => {}
            BlogScope::Author(user_id) => {
                query = query.filter(blog::Column::UserId.eq(*user_id));
            }
            BlogScope::Ids(ids) => {
                query = query.filter(blog::Column::Id.is_in(ids.clone()));
            }
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(blog::Column::CategoryId.eq(category_id));
        }

        if let Some(search) = filter.search.as_deref() {
            query = query.filter(blog::Column::Title.contains(search));
        }

        query
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn test_blog(id: i32, title: &str, total_fav: i32) -> blog::Model {
        blog::Model {
            id,
            title: title.to_string(),
            image_url: Some(format!("{id}.jpg")),
            content: Some("...".to_string()),
            video_url: None,
            country: Some("Indonesia".to_string()),
            is_published: true,
            is_deleted: false,
            category_id: 1,
            user_id: Some(1),
            total_fav,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!(SortDirection::from_query_param("DESC"), SortDirection::Desc);
        assert_eq!(SortDirection::from_query_param("desc"), SortDirection::Desc);
        assert_eq!(SortDirection::from_query_param("ASC"), SortDirection::Asc);
        assert_eq!(SortDirection::from_query_param("sideways"), SortDirection::Asc);
    }

    #[test]
    fn test_sort_column_whitelist() {
        assert!(sort_column("title").is_some());
        assert!(sort_column("createdAt").is_some());
        assert!(sort_column("total_fav").is_some());
        // Not a column clients may sort by.
        assert!(sort_column("password").is_none());
        assert!(sort_column("; DROP TABLE blog").is_none());
    }

    #[test]
    fn test_filter_offset() {
        let filter = BlogFilter {
            page: 3,
            size: 10,
            ..Default::default()
        };
        assert_eq!(filter.offset(), 20);

        let first = BlogFilter::default();
        assert_eq!(first.offset(), 0);
    }

    #[tokio::test]
    async fn test_find_page_all() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_blog(1, "Ubud", 4), test_blog(2, "Kyoto", 9)]])
                .into_connection(),
        );

        let repo = BlogRepository::new(db);
        let result = repo
            .find_page(&BlogScope::All, &BlogFilter::default(), false)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<blog::Model>::new()])
                .into_connection(),
        );

        let repo = BlogRepository::new(db);
        let err = repo.get_by_id(404).await.unwrap_err();

        assert!(matches!(err, AppError::BlogNotFound));
    }
}
