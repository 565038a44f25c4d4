//! Blog service: publishing, listing, and likes.

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;
use wanderblog_common::{AppError, AppResult, StorageBackend, generate_storage_key};
use wanderblog_db::{
    entities::{blog, category},
    repositories::{
        BlogFilter, BlogRepository, BlogScope, CategoryRepository, KeywordRepository,
        LikeRepository, UserRepository,
    },
};

use crate::services::account::UploadedImage;

/// Blog service for business logic.
#[derive(Clone)]
pub struct BlogService {
    blog_repo: BlogRepository,
    category_repo: CategoryRepository,
    keyword_repo: KeywordRepository,
    like_repo: LikeRepository,
    user_repo: UserRepository,
    storage: Arc<dyn StorageBackend>,
}

/// Input for creating a blog, decoded from the multipart `data` field.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub content: Option<String>,

    pub country: Option<String>,

    #[serde(alias = "CategoryId")]
    pub category_id: i32,

    /// Whitespace-separated keyword list.
    #[serde(default)]
    pub keywords: String,

    pub video_url: Option<String>,
}

/// Author details embedded in a listing entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogAuthor {
    pub username: String,
    pub photo_profile: Option<String>,
}

/// One like on a blog, with who placed it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogLikeEntry {
    pub user_id: i32,
    pub username: Option<String>,
}

/// A fully hydrated blog entry for listing responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogListItem {
    pub id: i32,
    pub title: String,
    pub image_url: Option<String>,
    pub content: Option<String>,
    pub video_url: Option<String>,
    pub country: Option<String>,
    pub total_fav: i32,
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub category: Option<category::Model>,
    pub user: Option<BlogAuthor>,
    pub keywords: Vec<String>,
    pub likes: Vec<BlogLikeEntry>,
}

/// One page of blogs plus paging metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    /// Requested page, 1-based.
    pub page: u64,
    /// Total matching rows across all pages.
    pub rows: u64,
    /// Total number of pages.
    pub blog_page: u64,
    /// Page size used.
    pub list_limit: u64,
    /// The page contents.
    pub result: Vec<BlogListItem>,
}

impl BlogService {
    /// Create a new blog service.
    #[must_use]
    pub fn new(
        blog_repo: BlogRepository,
        category_repo: CategoryRepository,
        keyword_repo: KeywordRepository,
        like_repo: LikeRepository,
        user_repo: UserRepository,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            blog_repo,
            category_repo,
            keyword_repo,
            like_repo,
            user_repo,
            storage,
        }
    }

    /// Publish a blog with its cover image and keywords.
    pub async fn create(
        &self,
        user_id: i32,
        input: CreateBlogInput,
        image: UploadedImage,
    ) -> AppResult<blog::Model> {
        input.validate()?;
        image.validate_image()?;

        self.category_repo
            .find_by_id(input.category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let key = generate_storage_key(&image.file_name);
        let stored = self
            .storage
            .upload(&key, &image.data, &image.content_type)
            .await?;

        let model = blog::ActiveModel {
            title: Set(input.title),
            image_url: Set(Some(stored.url)),
            content: Set(input.content),
            video_url: Set(input.video_url),
            country: Set(input.country),
            category_id: Set(input.category_id),
            user_id: Set(Some(user_id)),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        let created = self.blog_repo.create(model).await?;

        // Each word is a keyword; lookup-then-insert per word, then attach.
        for word in input.keywords.split_whitespace() {
            let keyword = self.keyword_repo.find_or_create(word).await?;
            self.keyword_repo
                .attach_to_blog(created.id, keyword.id)
                .await?;
        }

        Ok(created)
    }

    /// Remove a blog by ID. Hard delete, 404 if absent.
    pub async fn delete_blog(&self, blog_id: i32) -> AppResult<()> {
        let blog = self.blog_repo.get_by_id(blog_id).await?;
        self.blog_repo.delete(blog).await
    }

    /// Like a blog. Double likes are rejected, but the check is not atomic
    /// with the insert.
    pub async fn like_blog(&self, user_id: i32, blog_id: i32) -> AppResult<()> {
        self.blog_repo.get_by_id(blog_id).await?;

        if self.like_repo.has_liked(user_id, blog_id).await? {
            return Err(AppError::BadRequest("Blog already liked".to_string()));
        }

        self.like_repo.create(user_id, blog_id).await?;
        self.blog_repo.increment_total_fav(blog_id).await
    }

    /// Remove a like.
    pub async fn unlike_blog(&self, user_id: i32, blog_id: i32) -> AppResult<()> {
        let like = self
            .like_repo
            .find_by_user_and_blog(user_id, blog_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("You are not already like this blog".to_string())
            })?;

        self.like_repo.delete(like).await?;
        self.blog_repo.decrement_total_fav(blog_id).await
    }

    /// Public listing over every blog.
    pub async fn list(&self, filter: BlogFilter) -> AppResult<BlogPage> {
        self.page(BlogScope::All, filter, false).await
    }

    /// Listing restricted to the caller's own blogs, newest first.
    pub async fn list_by_author(&self, user_id: i32, filter: BlogFilter) -> AppResult<BlogPage> {
        self.page(BlogScope::Author(user_id), filter, false).await
    }

    /// Listing restricted to blogs the caller has liked.
    pub async fn list_liked(&self, user_id: i32, filter: BlogFilter) -> AppResult<BlogPage> {
        let ids = self.like_repo.find_blog_ids_by_user(user_id).await?;
        self.page(BlogScope::Ids(ids), filter, false).await
    }

    /// Listing ordered by like count, most liked first.
    pub async fn list_most_favorited(&self, filter: BlogFilter) -> AppResult<BlogPage> {
        self.page(BlogScope::All, filter, true).await
    }

    async fn page(
        &self,
        scope: BlogScope,
        filter: BlogFilter,
        most_fav_first: bool,
    ) -> AppResult<BlogPage> {
        let rows = self.blog_repo.count(&scope, &filter).await?;
        let total_pages = total_pages(rows, filter.size);

        // A page past the end answers 200 with an empty result, not 404.
        if filter.page > total_pages {
            return Ok(BlogPage {
                page: filter.page,
                rows,
                blog_page: total_pages,
                list_limit: filter.size,
                result: vec![],
            });
        }

        let blogs = self.blog_repo.find_page(&scope, &filter, most_fav_first).await?;
        let result = self.hydrate(blogs).await?;

        Ok(BlogPage {
            page: filter.page,
            rows,
            blog_page: total_pages,
            list_limit: filter.size,
            result,
        })
    }

    /// Attach category, author, keywords, and likes to a page of blogs with
    /// one batched query per relation.
    async fn hydrate(&self, blogs: Vec<blog::Model>) -> AppResult<Vec<BlogListItem>> {
        let blog_ids: Vec<i32> = blogs.iter().map(|b| b.id).collect();

        let mut category_ids: Vec<i32> = blogs.iter().map(|b| b.category_id).collect();
        category_ids.sort_unstable();
        category_ids.dedup();

        let mut author_ids: Vec<i32> = blogs.iter().filter_map(|b| b.user_id).collect();

        let likes = self.like_repo.find_for_blogs(&blog_ids).await?;
        let keywords = self.keyword_repo.find_for_blogs(&blog_ids).await?;

        author_ids.extend(likes.iter().map(|(like, _)| like.user_id));
        author_ids.sort_unstable();
        author_ids.dedup();

        let categories: HashMap<i32, category::Model> = self
            .category_repo
            .find_by_ids(&category_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let users: HashMap<i32, _> = self
            .user_repo
            .find_by_ids(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let mut keywords_by_blog: HashMap<i32, Vec<String>> = HashMap::new();
        for (link, keyword) in keywords {
            if let Some(keyword) = keyword {
                keywords_by_blog
                    .entry(link.blog_id)
                    .or_default()
                    .push(keyword.name);
            }
        }

        let mut likes_by_blog: HashMap<i32, Vec<BlogLikeEntry>> = HashMap::new();
        for (like, liker) in likes {
            likes_by_blog
                .entry(like.blog_id)
                .or_default()
                .push(BlogLikeEntry {
                    user_id: like.user_id,
                    username: liker.map(|u| u.username),
                });
        }

        Ok(blogs
            .into_iter()
            .map(|b| {
                let user = b.user_id.and_then(|id| {
                    users.get(&id).map(|u| BlogAuthor {
                        username: u.username.clone(),
                        photo_profile: u.photo_profile.clone(),
                    })
                });

                BlogListItem {
                    id: b.id,
                    title: b.title,
                    image_url: b.image_url,
                    content: b.content,
                    video_url: b.video_url,
                    country: b.country,
                    total_fav: b.total_fav,
                    created_at: b.created_at,
                    updated_at: b.updated_at,
                    category: categories.get(&b.category_id).cloned(),
                    user,
                    keywords: keywords_by_blog.remove(&b.id).unwrap_or_default(),
                    likes: likes_by_blog.remove(&b.id).unwrap_or_default(),
                }
            })
            .collect())
    }
}

/// Number of pages needed for `rows` rows at `size` per page.
const fn total_pages(rows: u64, size: u64) -> u64 {
    if size == 0 { 0 } else { rows.div_ceil(size) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use wanderblog_common::LocalStorage;
    use wanderblog_db::entities::like;

    fn test_service(db: DatabaseConnection) -> BlogService {
        let db = Arc::new(db);
        let storage: Arc<dyn StorageBackend> = Arc::new(LocalStorage::new(
            std::env::temp_dir().join("wanderblog-blog-tests"),
            "/public".to_string(),
        ));

        BlogService::new(
            BlogRepository::new(db.clone()),
            CategoryRepository::new(db.clone()),
            KeywordRepository::new(db.clone()),
            LikeRepository::new(db.clone()),
            UserRepository::new(db),
            storage,
        )
    }

    fn test_blog(id: i32, user_id: i32) -> blog::Model {
        blog::Model {
            id,
            title: format!("Blog {id}"),
            image_url: Some(format!("/public/{id}.jpg")),
            content: Some("...".to_string()),
            video_url: None,
            country: Some("Japan".to_string()),
            is_published: true,
            is_deleted: false,
            category_id: 1,
            user_id: Some(user_id),
            total_fav: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn count_result(n: i64) -> Vec<std::collections::BTreeMap<&'static str, sea_orm::Value>> {
        vec![btreemap! { "num_items" => sea_orm::Value::BigInt(Some(n)) }]
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty_not_error() {
        // 5 rows at size 10 means a single page; page 3 exists only as
        // metadata.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([count_result(5)])
            .into_connection();
        let svc = test_service(db);

        let page = svc
            .list(BlogFilter {
                page: 3,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.page, 3);
        assert_eq!(page.rows, 5);
        assert_eq!(page.blog_page, 1);
        assert!(page.result.is_empty());
    }

    #[tokio::test]
    async fn test_like_twice_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // blog lookup
            .append_query_results([[test_blog(1, 9)]])
            // existing like found
            .append_query_results([[like::Model {
                id: 1,
                blog_id: 1,
                user_id: 2,
                created_at: Utc::now().into(),
            }]])
            .into_connection();
        let svc = test_service(db);

        let err = svc.like_blog(2, 1).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(msg) if msg == "Blog already liked"));
    }

    #[tokio::test]
    async fn test_like_missing_blog_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog::Model>::new()])
            .into_connection();
        let svc = test_service(db);

        assert!(matches!(
            svc.like_blog(2, 404).await.unwrap_err(),
            AppError::BlogNotFound
        ));
    }

    #[tokio::test]
    async fn test_unlike_without_like_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<like::Model>::new()])
            .into_connection();
        let svc = test_service(db);

        let err = svc.unlike_blog(2, 1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("not already like")));
    }

    #[tokio::test]
    async fn test_delete_removes_blog_regardless_of_author() {
        // Delete goes by primary key only; whoever authored the blog, an
        // existing row is removed.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_blog(1, 9)]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let svc = test_service(db);

        svc.delete_blog(1).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_blog_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<blog::Model>::new()])
            .into_connection();
        let svc = test_service(db);

        assert!(matches!(
            svc.delete_blog(404).await.unwrap_err(),
            AppError::BlogNotFound
        ));
    }

    #[tokio::test]
    async fn test_create_with_unknown_category() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<category::Model>::new()])
            .into_connection();
        let svc = test_service(db);

        let input = CreateBlogInput {
            title: "Lost in Kyoto".to_string(),
            content: Some("...".to_string()),
            country: Some("Japan".to_string()),
            category_id: 99,
            keywords: "temples autumn".to_string(),
            video_url: None,
        };
        let image = UploadedImage {
            file_name: "kyoto.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data: vec![0; 64],
        };

        assert!(matches!(
            svc.create(1, input, image).await.unwrap_err(),
            AppError::CategoryNotFound
        ));
    }

    #[test]
    fn test_create_input_accepts_sequelize_casing() {
        let input: CreateBlogInput = serde_json::from_str(
            r#"{"title":"t","content":"c","country":"ID","CategoryId":2,"keywords":"a b"}"#,
        )
        .unwrap();

        assert_eq!(input.category_id, 2);
        assert_eq!(input.keywords, "a b");
    }
}
