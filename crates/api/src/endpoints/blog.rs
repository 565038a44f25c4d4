//! Blog endpoints.

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    routing::{delete, get, patch, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use wanderblog_common::{AppError, AppResult};
use wanderblog_core::{BlogPage, CreateBlogInput, UploadedImage};
use wanderblog_db::repositories::{BlogFilter, SortDirection};

use crate::{extractors::AuthUser, middleware::AppState, response::Envelope};

/// Listing query parameters, shared by all four listing variants.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    /// Category filter.
    id_cat: Option<i32>,
    /// Title substring search.
    search: Option<String>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
    /// `ASC` or `DESC`; anything else falls back to ascending.
    sort: Option<String>,
    page: Option<u64>,
    size: Option<u64>,
}

impl ListQuery {
    fn into_filter(self) -> BlogFilter {
        let defaults = BlogFilter::default();

        BlogFilter {
            category_id: self.id_cat,
            search: self.search.filter(|s| !s.is_empty()),
            sort_by: self.sort_by,
            sort: self
                .sort
                .as_deref()
                .map(SortDirection::from_query_param)
                .unwrap_or_default(),
            page: self.page.unwrap_or(defaults.page).max(1),
            size: self.size.filter(|&s| s > 0).unwrap_or(defaults.size),
        }
    }
}

/// Public listing over every blog.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Envelope<BlogPage>> {
    let page = state.blog_service.list(query.into_filter()).await?;
    Ok(Envelope::ok("OK", page))
}

/// The caller's own blogs, newest first.
async fn list_own(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Envelope<BlogPage>> {
    let page = state
        .blog_service
        .list_by_author(claims.id, query.into_filter())
        .await?;
    Ok(Envelope::ok("OK", page))
}

/// Blogs the caller has liked.
async fn list_liked(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Envelope<BlogPage>> {
    let page = state
        .blog_service
        .list_liked(claims.id, query.into_filter())
        .await?;
    Ok(Envelope::ok("OK", page))
}

/// Most-liked blogs first.
async fn list_most_favorited(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Envelope<BlogPage>> {
    let page = state
        .blog_service
        .list_most_favorited(query.into_filter())
        .await?;
    Ok(Envelope::ok("OK", page))
}

/// Publish a blog. Multipart: a `data` field holding the blog JSON and a
/// `file` field holding the cover image.
async fn create(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Envelope<Value>> {
    let mut input: Option<CreateBlogInput> = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("data") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read data: {e}")))?;
                input = Some(
                    serde_json::from_str(&raw)
                        .map_err(|e| AppError::BadRequest(format!("Invalid blog data: {e}")))?,
                );
            }
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;

                image = Some(UploadedImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    let input = input.ok_or_else(|| AppError::BadRequest("Blog data is required".to_string()))?;
    let image =
        image.ok_or_else(|| AppError::BadRequest("Please provide an image file".to_string()))?;

    let blog = state.blog_service.create(claims.id, input, image).await?;

    Ok(Envelope::created("Blog created", json!({ "blog": blog })))
}

/// Remove a blog.
async fn remove(
    AuthUser(_): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Envelope<Value>> {
    state.blog_service.delete_blog(id).await?;
    Ok(Envelope::message("Blog removed"))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LikeRequest {
    #[serde(alias = "BlogId")]
    blog_id: i32,
}

/// Like a blog.
async fn like(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> AppResult<Envelope<Value>> {
    state.blog_service.like_blog(claims.id, req.blog_id).await?;
    Ok(Envelope::created_message("Blog liked"))
}

/// Remove a like.
async fn unlike(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> AppResult<Envelope<Value>> {
    state
        .blog_service
        .unlike_blog(claims.id, req.blog_id)
        .await?;
    Ok(Envelope::message("Blog unliked"))
}

/// List every category.
async fn all_categories(State(state): State<AppState>) -> AppResult<Envelope<Value>> {
    let categories = state.category_service.get_all().await?;
    Ok(Envelope::ok("OK", json!({ "categories": categories })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/auth", get(list_own))
        .route("/liked", get(list_liked))
        .route("/fav", get(list_most_favorited))
        .route("/remove/{id}", patch(remove))
        .route("/like", post(like))
        .route("/unlike", delete(unlike))
        .route("/allCategory", get(all_categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let filter = ListQuery::default().into_filter();

        assert_eq!(filter.page, 1);
        assert_eq!(filter.size, 10);
        assert!(filter.category_id.is_none());
        assert_eq!(filter.sort, SortDirection::Asc);
    }

    #[test]
    fn test_list_query_mapping() {
        let query = ListQuery {
            id_cat: Some(3),
            search: Some("bali".to_string()),
            sort_by: Some("title".to_string()),
            sort: Some("DESC".to_string()),
            page: Some(2),
            size: Some(5),
        };
        let filter = query.into_filter();

        assert_eq!(filter.category_id, Some(3));
        assert_eq!(filter.search.as_deref(), Some("bali"));
        assert_eq!(filter.sort_by.as_deref(), Some("title"));
        assert_eq!(filter.sort, SortDirection::Desc);
        assert_eq!(filter.page, 2);
        assert_eq!(filter.size, 5);
    }

    #[test]
    fn test_list_query_zero_page_and_size_fall_back() {
        let query = ListQuery {
            page: Some(0),
            size: Some(0),
            ..Default::default()
        };
        let filter = query.into_filter();

        assert_eq!(filter.page, 1);
        assert_eq!(filter.size, 10);
    }
}
