//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use wanderblog_core::{AccountService, BlogService, CategoryService, TokenService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub account_service: AccountService,
    pub blog_service: BlogService,
    pub category_service: CategoryService,
    pub token_service: TokenService,
}

/// Authentication middleware.
///
/// Verifies the bearer token and stores its claims in the request
/// extensions. Routes enforce authentication through the extractors, so an
/// absent or invalid token passes through here untouched.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        match state.token_service.verify(token) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
            }
            Err(_) => {
                tracing::debug!("Rejected invalid bearer token");
            }
        }
    }

    next.run(req).await
}
