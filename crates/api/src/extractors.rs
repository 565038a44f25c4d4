//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use wanderblog_common::AppError;
use wanderblog_core::{Claims, TokenPurpose};

/// Authenticated caller extractor. Requires an access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Claims are set by the auth middleware.
        parts
            .extensions
            .get::<Claims>()
            .filter(|claims| claims.purpose == TokenPurpose::Access)
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}

/// Password-reset caller extractor. Only accepts reset-purpose tokens, so an
/// ordinary session token cannot drive the reset endpoint.
#[derive(Debug, Clone)]
pub struct ResetUser(pub Claims);

impl<S> FromRequestParts<S> for ResetUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .filter(|claims| claims.purpose == TokenPurpose::Reset)
            .cloned()
            .map(ResetUser)
            .ok_or(AppError::Unauthorized)
    }
}
