//! HTTP API layer for wanderblog.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: account and blog routes
//! - **Extractors**: bearer-token authentication
//! - **Middleware**: token verification, shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
