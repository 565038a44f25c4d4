//! Common utilities and shared types for wanderblog.
//!
//! This crate provides foundational components used across all wanderblog crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Local file storage for uploaded images
//!
//! # Example
//!
//! ```no_run
//! use wanderblog_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Listening on {}:{}", config.server.host, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{
    LocalStorage, StorageBackend, StoredFile, generate_storage_key, is_allowed_image_name,
    MAX_UPLOAD_BYTES,
};
