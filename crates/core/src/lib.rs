//! Core business logic for wanderblog.

pub mod services;

pub use services::*;
