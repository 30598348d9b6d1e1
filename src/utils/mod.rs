//! Shared utilities: error responses and field validation

pub mod error;
pub mod validation;

pub use error::{AppError, AppResult, ErrorResponse};
