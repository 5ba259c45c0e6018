//! quaerix-common — Shared error taxonomy and identifier helpers used across all Quaerix crates.

pub mod error;
pub mod token;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use token::{question_token, QUESTION_TOKEN_LEN};
