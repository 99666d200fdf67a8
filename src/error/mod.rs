mod app_error;

pub use app_error::AppError;

/// Crate-wide result; handlers and services default to [`AppError`].
pub type Result<T, E = AppError> = std::result::Result<T, E>;
