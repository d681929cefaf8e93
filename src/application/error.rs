//! Application-level errors (wraps domain errors)

use thiserror::Error;

/// Application errors: settings that cannot be loaded or shown.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("config error: {message}")]
    Config { message: String },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
