//! Infrastructure-level errors (wraps application errors)

use std::path::PathBuf;

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DumpContentType;

/// Failures reported by the dump processor.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("not a readable dump directory: {0}")]
    InvalidSourceDirectory(PathBuf),

    #[error("no {content_type} dump found in {location}")]
    DumpNotFound {
        content_type: DumpContentType,
        location: PathBuf,
    },

    #[error("site metadata unavailable: {message}")]
    SiteMetadata { message: String },

    #[error("unsupported dump format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BackendError {
    /// Create an I/O failure with path context.
    pub fn io(action: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        Self::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(source),
        }
    }
}

/// Result type for dump processor operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Infrastructure errors wrap application errors.
///
/// Backend failures never get here: the dispatcher turns them into a
/// usage outcome.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),
}
