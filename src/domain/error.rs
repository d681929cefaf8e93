//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid names and values.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown RDF task: {0}")]
    UnknownRdfTask(String),

    #[error("invalid dump date stamp: {0}")]
    InvalidDateStamp(String),
}
