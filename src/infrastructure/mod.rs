//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits and wires up services.

pub mod di;
pub mod dumps;
pub mod error;
pub mod logging;
pub mod traits;
pub mod usage;

pub use error::{BackendError, BackendResult, InfraError};
