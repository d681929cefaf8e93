//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod services;
pub mod verbosity;

pub use error::{ApplicationError, ApplicationResult};
pub use verbosity::{configure_verbosity, thresholds_for};
