//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (DumpBackend, UsageReporter, etc.)
//! but are themselves concrete structs, not traits.

mod dispatch;

pub use dispatch::{DispatchOutcome, DispatchService, UsageReason};
