//! Command-line client for the Wikidata dump processor.
//!
//! Arguments become an [`domain::ActionRequest`], the request is checked for
//! readiness, and a ready request is dispatched to a [`infrastructure::traits::DumpBackend`].
//! Whenever a request cannot run, usage is shown instead.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
