//! CLI layer: argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod error;
pub mod output;

pub use args::{parse_request, try_parse_cli, usage_text, Cli};
pub use error::{CliError, CliResult};
