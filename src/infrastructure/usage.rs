//! Usage output through the interactive log sink

use tracing::info;

use crate::infrastructure::traits::UsageReporter;

/// Prints a pre-rendered help text on the console sink.
///
/// The text goes through `tracing` like any other informational message, so
/// `-q`/`-s` suppress it as well.
#[derive(Debug, Clone)]
pub struct ConsoleUsageReporter {
    text: String,
}

impl ConsoleUsageReporter {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl UsageReporter for ConsoleUsageReporter {
    fn print_usage(&self) {
        info!("{}", self.text.trim_end());
    }
}
