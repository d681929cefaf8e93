//! Verbosity configuration: `-s`/`-q` to per-sink log thresholds

use tracing::debug;

use crate::domain::{LogThresholds, Threshold, VerbosityFlags};
use crate::infrastructure::traits::LogConfigurator;

/// Thresholds implied by the verbosity flags.
///
/// Silent and quiet both turn the console sink off. The error sink always
/// stays at warning level.
pub fn thresholds_for(flags: VerbosityFlags) -> LogThresholds {
    let console = if flags.suppresses_console() {
        Threshold::Off
    } else {
        Threshold::Info
    };

    LogThresholds {
        console,
        error: Threshold::Warn,
    }
}

/// Apply the thresholds implied by `flags` and return them.
pub fn configure_verbosity(flags: VerbosityFlags, logs: &dyn LogConfigurator) -> LogThresholds {
    let thresholds = thresholds_for(flags);
    logs.set_console_threshold(thresholds.console);
    logs.set_error_threshold(thresholds.error);
    debug!("log thresholds: {:?}", thresholds);
    thresholds
}
