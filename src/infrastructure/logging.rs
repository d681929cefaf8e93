//! Two-sink tracing setup with reloadable thresholds
//!
//! - Console sink: stdout, bare messages, informational events only
//! - Error sink: stderr, level and target, warnings and errors

use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, Layer, Registry};

use crate::domain::{LogThresholds, Threshold};
use crate::infrastructure::traits::LogConfigurator;

type ReloadHandle = reload::Handle<LevelFilter, Registry>;
type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// [`LogConfigurator`] backed by the process-wide tracing subscriber.
pub struct TracingLogConfigurator {
    console: ReloadHandle,
    error: ReloadHandle,
}

impl LogConfigurator for TracingLogConfigurator {
    fn set_console_threshold(&self, threshold: Threshold) {
        if let Err(e) = self.console.reload(level_filter(threshold)) {
            eprintln!("Error: Failed to set console log threshold: {}", e);
        }
    }

    fn set_error_threshold(&self, threshold: Threshold) {
        if let Err(e) = self.error.reload(level_filter(threshold)) {
            eprintln!("Error: Failed to set error log threshold: {}", e);
        }
    }
}

pub fn level_filter(threshold: Threshold) -> LevelFilter {
    match threshold {
        Threshold::Off => LevelFilter::OFF,
        Threshold::Warn => LevelFilter::WARN,
        Threshold::Info => LevelFilter::INFO,
    }
}

/// Install the global subscriber with default thresholds.
///
/// Must run before anything logs. The returned configurator changes the
/// thresholds of the installed sinks later on.
pub fn setup_logging() -> TracingLogConfigurator {
    let defaults = LogThresholds::default();
    let (console_filter, console) = reload::Layer::new(level_filter(defaults.console));
    let (error_filter, error) = reload::Layer::new(level_filter(defaults.error));

    // Warnings and errors belong to the error sink only
    let informational = filter_fn(|metadata| *metadata.level() > Level::WARN);

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_filter(console_filter)
        .with_filter(informational);

    let error_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(true)
        .with_thread_names(false)
        .with_filter(error_filter);

    // Both sinks sit directly on the registry so each keeps its own filter
    let sinks: Vec<BoxedLayer> = vec![console_layer.boxed(), error_layer.boxed()];

    tracing_subscriber::registry()
        .with(sinks)
        .try_init()
        .unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });

    TracingLogConfigurator { console, error }
}
