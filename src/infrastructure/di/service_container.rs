//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::DispatchService;
use crate::config::Settings;
use crate::infrastructure::dumps::LocalDumpController;
use crate::infrastructure::traits::{DumpBackend, FileSystem, RealFileSystem, UsageReporter};
use crate::infrastructure::usage::ConsoleUsageReporter;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Dump processor
    pub backend: Arc<dyn DumpBackend>,

    /// Usage/help output
    pub usage: Arc<dyn UsageReporter>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    ///
    /// `usage_text` is the rendered help shown whenever a request cannot run.
    pub fn new(settings: Settings, usage_text: impl Into<String>) -> Self {
        let settings = Arc::new(settings);
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let backend = Arc::new(LocalDumpController::new(fs, settings.clone()));
        let usage = Arc::new(ConsoleUsageReporter::new(usage_text));

        Self::with_deps(settings, backend, usage)
    }

    /// Create a service container with custom dependencies.
    pub fn with_deps(
        settings: Arc<Settings>,
        backend: Arc<dyn DumpBackend>,
        usage: Arc<dyn UsageReporter>,
    ) -> Self {
        Self {
            settings,
            backend,
            usage,
        }
    }

    /// Dispatcher bound to this container's backend and usage reporter.
    pub fn dispatch_service(&self) -> DispatchService {
        DispatchService::new(self.backend.clone(), self.usage.clone())
    }
}
