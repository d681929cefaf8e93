//! Action dispatch
//!
//! Drives the dump processor for a parsed request. Every failure ends in
//! exactly one usage display; nothing is retried.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::{
    check_readiness, ActionKind, ActionRequest, NotReadyReason, ProcessSummary,
    ReadinessVerdict,
};
use crate::infrastructure::traits::{DumpBackend, UsageReporter};

/// Why the usage text was shown instead of completing the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageReason {
    NotReady(NotReadyReason),
    SourceOverrideFailed,
    DumpResolutionFailed,
    SiteMetadataFailed,
    ProcessingFailed,
}

impl fmt::Display for UsageReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageReason::NotReady(reason) => write!(f, "{reason}"),
            UsageReason::SourceOverrideFailed => f.write_str("dump directory could not be used"),
            UsageReason::DumpResolutionFailed => f.write_str("no matching dump found"),
            UsageReason::SiteMetadataFailed => f.write_str("site metadata could not be retrieved"),
            UsageReason::ProcessingFailed => f.write_str("dump processing failed"),
        }
    }
}

/// Result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed(ProcessSummary),
    UsageShown(UsageReason),
}

impl DispatchOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, DispatchOutcome::Completed(_))
    }
}

/// Orchestrates the dump processor calls for one request.
pub struct DispatchService {
    backend: Arc<dyn DumpBackend>,
    usage: Arc<dyn UsageReporter>,
}

impl DispatchService {
    /// Create a new dispatch service.
    pub fn new(backend: Arc<dyn DumpBackend>, usage: Arc<dyn UsageReporter>) -> Self {
        Self { backend, usage }
    }

    /// Run the request, or show usage if it cannot run.
    ///
    /// Order of calls:
    /// 1. no action selected: usage, no backend call at all
    /// 2. source override, if given (also for requests that are otherwise not ready)
    /// 3. readiness: usage if the action lacks its required tasks
    /// 4. most recent dump for the action's content type
    /// 5. site metadata, only for actions that need it
    /// 6. processing
    pub fn perform_actions(&self, request: &ActionRequest) -> DispatchOutcome {
        let verdict = check_readiness(request);

        if verdict == ReadinessVerdict::NotReady(NotReadyReason::NoActionSelected) {
            debug!("no action selected");
            return self.show_usage(UsageReason::NotReady(NotReadyReason::NoActionSelected));
        }

        if let Some(dir) = &request.source_override {
            if let Err(e) = self.backend.set_source_override(dir) {
                error!("Cannot use dump directory {}: {}", dir.display(), e);
                return self.show_usage(UsageReason::SourceOverrideFailed);
            }
        }

        match verdict {
            ReadinessVerdict::Ready(kind) => self.dispatch(kind, request),
            ReadinessVerdict::NotReady(reason) => {
                warn!("Not ready: {}", reason);
                self.show_usage(UsageReason::NotReady(reason))
            }
        }
    }

    /// Resolve, fetch site metadata if needed, process. `request` is ready.
    fn dispatch(&self, kind: ActionKind, request: &ActionRequest) -> DispatchOutcome {
        let spec = kind.spec();

        let dump = match self.backend.resolve_most_recent(spec.content_type) {
            Ok(dump) => dump,
            Err(e) => {
                error!("Cannot find a {} dump: {}", spec.content_type, e);
                return self.show_usage(UsageReason::DumpResolutionFailed);
            }
        };
        info!("Processing {} for action '{}'", dump, kind);

        let sites = if spec.needs_site_metadata {
            match self.backend.retrieve_site_metadata() {
                Ok(sites) => Some(sites),
                Err(e) => {
                    error!("Cannot retrieve site metadata: {}", e);
                    return self.show_usage(UsageReason::SiteMetadataFailed);
                }
            }
        } else {
            None
        };

        match self.backend.process(&dump, &request.tasks, sites.as_ref()) {
            Ok(summary) => {
                info!(
                    "Finished {}: {} entities in {:.1?}",
                    summary.dump, summary.entities, summary.elapsed
                );
                for (task, count) in &summary.task_counts {
                    info!("  {}: {}", task, count);
                }
                DispatchOutcome::Completed(summary)
            }
            Err(e) => {
                error!("Processing {} failed: {}", dump, e);
                self.show_usage(UsageReason::ProcessingFailed)
            }
        }
    }

    fn show_usage(&self, reason: UsageReason) -> DispatchOutcome {
        debug!("showing usage: {}", reason);
        self.usage.print_usage();
        DispatchOutcome::UsageShown(reason)
    }
}
