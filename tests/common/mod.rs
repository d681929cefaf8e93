//! Recording test doubles for the I/O boundary traits
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use wdtk_client::domain::{
    DumpContentType, DumpHandle, ProcessSummary, SiteMetadata, SiteRecord, TaskSubset, Threshold,
};
use wdtk_client::infrastructure::traits::{DumpBackend, LogConfigurator, UsageReporter};
use wdtk_client::infrastructure::{BackendError, BackendResult};

/// One call made against the mock backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SetSourceOverride(PathBuf),
    ResolveMostRecent(DumpContentType),
    RetrieveSiteMetadata,
    Process {
        dump: String,
        tasks: TaskSubset,
        with_sites: bool,
    },
}

/// Mock dump processor that records every call and fails on request.
#[derive(Debug, Default)]
pub struct MockDumpBackend {
    pub calls: Mutex<Vec<BackendCall>>,
    pub fail_source_override: bool,
    pub fail_resolve: bool,
    pub fail_site_metadata: bool,
    pub fail_process: bool,
}

impl MockDumpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn source_overrides(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::SetSourceOverride(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn site_metadata_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::RetrieveSiteMetadata))
            .count()
    }

    pub fn process_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::Process { .. }))
            .count()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn mock_failure(operation: &str) -> BackendError {
    BackendError::OperationFailed {
        context: format!("mock {operation}"),
        source: Box::new(std::io::Error::new(std::io::ErrorKind::Other, "mock failure")),
    }
}

impl DumpBackend for MockDumpBackend {
    fn set_source_override(&self, path: &Path) -> BackendResult<()> {
        self.record(BackendCall::SetSourceOverride(path.to_path_buf()));
        if self.fail_source_override {
            return Err(mock_failure("set_source_override"));
        }
        Ok(())
    }

    fn resolve_most_recent(&self, content_type: DumpContentType) -> BackendResult<DumpHandle> {
        self.record(BackendCall::ResolveMostRecent(content_type));
        if self.fail_resolve {
            return Err(mock_failure("resolve_most_recent"));
        }
        Ok(DumpHandle {
            project: "wikidata".to_string(),
            date_stamp: "20150303".to_string(),
            content_type,
            path: PathBuf::from("/dev/null"),
        })
    }

    fn retrieve_site_metadata(&self) -> BackendResult<SiteMetadata> {
        self.record(BackendCall::RetrieveSiteMetadata);
        if self.fail_site_metadata {
            return Err(mock_failure("retrieve_site_metadata"));
        }
        Ok(SiteMetadata {
            sites: vec![SiteRecord {
                site_key: "enwiki".to_string(),
                group: "wikipedia".to_string(),
                language: "en".to_string(),
                url: "https://en.wikipedia.org/wiki/$1".to_string(),
            }],
        })
    }

    fn process(
        &self,
        dump: &DumpHandle,
        tasks: &TaskSubset,
        sites: Option<&SiteMetadata>,
    ) -> BackendResult<ProcessSummary> {
        self.record(BackendCall::Process {
            dump: dump.to_string(),
            tasks: tasks.clone(),
            with_sites: sites.is_some(),
        });
        if self.fail_process {
            return Err(mock_failure("process"));
        }
        Ok(ProcessSummary {
            dump: dump.to_string(),
            entities: 0,
            task_counts: tasks.iter().map(|task| (task, 0)).collect(),
            elapsed: Duration::from_millis(1),
        })
    }
}

/// Usage reporter that only counts how often it was invoked.
#[derive(Debug, Default)]
pub struct CountingUsageReporter {
    count: AtomicUsize,
}

impl CountingUsageReporter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl UsageReporter for CountingUsageReporter {
    fn print_usage(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Log configurator that remembers the last thresholds it was given.
#[derive(Debug, Default)]
pub struct RecordingLogConfigurator {
    console: Mutex<Option<Threshold>>,
    error: Mutex<Option<Threshold>>,
}

impl RecordingLogConfigurator {
    pub fn console(&self) -> Option<Threshold> {
        *self.console.lock().unwrap()
    }

    pub fn error(&self) -> Option<Threshold> {
        *self.error.lock().unwrap()
    }
}

impl LogConfigurator for RecordingLogConfigurator {
    fn set_console_threshold(&self, threshold: Threshold) {
        *self.console.lock().unwrap() = Some(threshold);
    }

    fn set_error_threshold(&self, threshold: Threshold) {
        *self.error.lock().unwrap() = Some(threshold);
    }
}
