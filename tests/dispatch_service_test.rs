//! Tests for DispatchService
//!
//! The backend is a recording mock, so these tests pin down exactly which
//! dump processor calls each invocation makes, and in which order.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use common::{BackendCall, CountingUsageReporter, MockDumpBackend};
use wdtk_client::application::services::{DispatchOutcome, DispatchService, UsageReason};
use wdtk_client::cli::parse_request;
use wdtk_client::domain::{ActionKind, DumpContentType, NotReadyReason, RdfTask, TaskSubset};
use wdtk_client::util::testing::init_test_setup;

/// Parse `args`, dispatch against `backend`, return the outcome and usage count.
fn run(backend: Arc<MockDumpBackend>, args: &[&str]) -> (DispatchOutcome, usize) {
    init_test_setup();
    let usage = Arc::new(CountingUsageReporter::default());
    let service = DispatchService::new(backend, usage.clone());

    let request = parse_request(args).expect("valid arguments");
    let outcome = service.perform_actions(&request);

    (outcome, usage.count())
}

// ============================================================
// not-ready requests
// ============================================================

#[test]
fn given_no_arguments_when_performing_then_prints_usage_without_backend_calls() {
    // Arrange
    let backend = Arc::new(MockDumpBackend::new());

    // Act
    let (outcome, usage_count) = run(backend.clone(), &[]);

    // Assert
    assert_eq!(
        outcome,
        DispatchOutcome::UsageShown(UsageReason::NotReady(NotReadyReason::NoActionSelected))
    );
    assert_eq!(usage_count, 1);
    assert!(backend.calls().is_empty(), "no backend call expected");
}

#[test]
fn given_only_dumps_directory_when_performing_then_no_backend_call() {
    let backend = Arc::new(MockDumpBackend::new());

    let (outcome, usage_count) = run(backend.clone(), &["--dumps", "/tmp"]);

    assert!(!outcome.is_completed());
    assert_eq!(usage_count, 1);
    assert!(backend.calls().is_empty());
}

#[test]
fn given_rdf_without_tasks_but_with_dumps_when_performing_then_sets_directory_only() {
    // Arrange
    let backend = Arc::new(MockDumpBackend::new());

    // Act
    let (outcome, usage_count) = run(backend.clone(), &["-a", "rdf", "--dumps", "/tmp"]);

    // Assert
    assert_eq!(
        outcome,
        DispatchOutcome::UsageShown(UsageReason::NotReady(NotReadyReason::MissingTaskSubset(
            ActionKind::Rdf
        )))
    );
    assert_eq!(usage_count, 1);
    assert_eq!(backend.source_overrides(), vec![PathBuf::from("/tmp")]);
    assert_eq!(backend.process_calls(), 0);
    assert_eq!(backend.site_metadata_calls(), 0);
}

#[test]
fn given_rdf_without_tasks_when_performing_then_nothing_is_resolved() {
    let backend = Arc::new(MockDumpBackend::new());

    let (_, usage_count) = run(backend.clone(), &["-a", "rdf"]);

    assert_eq!(usage_count, 1);
    assert!(backend.calls().is_empty());
}

// ============================================================
// ready requests
// ============================================================

#[test]
fn given_rdf_with_tasks_when_performing_then_retrieves_sites_before_processing() {
    // Arrange
    let backend = Arc::new(MockDumpBackend::new());

    // Act
    let (outcome, usage_count) = run(backend.clone(), &["-a", "rdf", "--rdftasks", "items,labels"]);

    // Assert
    assert!(outcome.is_completed());
    assert_eq!(usage_count, 0);
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::ResolveMostRecent(DumpContentType::Json),
            BackendCall::RetrieveSiteMetadata,
            BackendCall::Process {
                dump: "wikidata-20150303-json".to_string(),
                tasks: TaskSubset::from_iter([RdfTask::Items, RdfTask::Labels]),
                with_sites: true,
            },
        ]
    );
}

#[test]
fn given_json_action_when_performing_then_processes_without_sites() {
    let backend = Arc::new(MockDumpBackend::new());

    let (outcome, usage_count) = run(backend.clone(), &["-a", "json", "-q"]);

    assert!(outcome.is_completed());
    assert_eq!(usage_count, 0);
    assert_eq!(backend.process_calls(), 1);
    assert_eq!(backend.site_metadata_calls(), 0);
}

#[test]
fn given_ready_request_with_dumps_when_performing_then_override_comes_first() {
    let backend = Arc::new(MockDumpBackend::new());

    let (outcome, _) = run(backend.clone(), &["-a", "json", "--dumps", "/data/dumps"]);

    assert!(outcome.is_completed());
    let calls = backend.calls();
    assert_eq!(
        calls.first(),
        Some(&BackendCall::SetSourceOverride(PathBuf::from("/data/dumps")))
    );
    assert_eq!(calls.len(), 3);
}

#[test]
fn given_sites_action_when_performing_then_resolves_site_table() {
    let backend = Arc::new(MockDumpBackend::new());

    let (outcome, _) = run(backend.clone(), &["-a", "sites"]);

    assert!(outcome.is_completed());
    assert_eq!(
        backend.calls()[0],
        BackendCall::ResolveMostRecent(DumpContentType::Sites)
    );
    assert_eq!(backend.site_metadata_calls(), 1);
    assert_eq!(backend.process_calls(), 1);
}

// ============================================================
// backend failures
// ============================================================

#[test]
fn given_failing_dumps_directory_when_performing_then_aborts_before_processing() {
    // Arrange
    let backend = Arc::new(MockDumpBackend {
        fail_source_override: true,
        ..Default::default()
    });

    // Act
    let (outcome, usage_count) = run(
        backend.clone(),
        &["-a", "rdf", "--rdftasks", "items,labels", "--dumps", "/tmp/"],
    );

    // Assert
    assert_eq!(outcome, DispatchOutcome::UsageShown(UsageReason::SourceOverrideFailed));
    assert_eq!(usage_count, 1);
    assert_eq!(backend.calls(), vec![BackendCall::SetSourceOverride(PathBuf::from("/tmp/"))]);
    assert_eq!(backend.process_calls(), 0);
    assert_eq!(backend.site_metadata_calls(), 0);
}

#[test]
fn given_failing_site_metadata_when_performing_then_skips_processing() {
    // Arrange
    let backend = Arc::new(MockDumpBackend {
        fail_site_metadata: true,
        ..Default::default()
    });

    // Act
    let (outcome, usage_count) = run(backend.clone(), &["-a", "rdf", "--rdftasks", "items,labels"]);

    // Assert
    assert_eq!(outcome, DispatchOutcome::UsageShown(UsageReason::SiteMetadataFailed));
    assert_eq!(usage_count, 1);
    assert_eq!(backend.site_metadata_calls(), 1);
    assert_eq!(backend.process_calls(), 0);
}

#[test]
fn given_no_dump_found_when_performing_then_shows_usage_once() {
    let backend = Arc::new(MockDumpBackend {
        fail_resolve: true,
        ..Default::default()
    });

    let (outcome, usage_count) = run(backend.clone(), &["-a", "rdf", "--rdftasks", "terms"]);

    assert_eq!(outcome, DispatchOutcome::UsageShown(UsageReason::DumpResolutionFailed));
    assert_eq!(usage_count, 1);
    assert_eq!(backend.site_metadata_calls(), 0);
    assert_eq!(backend.process_calls(), 0);
}

#[test]
fn given_failing_processing_when_performing_then_not_retried() {
    let backend = Arc::new(MockDumpBackend {
        fail_process: true,
        ..Default::default()
    });

    let (outcome, usage_count) = run(backend.clone(), &["-a", "json"]);

    assert_eq!(outcome, DispatchOutcome::UsageShown(UsageReason::ProcessingFailed));
    assert_eq!(usage_count, 1);
    assert_eq!(backend.process_calls(), 1);
}
