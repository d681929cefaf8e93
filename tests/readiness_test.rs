//! Tests for readiness validation of parsed requests

use rstest::rstest;
use wdtk_client::cli::parse_request;
use wdtk_client::domain::{check_readiness, ActionKind, NotReadyReason, ReadinessVerdict};

fn verdict(args: &[&str]) -> ReadinessVerdict {
    check_readiness(&parse_request(args).expect("valid arguments"))
}

#[rstest]
#[case::no_arguments(&[], NotReadyReason::NoActionSelected)]
#[case::only_dumps(&["--dumps", "/tmp"], NotReadyReason::NoActionSelected)]
#[case::only_tasks(&["--rdftasks", "items"], NotReadyReason::NoActionSelected)]
#[case::only_quiet(&["-q"], NotReadyReason::NoActionSelected)]
#[case::rdf_without_tasks(&["-a", "rdf"], NotReadyReason::MissingTaskSubset(ActionKind::Rdf))]
#[case::rdf_with_dumps_only(
    &["-a", "rdf", "--dumps", "/tmp"],
    NotReadyReason::MissingTaskSubset(ActionKind::Rdf)
)]
fn given_incomplete_request_when_checking_then_not_ready(
    #[case] args: &[&str],
    #[case] reason: NotReadyReason,
) {
    assert_eq!(verdict(args), ReadinessVerdict::NotReady(reason));
}

#[rstest]
#[case::json(&["-a", "json"], ActionKind::Json)]
#[case::json_with_dumps(&["-a", "json", "--dumps", "/tmp"], ActionKind::Json)]
#[case::sites(&["-a", "sites"], ActionKind::Sites)]
#[case::rdf_with_tasks(&["-a", "rdf", "--rdftasks", "items,labels"], ActionKind::Rdf)]
#[case::json_ignores_tasks(&["-a", "json", "--rdftasks", "items"], ActionKind::Json)]
fn given_complete_request_when_checking_then_ready(
    #[case] args: &[&str],
    #[case] kind: ActionKind,
) {
    assert_eq!(verdict(args), ReadinessVerdict::Ready(kind));
}

#[test]
fn given_same_request_when_checking_repeatedly_then_same_verdict() {
    let request = parse_request(["-a", "rdf", "--dumps", "/tmp"]).unwrap();

    let first = check_readiness(&request);
    for _ in 0..3 {
        assert_eq!(check_readiness(&request), first);
    }
}
