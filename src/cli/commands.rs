//! Command execution after argument parsing

use std::io;

use clap_complete::{generate, Generator};
use tracing::debug;

use crate::application::services::{DispatchOutcome, UsageReason};
use crate::cli::args::{command, Cli};
use crate::cli::error::CliResult;
use crate::cli::output;
use crate::config::Settings;
use crate::domain::NotReadyReason;
use crate::exitcode;
use crate::infrastructure::di::ServiceContainer;

/// Run the parsed command line and return the process exit code.
///
/// Verbosity must already be configured.
pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<i32> {
    if let Some(shell) = cli.completions {
        print_completions(shell);
        return Ok(exitcode::OK);
    }
    if cli.config_template {
        output::info(&Settings::template());
        return Ok(exitcode::OK);
    }
    if cli.show_config {
        output::info(&container.settings.to_toml()?);
        return Ok(exitcode::OK);
    }

    let request = cli.action_request();
    debug!("request: {:?}", request);
    let outcome = container.dispatch_service().perform_actions(&request);
    Ok(outcome_exit_code(&outcome))
}

/// Exit code for a dispatch outcome.
pub fn outcome_exit_code(outcome: &DispatchOutcome) -> i32 {
    match outcome {
        DispatchOutcome::Completed(_) => exitcode::OK,
        DispatchOutcome::UsageShown(reason) => match reason {
            UsageReason::NotReady(NotReadyReason::NoActionSelected)
            | UsageReason::NotReady(NotReadyReason::MissingTaskSubset(_)) => exitcode::USAGE,
            UsageReason::SourceOverrideFailed | UsageReason::DumpResolutionFailed => {
                exitcode::NOINPUT
            }
            UsageReason::SiteMetadataFailed => exitcode::UNAVAILABLE,
            UsageReason::ProcessingFailed => exitcode::SOFTWARE,
        },
    }
}

fn print_completions<G: Generator>(gen: G) {
    let mut cmd = command();
    let name = cmd.get_name().to_string();
    generate(gen, &mut cmd, name, &mut io::stdout());
}
