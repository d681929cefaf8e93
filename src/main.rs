use std::process;

use wdtk_client::application::configure_verbosity;
use wdtk_client::cli::commands::execute_command;
use wdtk_client::cli::output;
use wdtk_client::cli::{try_parse_cli, usage_text, Cli, CliError};
use wdtk_client::config::Settings;
use wdtk_client::infrastructure::di::ServiceContainer;
use wdtk_client::infrastructure::logging::setup_logging;

fn main() {
    // Sinks exist before anything logs; thresholds follow once flags are known
    let logs = setup_logging();

    let cli = match try_parse_cli(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };
    configure_verbosity(cli.verbosity_flags(), &logs);

    process::exit(run(&cli));
}

fn run(cli: &Cli) -> i32 {
    let mut settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => return report(CliError::from(e)),
    };
    if cli.offline {
        settings.offline = true;
    }

    let container = ServiceContainer::new(settings, usage_text());
    execute_command(cli, &container).unwrap_or_else(report)
}

fn report(e: CliError) -> i32 {
    output::error(&e);
    e.exit_code()
}
