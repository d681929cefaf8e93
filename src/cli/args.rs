//! CLI argument definitions using clap

use std::ffi::OsString;
use std::path::PathBuf;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgMatches, Command, CommandFactory, FromArgMatches, Parser, ValueHint};

use crate::domain::{ActionKind, ActionRequest, RdfTask, VerbosityFlags, ACTION_SPECS};

/// Process Wikidata dumps: serialize entities as JSON or RDF, list sites
#[derive(Parser, Debug)]
#[command(name = "wdtk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Action to perform
    #[arg(
        short = 'a',
        long,
        value_name = "ACTION",
        value_parser = PossibleValuesParser::new(ActionKind::names())
            .try_map(|s| s.parse::<ActionKind>())
    )]
    pub action: Option<ActionKind>,

    /// Comma-separated RDF tasks, e.g. items,labels
    #[arg(
        long = "rdftasks",
        value_name = "TASKS",
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(RdfTask::names())
            .try_map(|s| s.parse::<RdfTask>())
    )]
    pub rdf_tasks: Vec<RdfTask>,

    /// Local directory containing the dumps (default: configured dump_dir)
    #[arg(long = "dumps", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub dumps: Option<PathBuf>,

    /// Silent: suppress console output
    #[arg(short = 's', long)]
    pub silent: bool,

    /// Quiet: suppress console output
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Only use dumps already available locally
    #[arg(short = 'n', long)]
    pub offline: bool,

    /// Config file (TOML)
    #[arg(short = 'i', long = "config", value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print a config file template and exit
    #[arg(long)]
    pub config_template: bool,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<clap_complete::Shell>,
}

impl Cli {
    pub fn verbosity_flags(&self) -> VerbosityFlags {
        VerbosityFlags {
            silent: self.silent,
            quiet: self.quiet,
        }
    }

    /// The action request described by these arguments.
    ///
    /// Missing optional arguments never fail: the action stays unset, the
    /// task subset stays empty and the dumps are discovered by default.
    pub fn action_request(&self) -> ActionRequest {
        ActionRequest {
            action: self.action,
            tasks: self.rdf_tasks.iter().copied().collect(),
            source_override: self.dumps.clone(),
            verbosity: self.verbosity_flags(),
        }
    }
}

/// The full command, including the action/task listing shown in help.
pub fn command() -> Command {
    Cli::command().after_help(actions_help())
}

/// Parse a full argument vector (program name first).
pub fn try_parse_cli<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches: ArgMatches = command().try_get_matches_from(args)?;
    Cli::from_arg_matches(&matches)
}

/// Parse arguments (without program name) into an action request.
///
/// Only grammar errors fail; they are returned to the caller untouched.
pub fn parse_request<I, T>(args: I) -> Result<ActionRequest, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let argv = std::iter::once(OsString::from("wdtk")).chain(args.into_iter().map(Into::into));
    try_parse_cli(argv).map(|cli| cli.action_request())
}

/// Rendered help text used by the usage reporter.
pub fn usage_text() -> String {
    command().render_help().to_string()
}

fn actions_help() -> String {
    let mut help = String::from("Actions:\n");
    for spec in ACTION_SPECS.iter() {
        help.push_str(&format!("  {:<8}{}\n", spec.name, spec.description));
    }
    let tasks: Vec<&str> = RdfTask::names().collect();
    help.push_str(&format!("\nRDF tasks:\n  {}\n", tasks.join(", ")));
    help
}
