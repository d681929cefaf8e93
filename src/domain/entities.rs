//! Domain entities: action kinds, task subsets, action requests, dump handles

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Content type of a dump file published by the dump processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DumpContentType {
    /// Full entity dump, one JSON document per entity
    Json,
    /// Current revisions of all pages (XML)
    Current,
    /// Full page history (XML)
    Full,
    /// Daily incremental revisions (XML)
    Daily,
    /// Site table (links between site keys and wiki URLs)
    Sites,
}

impl DumpContentType {
    /// Prefix of the dump directory name, e.g. `json` in `json-20150303`.
    pub fn dir_prefix(self) -> &'static str {
        match self {
            DumpContentType::Json => "json",
            DumpContentType::Current => "current",
            DumpContentType::Full => "full",
            DumpContentType::Daily => "daily",
            DumpContentType::Sites => "sites",
        }
    }
}

impl fmt::Display for DumpContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_prefix())
    }
}

/// What the client has been asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Serialize entities as JSON
    Json,
    /// Serialize entities as RDF
    Rdf,
    /// List the site table
    Sites,
}

/// Per-kind metadata shared by the readiness validator and the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub kind: ActionKind,
    /// Name accepted by `-a`
    pub name: &'static str,
    pub description: &'static str,
    /// Dump to resolve before processing
    pub content_type: DumpContentType,
    /// Request is not ready unless at least one task is selected
    pub requires_tasks: bool,
    /// Site metadata is retrieved before processing
    pub needs_site_metadata: bool,
}

const JSON_SPEC: ActionSpec = ActionSpec {
    kind: ActionKind::Json,
    name: "json",
    description: "serialize all entities of the most recent dump as JSON",
    content_type: DumpContentType::Json,
    requires_tasks: false,
    needs_site_metadata: false,
};

const RDF_SPEC: ActionSpec = ActionSpec {
    kind: ActionKind::Rdf,
    name: "rdf",
    description: "serialize the selected RDF tasks (see --rdftasks)",
    content_type: DumpContentType::Json,
    requires_tasks: true,
    needs_site_metadata: true,
};

const SITES_SPEC: ActionSpec = ActionSpec {
    kind: ActionKind::Sites,
    name: "sites",
    description: "list the sites known to the most recent site table",
    content_type: DumpContentType::Sites,
    requires_tasks: false,
    needs_site_metadata: true,
};

/// All recognized actions, in the order they are listed in usage output.
pub const ACTION_SPECS: [ActionSpec; 3] = [JSON_SPEC, RDF_SPEC, SITES_SPEC];

impl ActionKind {
    pub fn spec(self) -> &'static ActionSpec {
        match self {
            ActionKind::Json => &JSON_SPEC,
            ActionKind::Rdf => &RDF_SPEC,
            ActionKind::Sites => &SITES_SPEC,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        ACTION_SPECS.iter().map(|s| s.name)
    }
}

impl FromStr for ActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACTION_SPECS
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(s.trim()))
            .map(|spec| spec.kind)
            .ok_or_else(|| DomainError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Facets that the RDF action can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RdfTask {
    Items,
    Properties,
    Terms,
    Labels,
    Descriptions,
    Aliases,
    Statements,
    SimpleStatements,
    Sitelinks,
    Taxonomy,
    InstanceOf,
    SubclassOf,
}

impl RdfTask {
    pub const ALL: [RdfTask; 12] = [
        RdfTask::Items,
        RdfTask::Properties,
        RdfTask::Terms,
        RdfTask::Labels,
        RdfTask::Descriptions,
        RdfTask::Aliases,
        RdfTask::Statements,
        RdfTask::SimpleStatements,
        RdfTask::Sitelinks,
        RdfTask::Taxonomy,
        RdfTask::InstanceOf,
        RdfTask::SubclassOf,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RdfTask::Items => "items",
            RdfTask::Properties => "properties",
            RdfTask::Terms => "terms",
            RdfTask::Labels => "labels",
            RdfTask::Descriptions => "descriptions",
            RdfTask::Aliases => "aliases",
            RdfTask::Statements => "statements",
            RdfTask::SimpleStatements => "simplestatements",
            RdfTask::Sitelinks => "sitelinks",
            RdfTask::Taxonomy => "taxonomy",
            RdfTask::InstanceOf => "instanceof",
            RdfTask::SubclassOf => "subclassof",
        }
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(|t| t.name())
    }
}

impl FromStr for RdfTask {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|task| task.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownRdfTask(s.to_string()))
    }
}

impl fmt::Display for RdfTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered set of tasks: insertion order is kept, repeated names are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSubset {
    tasks: Vec<RdfTask>,
}

impl TaskSubset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Returns false if it was already present.
    pub fn insert(&mut self, task: RdfTask) -> bool {
        if self.tasks.contains(&task) {
            return false;
        }
        self.tasks.push(task);
        true
    }

    pub fn contains(&self, task: RdfTask) -> bool {
        self.tasks.contains(&task)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = RdfTask> + '_ {
        self.tasks.iter().copied()
    }
}

impl FromIterator<RdfTask> for TaskSubset {
    fn from_iter<I: IntoIterator<Item = RdfTask>>(iter: I) -> Self {
        let mut subset = TaskSubset::new();
        for task in iter {
            subset.insert(task);
        }
        subset
    }
}

impl fmt::Display for TaskSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.tasks.iter().map(|t| t.name()).collect();
        f.write_str(&names.join(","))
    }
}

/// The two flags that suppress interactive output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerbosityFlags {
    pub silent: bool,
    pub quiet: bool,
}

impl VerbosityFlags {
    pub fn suppresses_console(&self) -> bool {
        self.silent || self.quiet
    }
}

/// A parsed invocation. Built once from the arguments, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRequest {
    pub action: Option<ActionKind>,
    pub tasks: TaskSubset,
    /// Local dump directory used instead of default discovery
    pub source_override: Option<PathBuf>,
    pub verbosity: VerbosityFlags,
}

/// Log threshold of a single sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Threshold {
    /// Nothing is emitted
    Off,
    /// Warnings and errors only
    Warn,
    /// Informational messages and above
    Info,
}

/// Thresholds for the interactive (console) and error sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogThresholds {
    pub console: Threshold,
    pub error: Threshold,
}

impl Default for LogThresholds {
    fn default() -> Self {
        Self {
            console: Threshold::Info,
            error: Threshold::Warn,
        }
    }
}

/// A dump located by the dump processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpHandle {
    /// Project the dump belongs to, e.g. "wikidatawiki"
    pub project: String,
    /// Publication date as `YYYYMMDD`
    pub date_stamp: String,
    pub content_type: DumpContentType,
    /// Dump file on disk
    pub path: PathBuf,
}

impl fmt::Display for DumpHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}",
            self.project, self.date_stamp, self.content_type
        )
    }
}

/// One row of the site table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    /// Global site identifier, e.g. "enwiki"
    pub site_key: String,
    /// Site group, e.g. "wikipedia"
    pub group: String,
    pub language: String,
    /// Article URL pattern, `$1` stands for the page title
    pub url: String,
}

/// Auxiliary cross-reference data needed by some actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteMetadata {
    pub sites: Vec<SiteRecord>,
}

impl SiteMetadata {
    pub fn get(&self, site_key: &str) -> Option<&SiteRecord> {
        self.sites.iter().find(|s| s.site_key == site_key)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// What the dump processor reports after processing a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub dump: String,
    pub entities: u64,
    /// One count per requested task, in task order
    pub task_counts: Vec<(RdfTask, u64)>,
    pub elapsed: Duration,
}
