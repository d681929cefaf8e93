//! Dump processor over a local dump directory
//!
//! Dumps are discovered in `<root>/<project>/<type>-<YYYYMMDD>/`, where
//! `<root>` is the configured dump directory unless a source override has
//! been set.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::config::Settings;
use crate::domain::{
    DomainError, DumpContentType, DumpHandle, ProcessSummary, RdfTask, SiteMetadata, SiteRecord,
    TaskSubset,
};
use crate::infrastructure::traits::{DumpBackend, FileSystem};
use crate::infrastructure::{BackendError, BackendResult};

/// Name of the site table inside a `sites-<date>` directory.
pub const SITES_FILE_NAME: &str = "sites.json";

const COMPRESSED_SUFFIXES: [&str; 2] = [".gz", ".bz2"];

/// Local-directory implementation of [`DumpBackend`].
pub struct LocalDumpController {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    root: RwLock<PathBuf>,
}

impl LocalDumpController {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        let root = RwLock::new(settings.dump_dir.clone());
        Self { fs, settings, root }
    }

    /// Directory that is currently searched for dumps.
    pub fn root(&self) -> PathBuf {
        self.root
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn project_dir(&self) -> PathBuf {
        self.root().join(&self.settings.project)
    }

    /// Dump directories of one content type, newest first.
    fn candidate_dirs(&self, content_type: DumpContentType) -> BackendResult<Vec<(String, PathBuf)>> {
        let project_dir = self.project_dir();
        if !self.fs.is_dir(&project_dir) {
            return Ok(Vec::new());
        }

        let pattern = format!(r"^{}-(\d{{8}})$", regex::escape(content_type.dir_prefix()));
        let re = Regex::new(&pattern).map_err(|e| BackendError::OperationFailed {
            context: "compile dump directory pattern".to_string(),
            source: Box::new(e),
        })?;

        let children = self
            .fs
            .read_dir(&project_dir)
            .map_err(|e| BackendError::io("list dump directory", &project_dir, e))?;

        let mut candidates = Vec::new();
        for child in children {
            if !self.fs.is_dir(&child) {
                continue;
            }
            let Some(name) = child.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };
            let Some(caps) = re.captures(&name) else {
                continue;
            };
            let stamp = caps[1].to_string();
            match validate_date_stamp(&stamp) {
                Ok(()) => candidates.push((stamp, child)),
                Err(e) => debug!("skipping {}: {}", child.display(), e),
            }
        }

        candidates.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(candidates)
    }

    /// The dump file inside a dump directory, if any.
    fn dump_file(&self, dir: &Path, content_type: DumpContentType) -> BackendResult<Option<PathBuf>> {
        let children = self
            .fs
            .read_dir(dir)
            .map_err(|e| BackendError::io("list dump directory", dir, e))?;

        Ok(children.into_iter().find(|path| {
            if !self.fs.is_file(path) {
                return false;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            match content_type {
                DumpContentType::Json => name.contains(".json"),
                DumpContentType::Sites => name == SITES_FILE_NAME,
                _ => !name.starts_with('.'),
            }
        }))
    }

    /// Count entity documents, and per requested task the facets found in them.
    fn process_entities(
        &self,
        dump: &DumpHandle,
        tasks: &TaskSubset,
        sites: Option<&SiteMetadata>,
    ) -> BackendResult<(u64, Vec<(RdfTask, u64)>)> {
        let reader = self
            .fs
            .open(&dump.path)
            .map_err(|e| BackendError::io("open dump", &dump.path, e))?;

        let interval = self.settings.progress_interval.max(1);
        let mut entities = 0u64;
        let mut task_counts: Vec<(RdfTask, u64)> = tasks.iter().map(|task| (task, 0)).collect();

        for (index, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| BackendError::io("read dump", &dump.path, e))?;
            if !is_entity_document(&line) {
                continue;
            }
            entities += 1;

            if !task_counts.is_empty() {
                let entity = parse_entity(&line).map_err(|e| BackendError::OperationFailed {
                    context: format!("parse entity on line {} of {}", index + 1, dump.path.display()),
                    source: Box::new(e),
                })?;
                for (task, count) in task_counts.iter_mut() {
                    *count += task_facets(*task, &entity, sites);
                }
            }

            if entities % interval == 0 {
                info!("Processed {} entities of {}", entities, dump);
            }
        }
        Ok((entities, task_counts))
    }

    fn list_sites(&self, dump: &DumpHandle, sites: Option<&SiteMetadata>) -> BackendResult<u64> {
        let owned;
        let sites = match sites {
            Some(sites) => sites,
            None => {
                owned = self.read_site_table(&dump.path)?;
                &owned
            }
        };
        for site in &sites.sites {
            info!("{}\t{}\t{}\t{}", site.site_key, site.group, site.language, site.url);
        }
        Ok(sites.len() as u64)
    }

    fn read_site_table(&self, path: &Path) -> BackendResult<SiteMetadata> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| BackendError::SiteMetadata {
                message: format!("read {}: {}", path.display(), e),
            })?;
        let sites: Vec<SiteRecord> =
            serde_json::from_str(&content).map_err(|e| BackendError::SiteMetadata {
                message: format!("parse {}: {}", path.display(), e),
            })?;
        Ok(SiteMetadata { sites })
    }
}

impl DumpBackend for LocalDumpController {
    #[instrument(level = "debug", skip(self))]
    fn set_source_override(&self, path: &Path) -> BackendResult<()> {
        if !self.fs.is_dir(path) {
            return Err(BackendError::InvalidSourceDirectory(path.to_path_buf()));
        }
        let mut root = self
            .root
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *root = path.to_path_buf();
        debug!("dump root set to {}", path.display());
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    fn resolve_most_recent(&self, content_type: DumpContentType) -> BackendResult<DumpHandle> {
        for (date_stamp, dir) in self.candidate_dirs(content_type)? {
            if let Some(path) = self.dump_file(&dir, content_type)? {
                debug!("most recent {} dump: {}", content_type, path.display());
                return Ok(DumpHandle {
                    project: self.settings.project.clone(),
                    date_stamp,
                    content_type,
                    path,
                });
            }
            debug!("no dump file in {}, trying older dumps", dir.display());
        }

        if self.settings.offline {
            warn!("Offline mode: only {} is searched for dumps", self.root().display());
        }
        Err(BackendError::DumpNotFound {
            content_type,
            location: self.project_dir(),
        })
    }

    fn retrieve_site_metadata(&self) -> BackendResult<SiteMetadata> {
        let dump = self
            .resolve_most_recent(DumpContentType::Sites)
            .map_err(|e| BackendError::SiteMetadata {
                message: e.to_string(),
            })?;
        let metadata = self.read_site_table(&dump.path)?;
        info!("Loaded {} sites from {}", metadata.len(), dump);
        Ok(metadata)
    }

    fn process(
        &self,
        dump: &DumpHandle,
        tasks: &TaskSubset,
        sites: Option<&SiteMetadata>,
    ) -> BackendResult<ProcessSummary> {
        if is_compressed(&dump.path) {
            return Err(BackendError::UnsupportedFormat(dump.path.clone()));
        }

        if tasks.contains(RdfTask::Sitelinks) && sites.is_none() {
            warn!("No site table: every site link counts as resolved");
        }
        if !tasks.is_empty() {
            debug!("tasks for {}: {}", dump, tasks);
        }

        let started = Instant::now();
        let (entities, task_counts) = match dump.content_type {
            DumpContentType::Sites => (self.list_sites(dump, sites)?, Vec::new()),
            _ => self.process_entities(dump, tasks, sites)?,
        };

        Ok(ProcessSummary {
            dump: dump.to_string(),
            entities,
            task_counts,
            elapsed: started.elapsed(),
        })
    }
}

fn validate_date_stamp(stamp: &str) -> Result<(), DomainError> {
    NaiveDate::parse_from_str(stamp, "%Y%m%d")
        .map(|_| ())
        .map_err(|_| DomainError::InvalidDateStamp(stamp.to_string()))
}

fn is_compressed(path: &Path) -> bool {
    let name = path.to_string_lossy();
    COMPRESSED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Entity documents sit one per line between the enclosing `[` and `]`.
fn is_entity_document(line: &str) -> bool {
    line.trim_start().starts_with('{')
}

fn parse_entity(line: &str) -> serde_json::Result<Value> {
    serde_json::from_str(line.trim().trim_end_matches(','))
}

/// How many facets of `task` one entity contributes.
fn task_facets(task: RdfTask, entity: &Value, sites: Option<&SiteMetadata>) -> u64 {
    let found = match task {
        RdfTask::Items => entity_type(entity) == Some("item"),
        RdfTask::Properties => entity_type(entity) == Some("property"),
        RdfTask::Terms => ["labels", "descriptions", "aliases"]
            .iter()
            .any(|key| has_entries(entity, key)),
        RdfTask::Labels => has_entries(entity, "labels"),
        RdfTask::Descriptions => has_entries(entity, "descriptions"),
        RdfTask::Aliases => has_entries(entity, "aliases"),
        RdfTask::Statements => has_entries(entity, "claims"),
        RdfTask::SimpleStatements => has_unqualified_statement(entity),
        RdfTask::Sitelinks => return resolved_sitelinks(entity, sites),
        RdfTask::Taxonomy => has_claims_for(entity, INSTANCE_OF) || has_claims_for(entity, SUBCLASS_OF),
        RdfTask::InstanceOf => has_claims_for(entity, INSTANCE_OF),
        RdfTask::SubclassOf => has_claims_for(entity, SUBCLASS_OF),
    };
    u64::from(found)
}

const INSTANCE_OF: &str = "P31";
const SUBCLASS_OF: &str = "P279";

fn entity_type(entity: &Value) -> Option<&str> {
    entity.get("type").and_then(Value::as_str)
}

fn has_entries(entity: &Value, key: &str) -> bool {
    match entity.get(key) {
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(list)) => !list.is_empty(),
        _ => false,
    }
}

fn has_claims_for(entity: &Value, property: &str) -> bool {
    entity
        .get("claims")
        .and_then(|claims| claims.get(property))
        .and_then(Value::as_array)
        .is_some_and(|statements| !statements.is_empty())
}

fn has_unqualified_statement(entity: &Value) -> bool {
    let Some(claims) = entity.get("claims").and_then(Value::as_object) else {
        return false;
    };
    claims
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .any(|statement| !has_entries(statement, "qualifiers"))
}

/// Site links whose site is in the site table; all of them without a table.
fn resolved_sitelinks(entity: &Value, sites: Option<&SiteMetadata>) -> u64 {
    let Some(links) = entity.get("sitelinks").and_then(Value::as_object) else {
        return 0;
    };
    links
        .keys()
        .filter(|site_key| sites.map_or(true, |table| table.get(site_key).is_some()))
        .count() as u64
}
