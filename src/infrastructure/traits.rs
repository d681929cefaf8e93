//! I/O boundary traits for testability
//!
//! These traits abstract the dump processor, the filesystem, the logging
//! configuration and the usage output, allowing the dispatcher to be tested
//! with mock implementations.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::domain::{DumpContentType, DumpHandle, ProcessSummary, SiteMetadata, TaskSubset, Threshold};
use crate::infrastructure::BackendResult;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Open a file for buffered, line-oriented reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>>;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// List the immediate children of a directory, sorted by name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// The dump processor driven by the dispatcher.
///
/// Every call blocks until it has a result; timeouts and cancellation are
/// the implementation's concern.
pub trait DumpBackend: Send + Sync {
    /// Restrict dump discovery to a local directory.
    fn set_source_override(&self, path: &Path) -> BackendResult<()>;

    /// Locate the most recent dump of the given content type.
    fn resolve_most_recent(&self, content_type: DumpContentType) -> BackendResult<DumpHandle>;

    /// Retrieve the site table used to cross-reference site links.
    fn retrieve_site_metadata(&self) -> BackendResult<SiteMetadata>;

    /// Process a resolved dump.
    fn process(
        &self,
        dump: &DumpHandle,
        tasks: &TaskSubset,
        sites: Option<&SiteMetadata>,
    ) -> BackendResult<ProcessSummary>;
}

/// Process-wide log thresholds, one per sink.
pub trait LogConfigurator: Send + Sync {
    /// Threshold of the interactive (stdout) sink.
    fn set_console_threshold(&self, threshold: Threshold);

    /// Threshold of the error (stderr) sink.
    fn set_error_threshold(&self, threshold: Threshold);
}

/// Displays the usage/help text.
pub trait UsageReporter: Send + Sync {
    fn print_usage(&self);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        use walkdir::WalkDir;

        let mut children = Vec::new();
        for entry in WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            children.push(entry.into_path());
        }
        Ok(children)
    }
}
