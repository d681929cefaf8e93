//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/wdtk-client/config.toml`
//! 3. Explicit config file: `--config <FILE>`
//! 4. Environment variables: `WDTK_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};

/// Unified configuration for the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory searched for dumps unless `--dumps` is given
    pub dump_dir: PathBuf,
    /// Project whose dumps are processed
    pub project: String,
    /// Log progress every this many entities
    pub progress_interval: u64,
    /// Never look for dumps outside the local dump directory
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dump_dir: PathBuf::from("dumpfiles"),
            project: "wikidatawiki".to_string(),
            progress_interval: 100_000,
            offline: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub dump_dir: Option<PathBuf>,
    pub project: Option<String>,
    pub progress_interval: Option<u64>,
    pub offline: Option<bool>,
}

/// Get the XDG config directory for the client.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("org", "wikidata", "wdtk-client").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.dump_dir.to_string_lossy().as_ref());
        self.dump_dir = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            dump_dir: overlay
                .dump_dir
                .clone()
                .unwrap_or_else(|| self.dump_dir.clone()),
            project: overlay
                .project
                .clone()
                .unwrap_or_else(|| self.project.clone()),
            progress_interval: overlay.progress_interval.unwrap_or(self.progress_interval),
            offline: overlay.offline.unwrap_or(self.offline),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current, env_source())?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply WDTK_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, env: Environment) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(env)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("dump_dir") {
            settings.dump_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("project") {
            settings.project = val;
        }
        if let Ok(val) = config.get_int("progress_interval") {
            settings.progress_interval = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("progress_interval must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_bool("offline") {
            settings.offline = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# wdtk-client configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/wdtk-client/config.toml
#   Explicit: --config <FILE>
#   Env:      WDTK_* environment variables (e.g. WDTK_DUMP_DIR)

# Directory searched for dumps: <dump_dir>/<project>/<type>-<YYYYMMDD>/
# dump_dir = "dumpfiles"

# Project whose dumps are processed
# project = "wikidatawiki"

# Log progress every N entities
# progress_interval = 100000

# Only use dumps that are already available locally
# offline = false
"#
        .to_string()
    }
}

/// `WDTK_DUMP_DIR` sets `dump_dir`; nested keys would use `__`.
fn env_source() -> Environment {
    Environment::with_prefix("WDTK")
        .prefix_separator("_")
        .separator("__")
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
