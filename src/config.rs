//! Configuration file support for lockscan.
//!
//! A `lockscan.config.yml` next to the scanned lockfile (or passed with
//! `--config`) supplies defaults for the command-line flags.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::application::dto::SourceSelection;
use crate::ports::outbound::ProgressReporter;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "lockscan.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub source: Option<SourceSelection>,
    pub ignore_file: Option<PathBuf>,
    pub ignore: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    /// Alternative OSV batch endpoint (mirrors, tests)
    pub osv_api_url: Option<String>,
    /// Alternative GitHub GraphQL endpoint (GitHub Enterprise, tests)
    pub github_api_url: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    /// Anchors relative file paths at the directory holding the config file
    fn resolve_paths(mut self, base_dir: &Path) -> Self {
        let anchor = |path: PathBuf| {
            if path.is_relative() {
                base_dir.join(path)
            } else {
                path
            }
        };
        self.ignore_file = self.ignore_file.map(anchor);
        self.output = self.output.map(anchor);
        self
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path, reporter: &dyn ProgressReporter) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = if content.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml_ng::from_str(&content).with_context(|| {
            format!(
                "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML and that 'source' is one of osv, github or all.",
                path.display()
            )
        })?
    };

    validate_config(&config)?;
    for key in config.unknown_fields.keys() {
        reporter.report_error(&format!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        ));
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base_dir))
}

/// Auto-discover config next to the scan target. Returns `None` silently if not found.
///
/// A directory target is searched directly; a file target is searched in
/// its parent directory.
pub fn discover_config(target: &Path, reporter: &dyn ProgressReporter) -> Result<Option<ConfigFile>> {
    let dir = if target.is_dir() {
        target
    } else {
        target.parent().unwrap_or_else(|| Path::new(""))
    };
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.is_file() {
        return Ok(None);
    }

    reporter.report(&format!("⚙️  Using config file: {}", config_path.display()));
    load_config_from_path(&config_path, reporter).map(Some)
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref ids) = config.ignore {
        for (i, id) in ids.iter().enumerate() {
            if id.trim().is_empty() {
                bail!(
                    "Invalid config: ignore[{}] must not be empty.\n\n\
                     💡 Hint: Each ignore entry is an advisory id (e.g., \"GHSA-xxxx-xxxx-xxxx\" or \"CVE-2024-1234\").",
                    i
                );
            }
        }
    }
    Ok(())
}
