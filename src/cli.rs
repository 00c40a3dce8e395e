use clap::Parser;
use std::path::PathBuf;

use crate::application::dto::{ScanRequest, SourceSelection};
use crate::application::factories::SourceEndpoints;
use crate::config::ConfigFile;

/// Scan npm and Python lockfiles for known vulnerabilities
#[derive(Parser, Debug)]
#[command(name = "lockscan")]
#[command(version)]
#[command(
    about = "Scan npm and Python lockfiles for known vulnerabilities (OSV + GitHub Advisory Database)",
    long_about = None
)]
pub struct Args {
    /// Lockfile or project directory to scan
    #[arg(default_value = ".")]
    pub target: PathBuf,

    /// Vulnerability database: osv, github or all [default: all]
    #[arg(short, long, value_name = "SOURCE")]
    pub source: Option<SourceSelection>,

    /// File listing advisory ids to suppress, one per line
    #[arg(long, value_name = "PATH")]
    pub ignore_file: Option<PathBuf>,

    /// Suppress an advisory id (GHSA, CVE, ...)
    /// Can be specified multiple times: --ignore GHSA-xxxx --ignore CVE-2024-1234
    #[arg(short, long = "ignore", value_name = "ID")]
    pub ignore: Vec<String>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file (defaults to lockscan.config.yml next to the target)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Settings after command-line flags and the config file are merged
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    pub target: PathBuf,
    pub source: SourceSelection,
    pub ignore_ids: Vec<String>,
    pub ignore_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub endpoints: SourceEndpoints,
}

impl Args {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Merges with the config file; a flag given on the command line wins
    ///
    /// Ignore ids from both places apply.
    pub fn into_options(self, config: Option<ConfigFile>) -> ScanOptions {
        let config = config.unwrap_or_default();

        let mut ignore_ids = config.ignore.unwrap_or_default();
        for id in self.ignore {
            if !ignore_ids.contains(&id) {
                ignore_ids.push(id);
            }
        }

        ScanOptions {
            target: self.target,
            source: self.source.or(config.source).unwrap_or_default(),
            ignore_ids,
            ignore_file: self.ignore_file.or(config.ignore_file),
            output: self.output.or(config.output),
            endpoints: SourceEndpoints {
                osv: config.osv_api_url,
                github: config.github_api_url,
            },
        }
    }
}

impl ScanOptions {
    pub fn to_request(&self, github_token: Option<String>) -> ScanRequest {
        ScanRequest::new(self.target.clone(), self.source)
            .with_ignore_ids(self.ignore_ids.iter().cloned())
            .with_ignore_file(self.ignore_file.clone())
            .with_github_token(github_token)
    }
}
