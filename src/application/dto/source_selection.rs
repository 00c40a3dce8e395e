use crate::scan::domain::DatabaseSource;
use serde::Deserialize;

/// Which vulnerability databases a scan queries
///
/// Shared by the CLI (`--source`), the config file (`source:`) and the
/// factory that builds the query clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceSelection {
    /// OSV batch query only
    Osv,
    /// GitHub advisory database only
    GitHub,
    /// Both databases, merged (default)
    #[default]
    All,
}

impl SourceSelection {
    pub fn sources(&self) -> Vec<DatabaseSource> {
        match self {
            SourceSelection::Osv => vec![DatabaseSource::Osv],
            SourceSelection::GitHub => vec![DatabaseSource::GitHub],
            SourceSelection::All => vec![DatabaseSource::Osv, DatabaseSource::GitHub],
        }
    }
}

impl std::str::FromStr for SourceSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "osv" => Ok(SourceSelection::Osv),
            "github" | "ghsa" => Ok(SourceSelection::GitHub),
            "all" => Ok(SourceSelection::All),
            _ => Err(format!(
                "Invalid source: {}. Please specify 'osv', 'github' or 'all'",
                s
            )),
        }
    }
}

impl std::fmt::Display for SourceSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceSelection::Osv => write!(f, "osv"),
            SourceSelection::GitHub => write!(f, "github"),
            SourceSelection::All => write!(f, "all"),
        }
    }
}
