use crate::scan::domain::{DatabaseSource, DependencyNode, VulnerabilityMap};
use crate::shared::Result;
use async_trait::async_trait;

/// VulnerabilityRepository port for querying an advisory database
///
/// On success every input node id is a key of the returned map, possibly
/// with an empty list. Implementations decide their own failure policy:
/// an error aborts the scan, while a degraded answer is reported through
/// the diagnostics sink and returned as empty lists.
#[async_trait]
pub trait VulnerabilityRepository: Send + Sync {
    /// Which database this repository talks to
    fn source(&self) -> DatabaseSource;

    /// Looks up vulnerabilities for every dependency
    async fn fetch_vulnerabilities(&self, dependencies: &[DependencyNode])
        -> Result<VulnerabilityMap>;
}
