use crate::adapters::outbound::network::{GitHubAdvisoryClient, OsvClient};
use crate::application::dto::SourceSelection;
use crate::ports::outbound::{ProgressReporter, VulnerabilityRepository};
use crate::scan::domain::DatabaseSource;
use crate::shared::Result;
use std::sync::Arc;

/// Endpoint overrides for the query clients; `None` keeps the public API
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceEndpoints {
    pub osv: Option<String>,
    pub github: Option<String>,
}

/// Factory for the vulnerability database clients a scan needs
///
/// Every client shares the same diagnostics sink so concurrent queries
/// report through one place.
pub struct VulnerabilitySourceFactory;

impl VulnerabilitySourceFactory {
    pub fn create(
        selection: SourceSelection,
        github_token: Option<String>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Vec<Arc<dyn VulnerabilityRepository>>> {
        Self::create_with_endpoints(
            selection,
            github_token,
            reporter,
            &SourceEndpoints::default(),
        )
    }

    pub fn create_with_endpoints(
        selection: SourceSelection,
        github_token: Option<String>,
        reporter: Arc<dyn ProgressReporter>,
        endpoints: &SourceEndpoints,
    ) -> Result<Vec<Arc<dyn VulnerabilityRepository>>> {
        let mut repositories: Vec<Arc<dyn VulnerabilityRepository>> = Vec::new();

        for source in selection.sources() {
            let repository: Arc<dyn VulnerabilityRepository> = match source {
                DatabaseSource::Osv => Arc::new(match &endpoints.osv {
                    Some(url) => OsvClient::with_api_url(url.as_str(), reporter.clone())?,
                    None => OsvClient::new(reporter.clone())?,
                }),
                DatabaseSource::GitHub => Arc::new(match &endpoints.github {
                    Some(url) => GitHubAdvisoryClient::with_api_url(
                        url.as_str(),
                        github_token.clone(),
                        reporter.clone(),
                    )?,
                    None => GitHubAdvisoryClient::new(github_token.clone(), reporter.clone())?,
                }),
            };
            repositories.push(repository);
        }

        Ok(repositories)
    }
}
