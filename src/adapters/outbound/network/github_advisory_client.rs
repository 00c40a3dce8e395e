use crate::ports::outbound::{ProgressReporter, VulnerabilityRepository};
use crate::scan::domain::{
    DatabaseSource, DependencyNode, Reference, Registry, SeverityEntry, Vulnerability,
    VulnerabilityMap,
};
use crate::scan::services::VersionMatcher;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

/// Client for the GitHub Advisory Database (GraphQL API)
///
/// Distinct package names are queried in batches; each batch is one GraphQL
/// document holding an aliased `securityVulnerabilities` sub-query per
/// name. Version applicability is decided locally with [`VersionMatcher`].
///
/// # Failure policy
/// - Without a token no request is made and every dependency gets an empty list
/// - A failed batch (transport error, error status, GraphQL errors without
///   data) is reported as a warning and only its packages come back empty
pub struct GitHubAdvisoryClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    reporter: Arc<dyn ProgressReporter>,
}

impl GitHubAdvisoryClient {
    const API_ENDPOINT: &'static str = "https://api.github.com/graphql";
    const TIMEOUT_SECONDS: u64 = 30;
    /// Names per GraphQL document, keeps query complexity under GitHub's limit
    pub const BATCH_SIZE: usize = 20;
    /// Advisory nodes requested per package
    const NODES_PER_PACKAGE: usize = 100;

    pub fn new(token: Option<String>, reporter: Arc<dyn ProgressReporter>) -> Result<Self> {
        Self::with_api_url(Self::API_ENDPOINT, token, reporter)
    }

    pub fn with_api_url(
        api_url: impl Into<String>,
        token: Option<String>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(format!("lockscan/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.into(),
            token: token.filter(|t| !t.trim().is_empty()),
            reporter,
        })
    }

    async fn fetch_batch(
        &self,
        token: &str,
        registry: Registry,
        batch: &[(String, &str)],
    ) -> Result<HashMap<String, Option<VulnerabilityConnection>>> {
        let request = GraphQLRequest {
            query: build_query(registry, batch),
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", token))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub GraphQL API returned {}: {}", status, body.trim());
        }

        let body: GraphQLResponse = response.json().await?;
        match (body.data, body.errors) {
            (Some(data), errors) => {
                if let Some(errors) = errors.filter(|e| !e.is_empty()) {
                    self.reporter.report_error(&format!(
                        "⚠️  GitHub GraphQL returned partial data: {}",
                        join_messages(&errors)
                    ));
                }
                Ok(data)
            }
            (None, Some(errors)) => {
                anyhow::bail!("GitHub GraphQL errors: {}", join_messages(&errors))
            }
            (None, None) => anyhow::bail!("GitHub GraphQL response carried no data"),
        }
    }
}

#[async_trait]
impl VulnerabilityRepository for GitHubAdvisoryClient {
    fn source(&self) -> DatabaseSource {
        DatabaseSource::GitHub
    }

    async fn fetch_vulnerabilities(
        &self,
        dependencies: &[DependencyNode],
    ) -> Result<VulnerabilityMap> {
        let mut results: VulnerabilityMap = dependencies
            .iter()
            .map(|dep| (dep.id().to_string(), Vec::new()))
            .collect();

        let Some(token) = self.token.as_deref() else {
            self.reporter.report(
                "ℹ️  GITHUB_TOKEN is not set; skipping the GitHub Advisory Database",
            );
            return Ok(results);
        };

        let mut by_registry: BTreeMap<Registry, Vec<&DependencyNode>> = BTreeMap::new();
        for dep in dependencies {
            by_registry.entry(dep.registry()).or_default().push(dep);
        }

        // Alias numbering runs across every batch and registry of the scan
        let mut next_alias = 0usize;

        for (registry, members) in by_registry {
            let mut names: Vec<&str> = Vec::new();
            for dep in &members {
                if !names.contains(&dep.name()) {
                    names.push(dep.name());
                }
            }

            let batch_count = names.len().div_ceil(Self::BATCH_SIZE);
            let mut advisories: HashMap<&str, Vec<VulnerabilityNode>> = HashMap::new();

            for (batch_number, chunk) in names.chunks(Self::BATCH_SIZE).enumerate() {
                let batch: Vec<(String, &str)> = chunk
                    .iter()
                    .map(|name| {
                        let alias = query_alias(next_alias, name);
                        next_alias += 1;
                        (alias, *name)
                    })
                    .collect();

                self.reporter.report_progress(
                    batch_number + 1,
                    batch_count,
                    Some(&format!("GitHub advisories ({})", registry)),
                );

                match self.fetch_batch(token, registry, &batch).await {
                    Ok(mut data) => {
                        for (alias, name) in &batch {
                            let Some(Some(connection)) = data.remove(alias) else {
                                continue;
                            };
                            if connection.has_next_page() {
                                self.reporter.report_error(&format!(
                                    "⚠️  {} has more than {} GitHub advisories; only the first {} were checked",
                                    name,
                                    Self::NODES_PER_PACKAGE,
                                    Self::NODES_PER_PACKAGE
                                ));
                            }
                            advisories.entry(*name).or_default().extend(connection.nodes);
                        }
                    }
                    Err(e) => self.reporter.report_error(&format!(
                        "⚠️  GitHub advisory batch {}/{} ({}) failed, {} package(s) left unchecked: {}",
                        batch_number + 1,
                        batch_count,
                        registry,
                        batch.len(),
                        e
                    )),
                }
            }

            for dep in members {
                let Some(nodes) = advisories.get(dep.name()) else {
                    continue;
                };
                results.insert(dep.id().to_string(), matching_advisories(dep, nodes));
            }
        }

        let affected = results.values().filter(|v| !v.is_empty()).count();
        self.reporter.report_completion(&format!(
            "✅ GitHub: {} of {} package(s) have known vulnerabilities",
            affected,
            results.len()
        ));

        Ok(results)
    }
}

/// Builds the GraphQL field alias for the `index`-th package of a scan
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`. The numeric prefix
/// keeps aliases unique even when two names sanitize to the same text.
pub fn query_alias(index: usize, package_name: &str) -> String {
    let sanitized: String = package_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    format!("pkg{}_{}", index, sanitized)
}

fn build_query(registry: Registry, batch: &[(String, &str)]) -> String {
    let mut query = String::from("query {\n");
    for (alias, name) in batch {
        // A JSON string literal is also a valid GraphQL string literal
        let package = serde_json::Value::from(*name).to_string();
        query.push_str(&format!(
            "  {alias}: securityVulnerabilities(ecosystem: {ecosystem}, package: {package}, first: {first}) {{\n    nodes {{\n      advisory {{ ghsaId summary severity identifiers {{ type value }} references {{ url }} }}\n      vulnerableVersionRange\n      firstPatchedVersion {{ identifier }}\n    }}\n    pageInfo {{ hasNextPage }}\n  }}\n",
            alias = alias,
            ecosystem = registry.github_ecosystem(),
            package = package,
            first = GitHubAdvisoryClient::NODES_PER_PACKAGE,
        ));
    }
    query.push('}');
    query
}

/// Advisories whose vulnerable range covers the dependency's version, one per advisory id
fn matching_advisories(dep: &DependencyNode, nodes: &[VulnerabilityNode]) -> Vec<Vulnerability> {
    let mut matched: Vec<Vulnerability> = Vec::new();
    for node in nodes {
        if matched.iter().any(|v| v.id == node.advisory.ghsa_id) {
            continue;
        }
        let Some(range) = node.vulnerable_version_range.as_deref() else {
            continue;
        };
        if VersionMatcher::is_affected(dep.version(), range) {
            matched.push(node.to_domain());
        }
    }
    matched
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

// GitHub GraphQL request/response structures

#[derive(Debug, Serialize)]
struct GraphQLRequest {
    query: String,
}

#[derive(Debug, Deserialize)]
struct GraphQLResponse {
    #[serde(default)]
    data: Option<HashMap<String, Option<VulnerabilityConnection>>>,
    #[serde(default)]
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VulnerabilityConnection {
    #[serde(default)]
    nodes: Vec<VulnerabilityNode>,
    #[serde(default)]
    page_info: Option<PageInfo>,
}

impl VulnerabilityConnection {
    fn has_next_page(&self) -> bool {
        self.page_info.as_ref().is_some_and(|p| p.has_next_page)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    has_next_page: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VulnerabilityNode {
    advisory: Advisory,
    #[serde(default)]
    vulnerable_version_range: Option<String>,
    #[serde(default)]
    first_patched_version: Option<FirstPatchedVersion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Advisory {
    ghsa_id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    identifiers: Vec<Identifier>,
    #[serde(default)]
    references: Vec<AdvisoryReference>,
}

#[derive(Debug, Deserialize)]
struct Identifier {
    #[serde(rename = "type")]
    kind: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct AdvisoryReference {
    url: String,
}

#[derive(Debug, Deserialize)]
struct FirstPatchedVersion {
    identifier: String,
}

impl VulnerabilityNode {
    fn to_domain(&self) -> Vulnerability {
        let advisory = &self.advisory;
        let aliases = advisory
            .identifiers
            .iter()
            .filter(|i| i.kind != "GHSA")
            .map(|i| i.value.clone());

        let mut vulnerability = Vulnerability::new(advisory.ghsa_id.clone()).with_aliases(aliases);
        if let Some(summary) = &advisory.summary {
            vulnerability = vulnerability.with_summary(summary.clone());
        }
        if let Some(severity) = &advisory.severity {
            vulnerability = vulnerability.with_severity(SeverityEntry::new("GHSA", severity.clone()));
        }
        for reference in &advisory.references {
            vulnerability.add_reference(Reference::new("WEB", reference.url.clone()));
        }
        if let Some(patched) = &self.first_patched_version {
            vulnerability = vulnerability.with_fixed_in(patched.identifier.clone());
        }
        vulnerability
    }
}
