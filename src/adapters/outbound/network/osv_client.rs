use crate::ports::outbound::{ProgressReporter, VulnerabilityRepository};
use crate::scan::domain::{
    DatabaseSource, DependencyNode, Reference, SeverityEntry, Vulnerability, VulnerabilityMap,
};
use crate::shared::error::ScanError;
use crate::shared::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

/// OSV API client for fetching vulnerability data
///
/// Uses the OSV.dev batch query API: every distinct
/// `(ecosystem, name, version)` coordinate goes into one request and the
/// positional answers are fanned back out to the dependencies that share it.
///
/// The batch endpoint only returns advisory ids, so each distinct id is then
/// fetched from `/v1/vulns/{id}` for its summary, severity, references and
/// fixed version.
///
/// # Failure policy
/// - Any transport failure or non-success status aborts the scan, for the
///   batch call and for every detail lookup
/// - A batch answer whose length differs from the query count aborts the scan
/// - A result whose `vulns` is null or absent means "no advisories"
/// - Timeout is 30 seconds; no retries
pub struct OsvClient {
    client: Client,
    api_url: String,
    vulns_url: String,
    reporter: Arc<dyn ProgressReporter>,
}

impl OsvClient {
    const API_ENDPOINT: &'static str = "https://api.osv.dev/v1/querybatch";
    const TIMEOUT_SECONDS: u64 = 30;
    const DETAIL_CONCURRENCY: usize = 8;

    /// Creates a client for the public OSV endpoint
    pub fn new(reporter: Arc<dyn ProgressReporter>) -> Result<Self> {
        Self::with_api_url(Self::API_ENDPOINT, reporter)
    }

    /// Creates a client for a custom batch endpoint (mirrors, tests)
    ///
    /// Advisory details are read from the sibling `vulns` path, e.g.
    /// `http://mirror/v1/querybatch` pairs with `http://mirror/v1/vulns/{id}`.
    pub fn with_api_url(
        api_url: impl Into<String>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Self> {
        let user_agent = format!("lockscan/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        let api_url = api_url.into();
        Ok(Self {
            client,
            vulns_url: vulns_endpoint(&api_url),
            api_url,
            reporter,
        })
    }

    async fn fetch_batch(&self, queries: Vec<OsvQuery<'_>>) -> Result<Vec<OsvResult>> {
        let expected = queries.len();
        let response = self
            .client
            .post(&self.api_url)
            .json(&OsvBatchQuery { queries })
            .send()
            .await
            .map_err(|e| api_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(format!("status {}: {}", status, body.trim())).into());
        }

        let batch: OsvBatchResponse = response
            .json()
            .await
            .map_err(|e| api_error(format!("invalid response body: {}", e)))?;

        // Answers are matched to queries by position only
        if batch.results.len() != expected {
            return Err(api_error(format!(
                "expected {} results, got {}",
                expected,
                batch.results.len()
            ))
            .into());
        }
        Ok(batch.results)
    }

    /// Fetches the full record of one advisory
    async fn fetch_vulnerability_details(&self, vuln_id: &str) -> Result<Vulnerability> {
        let url = format!("{}/{}", self.vulns_url, vuln_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| api_error(format!("{}: {}", vuln_id, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(format!("status {} for {}", status, vuln_id)).into());
        }

        let vuln: OsvVulnerability = response
            .json()
            .await
            .map_err(|e| api_error(format!("invalid record for {}: {}", vuln_id, e)))?;
        Ok(vuln.into_domain())
    }

    /// Hydrates each distinct advisory id once, a few requests at a time
    async fn fetch_details(&self, ids: &[&str]) -> Result<HashMap<String, Vulnerability>> {
        let total = ids.len();
        let mut details = HashMap::with_capacity(total);
        if total == 0 {
            return Ok(details);
        }

        self.reporter.report(&format!(
            "📥 Fetching details for {} OSV advisor{}...",
            total,
            if total == 1 { "y" } else { "ies" }
        ));

        // Futures are built up front (they stay lazy) so the stream holds no
        // closure type, which trips rustc's higher-ranked Send check
        let requests: Vec<_> = ids
            .iter()
            .copied()
            .map(|id| async move { (id, self.fetch_vulnerability_details(id).await) })
            .collect();
        let mut pending = pin!(stream::iter(requests).buffered(Self::DETAIL_CONCURRENCY));

        while let Some((id, result)) = pending.next().await {
            details.insert(id.to_string(), result?);
            self.reporter
                .report_progress(details.len(), total, Some("OSV advisory details"));
        }

        Ok(details)
    }
}

/// `.../querybatch` becomes `.../vulns`; any other URL gets `/vulns` appended
fn vulns_endpoint(batch_url: &str) -> String {
    let base = batch_url.trim_end_matches('/');
    match base.strip_suffix("/querybatch") {
        Some(prefix) => format!("{}/vulns", prefix),
        None => format!("{}/vulns", base),
    }
}

fn api_error(details: String) -> ScanError {
    ScanError::VulnerabilityApiError {
        source_name: DatabaseSource::Osv.to_string(),
        details,
    }
}

#[async_trait]
impl VulnerabilityRepository for OsvClient {
    fn source(&self) -> DatabaseSource {
        DatabaseSource::Osv
    }

    async fn fetch_vulnerabilities(
        &self,
        dependencies: &[DependencyNode],
    ) -> Result<VulnerabilityMap> {
        let mut results = VulnerabilityMap::new();
        if dependencies.is_empty() {
            return Ok(results);
        }

        // Distinct node ids can share a coordinate, e.g. a range pin and an exact pin
        let mut coordinate_index: HashMap<(&str, &str, &str), usize> = HashMap::new();
        let mut queries: Vec<OsvQuery> = Vec::new();
        let mut slots: Vec<usize> = Vec::with_capacity(dependencies.len());

        for dep in dependencies {
            let key = (
                dep.registry().osv_ecosystem(),
                dep.name(),
                dep.version(),
            );
            let slot = *coordinate_index.entry(key).or_insert_with(|| {
                queries.push(OsvQuery {
                    package: OsvPackage {
                        ecosystem: key.0,
                        name: key.1,
                    },
                    version: key.2,
                });
                queries.len() - 1
            });
            slots.push(slot);
        }

        self.reporter.report(&format!(
            "🔍 Querying OSV for {} package(s)...",
            queries.len()
        ));

        let answers: Vec<Vec<String>> = self
            .fetch_batch(queries)
            .await?
            .into_iter()
            .map(|result| {
                result
                    .vulns
                    .unwrap_or_default()
                    .into_iter()
                    .map(|vuln| vuln.id)
                    .collect()
            })
            .collect();

        let mut seen = HashSet::new();
        let distinct_ids: Vec<&str> = answers
            .iter()
            .flatten()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect();
        let details = self.fetch_details(&distinct_ids).await?;

        for (dep, slot) in dependencies.iter().zip(slots) {
            let vulnerabilities = answers[slot]
                .iter()
                .filter_map(|id| details.get(id).cloned())
                .collect();
            results.insert(dep.id().to_string(), vulnerabilities);
        }

        let affected = results.values().filter(|v| !v.is_empty()).count();
        self.reporter.report_completion(&format!(
            "✅ OSV: {} of {} package(s) have known vulnerabilities",
            affected,
            results.len()
        ));

        Ok(results)
    }
}

// OSV API request/response structures

#[derive(Debug, Serialize)]
struct OsvBatchQuery<'a> {
    queries: Vec<OsvQuery<'a>>,
}

#[derive(Debug, Serialize)]
struct OsvQuery<'a> {
    package: OsvPackage<'a>,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct OsvPackage<'a> {
    ecosystem: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct OsvBatchResponse {
    #[serde(default)]
    results: Vec<OsvResult>,
}

#[derive(Debug, Deserialize)]
struct OsvResult {
    #[serde(default)]
    vulns: Option<Vec<OsvVulnerabilityId>>,
}

/// Batch answers carry only `id` and `modified`
#[derive(Debug, Deserialize)]
struct OsvVulnerabilityId {
    id: String,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
    #[serde(default)]
    severity: Vec<OsvSeverity>,
    #[serde(default)]
    references: Vec<OsvReference>,
    #[serde(default)]
    database_specific: Option<DatabaseSpecific>,
    #[serde(default)]
    affected: Vec<OsvAffected>,
}

#[derive(Debug, Deserialize)]
struct OsvSeverity {
    #[serde(rename = "type")]
    severity_type: String, // "CVSS_V3", "CVSS_V4"
    score: String,
}

#[derive(Debug, Deserialize)]
struct OsvReference {
    #[serde(rename = "type", default)]
    reference_type: Option<String>,
    url: String,
}

#[derive(Debug, Deserialize)]
struct DatabaseSpecific {
    #[serde(default)]
    severity: Option<String>, // "CRITICAL", "HIGH", "MODERATE", "LOW"
}

#[derive(Debug, Deserialize)]
struct OsvAffected {
    #[serde(default)]
    ranges: Vec<OsvRange>,
}

#[derive(Debug, Deserialize)]
struct OsvRange {
    #[serde(default)]
    events: Vec<OsvEvent>,
}

#[derive(Debug, Deserialize)]
struct OsvEvent {
    #[serde(default)]
    fixed: Option<String>,
}

impl OsvVulnerability {
    /// Converts to the domain model
    ///
    /// The `database_specific` label goes first so severity ranking sees a
    /// named level rather than a CVSS vector.
    fn into_domain(self) -> Vulnerability {
        let fixed_in = self
            .affected
            .iter()
            .flat_map(|a| &a.ranges)
            .flat_map(|r| &r.events)
            .find_map(|e| e.fixed.clone());

        let mut vulnerability = Vulnerability::new(self.id).with_aliases(self.aliases);
        if let Some(summary) = self.summary.filter(|s| !s.trim().is_empty()) {
            vulnerability = vulnerability.with_summary(summary);
        }
        if let Some(label) = self.database_specific.and_then(|db| db.severity) {
            vulnerability = vulnerability.with_severity(SeverityEntry::new("DATABASE_SPECIFIC", label));
        }
        for severity in self.severity {
            vulnerability =
                vulnerability.with_severity(SeverityEntry::new(severity.severity_type, severity.score));
        }
        for reference in self.references {
            vulnerability.add_reference(Reference::new(
                reference.reference_type.unwrap_or_else(|| "WEB".to_string()),
                reference.url,
            ));
        }
        if let Some(version) = fixed_in {
            vulnerability = vulnerability.with_fixed_in(version);
        }
        vulnerability
    }
}
