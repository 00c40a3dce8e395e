use crate::application::dto::{ScanRequest, ScanResponse};
use crate::application::use_cases::CheckVulnerabilitiesUseCase;
use crate::ports::outbound::{IgnoreListReader, LockfileReader, ProgressReporter};
use crate::scan::domain::{
    DependencyGraph, DependencyNode, ReportMetadata, ReportSummary, VulnerabilityMap,
};
use crate::scan::parsers::{parse_lockfile, LockfileFormat};
use crate::scan::services::{GraphTraversal, IgnoreFilter, ReportBuilder};
use crate::shared::Result;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

/// ScanDependenciesUseCase - Core use case for a lockfile scan
///
/// Orchestrates locate → parse → traverse → query → filter → report using
/// generic dependency injection for the file system and diagnostics ports.
/// The vulnerability databases are reached through the injected
/// [`CheckVulnerabilitiesUseCase`].
///
/// # Type Parameters
/// * `LR` - LockfileReader implementation
/// * `IR` - IgnoreListReader implementation
/// * `PR` - ProgressReporter implementation
pub struct ScanDependenciesUseCase<LR, IR, PR> {
    lockfile_reader: LR,
    ignore_list_reader: IR,
    progress_reporter: PR,
    vulnerability_checker: CheckVulnerabilitiesUseCase,
}

impl<LR, IR, PR> ScanDependenciesUseCase<LR, IR, PR>
where
    LR: LockfileReader,
    IR: IgnoreListReader,
    PR: ProgressReporter,
{
    pub fn new(
        lockfile_reader: LR,
        ignore_list_reader: IR,
        progress_reporter: PR,
        vulnerability_checker: CheckVulnerabilitiesUseCase,
    ) -> Self {
        Self {
            lockfile_reader,
            ignore_list_reader,
            progress_reporter,
            vulnerability_checker,
        }
    }

    /// Executes the scan
    ///
    /// The suppression list is loaded before any network query so a bad
    /// ignore file fails fast.
    pub async fn execute(&self, request: ScanRequest) -> Result<ScanResponse> {
        let started = Instant::now();

        // Step 1: Resolve, read and parse the lockfile
        let lockfile_path = self.lockfile_reader.locate_lockfile(&request.target)?;
        let graph = self.load_graph(&lockfile_path)?;

        // Step 2: Collect suppressions
        let suppressed = self.load_suppressions(&request)?;

        // Step 3: Walk the graph from its roots
        let dependencies = GraphTraversal::reachable(&graph);
        self.report_traversal(&graph, &dependencies);

        // Step 4: Query the databases
        let vulnerabilities = self.query_databases(&dependencies).await?;

        // Step 5: Drop suppressed advisories
        let outcome = IgnoreFilter::filter(&vulnerabilities, &suppressed);
        if outcome.removed_count > 0 {
            self.progress_reporter.report(&format!(
                "🔕 Suppressed {} advisory match(es): {}",
                outcome.removed_count,
                outcome.removed_ids.join(", ")
            ));
        }

        // Step 6: Build the report
        let metadata = ReportMetadata {
            scan_id: Uuid::new_v4().to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            scanned_file: lockfile_path.display().to_string(),
            sources: self.vulnerability_checker.sources(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: started.elapsed().as_millis() as u64,
            suppressed_count: outcome.removed_count,
            suppressed_ids: outcome.removed_ids.clone(),
        };
        let report = ReportBuilder::build(&dependencies, &outcome.vulnerabilities, metadata);

        self.report_summary(&report.summary);

        Ok(ScanResponse::new(report, lockfile_path))
    }

    fn load_graph(&self, lockfile_path: &Path) -> Result<DependencyGraph> {
        let format = LockfileFormat::from_path(lockfile_path)?;
        self.progress_reporter.report(&format!(
            "📖 Loading {} from: {}",
            format,
            lockfile_path.display()
        ));

        let content = self.lockfile_reader.read_lockfile(lockfile_path)?;
        let graph = parse_lockfile(lockfile_path, &content, &self.progress_reporter)?;

        self.progress_reporter.report(&format!(
            "✅ Detected {} package(s), {} entry point(s)",
            graph.node_count(),
            graph.root_count()
        ));
        Ok(graph)
    }

    /// Request ids plus the ids listed in the ignore file, if any
    fn load_suppressions(&self, request: &ScanRequest) -> Result<BTreeSet<String>> {
        let mut suppressed: BTreeSet<String> = request
            .ignore_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect();

        if let Some(ignore_file) = &request.ignore_file {
            let listed = self.ignore_list_reader.read_ignore_list(ignore_file)?;
            self.progress_reporter.report(&format!(
                "📋 Loaded {} suppressed id(s) from {}",
                listed.len(),
                ignore_file.display()
            ));
            suppressed.extend(listed);
        }

        Ok(suppressed)
    }

    fn report_traversal(&self, graph: &DependencyGraph, dependencies: &[DependencyNode]) {
        let unreachable = graph.node_count().saturating_sub(dependencies.len());
        if unreachable > 0 {
            self.progress_reporter.report(&format!(
                "   {} package(s) not reachable from any entry point were skipped",
                unreachable
            ));
        }
    }

    async fn query_databases(
        &self,
        dependencies: &[DependencyNode],
    ) -> Result<VulnerabilityMap> {
        let sources: Vec<String> = self
            .vulnerability_checker
            .sources()
            .iter()
            .map(ToString::to_string)
            .collect();
        self.progress_reporter.report(&format!(
            "🔍 Checking {} dependencies against: {}",
            dependencies.len(),
            sources.join(", ")
        ));

        self.vulnerability_checker.check(dependencies).await
    }

    fn report_summary(&self, summary: &ReportSummary) {
        if summary.vulnerable > 0 {
            self.progress_reporter.report_error(&format!(
                "⚠️  {} of {} dependencies ({}%) have known vulnerabilities",
                summary.vulnerable, summary.total, summary.vulnerable_percentage
            ));
        } else {
            self.progress_reporter.report_completion(&format!(
                "No known vulnerabilities in {} dependencies",
                summary.total
            ));
        }
    }
}
