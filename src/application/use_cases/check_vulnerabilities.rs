use crate::ports::outbound::VulnerabilityRepository;
use crate::scan::domain::{DatabaseSource, DependencyNode, VulnerabilityMap};
use crate::scan::services::VulnerabilityMerger;
use crate::shared::Result;
use futures::future::join_all;
use std::sync::Arc;

/// CheckVulnerabilitiesUseCase - queries every selected database and merges the answers
///
/// All repositories run concurrently over the same dependency list. The merge
/// starts only after every query has finished, and a fatal error from any
/// repository fails the whole check.
pub struct CheckVulnerabilitiesUseCase {
    repositories: Vec<Arc<dyn VulnerabilityRepository>>,
}

impl CheckVulnerabilitiesUseCase {
    pub fn new(repositories: Vec<Arc<dyn VulnerabilityRepository>>) -> Self {
        Self { repositories }
    }

    /// Databases queried by this check, in query order
    pub fn sources(&self) -> Vec<DatabaseSource> {
        self.repositories.iter().map(|r| r.source()).collect()
    }

    /// Returns a map holding an entry for every dependency, empty when clean
    pub async fn check(&self, dependencies: &[DependencyNode]) -> Result<VulnerabilityMap> {
        let results = join_all(
            self.repositories
                .iter()
                .map(|repository| repository.fetch_vulnerabilities(dependencies)),
        )
        .await;

        let maps = results.into_iter().collect::<Result<Vec<_>>>()?;
        let mut merged = VulnerabilityMerger::merge_all(&maps);

        for dependency in dependencies {
            merged.entry(dependency.id().to_string()).or_default();
        }

        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::domain::{DependencyType, Registry, SeverityEntry, Vulnerability};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticRepository {
        source: DatabaseSource,
        answer: VulnerabilityMap,
        delay_ms: u64,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StaticRepository {
        fn new(source: DatabaseSource, answer: VulnerabilityMap) -> Self {
            Self {
                source,
                answer,
                delay_ms: 0,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VulnerabilityRepository for StaticRepository {
        fn source(&self) -> DatabaseSource {
            self.source
        }

        async fn fetch_vulnerabilities(
            &self,
            _dependencies: &[DependencyNode],
        ) -> Result<VulnerabilityMap> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            }
            if self.fail {
                anyhow::bail!("{} unavailable", self.source);
            }
            Ok(self.answer.clone())
        }
    }

    fn shared(repository: StaticRepository) -> Arc<dyn VulnerabilityRepository> {
        Arc::new(repository)
    }

    fn lodash() -> DependencyNode {
        DependencyNode::new(Registry::Npm, "lodash", "4.17.20", DependencyType::Direct)
    }

    fn minimist() -> DependencyNode {
        DependencyNode::new(Registry::Npm, "minimist", "1.2.5", DependencyType::Transitive)
    }

    #[tokio::test]
    async fn test_merges_answers_from_both_sources() {
        let mut osv = VulnerabilityMap::new();
        osv.insert(
            lodash().id().to_string(),
            vec![Vulnerability::new("GHSA-35jh-r3h4-6jhm").with_summary("Command injection")],
        );
        let mut github = VulnerabilityMap::new();
        github.insert(
            lodash().id().to_string(),
            vec![Vulnerability::new("GHSA-35jh-r3h4-6jhm")
                .with_severity(SeverityEntry::new("GHSA", "HIGH"))],
        );

        let use_case = CheckVulnerabilitiesUseCase::new(vec![
            shared(StaticRepository::new(DatabaseSource::Osv, osv)),
            shared(StaticRepository::new(DatabaseSource::GitHub, github)),
        ]);

        let merged = use_case.check(&[lodash(), minimist()]).await.unwrap();
        let lodash_vulns = &merged[lodash().id()];
        assert_eq!(lodash_vulns.len(), 1);
        assert_eq!(lodash_vulns[0].summary.as_deref(), Some("Command injection"));
        assert_eq!(lodash_vulns[0].severity[0].score, "HIGH");
        assert!(merged[minimist().id()].is_empty());
    }

    #[tokio::test]
    async fn test_every_dependency_gets_an_entry() {
        let use_case = CheckVulnerabilitiesUseCase::new(vec![shared(StaticRepository::new(
            DatabaseSource::Osv,
            VulnerabilityMap::new(),
        ))]);

        let merged = use_case.check(&[lodash(), minimist()]).await.unwrap();
        assert_eq!(merged.len(), 2);
        assert!(merged.values().all(Vec::is_empty));
    }

    #[tokio::test]
    async fn test_failure_in_one_source_fails_the_check() {
        let mut failing = StaticRepository::new(DatabaseSource::Osv, VulnerabilityMap::new());
        failing.fail = true;
        let healthy = Arc::new(StaticRepository::new(
            DatabaseSource::GitHub,
            VulnerabilityMap::new(),
        ));

        let use_case = CheckVulnerabilitiesUseCase::new(vec![
            shared(failing),
            healthy.clone(),
        ]);

        let result = use_case.check(&[lodash()]).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("osv unavailable"));
        assert_eq!(healthy.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sources_run_concurrently() {
        let mut slow_osv = StaticRepository::new(DatabaseSource::Osv, VulnerabilityMap::new());
        slow_osv.delay_ms = 200;
        let mut slow_github =
            StaticRepository::new(DatabaseSource::GitHub, VulnerabilityMap::new());
        slow_github.delay_ms = 200;

        let use_case =
            CheckVulnerabilitiesUseCase::new(vec![shared(slow_osv), shared(slow_github)]);

        let started = std::time::Instant::now();
        use_case.check(&[lodash()]).await.unwrap();
        assert!(started.elapsed() < Duration::from_millis(380));
    }

    #[test]
    fn test_sources_follow_repository_order() {
        let use_case = CheckVulnerabilitiesUseCase::new(vec![
            shared(StaticRepository::new(DatabaseSource::GitHub, VulnerabilityMap::new())),
            shared(StaticRepository::new(DatabaseSource::Osv, VulnerabilityMap::new())),
        ]);
        assert_eq!(
            use_case.sources(),
            vec![DatabaseSource::GitHub, DatabaseSource::Osv]
        );
    }
}
