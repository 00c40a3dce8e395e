use async_trait::async_trait;
use lockscan::prelude::*;
use lockscan::scan::domain::DatabaseSource;
use std::sync::{Arc, Mutex};

/// Mock VulnerabilityRepository answering from a fixed map
///
/// Records the ids of every dependency it was asked about.
pub struct MockVulnerabilityRepository {
    source: DatabaseSource,
    answers: VulnerabilityMap,
    should_fail: bool,
    pub queried: Mutex<Vec<String>>,
}

impl MockVulnerabilityRepository {
    pub fn new(source: DatabaseSource) -> Self {
        Self {
            source,
            answers: VulnerabilityMap::new(),
            should_fail: false,
            queried: Mutex::new(Vec::new()),
        }
    }

    pub fn with_vulnerability(mut self, dependency_id: &str, vulnerability: Vulnerability) -> Self {
        self.answers
            .entry(dependency_id.to_string())
            .or_default()
            .push(vulnerability);
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn queried_ids(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }
}

#[async_trait]
impl VulnerabilityRepository for MockVulnerabilityRepository {
    fn source(&self) -> DatabaseSource {
        self.source
    }

    async fn fetch_vulnerabilities(
        &self,
        dependencies: &[DependencyNode],
    ) -> Result<VulnerabilityMap> {
        self.queried
            .lock()
            .unwrap()
            .extend(dependencies.iter().map(|d| d.id().to_string()));

        if self.should_fail {
            anyhow::bail!("Mock {} query failure", self.source);
        }

        Ok(dependencies
            .iter()
            .map(|d| {
                let found = self.answers.get(d.id()).cloned().unwrap_or_default();
                (d.id().to_string(), found)
            })
            .collect())
    }
}
