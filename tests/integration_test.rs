/// Integration tests for the application layer
mod test_utilities;

use lockscan::prelude::*;
use lockscan::scan::domain::{DatabaseSource, Reference, SeverityEntry};
use lockscan::shared::error::ExitCode;
use std::path::PathBuf;
use std::sync::Arc;
use test_utilities::mocks::*;

const NPM_LOCK: &str = include_str!("fixtures/npm-project/package-lock.json");
const YARN_LOCK: &str = include_str!("fixtures/yarn-project/yarn.lock");
const POETRY_LOCK: &str = include_str!("fixtures/poetry-project/poetry.lock");
const PIPFILE_LOCK: &str = include_str!("fixtures/pipfile-project/Pipfile.lock");
const REQUIREMENTS_TXT: &str = include_str!("fixtures/requirements-project/requirements.txt");
const HASHED_REQUIREMENTS_TXT: &str =
    include_str!("fixtures/hashed-requirements-project/requirements.txt");
const PACKAGE_JSON: &str = include_str!("fixtures/manifest-project/package.json");

type TestUseCase =
    ScanDependenciesUseCase<MockLockfileReader, MockIgnoreListReader, MockProgressReporter>;

fn build_use_case(
    reader: MockLockfileReader,
    ignore_reader: MockIgnoreListReader,
    reporter: MockProgressReporter,
    repositories: Vec<Arc<dyn VulnerabilityRepository>>,
) -> TestUseCase {
    ScanDependenciesUseCase::new(
        reader,
        ignore_reader,
        reporter,
        CheckVulnerabilitiesUseCase::new(repositories),
    )
}

fn clean_osv() -> Arc<dyn VulnerabilityRepository> {
    MockVulnerabilityRepository::new(DatabaseSource::Osv).shared()
}

fn request() -> ScanRequest {
    ScanRequest::new(PathBuf::from("/project"), SourceSelection::Osv)
}

fn finding_ids(response: &ScanResponse) -> Vec<&str> {
    response
        .report
        .findings
        .iter()
        .map(|f| f.id.as_str())
        .collect()
}

#[tokio::test]
async fn test_npm_lockfile_scan_follows_nested_resolution() {
    let use_case = build_use_case(
        MockLockfileReader::new("package-lock.json", NPM_LOCK),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![clean_osv()],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "npm:express@4.18.2",
            "npm:debug@2.6.9",
            "npm:ms@2.0.0",
            "npm:qs@6.11.0",
            "npm:jest-mock@29.7.0",
            "npm:ms@2.1.3",
        ]
    );
    let summary = &response.report.summary;
    assert_eq!(summary.total, 6);
    assert_eq!(summary.direct, 2);
    assert_eq!(summary.transitive, 4);
    assert_eq!(response.exit_code(), ExitCode::Success);
}

#[tokio::test]
async fn test_yarn_lockfile_scan() {
    let use_case = build_use_case(
        MockLockfileReader::new("yarn.lock", YARN_LOCK),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![clean_osv()],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "npm:express@4.18.2",
            "npm:debug@2.6.9",
            "npm:ms@2.0.0",
            "npm:qs@6.11.0",
            "npm:lodash@4.17.20",
        ]
    );
    assert_eq!(response.report.summary.direct, 2);
}

#[tokio::test]
async fn test_poetry_lockfile_scan_keeps_dev_packages_transitive() {
    let use_case = build_use_case(
        MockLockfileReader::new("poetry.lock", POETRY_LOCK),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![clean_osv()],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "pypi:certifi@2023.11.17",
            "pypi:requests@2.31.0",
            "pypi:urllib3@2.0.7",
            "pypi:pytest@7.4.3",
            "pypi:iniconfig@2.0.0",
        ]
    );
    let pytest = &response.report.findings[3];
    assert_eq!(pytest.dependency_type, DependencyType::Transitive);
    assert_eq!(response.report.summary.direct, 3);
}

#[tokio::test]
async fn test_pipfile_lock_scan_warns_about_vcs_entries() {
    let reporter = MockProgressReporter::new();
    let use_case = build_use_case(
        MockLockfileReader::new("Pipfile.lock", PIPFILE_LOCK),
        MockIgnoreListReader::default(),
        reporter.clone(),
        vec![clean_osv()],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "pypi:django@4.2.7",
            "pypi:sqlparse@0.4.4",
            "pypi:black@23.11.0",
        ]
    );
    assert!(reporter
        .warnings()
        .iter()
        .any(|w| w.contains("internal-lib")));
}

#[tokio::test]
async fn test_requirements_scan_skips_unpinned_lines() {
    let reporter = MockProgressReporter::new();
    let use_case = build_use_case(
        MockLockfileReader::new("requirements.txt", REQUIREMENTS_TXT),
        MockIgnoreListReader::default(),
        reporter.clone(),
        vec![clean_osv()],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "pypi:requests@2.31.0",
            "pypi:flask@3.0.0",
            "pypi:urllib3@>=1.26.0",
        ]
    );
    assert!(response
        .report
        .findings
        .iter()
        .all(|f| f.dependency_type == DependencyType::Direct));
    assert!(reporter.warnings().iter().any(|w| w.contains("numpy")));
}

#[tokio::test]
async fn test_hash_pinned_requirements_keep_exact_versions() {
    let osv = MockVulnerabilityRepository::new(DatabaseSource::Osv)
        .with_vulnerability(
            "pypi:requests@2.31.0",
            Vulnerability::new("GHSA-9wx4-h78v-vm56")
                .with_aliases(vec!["CVE-2024-35195".to_string()]),
        )
        .shared();
    let reporter = MockProgressReporter::new();
    let use_case = build_use_case(
        MockLockfileReader::new("requirements.txt", HASHED_REQUIREMENTS_TXT),
        MockIgnoreListReader::default(),
        reporter.clone(),
        vec![osv.clone() as Arc<dyn VulnerabilityRepository>],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "pypi:certifi@2024.2.2",
            "pypi:idna@3.6",
            "pypi:requests@2.31.0",
            "pypi:urllib3@2.0.7",
        ]
    );
    assert_eq!(osv.queried_ids().len(), 4);
    assert_eq!(response.report.summary.vulnerable, 1);
    assert!(reporter.warnings().is_empty());
}

#[tokio::test]
async fn test_package_json_scan_uses_declared_ranges() {
    let use_case = build_use_case(
        MockLockfileReader::new("package.json", PACKAGE_JSON),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![clean_osv()],
    );

    let response = use_case.execute(request()).await.unwrap();

    assert_eq!(
        finding_ids(&response),
        vec![
            "npm:lodash@^4.17.20",
            "npm:axios@~1.6.0",
            "npm:typescript@^5.3.0",
        ]
    );
    assert_eq!(response.report.summary.direct, 3);
}

#[tokio::test]
async fn test_two_sources_are_merged_per_advisory() {
    let osv = MockVulnerabilityRepository::new(DatabaseSource::Osv)
        .with_vulnerability(
            "npm:qs@6.11.0",
            Vulnerability::new("GHSA-hrpp-h998-j3pp")
                .with_aliases(vec!["CVE-2022-24999".to_string()])
                .with_summary("qs vulnerable to Prototype Pollution")
                .with_reference(Reference::new("ADVISORY", "https://osv.dev/GHSA-hrpp-h998-j3pp")),
        )
        .shared();
    let github = MockVulnerabilityRepository::new(DatabaseSource::GitHub)
        .with_vulnerability(
            "npm:qs@6.11.0",
            Vulnerability::new("GHSA-hrpp-h998-j3pp")
                .with_summary("qs vulnerable to Prototype Pollution in query parsing")
                .with_severity(SeverityEntry::new("GHSA", "HIGH"))
                .with_reference(Reference::new("WEB", "https://github.com/advisories/GHSA-hrpp-h998-j3pp"))
                .with_fixed_in("6.11.1"),
        )
        .with_vulnerability(
            "npm:debug@2.6.9",
            Vulnerability::new("GHSA-gxpj-cx7g-858c")
                .with_severity(SeverityEntry::new("GHSA", "LOW")),
        )
        .shared();

    let use_case = build_use_case(
        MockLockfileReader::new("package-lock.json", NPM_LOCK),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![osv.clone() as Arc<dyn VulnerabilityRepository>, github.clone()],
    );

    let response = use_case
        .execute(ScanRequest::new(PathBuf::from("/project"), SourceSelection::All))
        .await
        .unwrap();
    let report = &response.report;

    let qs = report.findings.iter().find(|f| f.name == "qs").unwrap();
    assert_eq!(qs.vulnerabilities.len(), 1);
    let merged = &qs.vulnerabilities[0];
    assert_eq!(
        merged.summary.as_deref(),
        Some("qs vulnerable to Prototype Pollution in query parsing")
    );
    assert_eq!(merged.severity[0].score, "HIGH");
    assert_eq!(merged.aliases, vec!["CVE-2022-24999"]);
    assert_eq!(merged.references.len(), 2);
    assert_eq!(merged.fixed_in.as_deref(), Some("6.11.1"));

    assert_eq!(report.summary.vulnerable, 2);
    assert_eq!(report.summary.vulnerable_percentage, 33.3);
    assert_eq!(
        report.metadata.sources,
        vec![DatabaseSource::Osv, DatabaseSource::GitHub]
    );
    assert_eq!(response.exit_code(), ExitCode::VulnerabilitiesDetected);

    // both databases saw the same reachable set
    assert_eq!(osv.queried_ids(), github.queried_ids());
    assert_eq!(osv.queried_ids().len(), 6);
}

#[tokio::test]
async fn test_ignore_file_suppresses_by_alias() {
    let osv: Arc<dyn VulnerabilityRepository> = MockVulnerabilityRepository::new(DatabaseSource::Osv)
        .with_vulnerability(
            "npm:qs@6.11.0",
            Vulnerability::new("GHSA-hrpp-h998-j3pp")
                .with_aliases(vec!["CVE-2022-24999".to_string()]),
        )
        .shared();

    let use_case = build_use_case(
        MockLockfileReader::new("package-lock.json", NPM_LOCK),
        MockIgnoreListReader::with_ids(&["CVE-2022-24999"]),
        MockProgressReporter::new(),
        vec![osv],
    );

    let request = request().with_ignore_file(Some(PathBuf::from("/project/.lockscanignore")));
    let response = use_case.execute(request).await.unwrap();

    assert!(!response.report.has_vulnerabilities());
    assert_eq!(response.report.metadata.suppressed_count, 1);
    assert_eq!(
        response.report.metadata.suppressed_ids,
        vec!["CVE-2022-24999"]
    );
    assert_eq!(response.exit_code(), ExitCode::Success);
}

#[tokio::test]
async fn test_failing_source_fails_the_scan() {
    let failing: Arc<dyn VulnerabilityRepository> = MockVulnerabilityRepository::new(DatabaseSource::Osv)
        .with_failure()
        .shared();

    let use_case = build_use_case(
        MockLockfileReader::new("yarn.lock", YARN_LOCK),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![failing],
    );

    let err = use_case.execute(request()).await.unwrap_err();
    assert!(err.to_string().contains("Mock osv query failure"));
}

#[tokio::test]
async fn test_lockfile_read_failure_is_fatal() {
    let use_case = build_use_case(
        MockLockfileReader::with_failure("yarn.lock"),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![clean_osv()],
    );

    let err = use_case.execute(request()).await.unwrap_err();
    assert!(err.to_string().contains("Mock lockfile read failure"));
}

#[tokio::test]
async fn test_malformed_npm_lockfile_is_fatal() {
    let use_case = build_use_case(
        MockLockfileReader::new("package-lock.json", r#"{"lockfileVersion": 1}"#),
        MockIgnoreListReader::default(),
        MockProgressReporter::new(),
        vec![clean_osv()],
    );

    let err = use_case.execute(request()).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse lockfile"));
}

mod network_clients {
    use super::*;
    use mockito::{Matcher, Server};

    /// Full pipeline against mocked OSV and GitHub endpoints
    #[tokio::test]
    async fn test_scan_with_both_http_clients() {
        let mut osv_server = Server::new_async().await;
        let mut github_server = Server::new_async().await;

        let osv_mock = osv_server
            .mock("POST", "/v1/querybatch")
            .match_body(Matcher::Regex("\"name\":\"lodash\"".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"results": [
                    {"vulns": [{"id": "GHSA-35jh-r3h4-6jhm", "modified": "2024-03-01T00:00:00Z"}]},
                    {"vulns": []},
                    {}
                ]}"#,
            )
            .expect(1)
            .create_async()
            .await;
        let osv_details = osv_server
            .mock("GET", "/v1/vulns/GHSA-35jh-r3h4-6jhm")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "id": "GHSA-35jh-r3h4-6jhm",
                    "summary": "Command Injection in lodash",
                    "aliases": ["CVE-2021-23337"],
                    "affected": [{"ranges": [{"type": "SEMVER", "events": [{"introduced": "0"}, {"fixed": "4.17.21"}]}]}]
                }"#,
            )
            .expect(1)
            .create_async()
            .await;

        let github_mock = github_server
            .mock("POST", "/graphql")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data": {
                    "pkg0_lodash": {"nodes": [{
                        "vulnerableVersionRange": ">= 4.0.0, < 4.17.21",
                        "firstPatchedVersion": {"identifier": "4.17.21"},
                        "advisory": {
                            "ghsaId": "GHSA-35jh-r3h4-6jhm",
                            "summary": "Command Injection in lodash",
                            "severity": "HIGH",
                            "permalink": "https://github.com/advisories/GHSA-35jh-r3h4-6jhm",
                            "identifiers": [
                                {"type": "GHSA", "value": "GHSA-35jh-r3h4-6jhm"},
                                {"type": "CVE", "value": "CVE-2021-23337"}
                            ]
                        }
                    }]},
                    "pkg1_axios": {"nodes": []},
                    "pkg2_minimist": {"nodes": []}
                }}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let reporter = MockProgressReporter::new();
        let shared_reporter: Arc<dyn ProgressReporter> = Arc::new(reporter.clone());
        let osv: Arc<dyn VulnerabilityRepository> = Arc::new(
            OsvClient::with_api_url(
                format!("{}/v1/querybatch", osv_server.url()),
                shared_reporter.clone(),
            )
            .unwrap(),
        );
        let github: Arc<dyn VulnerabilityRepository> = Arc::new(
            GitHubAdvisoryClient::with_api_url(
                format!("{}/graphql", github_server.url()),
                Some("test-token".to_string()),
                shared_reporter,
            )
            .unwrap(),
        );

        let lockfile = r#"{
  "name": "app",
  "lockfileVersion": 3,
  "packages": {
    "": {"name": "app", "dependencies": {"lodash": "^4.17.20", "axios": "^1.6.0"}},
    "node_modules/lodash": {"version": "4.17.20"},
    "node_modules/axios": {"version": "1.6.0", "dependencies": {"minimist": "1.2.5"}},
    "node_modules/minimist": {"version": "1.2.5"}
  }
}"#;

        let use_case = build_use_case(
            MockLockfileReader::new("package-lock.json", lockfile),
            MockIgnoreListReader::default(),
            reporter,
            vec![osv, github],
        );

        let response = use_case
            .execute(ScanRequest::new(PathBuf::from("/project"), SourceSelection::All))
            .await
            .unwrap();

        osv_mock.assert_async().await;
        osv_details.assert_async().await;
        github_mock.assert_async().await;

        let report = &response.report;
        assert_eq!(report.summary.total, 3);
        assert_eq!(report.summary.vulnerable, 1);

        let lodash = report.findings.iter().find(|f| f.name == "lodash").unwrap();
        assert_eq!(lodash.vulnerabilities.len(), 1);
        let vuln = &lodash.vulnerabilities[0];
        assert_eq!(vuln.id, "GHSA-35jh-r3h4-6jhm");
        assert_eq!(vuln.aliases, vec!["CVE-2021-23337"]);
        assert_eq!(vuln.severity[0].score, "HIGH");
        assert_eq!(vuln.fixed_in.as_deref(), Some("4.17.21"));
    }
}
