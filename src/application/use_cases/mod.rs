/// Use cases module containing application business logic orchestration
mod check_vulnerabilities;
mod scan_dependencies;

pub use check_vulnerabilities::CheckVulnerabilitiesUseCase;
pub use scan_dependencies::ScanDependenciesUseCase;
