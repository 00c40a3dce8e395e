/// Network adapters for the vulnerability databases
mod github_advisory_client;
mod osv_client;

pub use github_advisory_client::{query_alias, GitHubAdvisoryClient};
pub use osv_client::OsvClient;
