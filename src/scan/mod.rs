/// Scan domain: graph model, lockfile parsers, and the pure services that
/// traverse, match, merge, filter and summarise.
pub mod domain;
pub mod parsers;
pub mod services;
