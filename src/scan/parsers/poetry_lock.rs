use crate::ports::outbound::ProgressReporter;
use crate::scan::domain::{DependencyGraph, DependencyNode, DependencyType, NodeId, Registry};
use crate::shared::error::ScanError;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Entries stay raw so one malformed `[[package]]` only loses itself
#[derive(Debug, Deserialize)]
struct PoetryLock {
    #[serde(default)]
    package: Option<Vec<toml::Value>>,
}

#[derive(Debug, Deserialize)]
struct PoetryPackage {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    dependencies: toml::Table,
}

impl PoetryPackage {
    fn is_dev(&self) -> bool {
        self.category.as_deref() == Some("dev")
    }
}

/// Normalizes a Python distribution name (PEP 503)
///
/// Lowercases and collapses every run of `-`, `_` and `.` into one `-`, so
/// `Typing_Extensions` and `typing-extensions` compare equal.
pub fn normalize_python_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                normalized.push('-');
            }
            in_separator = true;
        } else {
            normalized.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    normalized
}

/// Parser for `poetry.lock`
///
/// Each `[[package]]` table is one resolved distribution; the names under
/// its `[package.dependencies]` are resolved against every parsed package.
/// Packages in the `dev` category are kept transitive but still appended to
/// the roots so the traversal reaches them.
pub struct PoetryLockParser;

impl PoetryLockParser {
    pub fn parse(
        path: &Path,
        content: &str,
        reporter: &dyn ProgressReporter,
    ) -> Result<DependencyGraph> {
        let lockfile: PoetryLock =
            toml::from_str(content).map_err(|e| ScanError::parse(path, e.to_string()))?;
        let packages = lockfile
            .package
            .ok_or_else(|| ScanError::parse(path, "no [[package]] sections found"))?;

        let mut versioned: Vec<(PoetryPackage, String)> = Vec::with_capacity(packages.len());
        for (position, entry) in packages.into_iter().enumerate() {
            let mut package: PoetryPackage = match entry.try_into() {
                Ok(package) => package,
                Err(e) => {
                    reporter.report_error(&format!(
                        "⚠️  Skipping [[package]] #{} in {}: {}",
                        position + 1,
                        path.display(),
                        e.to_string().lines().next().unwrap_or_default()
                    ));
                    continue;
                }
            };
            match package.version.take() {
                Some(version) => versioned.push((package, version)),
                None => reporter.report_error(&format!(
                    "⚠️  Skipping {} in {}: package has no version",
                    package.name,
                    path.display()
                )),
            }
        }

        let mut index: HashMap<String, NodeId> = HashMap::new();
        for (package, version) in &versioned {
            index
                .entry(normalize_python_name(&package.name))
                .or_insert_with(|| DependencyNode::make_id(Registry::PyPI, &package.name, version));
        }

        let mut builder = DependencyGraph::builder();
        let mut dev_roots: Vec<NodeId> = Vec::new();

        for (package, version) in &versioned {
            let children = package
                .dependencies
                .keys()
                .filter_map(|name| index.get(&normalize_python_name(name)).cloned());

            let dependency_type = if package.is_dev() {
                DependencyType::Transitive
            } else {
                DependencyType::Direct
            };

            let node = DependencyNode::new(
                Registry::PyPI,
                package.name.as_str(),
                version.as_str(),
                dependency_type,
            )
            .with_dependencies(children);
            let id = node.id().to_string();
            if !builder.add_node(node) {
                continue;
            }

            match dependency_type {
                DependencyType::Direct => builder.add_root(id),
                DependencyType::Transitive => dev_roots.push(id),
            }
        }

        for id in dev_roots {
            builder.add_root(id);
        }

        Ok(builder.build())
    }
}
